use std::fmt;

use serde::Serialize;

/// Number of column slots a table can define. Ids at or above this never
/// resolve to a name.
pub const MAX_COLUMNS: u8 = 64;

/// Column identifier as stored in a chain node header.
///
/// The on-disk byte is unsigned. Legacy readers stored it in a signed byte
/// and dropped "negative" ids; [`ColumnId::is_negative`] names that test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ColumnId(u8);

impl ColumnId {
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    /// Raw byte value.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// True when the id can reference a registered column (`< 64`).
    pub const fn is_valid(self) -> bool {
        self.0 < MAX_COLUMNS
    }

    /// True when the high bit is set (`>= 128`).
    pub const fn is_negative(self) -> bool {
        self.0 & 0x80 != 0
    }
}

impl From<u8> for ColumnId {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
