use std::fmt;

use serde::Serialize;

/// On-disk type tag of a chain node.
///
/// Tag 8 is unassigned; it and anything above 13 decode as [`FieldType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Column,
    Index,
    Redirector,
    String,
    Integer,
    Boolean,
    Binary,
    Guid,
    Float,
    DateTime,
    Length,
    Filename,
    Long,
    Unknown(u8),
}

impl FieldType {
    pub const fn from_u8(tag: u8) -> Self {
        match tag {
            0 => FieldType::Column,
            1 => FieldType::Index,
            2 => FieldType::Redirector,
            3 => FieldType::String,
            4 => FieldType::Integer,
            5 => FieldType::Boolean,
            6 => FieldType::Binary,
            7 => FieldType::Guid,
            9 => FieldType::Float,
            10 => FieldType::DateTime,
            11 => FieldType::Length,
            12 => FieldType::Filename,
            13 => FieldType::Long,
            other => FieldType::Unknown(other),
        }
    }

    pub const fn as_u8(self) -> u8 {
        match self {
            FieldType::Column => 0,
            FieldType::Index => 1,
            FieldType::Redirector => 2,
            FieldType::String => 3,
            FieldType::Integer => 4,
            FieldType::Boolean => 5,
            FieldType::Binary => 6,
            FieldType::Guid => 7,
            FieldType::Float => 9,
            FieldType::DateTime => 10,
            FieldType::Length => 11,
            FieldType::Filename => 12,
            FieldType::Long => 13,
            FieldType::Unknown(tag) => tag,
        }
    }

}

impl From<u8> for FieldType {
    fn from(tag: u8) -> Self {
        Self::from_u8(tag)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Column => "COLUMN",
            FieldType::Index => "INDEX",
            FieldType::Redirector => "REDIRECTOR",
            FieldType::String => "STRING",
            FieldType::Integer => "INTEGER",
            FieldType::Boolean => "BOOLEAN",
            FieldType::Binary => "BINARY",
            FieldType::Guid => "GUID",
            FieldType::Float => "FLOAT",
            FieldType::DateTime => "DATETIME",
            FieldType::Length => "LENGTH",
            FieldType::Filename => "FILENAME",
            FieldType::Long => "LONG",
            FieldType::Unknown(tag) => return write!(f, "UNKNOWN({})", tag),
        };
        f.write_str(name)
    }
}
