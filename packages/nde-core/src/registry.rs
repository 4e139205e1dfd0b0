//! Column id to display name mapping built from the schema chain.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{NdeError, Result};
use crate::types::ColumnId;

/// Registry of column names.
///
/// Filled once while the schema chain is decoded and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnRegistry {
    columns: BTreeMap<ColumnId, String>,
}

impl ColumnRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a column name. A duplicate id replaces the earlier name.
    pub fn register(&mut self, column_id: ColumnId, name: impl Into<String>) {
        let name = name.into();
        if let Some(previous) = self.columns.insert(column_id, name) {
            tracing::debug!(
                "Column {} redefined, replacing previous name '{}'",
                column_id,
                previous
            );
        }
    }

    /// Looks up a column name.
    ///
    /// # Returns
    /// The registered name, or `UnknownColumn` if the schema never defined it.
    pub fn lookup(&self, column_id: ColumnId) -> Result<&str> {
        self.get(column_id).ok_or(NdeError::UnknownColumn {
            column_id: column_id.get(),
        })
    }

    pub fn get(&self, column_id: ColumnId) -> Option<&str> {
        self.columns.get(&column_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (ColumnId, &str)> {
        self.columns.iter().map(|(id, name)| (*id, name.as_str()))
    }
}
