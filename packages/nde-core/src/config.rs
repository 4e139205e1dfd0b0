//! Decoder configuration.
//!
//! Defaults reproduce the behavior of the legacy exporter. A configuration
//! can also be loaded from a JSON file; missing keys fall back to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NdeError, Result};

/// What to do when a data-chain node carries a column id with the high bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidColumnPolicy {
    /// Abort the whole decode with `MalformedChain`
    #[default]
    Abort,
    /// Keep the field; the serializer drops it from output
    Skip,
}

/// What to do when serialization meets a column id missing from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownColumnPolicy {
    /// Fail with `UnknownColumn`
    #[default]
    Fail,
    /// Emit the member under a `column_<id>` key
    Placeholder,
}

/// Numeric rendering rules for DATETIME and LONG fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormattingPolicy {
    /// Byte-compatible with existing consumers: datetime gets a literal
    /// `000` suffix, long is narrowed to `f32` before printing
    #[default]
    Legacy,
    /// Datetime as seconds * 1000, long as the exact integer
    Exact,
}

/// Decoder configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Bytes of index header skipped before anything else
    pub index_header_len: u64,
    /// Absolute offset of the first index slot
    pub index_table_start: u64,
    /// Decode and discard the second index entry
    pub skip_index_chain: bool,
    /// Handling of column ids >= 128 in data chains
    pub invalid_column_policy: InvalidColumnPolicy,
    /// Handling of unregistered column ids at serialization
    pub unknown_column_policy: UnknownColumnPolicy,
    /// DATETIME/LONG rendering
    pub formatting: FormattingPolicy,
    /// Maximum nodes visited per chain (None = derived from data length)
    pub max_chain_hops: Option<u64>,
    /// Maximum retry attempts for transient open errors
    pub open_max_retries: u32,
    /// Delay between retry attempts in milliseconds
    pub open_retry_delay_ms: u64,
    /// Where the CLI writes the JSON document
    pub output_path: PathBuf,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            index_header_len: 8,
            index_table_start: 16,
            skip_index_chain: true,
            invalid_column_policy: InvalidColumnPolicy::Abort,
            unknown_column_policy: UnknownColumnPolicy::Fail,
            formatting: FormattingPolicy::Legacy,
            max_chain_hops: None,
            open_max_retries: 3,
            open_retry_delay_ms: 100,
            output_path: PathBuf::from("output.json"),
        }
    }
}

impl DecodeConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| NdeError::Config(e.to_string()))
    }

    /// Loads a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| NdeError::IoUnavailable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&text)
    }
}
