//! Decoder error types.

use thiserror::Error;

/// Errors raised while opening, decoding or exporting an NDE table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NdeError {
    /// Source file cannot be opened or read
    #[error("Source '{path}' unavailable: {message}")]
    IoUnavailable { path: String, message: String },

    /// Fewer bytes remain than a read requested
    #[error("Truncated input at offset {offset}: requested {requested} bytes, {available} available")]
    TruncatedInput {
        offset: u64,
        requested: usize,
        available: u64,
    },

    /// Serialization referenced a column id the schema never defined
    #[error("Column {column_id} is not defined by the schema chain")]
    UnknownColumn { column_id: u8 },

    /// Chain node is structurally invalid
    #[error("Malformed chain at offset {offset}: {reason}")]
    MalformedChain { offset: u64, reason: String },

    /// Configuration file could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O failure while emitting output
    #[error("I/O error: {0}")]
    Io(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, NdeError>;
