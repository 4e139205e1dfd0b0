//! Decoder for NDE index/data table files.
//!
//! Provides a positioned binary cursor, the index offset table walker, the
//! record chain decoder, the column registry built from the schema chain,
//! and a JSON exporter that reproduces the legacy output layout.

pub mod config;
pub mod cursor;
pub mod decoder;
pub mod error;
pub mod index;
pub mod io_utils;
pub mod json;
pub mod registry;
pub mod session;
pub mod text;
pub mod types;

pub use config::DecodeConfig;
pub use error::{NdeError, Result};
pub use registry::ColumnRegistry;
pub use session::{decode_files, DecodeSession, DecodedTable};
pub use types::{ColumnId, Field, FieldType, FieldValue, Record};
