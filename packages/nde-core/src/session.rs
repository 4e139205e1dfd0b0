//! Decode session: runs the whole pipeline over one index/data pair.
//!
//! Index entry order is fixed: the first offset is the schema chain, the
//! second is the table's own index chain (decoded and dropped), every
//! remaining offset is one data record.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use serde::Serialize;

use crate::config::DecodeConfig;
use crate::decoder::ChainDecoder;
use crate::error::{NdeError, Result};
use crate::index::IndexWalker;
use crate::io_utils::open_source;
use crate::json::JsonSerializer;
use crate::registry::ColumnRegistry;
use crate::types::Record;

#[cfg(feature = "mmap")]
use memmap2::Mmap;

/// In-memory byte source the data file is decoded from.
#[cfg(feature = "mmap")]
pub type DataSource = Cursor<Mmap>;

/// In-memory byte source the data file is decoded from.
#[cfg(not(feature = "mmap"))]
pub type DataSource = Cursor<Vec<u8>>;

/// Column names plus every decoded data record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecodedTable {
    pub registry: ColumnRegistry,
    pub records: Vec<Record>,
}

impl DecodedTable {
    /// Renders the table with the serializer policies from `config`.
    pub fn to_json(&self, config: &DecodeConfig) -> Result<String> {
        JsonSerializer::with_config(&self.registry, config).serialize(&self.records)
    }

    /// Pretty-printed structural dump of columns and typed fields, for
    /// inspecting a table rather than consuming it.
    pub fn to_structured_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| NdeError::Io(format!("Failed to serialize table dump: {}", e)))
    }

    /// Writes the table as JSON into `writer`.
    pub fn write_json<W: std::io::Write>(&self, writer: W, config: &DecodeConfig) -> Result<()> {
        JsonSerializer::with_config(&self.registry, config).write_json(writer, &self.records)
    }
}

/// Decodes one index/data pair.
#[derive(Debug)]
pub struct DecodeSession<I, D> {
    index: IndexWalker<I>,
    decoder: ChainDecoder<D>,
    config: DecodeConfig,
}

impl DecodeSession<Cursor<Vec<u8>>, DataSource> {
    /// Opens both files and loads them for random access.
    ///
    /// # Returns
    /// `IoUnavailable` if either file cannot be opened or read.
    pub fn open(index_path: &Path, data_path: &Path, config: DecodeConfig) -> Result<Self> {
        let index = read_source(index_path, &config)?;
        let data = load_data(data_path, &config)?;
        tracing::debug!(
            "Opened index {} ({} bytes) and data {}",
            index_path.display(),
            index.len(),
            data_path.display()
        );
        Self::new(Cursor::new(index), data, config)
    }
}

impl<I: Read + Seek, D: Read + Seek> DecodeSession<I, D> {
    pub fn new(index: I, data: D, config: DecodeConfig) -> Result<Self> {
        let index =
            IndexWalker::with_layout(index, config.index_header_len, config.index_table_start)?;
        let decoder = ChainDecoder::with_config(data, &config)?;
        Ok(Self {
            index,
            decoder,
            config,
        })
    }

    /// Runs schema, index and data decoding in order.
    pub fn decode(mut self) -> Result<DecodedTable> {
        self.index.read_header()?;

        let schema_offset = self.index.next_offset()?;
        if schema_offset == 0 {
            tracing::info!("Index table is empty, nothing to decode");
            return Ok(DecodedTable::default());
        }
        let mut registry = ColumnRegistry::new();
        self.decoder.decode_schema(schema_offset, &mut registry)?;

        let offsets = &mut self.index;
        if self.config.skip_index_chain {
            match offsets.next().transpose()? {
                Some(offset) => {
                    let discarded = self.decoder.decode_chain(offset)?;
                    tracing::debug!(
                        "Skipped index chain at {:#x} ({} fields)",
                        offset,
                        discarded.len()
                    );
                }
                None => {
                    tracing::info!("Index table holds a schema only");
                    return Ok(DecodedTable {
                        registry,
                        records: Vec::new(),
                    });
                }
            }
        }

        let mut records = Vec::new();
        for offset in offsets {
            let offset = offset?;
            records.push(self.decoder.decode_chain(offset)?);
        }

        tracing::info!(
            "Decoded {} records against {} columns",
            records.len(),
            registry.len()
        );
        Ok(DecodedTable { registry, records })
    }
}

/// Decodes the files at `index_path` and `data_path` in one call.
pub fn decode_files(
    index_path: &Path,
    data_path: &Path,
    config: &DecodeConfig,
) -> Result<DecodedTable> {
    DecodeSession::open(index_path, data_path, config.clone())?.decode()
}

fn read_source(path: &Path, config: &DecodeConfig) -> Result<Vec<u8>> {
    let mut file = open_source(path, config.open_max_retries, config.open_retry_delay_ms)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| NdeError::IoUnavailable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    Ok(bytes)
}

#[cfg(not(feature = "mmap"))]
fn load_data(path: &Path, config: &DecodeConfig) -> Result<DataSource> {
    read_source(path, config).map(Cursor::new)
}

#[cfg(feature = "mmap")]
fn load_data(path: &Path, config: &DecodeConfig) -> Result<DataSource> {
    let file = open_source(path, config.open_max_retries, config.open_retry_delay_ms)?;
    // The mapping is read-only and lives no longer than the session.
    let mmap = unsafe {
        Mmap::map(&file).map_err(|e| NdeError::IoUnavailable {
            path: path.display().to_string(),
            message: format!("Failed to memory map file: {}", e),
        })?
    };
    Ok(Cursor::new(mmap))
}
