//! Record chain decoder.
//!
//! A chain is a singly-linked list of nodes scattered through the data file.
//! Each node is a 14-byte header followed by a payload whose shape is set by
//! the node's type tag:
//!
//! ```text
//! id: u8 | type: u8 | size: u32 | next: u32 | prev: u32 | payload...
//! ```
//!
//! Traversal follows `next` (0 terminates) and never file order. REDIRECTOR
//! nodes replace `next` with an offset read from their payload.

use std::collections::HashSet;
use std::io::{Read, Seek};

use crate::config::{DecodeConfig, InvalidColumnPolicy};
use crate::cursor::BinaryCursor;
use crate::error::{NdeError, Result};
use crate::registry::ColumnRegistry;
use crate::text::decode_text;
use crate::types::{ColumnId, Field, FieldType, FieldValue, Record};

/// Size of a chain node header in bytes.
pub const NODE_HEADER_LEN: u64 = 14;

/// Payload size of a GUID node, regardless of its header.
pub const GUID_LEN: usize = 16;

/// Header of one chain node. Transient decode state, never stored in records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainNode {
    pub id: ColumnId,
    pub field_type: FieldType,
    pub size: u32,
    /// Absolute offset of the next node, 0 terminates the chain
    pub next: u32,
    /// Present on disk, unused
    pub prev: u32,
}

/// One COLUMN node from the schema chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub column_id: ColumnId,
    pub unique: bool,
    pub name: String,
}

/// Decodes chains from a data file.
#[derive(Debug)]
pub struct ChainDecoder<R> {
    cursor: BinaryCursor<R>,
    invalid_column_policy: InvalidColumnPolicy,
    max_hops: u64,
}

impl<R: Read + Seek> ChainDecoder<R> {
    /// Creates a decoder with default configuration.
    pub fn new(source: R) -> Result<Self> {
        Self::with_config(source, &DecodeConfig::default())
    }

    pub fn with_config(source: R, config: &DecodeConfig) -> Result<Self> {
        let cursor = BinaryCursor::new(source)?;
        // Every hop consumes at least a full header, so no valid chain can be
        // longer than this.
        let max_hops = config
            .max_chain_hops
            .unwrap_or(cursor.len() / NODE_HEADER_LEN + 1);
        Ok(Self {
            cursor,
            invalid_column_policy: config.invalid_column_policy,
            max_hops,
        })
    }

    /// Reads a node header at the current position.
    pub fn read_node(&mut self) -> Result<ChainNode> {
        Ok(ChainNode {
            id: ColumnId::new(self.cursor.read_u8()?),
            field_type: FieldType::from_u8(self.cursor.read_u8()?),
            size: self.cursor.read_u32_le()?,
            next: self.cursor.read_u32_le()?,
            prev: self.cursor.read_u32_le()?,
        })
    }

    /// Decodes the schema chain at `start`, registering every column it defines.
    ///
    /// # Returns
    /// The number of COLUMN nodes seen.
    pub fn decode_schema(&mut self, start: u32, registry: &mut ColumnRegistry) -> Result<usize> {
        let mut defined = 0usize;
        self.walk(start, |cursor, node, node_offset| {
            match node.field_type {
                FieldType::Column => {
                    if !node.id.is_valid() {
                        return Err(NdeError::MalformedChain {
                            offset: node_offset,
                            reason: format!("schema column id {} out of range", node.id),
                        });
                    }
                    let column = read_column(cursor)?;
                    if column.column_id != node.id {
                        tracing::warn!(
                            "Schema node at {:#x} has id {} but defines column {}; using node id",
                            node_offset,
                            node.id,
                            column.column_id
                        );
                    }
                    tracing::debug!(
                        "Column {}: '{}'{}",
                        node.id,
                        column.name,
                        if column.unique { " (unique)" } else { "" }
                    );
                    registry.register(node.id, column.name);
                    defined += 1;
                }
                FieldType::Redirector => {
                    node.next = cursor.read_u32_le()?;
                }
                other => {
                    tracing::warn!(
                        "Ignoring {} node at {:#x} in schema chain",
                        other,
                        node_offset
                    );
                }
            }
            Ok(())
        })?;
        tracing::debug!("Schema chain at {:#x} defined {} columns", start, defined);
        Ok(defined)
    }

    /// Decodes one data chain into a record.
    ///
    /// REDIRECTOR nodes are kept as fields so callers can see them; COLUMN
    /// nodes are consumed without producing a field.
    pub fn decode_chain(&mut self, start: u32) -> Result<Record> {
        let policy = self.invalid_column_policy;
        let mut record = Record::default();
        self.walk(start, |cursor, node, node_offset| {
            if node.id.is_negative() {
                match policy {
                    InvalidColumnPolicy::Abort => {
                        return Err(NdeError::MalformedChain {
                            offset: node_offset,
                            reason: format!("column id {} >= 128 in data chain", node.id),
                        });
                    }
                    InvalidColumnPolicy::Skip => {
                        tracing::debug!(
                            "Node at {:#x} has invalid column id {}, keeping it out of output",
                            node_offset,
                            node.id
                        );
                    }
                }
            }

            let Some(field) = read_field(cursor, node)? else {
                tracing::warn!(
                    "Ignoring column definition at {:#x} inside a data chain",
                    node_offset
                );
                return Ok(());
            };
            tracing::trace!(
                "Field column={} type={} size={} at {:#x}",
                field.column_id,
                field.type_tag,
                field.declared_size,
                node_offset
            );
            record.push(field);
            Ok(())
        })?;
        Ok(record)
    }

    /// Follows a chain from `start`, calling `visit` once per node with the
    /// cursor positioned at the node's payload. `visit` may rewrite `next`.
    fn walk<F>(&mut self, start: u32, mut visit: F) -> Result<()>
    where
        F: FnMut(&mut BinaryCursor<R>, &mut ChainNode, u64) -> Result<()>,
    {
        let mut visited = HashSet::new();
        let mut offset = start;
        loop {
            let node_offset = u64::from(offset);
            if !visited.insert(offset) {
                return Err(NdeError::MalformedChain {
                    offset: node_offset,
                    reason: "chain loops back to an already visited node".to_string(),
                });
            }
            if visited.len() as u64 > self.max_hops {
                return Err(NdeError::MalformedChain {
                    offset: node_offset,
                    reason: format!("chain exceeds {} nodes", self.max_hops),
                });
            }

            self.cursor.seek_absolute(node_offset)?;
            let mut node = self.read_node()?;
            visit(&mut self.cursor, &mut node, node_offset)?;

            if node.next == 0 {
                return Ok(());
            }
            offset = node.next;
        }
    }
}

fn read_column<R: Read + Seek>(cursor: &mut BinaryCursor<R>) -> Result<ColumnDefinition> {
    let column_id = ColumnId::new(cursor.read_u8()?);
    let unique = cursor.read_u8()? != 0;
    let len = cursor.read_u8()?;
    let raw = cursor.read_bytes(usize::from(len))?;
    Ok(ColumnDefinition {
        column_id,
        unique,
        name: decode_text(&raw).unwrap_or_default(),
    })
}

/// Parses a node payload into a field. REDIRECTOR rewrites `node.next`;
/// COLUMN payloads are consumed and yield no field.
fn read_field<R: Read + Seek>(
    cursor: &mut BinaryCursor<R>,
    node: &mut ChainNode,
) -> Result<Option<Field>> {
    let mut size = node.size;
    let value = match node.field_type {
        FieldType::Column => {
            read_column(cursor)?;
            return Ok(None);
        }
        FieldType::Index => FieldValue::Absent,
        FieldType::Redirector => {
            node.next = cursor.read_u32_le()?;
            FieldValue::Absent
        }
        FieldType::String | FieldType::Filename => {
            let len = cursor.read_u16_le()?;
            let raw = cursor.read_bytes(usize::from(len))?;
            decode_text(&raw).map_or(FieldValue::Absent, FieldValue::Text)
        }
        FieldType::Integer | FieldType::Length | FieldType::DateTime => {
            FieldValue::UInt32(cursor.read_u32_le()?)
        }
        FieldType::Boolean => FieldValue::Boolean(cursor.read_u8()? != 0),
        FieldType::Binary => {
            // The header size is not reliable for BINARY; the inline length is.
            let len = cursor.read_u16_le()?;
            size = u32::from(len);
            FieldValue::Binary(cursor.read_bytes(usize::from(len))?)
        }
        FieldType::Guid => {
            size = GUID_LEN as u32;
            FieldValue::Guid(cursor.read_array::<GUID_LEN>()?)
        }
        FieldType::Float => FieldValue::Float(cursor.read_f32_le()?),
        FieldType::Long => FieldValue::UInt64(cursor.read_u64_le()?),
        FieldType::Unknown(tag) => {
            tracing::debug!("Unsupported field type {} (size {})", tag, node.size);
            FieldValue::Absent
        }
    };
    Ok(Some(Field::new(node.id, node.field_type, size, value)))
}
