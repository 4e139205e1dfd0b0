//! JSON export in the fixed layout downstream consumers compare against.
//!
//! The output is written by hand rather than through `serde_json` because the
//! layout is part of the contract: two-space indentation, `", "` between
//! array bytes, six fractional digits for floats, keys emitted verbatim and
//! only `"` and `\` escaped inside strings.

use std::io::Write;

use crate::config::{DecodeConfig, FormattingPolicy, UnknownColumnPolicy};
use crate::error::{NdeError, Result};
use crate::registry::ColumnRegistry;
use crate::types::{Field, FieldType, FieldValue, Record};

/// Renders decoded records as a JSON array of objects.
#[derive(Debug, Clone, Copy)]
pub struct JsonSerializer<'a> {
    registry: &'a ColumnRegistry,
    formatting: FormattingPolicy,
    unknown_columns: UnknownColumnPolicy,
}

impl<'a> JsonSerializer<'a> {
    /// Serializer with legacy formatting that fails on unknown columns.
    pub fn new(registry: &'a ColumnRegistry) -> Self {
        Self {
            registry,
            formatting: FormattingPolicy::Legacy,
            unknown_columns: UnknownColumnPolicy::Fail,
        }
    }

    pub fn with_config(registry: &'a ColumnRegistry, config: &DecodeConfig) -> Self {
        Self {
            registry,
            formatting: config.formatting,
            unknown_columns: config.unknown_column_policy,
        }
    }

    pub fn formatting(mut self, formatting: FormattingPolicy) -> Self {
        self.formatting = formatting;
        self
    }

    pub fn unknown_columns(mut self, policy: UnknownColumnPolicy) -> Self {
        self.unknown_columns = policy;
        self
    }

    /// Renders `records` to a string.
    pub fn serialize(&self, records: &[Record]) -> Result<String> {
        let mut out = String::from("[\n");
        for (i, record) in records.iter().enumerate() {
            out.push_str("  {\n");
            let members = record.iter().filter(|f| is_emitted(f)).collect::<Vec<_>>();
            for (j, field) in members.iter().enumerate() {
                let key = self.key_for(field)?;
                out.push_str("    \"");
                out.push_str(&key);
                out.push_str("\": ");
                out.push_str(&render_value(field, self.formatting));
                if j + 1 < members.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            out.push_str("  }");
            if i + 1 < records.len() {
                out.push(',');
            }
            out.push('\n');
        }
        out.push_str("]\n");
        Ok(out)
    }

    /// Renders `records` into `writer`.
    pub fn write_json<W: Write>(&self, mut writer: W, records: &[Record]) -> Result<()> {
        let text = self.serialize(records)?;
        writer
            .write_all(text.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| NdeError::Io(format!("Failed to write JSON: {}", e)))
    }

    fn key_for(&self, field: &Field) -> Result<String> {
        match self.registry.lookup(field.column_id) {
            Ok(name) => Ok(name.to_string()),
            Err(err) => match self.unknown_columns {
                UnknownColumnPolicy::Fail => Err(err),
                UnknownColumnPolicy::Placeholder => {
                    tracing::warn!("Column {} has no name, using placeholder", field.column_id);
                    Ok(format!("column_{}", field.column_id))
                }
            },
        }
    }
}

/// Renders `records` with the default policies.
pub fn serialize(records: &[Record], registry: &ColumnRegistry) -> Result<String> {
    JsonSerializer::new(registry).serialize(records)
}

/// REDIRECTOR fields and ids with the high bit set never reach the output.
pub fn is_emitted(field: &Field) -> bool {
    field.type_tag != FieldType::Redirector && !field.column_id.is_negative()
}

/// Renders one field value. Non-finite floats have no JSON literal and are
/// written as `null`.
fn render_value(field: &Field, formatting: FormattingPolicy) -> String {
    match (&field.value, field.type_tag) {
        (FieldValue::Text(text), _) => quote(text),
        (FieldValue::UInt32(v), FieldType::DateTime) => match formatting {
            FormattingPolicy::Legacy => format!("{}000", v),
            FormattingPolicy::Exact => (u64::from(*v) * 1000).to_string(),
        },
        (FieldValue::UInt32(v), _) => v.to_string(),
        (FieldValue::Boolean(b), _) => b.to_string(),
        (FieldValue::Binary(bytes), _) => byte_array(bytes),
        (FieldValue::Guid(bytes), _) => byte_array(bytes),
        (FieldValue::Float(v), _) if !v.is_finite() => "null".to_string(),
        (FieldValue::Float(v), _) => format!("{:.6}", v),
        (FieldValue::UInt64(v), _) => match formatting {
            FormattingPolicy::Legacy => format!("{:.0}", *v as f32),
            FormattingPolicy::Exact => v.to_string(),
        },
        (FieldValue::Absent, FieldType::Unknown(tag)) => {
            quote(&format!("UNKNOWN_TYPE: {} - size: {}", tag, field.declared_size))
        }
        (FieldValue::Absent, _) => "null".to_string(),
    }
}

fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn byte_array(bytes: &[u8]) -> String {
    let items: Vec<String> = bytes.iter().map(u8::to_string).collect();
    format!("[{}]", items.join(", "))
}
