use serde::Serialize;

use super::{ColumnId, FieldType};

/// Decoded payload of one chain node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// STRING / FILENAME, already converted to UTF-8
    Text(String),
    /// INTEGER / LENGTH / DATETIME
    UInt32(u32),
    Boolean(bool),
    Binary(Vec<u8>),
    Guid([u8; 16]),
    Float(f32),
    /// LONG
    UInt64(u64),
    /// INDEX, REDIRECTOR, empty text and unsupported tags
    Absent,
}

/// One decoded field of a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub column_id: ColumnId,
    pub type_tag: FieldType,
    /// Size from the node header, or the re-read length for BINARY/GUID
    pub declared_size: u32,
    pub value: FieldValue,
}

impl Field {
    /// Pairs a value with its type tag.
    ///
    /// The value variant must be one the tag can produce, see [`Field::accepts`].
    pub fn new(
        column_id: ColumnId,
        type_tag: FieldType,
        declared_size: u32,
        value: FieldValue,
    ) -> Self {
        debug_assert!(
            Self::accepts(type_tag, &value),
            "value {:?} does not match type {}",
            value,
            type_tag
        );
        Self {
            column_id,
            type_tag,
            declared_size,
            value,
        }
    }

    /// Whether `value` is a payload shape `type_tag` can carry.
    pub fn accepts(type_tag: FieldType, value: &FieldValue) -> bool {
        use FieldType as T;
        use FieldValue as V;
        matches!(
            (type_tag, value),
            (T::String | T::Filename, V::Text(_) | V::Absent)
                | (T::Integer | T::Length | T::DateTime, V::UInt32(_))
                | (T::Boolean, V::Boolean(_))
                | (T::Binary, V::Binary(_))
                | (T::Guid, V::Guid(_))
                | (T::Float, V::Float(_))
                | (T::Long, V::UInt64(_))
                | (T::Index | T::Redirector | T::Unknown(_), V::Absent)
        )
    }

    /// Absent text, INDEX, REDIRECTOR and unknown tags carry nothing.
    pub fn is_absent(&self) -> bool {
        matches!(self.value, FieldValue::Absent)
    }
}

/// Fields of one chain, in the order the chain was walked.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: Vec<Field>,
}

impl Record {
    pub fn from_fields(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// First field stored under `column_id`, if any.
    pub fn get(&self, column_id: ColumnId) -> Option<&Field> {
        self.fields.iter().find(|f| f.column_id == column_id)
    }

    pub(crate) fn push(&mut self, field: Field) {
        self.fields.push(field);
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
