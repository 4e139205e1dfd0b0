//! Field model: type tags, column ids, decoded values and records.

mod column_id;
mod field;
mod field_type;

pub use column_id::{ColumnId, MAX_COLUMNS};
pub use field::{Field, FieldValue, Record};
pub use field_type::FieldType;
