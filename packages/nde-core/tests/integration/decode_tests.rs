//! Session-level decoding over in-memory index/data images.

use std::io::Cursor;

use nde_core::config::InvalidColumnPolicy;
use nde_core::{ColumnId, DecodeConfig, DecodeSession, DecodedTable, FieldType, FieldValue, NdeError};
use ntest::timeout;

use super::helpers::*;

fn decode(index: Vec<u8>, data: Vec<u8>, config: DecodeConfig) -> Result<DecodedTable, NdeError> {
    DecodeSession::new(Cursor::new(index), Cursor::new(data), config)?.decode()
}

#[timeout(1000)]
#[test]
fn test_suite_registry_and_records() {
    let (index, data) = suite_fixture();
    let table = decode(index, data, DecodeConfig::default()).unwrap();

    assert_eq!(table.registry.len(), SUITE_COLUMNS.len());
    for (id, name) in SUITE_COLUMNS.iter().enumerate() {
        assert_eq!(table.registry.lookup(ColumnId::new(id as u8)).unwrap(), *name);
    }

    assert_eq!(table.records.len(), 2);
    let first = &table.records[0];
    // 12 values plus the redirector that splices in the tail region.
    assert_eq!(first.len(), 13);
    let tags: Vec<FieldType> = first.iter().map(|f| f.type_tag).collect();
    assert_eq!(
        tags,
        vec![
            FieldType::Filename,
            FieldType::String,
            FieldType::String,
            FieldType::Boolean,
            FieldType::Integer,
            FieldType::DateTime,
            FieldType::Length,
            FieldType::Long,
            FieldType::Redirector,
            FieldType::String,
            FieldType::Binary,
            FieldType::Guid,
            FieldType::Float,
        ]
    );
    assert_eq!(
        first.get(ColumnId::new(0)).map(|f| &f.value),
        Some(&FieldValue::Text("abc.mp3".to_string()))
    );
    assert_eq!(first.fields()[10].declared_size, 5);
    assert_eq!(first.fields()[11].declared_size, 16);

    let second = &table.records[1];
    assert_eq!(second.len(), 3);
    assert_eq!(second.fields()[1].type_tag, FieldType::Unknown(255));
    assert_eq!(second.fields()[1].declared_size, 4);
}

#[timeout(1000)]
#[test]
fn test_empty_index_decodes_nothing() {
    let table = decode(index_image(&[]), DataImage::new().bytes, DecodeConfig::default()).unwrap();
    assert!(table.registry.is_empty());
    assert!(table.records.is_empty());
    assert_eq!(table.to_json(&DecodeConfig::default()).unwrap(), "[\n]\n");
}

#[timeout(1000)]
#[test]
fn test_schema_only_index() {
    let mut data = DataImage::new();
    let schema = data.chain(&[NodeDef::column(0, "only")]);
    let table = decode(index_image(&[schema]), data.bytes, DecodeConfig::default()).unwrap();
    assert_eq!(table.registry.len(), 1);
    assert!(table.records.is_empty());
}

#[timeout(1000)]
#[test]
fn test_index_chain_is_not_a_record() {
    let mut data = DataImage::new();
    let schema = data.chain(&[NodeDef::column(0, "name")]);
    let index_chain = data.chain(&[NodeDef::string(0, "index")]);
    let record = data.chain(&[NodeDef::string(0, "row")]);

    let image = index_image(&[schema, index_chain, record]);
    let table = decode(image.clone(), data.bytes.clone(), DecodeConfig::default()).unwrap();
    assert_eq!(table.records.len(), 1);
    assert_eq!(
        table.records[0].fields()[0].value,
        FieldValue::Text("row".to_string())
    );

    let keep_index = DecodeConfig {
        skip_index_chain: false,
        ..Default::default()
    };
    let table = decode(image, data.bytes, keep_index).unwrap();
    assert_eq!(table.records.len(), 2);
}

#[timeout(1000)]
#[test]
fn test_narrow_strings_decode_to_text() {
    let mut data = DataImage::new();
    let schema = data.chain(&[NodeDef::column(0, "filename")]);
    let index_chain = data.chain(&[NodeDef::raw(0, TAG_INDEX, 0)]);
    let record = data.chain(&[NodeDef::narrow_string(0, "plain.mp3")]);

    let table = decode(
        index_image(&[schema, index_chain, record]),
        data.bytes,
        DecodeConfig::default(),
    )
    .unwrap();
    assert_eq!(
        table.records[0].fields()[0].value,
        FieldValue::Text("plain.mp3".to_string())
    );
}

#[timeout(1000)]
#[test]
fn test_high_column_id_aborts_whole_run() {
    let mut data = DataImage::new();
    let schema = data.chain(&[NodeDef::column(0, "a")]);
    let index_chain = data.chain(&[NodeDef::raw(0, TAG_INDEX, 0)]);
    let good = data.chain(&[NodeDef::u32(0, TAG_INTEGER, 1)]);
    let bad = data.chain(&[NodeDef::u32(0, TAG_INTEGER, 2), NodeDef::u32(0xFF, TAG_INTEGER, 3)]);

    let err = decode(
        index_image(&[schema, index_chain, good, bad]),
        data.bytes,
        DecodeConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, NdeError::MalformedChain { .. }));
}

#[timeout(1000)]
#[test]
fn test_high_column_id_skipped_when_configured() {
    let mut data = DataImage::new();
    let schema = data.chain(&[NodeDef::column(0, "a")]);
    let index_chain = data.chain(&[NodeDef::raw(0, TAG_INDEX, 0)]);
    let record = data.chain(&[NodeDef::u32(0, TAG_INTEGER, 2), NodeDef::u32(0xFF, TAG_INTEGER, 3)]);

    let config = DecodeConfig {
        invalid_column_policy: InvalidColumnPolicy::Skip,
        ..Default::default()
    };
    let table = decode(index_image(&[schema, index_chain, record]), data.bytes, config.clone()).unwrap();
    assert_eq!(table.records[0].len(), 2);
    assert_eq!(
        table.to_json(&config).unwrap(),
        "[\n  {\n    \"a\": 2\n  }\n]\n"
    );
}

#[timeout(1000)]
#[test]
fn test_truncated_data_is_fatal() {
    let (index, mut data) = suite_fixture();
    data.truncate(data.len() - 3);
    let err = decode(index, data, DecodeConfig::default()).unwrap_err();
    assert!(matches!(err, NdeError::TruncatedInput { .. }));
}

#[timeout(1000)]
#[test]
fn test_offset_beyond_data_is_truncated() {
    let mut data = DataImage::new();
    let schema = data.chain(&[NodeDef::column(0, "a")]);
    let index_chain = data.chain(&[NodeDef::raw(0, TAG_INDEX, 0)]);
    let err = decode(
        index_image(&[schema, index_chain, 0x00FF_FFFF]),
        data.bytes,
        DecodeConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, NdeError::TruncatedInput { offset: 0x00FF_FFFF, .. }));
}

#[timeout(1000)]
#[test]
fn test_self_referencing_chain_terminates() {
    let mut data = DataImage::new();
    let schema = data.chain(&[NodeDef::column(0, "a")]);
    let index_chain = data.chain(&[NodeDef::raw(0, TAG_INDEX, 0)]);
    let at = data.bytes.len() as u32;
    data.write_node(&NodeDef::u32(0, TAG_INTEGER, 1), at);

    let err = decode(index_image(&[schema, index_chain, at]), data.bytes, DecodeConfig::default())
        .unwrap_err();
    assert!(matches!(err, NdeError::MalformedChain { .. }));
}

#[timeout(1000)]
#[test]
fn test_redirector_loop_terminates() {
    let mut data = DataImage::new();
    let schema = data.chain(&[NodeDef::column(0, "a")]);
    let index_chain = data.chain(&[NodeDef::raw(0, TAG_INDEX, 0)]);
    let at = data.bytes.len() as u32;
    data.write_node(&NodeDef::redirector(0, at), 0);

    let err = decode(index_image(&[schema, index_chain, at]), data.bytes, DecodeConfig::default())
        .unwrap_err();
    assert!(matches!(err, NdeError::MalformedChain { .. }));
}

#[timeout(1000)]
#[test]
fn test_duplicate_column_last_definition_wins() {
    let mut data = DataImage::new();
    let schema = data.chain(&[NodeDef::column(0, "first"), NodeDef::column(0, "second")]);
    let table = decode(index_image(&[schema]), data.bytes, DecodeConfig::default()).unwrap();
    assert_eq!(table.registry.lookup(ColumnId::new(0)).unwrap(), "second");
}
