//! File-backed decoding through `decode_files`.

use std::fs;

use nde_core::{decode_files, DecodeConfig, NdeError};
use ntest::timeout;
use tempfile::tempdir;

use super::helpers::*;

#[timeout(2000)]
#[test]
fn test_decode_files_round_trip() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let (index, data) = suite_fixture();
    let index_path = dir.path().join("suite.idx");
    let data_path = dir.path().join("suite.dat");
    fs::write(&index_path, index)?;
    fs::write(&data_path, data)?;

    let config = DecodeConfig::default();
    let table = decode_files(&index_path, &data_path, &config)?;
    assert_eq!(table.records.len(), 2);

    let out_path = dir.path().join("output.json");
    let file = fs::File::create(&out_path)?;
    table.write_json(file, &config)?;
    assert_eq!(fs::read_to_string(&out_path)?, SUITE_JSON);
    Ok(())
}

#[timeout(2000)]
#[test]
fn test_missing_index_is_unavailable() {
    let dir = tempdir().unwrap();
    let data_path = dir.path().join("suite.dat");
    fs::write(&data_path, DataImage::new().bytes).unwrap();

    let config = DecodeConfig {
        open_retry_delay_ms: 0,
        ..Default::default()
    };
    let err = decode_files(&dir.path().join("nope.idx"), &data_path, &config).unwrap_err();
    match err {
        NdeError::IoUnavailable { path, .. } => assert!(path.ends_with("nope.idx")),
        other => panic!("expected IoUnavailable, got {other:?}"),
    }
}

#[timeout(2000)]
#[test]
fn test_missing_data_is_unavailable() {
    let dir = tempdir().unwrap();
    let index_path = dir.path().join("suite.idx");
    fs::write(&index_path, index_image(&[])).unwrap();

    let err = decode_files(&index_path, &dir.path().join("nope.dat"), &DecodeConfig::default())
        .unwrap_err();
    assert!(matches!(err, NdeError::IoUnavailable { .. }));
}

#[timeout(2000)]
#[test]
fn test_config_file_overrides() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let config_path = dir.path().join("nde.json");
    fs::write(
        &config_path,
        r#"{ "formatting": "exact", "output_path": "rows.json" }"#,
    )?;

    let config = DecodeConfig::from_file(&config_path)?;
    assert_eq!(config.formatting, nde_core::config::FormattingPolicy::Exact);
    assert_eq!(config.output_path, std::path::PathBuf::from("rows.json"));
    assert!(config.skip_index_chain);
    Ok(())
}
