//! Command-line exporter for NDE tables.
//!
//! Decodes an index/data file pair and writes the records as JSON, then
//! prints how many records were exported.

mod cli;

use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use nde_core::{decode_files, DecodeConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::Args;

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(count) => println!("Total Records Processed: {}", count),
        Err(e) => {
            tracing::error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

/// Runs one export and returns the number of records written.
fn run(args: &Args) -> Result<usize> {
    let base = match &args.config {
        Some(path) => DecodeConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DecodeConfig::default(),
    };
    let config = args.apply(base);

    let table = decode_files(&args.index, &args.data, &config).with_context(|| {
        format!(
            "Failed to decode {} / {}",
            args.index.display(),
            args.data.display()
        )
    })?;

    if let Some(dump_path) = &args.dump {
        let dump = table.to_structured_json()?;
        fs::write(dump_path, dump)
            .with_context(|| format!("Failed to write dump {}", dump_path.display()))?;
        tracing::info!("Wrote structural dump to {}", dump_path.display());
    }

    // Nothing touches the output path until serialization has succeeded.
    let json = table
        .to_json(&config)
        .context("Failed to serialize records")?;
    fs::write(&config.output_path, json)
        .with_context(|| format!("Failed to write {}", config.output_path.display()))?;
    tracing::info!(
        "Exported {} records to {}",
        table.records.len(),
        config.output_path.display()
    );

    Ok(table.records.len())
}
