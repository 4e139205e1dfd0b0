use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use nde_core::config::{FormattingPolicy, InvalidColumnPolicy, UnknownColumnPolicy};
use nde_core::DecodeConfig;

/// Export an NDE index/data table pair to JSON.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Index file (.idx)
    pub index: PathBuf,

    /// Data file (.dat)
    pub data: PathBuf,

    /// Where to write the JSON export [default: output.json]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON file with decoder settings; flags override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Keep going past nodes whose column id has the high bit set
    #[arg(long)]
    pub skip_invalid_columns: bool,

    /// What to do with fields whose column has no name
    #[arg(long, value_enum)]
    pub unknown_columns: Option<UnknownColumns>,

    /// Print 64-bit integers and datetimes without legacy rounding
    #[arg(long)]
    pub exact_numbers: bool,

    /// Also write a structural dump of columns and typed fields
    #[arg(long)]
    pub dump: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnknownColumns {
    /// Abort the export
    Fail,
    /// Emit the field under `column_<id>`
    Placeholder,
}

impl From<UnknownColumns> for UnknownColumnPolicy {
    fn from(value: UnknownColumns) -> Self {
        match value {
            UnknownColumns::Fail => UnknownColumnPolicy::Fail,
            UnknownColumns::Placeholder => UnknownColumnPolicy::Placeholder,
        }
    }
}

impl Args {
    /// Layers command-line flags over `config`.
    pub fn apply(&self, mut config: DecodeConfig) -> DecodeConfig {
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if self.skip_invalid_columns {
            config.invalid_column_policy = InvalidColumnPolicy::Skip;
        }
        if let Some(policy) = self.unknown_columns {
            config.unknown_column_policy = policy.into();
        }
        if self.exact_numbers {
            config.formatting = FormattingPolicy::Exact;
        }
        config
    }
}
