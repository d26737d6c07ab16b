//! CLI enum types for the encode/decode commands.

use clap::ValueEnum;
use veil_core::OutputFormat as CoreOutputFormat;

/// Supported report formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl ReportFormat {
    pub fn to_core(self) -> CoreOutputFormat {
        match self {
            ReportFormat::Json => CoreOutputFormat::Json,
            ReportFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }

    pub fn from_core(format: CoreOutputFormat) -> Self {
        match format {
            CoreOutputFormat::Json => ReportFormat::Json,
            CoreOutputFormat::JsonLines => ReportFormat::Jsonl,
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}
