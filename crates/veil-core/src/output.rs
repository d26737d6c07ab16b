//! Transform reports in JSON or JSONL.
//!
//! A JSON report is one array written once the batch is finished. JSONL gets
//! one record per line as each file completes, so a long run can be tailed.

use serde::Serialize;
use std::io::{self, Write};

use crate::types::OutputRecord;

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One JSON document: an object for a single file, an array for a batch
    Json,
    /// Newline-delimited JSON
    JsonLines,
}

impl OutputFormat {
    /// Parse a format name, ignoring case. `jsonlines` and `ndjson` are
    /// accepted as aliases for `jsonl`.
    pub fn parse(s: &str) -> Option<Self> {
        const LINE_ALIASES: [&str; 3] = ["jsonl", "jsonlines", "ndjson"];
        if s.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else if LINE_ALIASES.iter().any(|alias| s.eq_ignore_ascii_case(alias)) {
            Some(Self::JsonLines)
        } else {
            None
        }
    }

    /// Whether records can be written one at a time as they complete.
    pub fn is_streaming(self) -> bool {
        matches!(self, Self::JsonLines)
    }
}

/// How many records of each status went into a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportTally {
    pub ok: usize,
    pub failed: usize,
}

impl ReportTally {
    fn count(&mut self, record: &OutputRecord) {
        match record {
            OutputRecord::Ok(_) => self.ok += 1,
            OutputRecord::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.ok + self.failed
    }
}

/// Serializes [`OutputRecord`]s to a report sink.
pub struct OutputWriter<W: Write> {
    out: W,
    format: OutputFormat,
    pretty: bool,
    tally: ReportTally,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` only affects JSON; JSONL always stays one record per line.
    pub fn new(out: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            out,
            format,
            pretty,
            tally: ReportTally::default(),
        }
    }

    /// Write one record as soon as it is available.
    pub fn write(&mut self, record: &OutputRecord) -> io::Result<()> {
        self.emit(record)?;
        self.tally.count(record);
        Ok(())
    }

    /// Write a finished batch: an array for JSON, a line per record for JSONL.
    pub fn write_all(&mut self, records: &[OutputRecord]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                self.emit(records)?;
                records.iter().for_each(|r| self.tally.count(r));
            }
            OutputFormat::JsonLines => {
                for record in records {
                    self.write(record)?;
                }
            }
        }
        Ok(())
    }

    pub fn tally(&self) -> ReportTally {
        self.tally
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn emit<T: Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        let serialized = if self.pretty && self.format == OutputFormat::Json {
            serde_json::to_writer_pretty(&mut self.out, value)
        } else {
            serde_json::to_writer(&mut self.out, value)
        };
        serialized.map_err(io::Error::other)?;
        writeln!(self.out)
    }
}

/// Render one record, as printed to stdout for a single-file run.
pub fn to_json(record: &OutputRecord, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(record)
    } else {
        serde_json::to_string(record)
    }
}
