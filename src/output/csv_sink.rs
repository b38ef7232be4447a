//! CSV result file

use super::ResultSink;
use crate::{
    error::{ErrorContext, Result},
    models::{TrialRecord, CSV_HEADER},
};
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// Results file: truncated and given a header on creation, one flushed row per trial.
///
/// Rows are flushed individually so a run that aborts part way still leaves
/// every completed trial on disk.
pub struct CsvSink {
    writer: Writer<File>,
    path: PathBuf,
    rows: usize,
}

impl CsvSink {
    /// Create or truncate `path` and write the header row
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("Failed to open results file {}", path.display()))?;

        // Fields are written bare; catalog validation keeps separators out of them.
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(file);

        writer.write_record(CSV_HEADER)?;
        writer.flush()?;

        Ok(Self {
            writer,
            path: path.to_path_buf(),
            rows: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Data rows written so far
    pub fn rows(&self) -> usize {
        self.rows
    }
}

impl ResultSink for CsvSink {
    fn record(&mut self, record: &TrialRecord) -> Result<()> {
        self.writer
            .write_record(record.csv_fields())
            .with_context(|| format!("Failed to append to {}", self.path.display()))?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }
}
