//! Result sinks and console output
//!
//! Trials flow into a [`ResultSink`] the moment they complete. The CSV sink is
//! the durable record of a run; the formatter renders the dry-run plan and the
//! end-of-run summary for the terminal.

mod csv_sink;
mod formatter;

pub use csv_sink::CsvSink;
pub use formatter::{Alignment, Column, SummaryFormatter, TableFormat};

use crate::{error::Result, models::TrialRecord};

/// Destination for completed trials
pub trait ResultSink {
    /// Persist one trial; called once per trial, in order
    fn record(&mut self, record: &TrialRecord) -> Result<()>;
}

impl<S: ResultSink + ?Sized> ResultSink for &mut S {
    fn record(&mut self, record: &TrialRecord) -> Result<()> {
        (**self).record(record)
    }
}

/// Sink that keeps trials in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    records: Vec<TrialRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }
}

impl ResultSink for MemorySink {
    fn record(&mut self, record: &TrialRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}
