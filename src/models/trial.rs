//! Trial timing results and the CSV row they become

use crate::types::{Method, PerformanceLevel, Source};
use serde::{Deserialize, Serialize};

/// Columns of the results CSV, in order
pub const CSV_HEADER: [&str; 7] = [
    "FILENAME",
    "METHOD",
    "TRIAL",
    "URL",
    "START TIME (sec)",
    "END TIME (sec)",
    "TOTAL TIME (sec)",
];

/// Timing of a single download
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    /// URL that was requested
    pub url: String,

    /// Monotonic seconds when the request was issued
    pub start_time: f64,

    /// Monotonic seconds when the body was fully read
    pub end_time: f64,

    /// Response body size in bytes
    pub bytes: u64,
}

impl TrialResult {
    pub fn new(url: String, start_time: f64, end_time: f64, bytes: u64) -> Self {
        Self {
            url,
            start_time,
            end_time,
            bytes,
        }
    }

    /// Elapsed seconds between request and end of body
    pub fn elapsed(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn performance_level(&self) -> PerformanceLevel {
        PerformanceLevel::from_secs(self.elapsed())
    }
}

/// One completed trial together with what was being measured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub file_name: String,
    pub source: Source,
    pub method: Method,
    pub trial: u32,
    pub result: TrialResult,
}

impl TrialRecord {
    /// Fields of the CSV row, matching [`CSV_HEADER`]
    pub fn csv_fields(&self) -> [String; 7] {
        [
            self.file_name.clone(),
            self.method.as_str().to_string(),
            self.trial.to_string(),
            self.result.url.clone(),
            self.result.start_time.to_string(),
            self.result.end_time.to_string(),
            self.result.elapsed().to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> TrialRecord {
        TrialRecord {
            file_name: "4hhb".to_string(),
            source: Source::CloudHttp,
            method: Method::Http,
            trial: 7,
            result: TrialResult::new(
                "https://s3.rcsb.org/pub/pdb/data/structures/divided/pdb/hh/pdb4hhb.ent.gz".to_string(),
                10.5,
                11.25,
                109_568,
            ),
        }
    }

    #[test]
    fn test_elapsed() {
        let record = sample_record();
        assert_eq!(record.result.elapsed(), 0.75);
        assert_eq!(record.result.performance_level(), PerformanceLevel::Good);
    }

    #[test]
    fn test_csv_fields_follow_header_order() {
        let fields = sample_record().csv_fields();
        assert_eq!(fields.len(), CSV_HEADER.len());
        assert_eq!(fields[0], "4hhb");
        assert_eq!(fields[1], "http");
        assert_eq!(fields[2], "7");
        assert!(fields[3].starts_with("https://s3.rcsb.org/"));
        assert_eq!(fields[4], "10.5");
        assert_eq!(fields[5], "11.25");
        assert_eq!(fields[6], "0.75");
    }

    #[test]
    fn test_header_line() {
        assert_eq!(
            CSV_HEADER.join(","),
            "FILENAME,METHOD,TRIAL,URL,START TIME (sec),END TIME (sec),TOTAL TIME (sec)"
        );
    }
}
