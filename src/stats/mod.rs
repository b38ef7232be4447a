//! Summary statistics over completed trials

use crate::{
    models::TrialRecord,
    types::{Method, PerformanceLevel, Source},
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Elapsed-time statistics for one file/endpoint/method combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialStats {
    pub file_name: String,
    pub source: Source,
    pub method: Method,
    pub count: usize,
    pub min_sec: f64,
    pub mean_sec: f64,
    pub median_sec: f64,
    pub p90_sec: f64,
    pub max_sec: f64,
    pub total_bytes: u64,
}

impl TrialStats {
    /// Statistics over one group of records; `None` when the group is empty
    pub fn from_records(records: &[&TrialRecord]) -> Option<Self> {
        let first = records.first()?;

        let mut elapsed: Vec<f64> = records.iter().map(|r| r.result.elapsed()).collect();
        elapsed.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let count = elapsed.len();
        let mean_sec = elapsed.iter().sum::<f64>() / count as f64;

        Some(Self {
            file_name: first.file_name.clone(),
            source: first.source,
            method: first.method,
            count,
            min_sec: elapsed[0],
            mean_sec,
            median_sec: percentile(&elapsed, 50.0),
            p90_sec: percentile(&elapsed, 90.0),
            max_sec: elapsed[count - 1],
            total_bytes: records.iter().map(|r| r.result.bytes).sum(),
        })
    }

    pub fn performance_level(&self) -> PerformanceLevel {
        PerformanceLevel::from_secs(self.mean_sec)
    }

    /// Mean throughput in bytes per second, if any time elapsed
    pub fn throughput_bps(&self) -> Option<f64> {
        let total_time = self.mean_sec * self.count as f64;
        if total_time > 0.0 {
            Some(self.total_bytes as f64 / total_time)
        } else {
            None
        }
    }
}

/// Group records by combination, keeping first-seen order
pub fn summarize(records: &[TrialRecord]) -> Vec<TrialStats> {
    let mut groups: Vec<((&str, Source, Method), Vec<&TrialRecord>)> = Vec::new();

    for record in records {
        let key = (record.file_name.as_str(), record.source, record.method);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, group)) => group.push(record),
            None => groups.push((key, vec![record])),
        }
    }

    groups
        .iter()
        .filter_map(|(_, group)| TrialStats::from_records(group))
        .collect()
}

/// Linear-interpolated percentile of an ascending slice
pub fn percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let index = (percentile / 100.0) * (sorted_values.len() as f64 - 1.0);
    let lower_index = index.floor() as usize;
    let upper_index = index.ceil() as usize;

    if lower_index == upper_index {
        sorted_values[lower_index]
    } else {
        let weight = index - lower_index as f64;
        sorted_values[lower_index] * (1.0 - weight) + sorted_values[upper_index] * weight
    }
}
