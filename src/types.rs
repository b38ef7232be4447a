//! Type definitions and aliases

use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Access pattern used to fetch a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Path-based mirror fetch
    Http,
    /// Direct-download alias service
    Download,
}

impl Method {
    /// Name written to the METHOD column of the CSV
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Http => "http",
            Method::Download => "download",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(Method::Http),
            "download" => Ok(Method::Download),
            other => Err(AppError::parse(format!("Unknown method '{}', expected 'http' or 'download'", other))),
        }
    }
}

/// One of the base URLs file content is fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    /// Legacy path-based mirror
    FilesHttp,
    /// Cloud-distribution mirror
    CloudHttp,
    /// Direct-download alias service
    FilesDownload,
}

impl Source {
    /// Short label used in progress output and the summary table
    pub fn label(&self) -> &'static str {
        match self {
            Source::FilesHttp => "files-http",
            Source::CloudHttp => "cloud-http",
            Source::FilesDownload => "files-download",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Performance classification based on download duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PerformanceLevel {
    /// Good performance (< 1 second)
    Good,
    /// Moderate performance (1-3 seconds)
    Moderate,
    /// Poor performance (> 3 seconds)
    Poor,
}

impl PerformanceLevel {
    /// Classify performance based on total duration
    pub fn from_duration(duration: Duration) -> Self {
        Self::from_secs(duration.as_secs_f64())
    }

    /// Classify performance based on elapsed seconds
    pub fn from_secs(secs: f64) -> Self {
        if secs < 1.0 {
            Self::Good
        } else if secs < 3.0 {
            Self::Moderate
        } else {
            Self::Poor
        }
    }

    /// Terminal color for this level
    pub fn color(&self) -> colored::Color {
        match self {
            Self::Good => colored::Color::Green,
            Self::Moderate => colored::Color::Yellow,
            Self::Poor => colored::Color::Red,
        }
    }
}
