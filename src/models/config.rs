//! Configuration data model and validation

use crate::models::catalog::Catalog;
use crate::types::{AppError, Result, Source};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Base URLs of the three endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sources {
    /// Legacy path-based mirror
    #[serde(default = "default_files_http_source")]
    pub files_http: String,

    /// Cloud-distribution mirror
    #[serde(default = "default_cloud_http_source")]
    pub cloud_http: String,

    /// Direct-download alias service
    #[serde(default = "default_download_source")]
    pub files_download: String,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            files_http: default_files_http_source(),
            cloud_http: default_cloud_http_source(),
            files_download: default_download_source(),
        }
    }
}

impl Sources {
    /// Base URL for an endpoint
    pub fn base_url(&self, source: Source) -> &str {
        match source {
            Source::FilesHttp => &self.files_http,
            Source::CloudHttp => &self.cloud_http,
            Source::FilesDownload => &self.files_download,
        }
    }

    fn all(&self) -> [(Source, &str); 3] {
        [
            (Source::FilesHttp, self.files_http.as_str()),
            (Source::CloudHttp, self.cloud_http.as_str()),
            (Source::FilesDownload, self.files_download.as_str()),
        ]
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// CSV file reset at startup and appended to per trial
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    /// Endpoint base URLs
    #[serde(default)]
    pub sources: Sources,

    /// Trials per combination for files with a download alias
    #[serde(default = "default_alias_iterations")]
    pub alias_iterations: u32,

    /// Trials per combination for files without one
    #[serde(default = "default_plain_iterations")]
    pub plain_iterations: u32,

    /// Lower bound of the pause after each request, inclusive
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,

    /// Upper bound of the pause after each request, exclusive
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Request timeout; `None` keeps the HTTP client default
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Catalog loaded from `--catalog`, or the built-in table
    #[serde(default)]
    pub catalog: Catalog,

    /// Where the catalog came from, if not built in
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Seed for the pacing RNG; `None` seeds from OS entropy
    #[serde(default)]
    pub seed: Option<u64>,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Print the plan and exit without downloading
    #[serde(default)]
    pub dry_run: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_file: default_output_file(),
            sources: Sources::default(),
            alias_iterations: default_alias_iterations(),
            plain_iterations: default_plain_iterations(),
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            timeout_seconds: None,
            catalog: Catalog::default(),
            catalog_path: None,
            seed: None,
            enable_color: default_enable_color(),
            dry_run: false,
            verbose: false,
            debug: false,
        }
    }
}

pub const MAX_ITERATIONS: u32 = 10_000;
pub const MAX_DELAY_MS: u64 = 600_000;
pub const MAX_TIMEOUT_SECONDS: u64 = 3_600;

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Request timeout as Duration, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// Pause bounds as Durations (inclusive min, exclusive max)
    pub fn delay_bounds(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.min_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        )
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.output_file.as_os_str().is_empty() {
            return Err(AppError::config("Output file path cannot be empty"));
        }

        for (source, base_url) in self.sources.all() {
            if base_url.trim().is_empty() {
                return Err(AppError::config(format!("Base URL for {} cannot be empty", source)));
            }

            // Url::parse silently drops line breaks, so check the raw value first.
            if base_url.contains([',', '\r', '\n']) {
                return Err(AppError::config(format!(
                    "Base URL for {} must not contain commas or line breaks: '{}'",
                    source,
                    base_url.escape_debug()
                )));
            }

            match url::Url::parse(base_url) {
                Ok(parsed) => {
                    if parsed.scheme() != "http" && parsed.scheme() != "https" {
                        return Err(AppError::config(format!(
                            "Base URL for {} must use http or https: {}",
                            source, base_url
                        )));
                    }
                }
                Err(e) => {
                    return Err(AppError::config(format!("Invalid base URL for {} '{}': {}", source, base_url, e)));
                }
            }
        }

        if self.alias_iterations > MAX_ITERATIONS || self.plain_iterations > MAX_ITERATIONS {
            return Err(AppError::config(format!("Iteration counts cannot exceed {}", MAX_ITERATIONS)));
        }

        if self.min_delay_ms > self.max_delay_ms {
            return Err(AppError::config(format!(
                "Minimum delay ({}ms) cannot exceed maximum delay ({}ms)",
                self.min_delay_ms, self.max_delay_ms
            )));
        }

        if self.max_delay_ms > MAX_DELAY_MS {
            return Err(AppError::config(format!("Maximum delay cannot exceed {}ms", MAX_DELAY_MS)));
        }

        if let Some(timeout) = self.timeout_seconds {
            if timeout == 0 {
                return Err(AppError::config("Timeout must be greater than 0"));
            }
            if timeout > MAX_TIMEOUT_SECONDS {
                return Err(AppError::config(format!("Timeout cannot exceed {} seconds", MAX_TIMEOUT_SECONDS)));
            }
        }

        self.catalog
            .validate()
            .map_err(|e| AppError::config(e.message().to_string()))?;

        Ok(())
    }

    /// Merge values from a variable lookup (normally the process environment)
    pub fn merge_from_lookup<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(output) = lookup("BENCH_OUTPUT_FILE") {
            self.output_file = PathBuf::from(output.trim());
        }

        if let Some(url) = lookup("BENCH_FILES_HTTP_SOURCE") {
            self.sources.files_http = url.trim().to_string();
        }

        if let Some(url) = lookup("BENCH_CLOUD_HTTP_SOURCE") {
            self.sources.cloud_http = url.trim().to_string();
        }

        if let Some(url) = lookup("BENCH_DOWNLOAD_SOURCE") {
            self.sources.files_download = url.trim().to_string();
        }

        if let Some(value) = lookup("BENCH_ALIAS_ITERATIONS") {
            self.alias_iterations = parse_var("BENCH_ALIAS_ITERATIONS", &value)?;
        }

        if let Some(value) = lookup("BENCH_PLAIN_ITERATIONS") {
            self.plain_iterations = parse_var("BENCH_PLAIN_ITERATIONS", &value)?;
        }

        if let Some(value) = lookup("BENCH_MIN_DELAY_MS") {
            self.min_delay_ms = parse_var("BENCH_MIN_DELAY_MS", &value)?;
        }

        if let Some(value) = lookup("BENCH_MAX_DELAY_MS") {
            self.max_delay_ms = parse_var("BENCH_MAX_DELAY_MS", &value)?;
        }

        if let Some(value) = lookup("BENCH_TIMEOUT_SECONDS") {
            self.timeout_seconds = Some(parse_var("BENCH_TIMEOUT_SECONDS", &value)?);
        }

        if let Some(value) = lookup("BENCH_SEED") {
            self.seed = Some(parse_var("BENCH_SEED", &value)?);
        }

        if let Some(path) = lookup("BENCH_CATALOG") {
            self.catalog_path = Some(PathBuf::from(path.trim()));
        }

        if let Some(enable_color) = lookup("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from_lookup(|key| std::env::var(key).ok())
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))
}

// Default value functions for serde
fn default_output_file() -> PathBuf {
    PathBuf::from(crate::defaults::DEFAULT_OUTPUT_FILE)
}

fn default_files_http_source() -> String {
    crate::defaults::DEFAULT_FILES_HTTP_SOURCE.to_string()
}

fn default_cloud_http_source() -> String {
    crate::defaults::DEFAULT_CLOUD_HTTP_SOURCE.to_string()
}

fn default_download_source() -> String {
    crate::defaults::DEFAULT_DOWNLOAD_SOURCE.to_string()
}

fn default_alias_iterations() -> u32 {
    crate::defaults::DEFAULT_ALIAS_ITERATIONS
}

fn default_plain_iterations() -> u32 {
    crate::defaults::DEFAULT_PLAIN_ITERATIONS
}

fn default_min_delay_ms() -> u64 {
    crate::defaults::DEFAULT_MIN_DELAY_MS
}

fn default_max_delay_ms() -> u64 {
    crate::defaults::DEFAULT_MAX_DELAY_MS
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
