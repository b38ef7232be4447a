//! Command-line interface

use clap::Parser;
use std::path::PathBuf;

/// Mirror Latency Bench - time repeated downloads of a file catalog across mirror endpoints
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "mirror-latency-bench")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output CSV file (reset at startup)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// JSON catalog of files to benchmark, replacing the built-in table
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Base URL of the legacy path-based mirror
    #[arg(long, value_name = "URL")]
    pub files_http_source: Option<String>,

    /// Base URL of the cloud-distribution mirror
    #[arg(long, value_name = "URL")]
    pub cloud_http_source: Option<String>,

    /// Base URL of the direct-download alias service
    #[arg(long, value_name = "URL")]
    pub download_source: Option<String>,

    /// Trials per endpoint for files that have a download alias
    #[arg(long, value_name = "N")]
    pub alias_iterations: Option<u32>,

    /// Trials per endpoint for files without a download alias
    #[arg(long, value_name = "N")]
    pub plain_iterations: Option<u32>,

    /// Minimum pause after each request, in milliseconds
    #[arg(long, value_name = "MS")]
    pub min_delay_ms: Option<u64>,

    /// Maximum pause after each request, in milliseconds (exclusive)
    #[arg(long, value_name = "MS")]
    pub max_delay_ms: Option<u64>,

    /// Request timeout in seconds (default: no timeout)
    #[arg(short, long, value_name = "SECS", value_parser = parse_timeout)]
    pub timeout: Option<u64>,

    /// Seed for the randomized pause between requests
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the execution plan without downloading anything
    #[arg(long)]
    pub dry_run: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(min), Some(max)) = (self.min_delay_ms, self.max_delay_ms) {
            if min > max {
                return Err(format!(
                    "--min-delay-ms ({}) cannot exceed --max-delay-ms ({})",
                    min, max
                ));
            }
        }

        Ok(())
    }
}

/// Parse timeout seconds
fn parse_timeout(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid timeout: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid timeout: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Timeout must be greater than 0".to_string())
            } else if secs > crate::models::config::MAX_TIMEOUT_SECONDS {
                Err(format!(
                    "Timeout cannot exceed {} seconds",
                    crate::models::config::MAX_TIMEOUT_SECONDS
                ))
            } else {
                Ok(secs)
            }
        })
}
