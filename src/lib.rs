//! Mirror Latency Bench
//!
//! A sequential benchmarking tool that downloads a fixed catalog of files from
//! several mirror endpoints, timing every request and appending one CSV row
//! per trial.

pub mod app;
pub mod cli;
pub mod client;
pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod pacing;
pub mod runner;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Catalog, CatalogEntry, Config, FileSpec, TrialRecord, TrialResult};
pub use types::{Method, Source};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    /// Output CSV written in the working directory
    pub const DEFAULT_OUTPUT_FILE: &str = "results.csv";

    /// Legacy path-based mirror
    pub const DEFAULT_FILES_HTTP_SOURCE: &str = "https://files.rcsb.org/pub/pdb";
    /// Cloud-distribution mirror
    pub const DEFAULT_CLOUD_HTTP_SOURCE: &str = "https://s3.rcsb.org/pub/pdb";
    /// Direct-download alias service
    pub const DEFAULT_DOWNLOAD_SOURCE: &str = "https://files.rcsb.org/download";

    /// Trials per combination for files that have a download alias
    pub const DEFAULT_ALIAS_ITERATIONS: u32 = 15;
    /// Trials per combination for files without one
    pub const DEFAULT_PLAIN_ITERATIONS: u32 = 3;

    /// Pause after each request, as a half-open millisecond range
    pub const DEFAULT_MIN_DELAY_MS: u64 = 2_000;
    pub const DEFAULT_MAX_DELAY_MS: u64 = 5_000;

    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Built-in catalog: (identifier, http path, download path)
    pub const DEFAULT_CATALOG: &[(&str, &str, Option<&str>)] = &[
        // 107 KB
        ("4hhb", "data/structures/divided/pdb/hh/pdb4hhb.ent.gz", Some("4hhb.pdb.gz")),
        // 673 KB
        ("5hhf", "data/structures/divided/pdb/hh/pdb5hhf.ent.gz", Some("5hhf.pdb.gz")),
        // 295 KB
        ("1d8w", "data/biounit/coordinates/divided/d8/1d8w.pdb1.gz", Some("1d8w.pdb1.gz")),
        // 399 MB
        ("ls-lR", "ls-lR", None),
        // 11 MB
        ("current_file_holdings", "holdings/current_file_holdings.json.gz", None),
    ];
}
