//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    /// Load a specific env file if it exists
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {} file: {}", path.display(), e)))?;

            if debug {
                println!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            println!("No {} file found, using defaults and CLI arguments", path.display());
        }

        Ok(())
    }

    /// List of all supported environment variables with descriptions and examples
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("BENCH_OUTPUT_FILE", "Output CSV path", "results.csv"),
            ("BENCH_FILES_HTTP_SOURCE", "Legacy path-based mirror base URL", "https://files.rcsb.org/pub/pdb"),
            ("BENCH_CLOUD_HTTP_SOURCE", "Cloud-distribution mirror base URL", "https://s3.rcsb.org/pub/pdb"),
            ("BENCH_DOWNLOAD_SOURCE", "Direct-download alias base URL", "https://files.rcsb.org/download"),
            ("BENCH_ALIAS_ITERATIONS", "Trials per endpoint for files with a download alias", "15"),
            ("BENCH_PLAIN_ITERATIONS", "Trials per endpoint for files without one", "3"),
            ("BENCH_MIN_DELAY_MS", "Minimum pause after each request (ms)", "2000"),
            ("BENCH_MAX_DELAY_MS", "Maximum pause after each request (ms, exclusive)", "5000"),
            ("BENCH_TIMEOUT_SECONDS", "Request timeout in seconds (unset: no timeout)", "60"),
            ("BENCH_CATALOG", "JSON catalog file replacing the built-in table", "catalog.json"),
            ("BENCH_SEED", "Seed for the randomized pause", "42"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }
}
