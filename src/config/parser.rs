//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::Result,
    models::{Catalog, Config},
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        // .env values become process environment variables
        EnvManager::load_env_file(self.cli.debug)?;

        self.build_with_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from defaults, a variable lookup and the CLI
    pub fn build_with_lookup<F>(&self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        config.merge_from_lookup(lookup)?;

        self.apply_cli_overrides(&mut config);

        if let Some(path) = &config.catalog_path {
            config.catalog = Catalog::load(path)?;
        }

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        let cli = &self.cli;

        if let Some(output) = &cli.output {
            config.output_file = output.clone();
        }

        if let Some(catalog) = &cli.catalog {
            config.catalog_path = Some(catalog.clone());
        }

        if let Some(url) = &cli.files_http_source {
            config.sources.files_http = url.clone();
        }

        if let Some(url) = &cli.cloud_http_source {
            config.sources.cloud_http = url.clone();
        }

        if let Some(url) = &cli.download_source {
            config.sources.files_download = url.clone();
        }

        if let Some(iterations) = cli.alias_iterations {
            config.alias_iterations = iterations;
        }

        if let Some(iterations) = cli.plain_iterations {
            config.plain_iterations = iterations;
        }

        if let Some(ms) = cli.min_delay_ms {
            config.min_delay_ms = ms;
        }

        if let Some(ms) = cli.max_delay_ms {
            config.max_delay_ms = ms;
        }

        if let Some(timeout) = cli.timeout {
            config.timeout_seconds = Some(timeout);
        }

        if let Some(seed) = cli.seed {
            config.seed = Some(seed);
        }

        if cli.no_color {
            config.enable_color = false;
        }

        // CLI-only flags
        config.dry_run = cli.dry_run;
        config.verbose = cli.verbose;
        config.debug = cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Output File: {}", config.output_file.display()));
    summary.push(format!("Legacy Mirror: {}", config.sources.files_http));
    summary.push(format!("Cloud Mirror: {}", config.sources.cloud_http));
    summary.push(format!("Download Alias: {}", config.sources.files_download));
    summary.push(format!(
        "Iterations: {} (with alias), {} (without)",
        config.alias_iterations, config.plain_iterations
    ));
    summary.push(format!("Pause: {}ms..{}ms", config.min_delay_ms, config.max_delay_ms));
    summary.push(match config.timeout_seconds {
        Some(secs) => format!("Timeout: {}s", secs),
        None => "Timeout: client default".to_string(),
    });
    summary.push(match &config.catalog_path {
        Some(path) => format!("Catalog: {} ({} files)", path.display(), config.catalog.len()),
        None => format!("Catalog: built-in ({} files)", config.catalog.len()),
    });
    summary.push(match config.seed {
        Some(seed) => format!("Seed: {}", seed),
        None => "Seed: random".to_string(),
    });
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
