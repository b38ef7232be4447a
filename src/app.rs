//! Application orchestration: configuration, plan, run, summary

use crate::{
    cli::Cli,
    client::ReqwestClient,
    config::{display_config_summary, load_config, EnvManager},
    driver::{build_plan, Driver, RunPlan},
    error::Result,
    logging::LoggerFactory,
    models::Config,
    output::{CsvSink, SummaryFormatter},
    pacing::RandomDelay,
    runner::BenchmarkRunner,
};
use std::env;

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Load configuration, then either print the plan or run it
    pub async fn run(self) -> Result<()> {
        let config = load_config(self.cli.clone())?;
        let loggers = LoggerFactory::new(&config);

        if config.debug {
            print_debug_banner(&config, loggers.session_id());
        }

        let plan = build_plan(&config);
        let formatter = SummaryFormatter::new(config.enable_color);

        if config.dry_run {
            println!("{}", formatter.format_plan(&plan, &config));
            return Ok(());
        }

        match execute(&config, &plan, &loggers, &formatter).await {
            Ok(()) => Ok(()),
            Err(e) => {
                loggers
                    .create_error_logger()
                    .log_fatal(&e, Some("Benchmark aborted"))
                    .await;
                Err(e)
            }
        }
    }
}

async fn execute(
    config: &Config,
    plan: &RunPlan,
    loggers: &LoggerFactory,
    formatter: &SummaryFormatter,
) -> Result<()> {
    let client = ReqwestClient::new(config.timeout())?;
    let pacing = RandomDelay::from_config(config)?;
    let sink = CsvSink::create(&config.output_file)?;

    let runner = BenchmarkRunner::new(client, pacing, sink, loggers);
    let mut driver = Driver::new(runner, config.sources.clone(), loggers);

    let report = driver.execute(&config.catalog, plan).await?;

    println!();
    println!("{}", formatter.format_report(&report, config));
    Ok(())
}

fn print_debug_banner(config: &Config, session_id: &str) {
    println!("{} v{}", crate::PKG_NAME, crate::VERSION);
    if let Some(build_time) = option_env!("BUILD_TIME") {
        println!("Built: {}", build_time);
    }
    if let Some(commit) = option_env!("GIT_COMMIT") {
        println!("Commit: {}", commit);
    }
    println!("Session: {}", session_id);
    println!();
    println!("Configuration Summary:");
    println!("{}", display_config_summary(config));

    let overrides: Vec<String> = EnvManager::get_supported_env_vars()
        .into_iter()
        .filter_map(|(key, _, _)| env::var(key).ok().map(|value| format!("  {}={}", key, value)))
        .collect();
    if !overrides.is_empty() {
        println!("Environment overrides:");
        for line in overrides {
            println!("{}", line);
        }
    }
    println!();
}
