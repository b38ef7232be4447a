//! Benchmark driver: which combinations run, and running them in order
//!
//! A file with a download alias is measured against all three endpoints; a
//! file without one only against the two path-based mirrors. Combinations run
//! strictly one after another in catalog order.

use crate::{
    client::HttpClient,
    error::{AppError, Result},
    log_debug, log_info,
    logging::{Logger, LoggerFactory, PerformanceLogger},
    models::{Catalog, Config, FileSpec, Sources, TrialRecord},
    output::ResultSink,
    pacing::DelayPolicy,
    runner::BenchmarkRunner,
    types::{Method, Source},
};
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Trials per combination, by whether the file has a download alias
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationPolicy {
    pub alias_iterations: u32,
    pub plain_iterations: u32,
}

impl IterationPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            alias_iterations: config.alias_iterations,
            plain_iterations: config.plain_iterations,
        }
    }
}

impl Default for IterationPolicy {
    fn default() -> Self {
        Self {
            alias_iterations: crate::defaults::DEFAULT_ALIAS_ITERATIONS,
            plain_iterations: crate::defaults::DEFAULT_PLAIN_ITERATIONS,
        }
    }
}

/// One file/endpoint/method combination scheduled for measurement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRun {
    pub file_name: String,
    pub source: Source,
    pub method: Method,
    pub iterations: u32,
}

/// Combinations for a single file, in execution order
pub fn plan_for_file(file_name: &str, spec: &FileSpec, policy: IterationPolicy) -> Vec<PlannedRun> {
    let run = |source, method, iterations| PlannedRun {
        file_name: file_name.to_string(),
        source,
        method,
        iterations,
    };

    if spec.has_download_alias() {
        vec![
            run(Source::FilesHttp, Method::Http, policy.alias_iterations),
            run(Source::CloudHttp, Method::Http, policy.alias_iterations),
            run(Source::FilesDownload, Method::Download, policy.alias_iterations),
        ]
    } else {
        vec![
            run(Source::FilesHttp, Method::Http, policy.plain_iterations),
            run(Source::CloudHttp, Method::Http, policy.plain_iterations),
        ]
    }
}

/// Every combination of a run, in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunPlan {
    runs: Vec<PlannedRun>,
}

impl RunPlan {
    pub fn build(catalog: &Catalog, policy: IterationPolicy) -> Self {
        let runs = catalog
            .iter()
            .flat_map(|entry| plan_for_file(&entry.name, &entry.spec, policy))
            .collect();
        Self { runs }
    }

    pub fn runs(&self) -> &[PlannedRun] {
        &self.runs
    }

    /// Rows the CSV will hold after a successful run
    pub fn total_trials(&self) -> u64 {
        self.runs.iter().map(|r| u64::from(r.iterations)).sum()
    }

    /// Lower bound on wall time spent pausing between requests
    pub fn minimum_pause(&self, min_delay: Duration) -> Duration {
        let trials = u32::try_from(self.total_trials()).unwrap_or(u32::MAX);
        min_delay.saturating_mul(trials)
    }
}

/// Plan for the configured catalog and iteration counts
pub fn build_plan(config: &Config) -> RunPlan {
    RunPlan::build(&config.catalog, IterationPolicy::from_config(config))
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub records: Vec<TrialRecord>,
    pub started_at: DateTime<Utc>,
    pub wall_time: Duration,
}

/// Executes a [`RunPlan`] through a [`BenchmarkRunner`]
pub struct Driver<C, D, S> {
    runner: BenchmarkRunner<C, D, S>,
    sources: Sources,
    logger: Logger,
    perf_logger: PerformanceLogger,
}

impl<C, D, S> Driver<C, D, S>
where
    C: HttpClient,
    D: DelayPolicy,
    S: ResultSink,
{
    pub fn new(runner: BenchmarkRunner<C, D, S>, sources: Sources, loggers: &LoggerFactory) -> Self {
        Self {
            runner,
            sources,
            logger: loggers.create_logger("MAIN"),
            perf_logger: loggers.create_performance_logger(),
        }
    }

    /// Run every combination in order, stopping at the first error
    pub async fn execute(&mut self, catalog: &Catalog, plan: &RunPlan) -> Result<RunReport> {
        let started_at = Utc::now();
        let timer = Instant::now();
        let mut records = Vec::new();
        let mut current_file: Option<&str> = None;

        log_debug!(
            self.logger,
            "Executing {} combinations ({} trials)",
            plan.runs().len(),
            plan.total_trials()
        );

        for planned in plan.runs() {
            if current_file != Some(planned.file_name.as_str()) {
                log_info!(self.logger, "Testing downloads of {}", planned.file_name);
                current_file = Some(planned.file_name.as_str());
            }

            let spec = catalog.get(&planned.file_name).ok_or_else(|| {
                AppError::internal(format!("'{}' is planned but not in the catalog", planned.file_name))
            })?;

            let batch = self
                .runner
                .run(
                    &planned.file_name,
                    spec,
                    planned.source,
                    self.sources.base_url(planned.source),
                    planned.method,
                    planned.iterations,
                )
                .await?;
            records.extend(batch);
        }

        let wall_time = timer.elapsed();
        self.perf_logger.log_run_summary(records.len(), wall_time).await;

        Ok(RunReport {
            records,
            started_at,
            wall_time,
        })
    }

    pub fn into_runner(self) -> BenchmarkRunner<C, D, S> {
        self.runner
    }
}
