//! Benchmark runner: sequential timed downloads of one file from one endpoint


use crate::{
    client::HttpClient,
    clock::MonotonicClock,
    error::{AppError, Result},
    logging::{Logger, LoggerFactory, NetworkLogger, PerformanceLogger},
    models::{FileSpec, TrialRecord, TrialResult},
    output::ResultSink,
    pacing::DelayPolicy,
    types::{Method, Source},
};

/// Join a base URL and a relative path with exactly one slash between them
pub fn join_url(base_url: &str, relative_path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        relative_path.trim_start_matches('/')
    )
}

/// Performs timed downloads and hands every trial to a sink as soon as it completes.
///
/// Trials run strictly one after another, and any failure ends the run: rows
/// already written stay in the sink, nothing is retried.
pub struct BenchmarkRunner<C, D, S> {
    client: C,
    pacing: D,
    sink: S,
    clock: MonotonicClock,
    logger: Logger,
    network_logger: NetworkLogger,
    perf_logger: PerformanceLogger,
}

impl<C, D, S> BenchmarkRunner<C, D, S>
where
    C: HttpClient,
    D: DelayPolicy,
    S: ResultSink,
{
    pub fn new(client: C, pacing: D, sink: S, loggers: &LoggerFactory) -> Self {
        Self {
            client,
            pacing,
            sink,
            clock: MonotonicClock::new(),
            logger: loggers.create_logger("RUN"),
            network_logger: loggers.create_network_logger(),
            perf_logger: loggers.create_performance_logger(),
        }
    }

    /// Download `base_url/<path for method>` `iterations` times.
    ///
    /// Each trial is timed from just before the request until the body has
    /// been read, recorded to the sink, then followed by a pause from the
    /// delay policy. The path mapping is passed in explicitly; `method` must
    /// have an entry in it.
    pub async fn run(
        &mut self,
        file_name: &str,
        paths: &FileSpec,
        source: Source,
        base_url: &str,
        method: Method,
        iterations: u32,
    ) -> Result<Vec<TrialRecord>> {
        if base_url.trim().is_empty() {
            return Err(AppError::validation(format!("Base URL for {} cannot be empty", source)));
        }

        let relative_path = paths.path_for(method).ok_or_else(|| {
            AppError::validation(format!("File '{}' has no {} path", file_name, method))
        })?;
        let url = join_url(base_url, relative_path);

        let mut records = Vec::with_capacity(iterations as usize);

        for trial in 0..iterations {
            self.logger
                .info(&format!("Downloading from {} - trial number {}", base_url, trial))
                .log()
                .await;

            let start_time = self.clock.now();
            let response = match self.client.fetch(&url).await {
                Ok(response) => response,
                Err(e) => {
                    self.network_logger.log_http_failure(&url, &e).await;
                    return Err(e);
                }
            };
            let end_time = self.clock.now();

            let record = TrialRecord {
                file_name: file_name.to_string(),
                source,
                method,
                trial,
                result: TrialResult::new(url.clone(), start_time, end_time, response.body_size),
            };

            self.network_logger
                .log_http_request(&url, response.status_code, response.body_size, record.result.elapsed())
                .await;

            self.sink.record(&record)?;
            self.perf_logger.log_trial(&record).await;

            let delay = self.pacing.next_delay();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            records.push(record);
        }

        self.perf_logger
            .log_combination_complete(file_name, source, method, &records)
            .await;

        Ok(records)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FetchResponse;
    use crate::models::Config;
    use crate::output::MemorySink;
    use crate::pacing::FixedDelay;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Client that answers from a script and remembers what it was asked
    #[derive(Clone, Default)]
    struct ScriptedClient {
        fail_on_call: Option<usize>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedClient {
        fn ok() -> Self {
            Self::default()
        }

        fn failing_on(call: usize) -> Self {
            Self { fail_on_call: Some(call), ..Self::default() }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpClient for ScriptedClient {
        async fn fetch(&self, url: &str) -> Result<FetchResponse> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(url.to_string());
            if Some(calls.len() - 1) == self.fail_on_call {
                return Err(AppError::http_request(format!("GET {} returned 503 Service Unavailable", url)));
            }
            Ok(FetchResponse {
                status_code: 200,
                body_size: 42,
                final_url: url.to_string(),
            })
        }
    }

    /// Pause policy that counts how often it was consulted
    struct CountingDelay(usize);

    impl DelayPolicy for CountingDelay {
        fn next_delay(&mut self) -> Duration {
            self.0 += 1;
            Duration::ZERO
        }
    }

    fn quiet_loggers() -> LoggerFactory {
        LoggerFactory::new(&Config { enable_color: false, ..Default::default() })
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://s3.rcsb.org/pub/pdb", "ls-lR"), "https://s3.rcsb.org/pub/pdb/ls-lR");
        assert_eq!(join_url("https://s3.rcsb.org/pub/pdb/", "/ls-lR"), "https://s3.rcsb.org/pub/pdb/ls-lR");
    }

    #[tokio::test]
    async fn test_trials_are_sequential_and_recorded() {
        let client = ScriptedClient::ok();
        let mut runner = BenchmarkRunner::new(client.clone(), FixedDelay::none(), MemorySink::new(), &quiet_loggers());
        let spec = FileSpec::with_alias("data/pdb4hhb.ent.gz", "4hhb.pdb.gz");

        let records = runner
            .run("4hhb", &spec, Source::FilesDownload, "https://files.rcsb.org/download", Method::Download, 4)
            .await
            .unwrap();

        assert_eq!(records.len(), 4);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.trial, i as u32);
            assert_eq!(record.method, Method::Download);
            assert_eq!(record.result.url, "https://files.rcsb.org/download/4hhb.pdb.gz");
            assert!(record.result.end_time >= record.result.start_time);
            assert_eq!(record.result.bytes, 42);
        }
        for pair in records.windows(2) {
            assert!(pair[1].result.start_time >= pair[0].result.end_time);
        }
        assert_eq!(runner.sink().records(), records.as_slice());
        assert_eq!(client.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_pause_after_every_request() {
        let client = ScriptedClient::ok();
        let mut delay = CountingDelay(0);
        let mut runner = BenchmarkRunner::new(client.clone(), &mut delay, MemorySink::new(), &quiet_loggers());

        runner
            .run("ls-lR", &FileSpec::http_only("ls-lR"), Source::CloudHttp, "https://s3.rcsb.org/pub/pdb", Method::Http, 3)
            .await
            .unwrap();
        drop(runner);

        assert_eq!(delay.0, 3);
    }

    #[tokio::test]
    async fn test_zero_iterations_does_nothing() {
        let client = ScriptedClient::ok();
        let mut runner = BenchmarkRunner::new(client.clone(), FixedDelay::none(), MemorySink::new(), &quiet_loggers());

        let records = runner
            .run("ls-lR", &FileSpec::http_only("ls-lR"), Source::FilesHttp, "https://files.rcsb.org/pub/pdb", Method::Http, 0)
            .await
            .unwrap();

        assert!(records.is_empty());
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_method_path_is_error() {
        let client = ScriptedClient::ok();
        let mut runner = BenchmarkRunner::new(client.clone(), FixedDelay::none(), MemorySink::new(), &quiet_loggers());

        let err = runner
            .run("ls-lR", &FileSpec::http_only("ls-lR"), Source::FilesDownload, "https://files.rcsb.org/download", Method::Download, 1)
            .await
            .unwrap_err();

        assert_eq!(err.category(), "VALIDATION");
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_base_url_is_error() {
        let client = ScriptedClient::ok();
        let mut runner = BenchmarkRunner::new(client.clone(), FixedDelay::none(), MemorySink::new(), &quiet_loggers());

        let result = runner
            .run("ls-lR", &FileSpec::http_only("ls-lR"), Source::FilesHttp, "", Method::Http, 1)
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_failure_aborts_and_keeps_earlier_rows() {
        let client = ScriptedClient::failing_on(2);
        let mut runner = BenchmarkRunner::new(client.clone(), FixedDelay::none(), MemorySink::new(), &quiet_loggers());

        let err = runner
            .run("5hhf", &FileSpec::http_only("pdb5hhf.ent.gz"), Source::FilesHttp, "https://files.rcsb.org/pub/pdb", Method::Http, 10)
            .await
            .unwrap_err();

        assert_eq!(err.category(), "HTTP");
        assert_eq!(client.calls().len(), 3);
        assert_eq!(runner.into_sink().records().len(), 2);
    }
}
