//! Structured logging system for the mirror latency bench
//!
//! This module provides:
//! - Structured logging with multiple levels and contexts
//! - Console, compact and JSON output formats
//! - Per-request network logging and per-combination performance logging
//! - Error event logging with a session correlation ID

use crate::error::{AppError, Result};
use crate::models::{Config, TrialRecord};
use crate::types::{Method, Source};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level - most detailed
    Trace = 0,
    /// Debug level - detailed information for debugging
    Debug = 1,
    /// Info level - progress of the benchmark
    Info = 2,
    /// Warning level - potentially harmful situations
    Warn = 3,
    /// Error level - error events
    Error = 4,
    /// Fatal level - errors that abort the run
    Fatal = 5,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[37m",    // White
            LogLevel::Debug => "\x1b[36m",    // Cyan
            LogLevel::Info => "\x1b[32m",     // Green
            LogLevel::Warn => "\x1b[33m",     // Yellow
            LogLevel::Error => "\x1b[31m",    // Red
            LogLevel::Fatal => "\x1b[35m",    // Magenta
        }
    }

    /// Reset ANSI color code
    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Timestamp when log entry was created
    pub timestamp: DateTime<Utc>,
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Correlation ID for tracking related events
    pub correlation_id: Option<String>,
    /// Additional structured fields
    pub fields: HashMap<String, serde_json::Value>,
    /// File and line information
    pub location: Option<LogLocation>,
}

/// Source code location information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLocation {
    pub file: String,
    pub line: u32,
    pub module: Option<String>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// JSON format for structured logging
    Json,
    /// Compact single-line format
    Compact,
}

/// Shared logging context for session tracking
#[derive(Debug, Default)]
struct LogContext {
    /// Global correlation ID for the session
    session_id: Option<String>,
    /// Additional context fields
    context_fields: HashMap<String, serde_json::Value>,
}

/// Logger implementation with multiple output formats
#[derive(Clone)]
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    include_location: bool,
    format: LogFormat,
    name: String,
    context: Arc<RwLock<LogContext>>,
}

impl Logger {
    /// Create a new logger
    pub fn new(name: String) -> Self {
        Self {
            min_level: LogLevel::Info,
            use_color: true,
            include_location: false,
            format: LogFormat::Console,
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Create a logger with specific configuration
    pub fn with_config(name: String, config: &Config) -> Self {
        let min_level = if config.debug {
            LogLevel::Trace
        } else if config.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Info
        };

        Self {
            min_level,
            use_color: config.enable_color,
            include_location: config.debug,
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Create a logger that is already tagged with a session ID
    fn with_session(name: String, config: &Config, session_id: &str) -> Self {
        let logger = Self::with_config(name, config);
        let context = LogContext {
            session_id: Some(session_id.to_string()),
            context_fields: HashMap::new(),
        };
        Self {
            context: Arc::new(RwLock::new(context)),
            ..logger
        }
    }

    /// Set session correlation ID
    pub async fn set_session_id(&self, session_id: String) {
        let mut context = self.context.write().await;
        context.session_id = Some(session_id);
    }

    /// Add context field for all subsequent log entries
    pub async fn add_context_field<T: Serialize>(&self, key: String, value: T) {
        if let Ok(json_value) = serde_json::to_value(value) {
            let mut context = self.context.write().await;
            context.context_fields.insert(key, json_value);
        }
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn trace(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Trace, message)
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    pub fn fatal(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Fatal, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Render an entry with context fields applied, or `None` if it is filtered out
    async fn render(&self, mut entry: LogEntry) -> Option<(LogLevel, String)> {
        if entry.level < self.min_level {
            return None;
        }

        let context = self.context.read().await;
        if let Some(session_id) = &context.session_id {
            entry.fields.insert("session_id".to_string(), serde_json::Value::String(session_id.clone()));
        }
        for (key, value) in &context.context_fields {
            entry.fields.insert(key.clone(), value.clone());
        }
        drop(context);

        let output = match self.format {
            LogFormat::Console => self.format_console(&entry),
            LogFormat::Json => self.format_json(&entry),
            LogFormat::Compact => self.format_compact(&entry),
        };

        Some((entry.level, output))
    }

    /// Write log entry to output
    async fn write_entry(&self, entry: LogEntry) {
        if let Some((level, output)) = self.render(entry).await {
            // Write to stderr for errors/warnings, stdout for others
            if level >= LogLevel::Warn {
                let _ = writeln!(io::stderr(), "{}", output);
            } else {
                let _ = writeln!(io::stdout(), "{}", output);
            }
        }
    }

    /// Format log entry for console output
    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}", timestamp, formatted_level, entry.logger, entry.message);

        if let Some(correlation_id) = &entry.correlation_id {
            let short: String = correlation_id.chars().take(8).collect();
            output.push_str(&format!(" [{}]", short));
        }

        // Session id is noise on the console; everything else is shown sorted
        let mut fields: Vec<(&String, &serde_json::Value)> = entry
            .fields
            .iter()
            .filter(|(k, _)| k.as_str() != "session_id")
            .collect();
        if !fields.is_empty() {
            fields.sort_by(|a, b| a.0.cmp(b.0));
            let fields_str: Vec<String> = fields.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            output.push_str(&format!(" {{{}}}", fields_str.join(", ")));
        }

        if self.include_location {
            if let Some(location) = &entry.location {
                output.push_str(&format!(" @ {}:{}", location.file, location.line));
            }
        }

        output
    }

    /// Format log entry as JSON
    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!("{{\"error\": \"Failed to serialize log entry\", \"message\": \"{}\"}}", entry.message),
        }
    }

    /// Format log entry in compact format
    fn format_compact(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%H:%M:%S");
        format!(
            "{} {} {}: {}",
            timestamp,
            entry.level.as_str().chars().next().unwrap_or('?'),
            entry.logger,
            entry.message
        )
    }
}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                correlation_id: None,
                fields: HashMap::new(),
                location: None,
            },
        }
    }

    /// Add a correlation ID
    pub fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add location information
    pub fn location(mut self, file: &str, line: u32, module: Option<&str>) -> Self {
        self.entry.location = Some(LogLocation {
            file: file.to_string(),
            line,
            module: module.map(String::from),
        });
        self
    }

    /// Add the measurements of a completed trial
    pub fn trial(self, record: &TrialRecord) -> Self {
        self.field("file", &record.file_name)
            .field("source", record.source.label())
            .field("method", record.method.as_str())
            .field("trial", record.trial)
            .field("elapsed_sec", record.result.elapsed())
            .field("bytes", record.result.bytes)
    }

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_exit_code", error.exit_code())
    }

    /// Finalize and write the log entry
    pub async fn log(self) {
        self.logger.write_entry(self.entry).await;
    }

    /// Finalize and return the rendered line instead of writing it
    pub async fn render(self) -> Option<String> {
        self.logger.render(self.entry).await.map(|(_, output)| output)
    }
}

/// Per-request network logging
pub struct NetworkLogger {
    logger: Logger,
}

impl NetworkLogger {
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("NET".to_string(), config),
        }
    }

    fn with_logger(logger: Logger) -> Self {
        Self { logger }
    }

    /// Log a completed GET
    pub async fn log_http_request(&self, url: &str, status_code: u16, bytes: u64, elapsed_sec: f64) {
        let message = format!("GET {} -> {} ({} bytes in {:.3}s)", url, status_code, bytes, elapsed_sec);

        self.logger.debug(&message)
            .field("url", url)
            .field("status_code", status_code)
            .field("bytes", bytes)
            .field("elapsed_sec", elapsed_sec)
            .log()
            .await;
    }

    /// Log a failed GET; the run aborts right after this
    pub async fn log_http_failure(&self, url: &str, error: &AppError) {
        self.logger.error(&format!("GET {} failed: {}", url, error))
            .field("url", url)
            .error_info(error)
            .log()
            .await;
    }
}

/// Timing logger for trials and combinations
pub struct PerformanceLogger {
    logger: Logger,
}

impl PerformanceLogger {
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("PERF".to_string(), config),
        }
    }

    fn with_logger(logger: Logger) -> Self {
        Self { logger }
    }

    /// Log one trial with its measurements
    pub async fn log_trial(&self, record: &TrialRecord) {
        self.logger.trace(&format!(
            "{} {} {} trial {}: {:.3}s",
            record.file_name, record.source, record.method, record.trial, record.result.elapsed()
        ))
        .trial(record)
        .log()
        .await;
    }

    /// Log completion of one file/endpoint/method combination
    pub async fn log_combination_complete(
        &self,
        file_name: &str,
        source: Source,
        method: Method,
        records: &[TrialRecord],
    ) {
        let total: f64 = records.iter().map(|r| r.result.elapsed()).sum();
        let mean = if records.is_empty() { 0.0 } else { total / records.len() as f64 };

        self.logger.debug(&format!(
            "Completed {} via {} ({}): {} trials, mean {:.3}s",
            file_name, source, method, records.len(), mean
        ))
        .field("file", file_name)
        .field("source", source.label())
        .field("method", method.as_str())
        .field("trials", records.len())
        .field("mean_elapsed_sec", mean)
        .log()
        .await;
    }

    /// Log the end of the whole run
    pub async fn log_run_summary(&self, trial_count: usize, wall_time: Duration) {
        self.logger.info(&format!(
            "Run finished: {} trials in {:.1}s",
            trial_count,
            wall_time.as_secs_f64()
        ))
        .field("trials", trial_count)
        .field("wall_time_sec", wall_time.as_secs_f64())
        .log()
        .await;
    }
}

/// Error event logger
pub struct ErrorEventLogger {
    logger: Logger,
}

impl ErrorEventLogger {
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("ERR".to_string(), config),
        }
    }

    fn with_logger(logger: Logger) -> Self {
        Self { logger }
    }

    /// Log an error that terminates the run
    pub async fn log_fatal(&self, error: &AppError, context: Option<&str>) {
        let message = match context {
            Some(ctx) => format!("{}: {}", ctx, error),
            None => error.to_string(),
        };

        self.logger.fatal(&message)
            .error_info(error)
            .log()
            .await;
    }
}

/// Logger factory sharing one session ID between all loggers of a run
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            session_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create a logger with a specific name
    pub fn create_logger(&self, name: &str) -> Logger {
        Logger::with_session(name.to_string(), &self.config, &self.session_id)
    }

    pub fn create_performance_logger(&self) -> PerformanceLogger {
        PerformanceLogger::with_logger(self.create_logger("PERF"))
    }

    pub fn create_network_logger(&self) -> NetworkLogger {
        NetworkLogger::with_logger(self.create_logger("NET"))
    }

    pub fn create_error_logger(&self) -> ErrorEventLogger {
        ErrorEventLogger::with_logger(self.create_logger("ERR"))
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// Log at info level with source location attached
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

/// Log at debug level with source location attached
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrialResult;
    use std::str::FromStr;

    fn sample_record() -> TrialRecord {
        TrialRecord {
            file_name: "1d8w".to_string(),
            source: Source::FilesDownload,
            method: Method::Download,
            trial: 3,
            result: TrialResult::new("https://files.rcsb.org/download/1d8w.pdb1.gz".to_string(), 1.0, 1.5, 2048),
        }
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Fatal);
    }

    #[test]
    fn test_logger_with_config_levels() {
        let quiet = Logger::with_config("T".to_string(), &Config::default());
        assert_eq!(quiet.min_level, LogLevel::Info);
        assert_eq!(quiet.format, LogFormat::Console);

        let verbose = Logger::with_config("T".to_string(), &Config { verbose: true, ..Default::default() });
        assert_eq!(verbose.min_level, LogLevel::Debug);

        let debug = Logger::with_config(
            "T".to_string(),
            &Config { debug: true, enable_color: false, ..Default::default() },
        );
        assert_eq!(debug.min_level, LogLevel::Trace);
        assert_eq!(debug.format, LogFormat::Json);
        assert!(debug.include_location);
        assert!(!debug.use_color);
    }

    #[test]
    fn test_would_log() {
        let mut logger = Logger::new("TEST".to_string());
        logger.min_level = LogLevel::Warn;

        assert!(!logger.would_log(LogLevel::Debug));
        assert!(!logger.would_log(LogLevel::Info));
        assert!(logger.would_log(LogLevel::Warn));
        assert!(logger.would_log(LogLevel::Fatal));
    }

    #[tokio::test]
    async fn test_filtered_entry_renders_nothing() {
        let logger = Logger::new("TEST".to_string());
        assert!(logger.debug("hidden").render().await.is_none());
        assert!(logger.info("shown").render().await.is_some());
    }

    #[tokio::test]
    async fn test_console_format_includes_sorted_fields() {
        let mut config = Config::default();
        config.enable_color = false;
        let logger = Logger::with_config("RUN".to_string(), &config);

        let line = logger
            .info("Downloading from https://s3.rcsb.org/pub/pdb - trial number 0")
            .field("trial", 0)
            .field("file", "4hhb")
            .render()
            .await
            .unwrap();

        assert!(line.contains(" INFO [RUN] Downloading from https://s3.rcsb.org/pub/pdb - trial number 0"));
        assert!(line.ends_with("{file=\"4hhb\", trial=0}"));
    }

    #[tokio::test]
    async fn test_json_format_carries_session_and_trial() {
        let factory = LoggerFactory::new(&Config { debug: true, ..Default::default() });
        let logger = factory.create_logger("PERF");

        let line = logger.debug("trial").trial(&sample_record()).render().await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(json["logger"], "PERF");
        assert_eq!(json["fields"]["session_id"], factory.session_id());
        assert_eq!(json["fields"]["method"], "download");
        assert_eq!(json["fields"]["source"], "files-download");
        assert_eq!(json["fields"]["bytes"], 2048);
        assert_eq!(json["fields"]["elapsed_sec"], 0.5);
    }

    #[tokio::test]
    async fn test_context_fields_are_applied() {
        let mut logger = Logger::new("TEST".to_string());
        logger.format = LogFormat::Json;
        logger.add_context_field("run".to_string(), "nightly").await;
        logger.set_session_id("abc".to_string()).await;

        let line = logger.info("hello").render().await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(json["fields"]["run"], "nightly");
        assert_eq!(json["fields"]["session_id"], "abc");
    }

    #[tokio::test]
    async fn test_compact_format() {
        let mut logger = Logger::new("NET".to_string());
        logger.format = LogFormat::Compact;
        let line = logger.warn("slow mirror").render().await.unwrap();
        assert!(line.ends_with("W NET: slow mirror"));
    }

    #[test]
    fn test_factory_loggers_share_session() {
        let factory = LoggerFactory::new(&Config::default());
        assert!(!factory.session_id().is_empty());
        assert_eq!(factory.create_performance_logger().logger.name, "PERF");
        assert_eq!(factory.create_network_logger().logger.name, "NET");
        assert_eq!(factory.create_error_logger().logger.name, "ERR");
    }

    #[tokio::test]
    async fn test_specialized_loggers_do_not_panic() {
        let config = Config { enable_color: false, ..Default::default() };
        let record = sample_record();

        PerformanceLogger::new(&config).log_trial(&record).await;
        PerformanceLogger::new(&config)
            .log_combination_complete("1d8w", Source::FilesDownload, Method::Download, &[record.clone()])
            .await;
        PerformanceLogger::new(&config).log_run_summary(1, Duration::from_secs(3)).await;
        NetworkLogger::new(&config).log_http_request(&record.result.url, 200, 2048, 0.5).await;
        NetworkLogger::new(&config)
            .log_http_failure(&record.result.url, &AppError::http_request("404 Not Found"))
            .await;
        ErrorEventLogger::new(&config)
            .log_fatal(&AppError::network("connection reset"), Some("Benchmark aborted"))
            .await;
    }
}
