use std::env;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for the diagnostic stream.
///
/// Logs go to stderr by default so the tool can be chained in build scripts
/// that consume stdout; a log file can be configured for IDE task
/// integration, optionally in JSON format.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Log level filter (e.g., "debug", "info", "warn", "error")
    pub level: Option<String>,
    /// Optional log file path. If None, logs only to stderr
    pub file_path: Option<PathBuf>,
    /// Whether to use structured JSON format for logs
    pub json_format: bool,
}

impl LogConfig {
    /// Build configuration from `RUST_LOG`, `SYNC_LOG_FILE` and
    /// `SYNC_LOG_JSON`.
    pub fn from_env() -> Self {
        Self {
            level: env::var("RUST_LOG").ok(),
            file_path: env::var("SYNC_LOG_FILE").ok().map(PathBuf::from),
            json_format: env::var("SYNC_LOG_JSON").unwrap_or_default() == "true",
        }
    }

    /// CLI flags take precedence over environment variables.
    pub fn with_overrides(mut self, level: Option<String>, file_path: Option<PathBuf>) -> Self {
        if level.is_some() {
            self.level = level;
        }
        if let Some(file_path) = file_path {
            self.file_path = Some(file_path);
        }
        self
    }

    fn open_log_file(&self) -> io::Result<Option<File>> {
        match &self.file_path {
            Some(path) => OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map(Some),
            None => Ok(None),
        }
    }
}

/// Initialize the logging system based on configuration.
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let level = config.level.as_deref().unwrap_or("info");
    let env_filter = EnvFilter::try_new(level).or_else(|_| EnvFilter::try_new("info"))?;
    let registry = tracing_subscriber::registry().with(env_filter);

    match (config.open_log_file()?, config.json_format) {
        (Some(file), true) => {
            registry
                .with(fmt::layer().json().with_writer(file).with_ansi(false))
                .init();
        }
        (Some(file), false) => {
            registry
                .with(fmt::layer().with_writer(file).with_ansi(false))
                .init();
        }
        (None, true) => {
            registry
                .with(fmt::layer().json().with_writer(io::stderr).with_ansi(false))
                .init();
        }
        (None, false) => {
            registry.with(fmt::layer().with_writer(io::stderr)).init();
        }
    }

    Ok(())
}
