//! Structured logging infrastructure for aqdash

use std::sync::Mutex;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "aqdash_analysis=trace")
    pub level: String,
    /// Whether to emit one JSON object per event
    pub json_format: bool,
    /// Whether to enable pretty formatting with colors
    pub pretty_format: bool,
    /// Optional file path for log output
    pub file_path: Option<String>,
    /// Whether to include span open/close events in the output
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
    /// Whether to include source file and line
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            pretty_format: true,
            file_path: None,
            include_spans: false,
            include_targets: true,
            include_location: false,
        }
    }
}

type InitResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Initialize the tracing subscriber with the given configuration.
///
/// `RUST_LOG` takes precedence over `config.level` when it is set.
pub fn init_logging(config: LoggingConfig) -> InitResult {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).or_else(|_| EnvFilter::try_new("info"))?,
    };

    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    let file = match &config.file_path {
        Some(path) => Some(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map(Mutex::new)?,
        ),
        None => None,
    };

    if config.json_format {
        let layer = fmt::layer()
            .json()
            .with_span_events(span_events)
            .with_target(config.include_targets)
            .with_file(config.include_location)
            .with_line_number(config.include_location);

        match file {
            Some(file) => registry.with(layer.with_writer(file)).try_init()?,
            None => registry.with(layer).try_init()?,
        }
    } else if config.pretty_format {
        let layer = fmt::layer()
            .pretty()
            .with_span_events(span_events)
            .with_target(config.include_targets)
            .with_file(config.include_location)
            .with_line_number(config.include_location);

        match file {
            Some(file) => registry
                .with(layer.with_ansi(false).with_writer(file))
                .try_init()?,
            None => registry.with(layer).try_init()?,
        }
    } else {
        let layer = fmt::layer()
            .compact()
            .with_span_events(span_events)
            .with_target(config.include_targets)
            .with_file(config.include_location)
            .with_line_number(config.include_location);

        match file {
            Some(file) => registry
                .with(layer.with_ansi(false).with_writer(file))
                .try_init()?,
            None => registry.with(layer).try_init()?,
        }
    }

    Ok(())
}

/// Initialize logging with default configuration
pub fn init_default_logging() -> InitResult {
    init_logging(LoggingConfig::default())
}

/// Initialize logging for development (pretty, debug level, spans)
pub fn init_dev_logging() -> InitResult {
    init_logging(LoggingConfig {
        level: "debug".to_string(),
        include_spans: true,
        include_location: true,
        ..LoggingConfig::default()
    })
}
