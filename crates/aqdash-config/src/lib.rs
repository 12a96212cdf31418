//! Configuration management for the aqdash dashboard

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{
    AnalysisConfig, Config, DataConfig, GraphConfig, ImageFormat, LoggingConfig, OutputConfig,
    DEFAULT_TITLE,
};
