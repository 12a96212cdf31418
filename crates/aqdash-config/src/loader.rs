//! Configuration loading utilities

use crate::Config;
use aqdash_common::Result as AqResult;
use std::env;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_VAR: &str = "AQDASH_CONFIG_PATH";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {message}")]
    EnvParseError { var: String, message: String },
}

impl From<ConfigError> for aqdash_common::AqError {
    fn from(err: ConfigError) -> Self {
        aqdash_common::AqError::config_with_source("Failed to load configuration", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let mut config = Self::read_config(path)?;
        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from `AQDASH_CONFIG_PATH`, `aqdash.yaml`/`aqdash.yml`
    /// in the working directory, or built-in defaults, in that order.
    pub fn load() -> AqResult<Config> {
        Self::load_with(None, |_| {})
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> AqResult<Config> {
        Self::load_with(Some(path.as_ref()), |_| {})
    }

    /// Load from `path` (or the default lookup), apply environment overrides,
    /// then `overrides`, and validate the result once.
    pub fn load_with<F>(path: Option<&Path>, overrides: F) -> AqResult<Config>
    where
        F: FnOnce(&mut Config),
    {
        let mut config = match path {
            Some(path) => Self::read_config(path)?,
            None => Self::discover()?,
        };
        Self::apply_env_overrides(&mut config)?;
        overrides(&mut config);
        config.validate_all().map_err(ConfigError::ValidationError)?;

        Ok(config)
    }

    fn read_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        debug!(path = %path.as_ref().display(), "Loaded configuration file");
        Ok(config)
    }

    fn discover() -> Result<Config, ConfigError> {
        if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::read_config(config_path)
        } else if Path::new("aqdash.yaml").exists() {
            Self::read_config("aqdash.yaml")
        } else if Path::new("aqdash.yml").exists() {
            Self::read_config("aqdash.yml")
        } else {
            debug!("No configuration file found, using defaults");
            Ok(Config::default())
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides(config, |var| env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("AQDASH_DATA_PATH") {
            config.data.path = path;
        }

        if let Some(dir) = lookup("AQDASH_OUTPUT_DIR") {
            config.output.directory = dir;
        }

        if let Some(format) = lookup("AQDASH_IMAGE_FORMAT") {
            config.output.image_format = parse_var("AQDASH_IMAGE_FORMAT", &format)?;
        }

        if let Some(period) = lookup("AQDASH_DECOMPOSITION_PERIOD") {
            config.analysis.decomposition_period = parse_var("AQDASH_DECOMPOSITION_PERIOD", &period)?;
        }

        if let Some(policy) = lookup("AQDASH_GAP_POLICY") {
            config.analysis.gap_policy = parse_var("AQDASH_GAP_POLICY", &policy)?;
        }

        if let Some(order) = lookup("AQDASH_WIND_ORDER") {
            config.analysis.wind_order = parse_var("AQDASH_WIND_ORDER", &order)?;
        }

        if let Some(width) = lookup("AQDASH_GRAPH_WIDTH") {
            config.graph.width = parse_var("AQDASH_GRAPH_WIDTH", &width)?;
        }

        if let Some(height) = lookup("AQDASH_GRAPH_HEIGHT") {
            config.graph.height = parse_var("AQDASH_GRAPH_HEIGHT", &height)?;
        }

        if let Some(level) = lookup("AQDASH_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}

fn parse_var<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::EnvParseError {
        var: var.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqdash_common::{GapPolicy, WindOrder};
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_valid_yaml_config() {
        let yaml_content = "data:\n  path: \"/srv/air/PRSA_Data_Guanyuan.csv\"\nanalysis:\n  decomposition_period: 30\n  gap_policy: interpolate\n  wind_order: lexical\ngraph:\n  width: 1300\n  height: 600\n  background_color: \"#FAFAFA\"\n  primary_color: \"#348ABD\"\n  font_family: \"DejaVu Sans\"\n  title_font_size: 18\n  font_size: 12\n  show_grid: false\noutput:\n  directory: \"/srv/air/out\"\n  image_format: svg\n  write_summary_json: true\n  title: \"Guanyuan\"\nlogging:\n  level: \"debug\"\n  file: \"/var/log/aqdash.log\"\n  colored: false\n  json: true\n  include_location: true";

        let temp_file = create_test_config_file(yaml_content);
        let config = ConfigLoader::load_config(temp_file.path()).expect("Failed to load config");

        assert_eq!(config.data.path, "/srv/air/PRSA_Data_Guanyuan.csv");
        assert_eq!(config.analysis.decomposition_period, 30);
        assert_eq!(config.analysis.gap_policy, GapPolicy::Interpolate);
        assert_eq!(config.analysis.wind_order, WindOrder::Lexical);
        assert_eq!(config.graph.width, 1300);
        assert!(!config.graph.show_grid);
        assert!(config.output.write_summary_json);
        assert_eq!(config.logging.file.as_deref(), Some("/var/log/aqdash.log"));
    }

    #[test]
    fn test_invalid_yaml() {
        let temp_file = create_test_config_file("graph:\n  width: [unclosed array");
        let result = ConfigLoader::load_config(temp_file.path());

        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_unknown_policy_is_parse_error() {
        let temp_file = create_test_config_file("analysis:\n  gap_policy: guess\n");
        let result = ConfigLoader::load_config(temp_file.path());

        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_validation_error() {
        let temp_file = create_test_config_file("graph:\n  width: 20\n");
        let result = ConfigLoader::load_config(temp_file.path());

        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = Config::default();
        let lookup = lookup_from(&[
            ("AQDASH_DATA_PATH", "/data/other.csv"),
            ("AQDASH_OUTPUT_DIR", "/tmp/dash"),
            ("AQDASH_IMAGE_FORMAT", "svg"),
            ("AQDASH_DECOMPOSITION_PERIOD", " 14 "),
            ("AQDASH_GAP_POLICY", "interpolate"),
            ("AQDASH_WIND_ORDER", "lexical"),
            ("AQDASH_GRAPH_WIDTH", "1500"),
            ("AQDASH_GRAPH_HEIGHT", "700"),
            ("AQDASH_LOG_LEVEL", "trace"),
        ]);

        ConfigLoader::apply_overrides(&mut config, lookup).expect("overrides should apply");

        assert_eq!(config.data.path, "/data/other.csv");
        assert_eq!(config.output.directory, "/tmp/dash");
        assert_eq!(config.output.image_format, crate::ImageFormat::Svg);
        assert_eq!(config.analysis.decomposition_period, 14);
        assert_eq!(config.analysis.gap_policy, GapPolicy::Interpolate);
        assert_eq!(config.analysis.wind_order, WindOrder::Lexical);
        assert_eq!(config.graph.width, 1500);
        assert_eq!(config.graph.height, 700);
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn test_env_parse_error() {
        let mut config = Config::default();
        let result = ConfigLoader::apply_overrides(
            &mut config,
            lookup_from(&[("AQDASH_GRAPH_WIDTH", "wide")]),
        );

        match result {
            Err(ConfigError::EnvParseError { var, .. }) => assert_eq!(var, "AQDASH_GRAPH_WIDTH"),
            other => panic!("expected EnvParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_overrides_applied_before_validation() {
        let temp_file = create_test_config_file("data:\n  path: \"\"\nlogging:\n  level: loud\n");

        let result = ConfigLoader::load_from_file(temp_file.path());
        assert!(result.is_err());

        let config = ConfigLoader::load_with(Some(temp_file.path()), |config| {
            config.data.path = "station.csv".to_string();
            config.logging.level = "debug".to_string();
        })
        .expect("overrides should repair the invalid values");

        assert_eq!(config.data.path, "station.csv");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_missing_config_file() {
        let result = ConfigLoader::load_config("/nonexistent/path/aqdash.yaml");
        assert!(matches!(result.unwrap_err(), ConfigError::IoError(_)));
    }

    #[test]
    fn test_config_error_converts_to_aq_error() {
        let err: aqdash_common::AqError = ConfigError::EnvParseError {
            var: "AQDASH_GRAPH_WIDTH".to_string(),
            message: "invalid digit".to_string(),
        }
        .into();
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
