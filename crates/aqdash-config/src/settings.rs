//! Application configuration structures

use aqdash_common::{GapPolicy, WindOrder};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

/// Default page title, taken from the station the published dataset covers.
pub const DEFAULT_TITLE: &str = "PM2.5 Concentration Dashboard - Guanyuan Air Quality Analysis";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Input dataset
    #[validate]
    pub data: DataConfig,

    /// Aggregation and decomposition settings
    #[validate]
    pub analysis: AnalysisConfig,

    /// Chart rendering settings
    #[validate]
    pub graph: GraphConfig,

    /// Dashboard output
    #[validate]
    pub output: OutputConfig,

    /// Logging configuration
    #[validate]
    pub logging: LoggingConfig,
}

/// Input dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DataConfig {
    /// Path of the hourly readings CSV
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Data path must be a non-empty file path"))]
    pub path: String,
}

/// Analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Season length, in days, of the daily decomposition
    #[validate(range(min = 2, max = 366, message = "Decomposition period must be between 2 and 366 days"))]
    pub decomposition_period: usize,

    /// Treatment of days without readings before decomposition
    pub gap_policy: GapPolicy,

    /// Order of the wind-direction bars
    pub wind_order: WindOrder,
}

/// Chart rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GraphConfig {
    /// Chart width in pixels
    #[validate(range(min = 100, max = 4000, message = "Width must be between 100 and 4000 pixels"))]
    pub width: u32,

    /// Chart height in pixels
    #[validate(range(min = 100, max = 4000, message = "Height must be between 100 and 4000 pixels"))]
    pub height: u32,

    /// Background color (hex format)
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Background color must be valid hex color"))]
    pub background_color: String,

    /// Bar and line color (hex format)
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Primary color must be valid hex color"))]
    pub primary_color: String,

    /// Font family for text rendering
    #[validate(length(min = 1, message = "Font family cannot be empty"))]
    pub font_family: String,

    /// Font size for chart titles
    #[validate(range(min = 8, max = 72, message = "Title font size must be between 8 and 72"))]
    pub title_font_size: u32,

    /// Font size for axis descriptions and labels
    #[validate(range(min = 8, max = 72, message = "Font size must be between 8 and 72"))]
    pub font_size: u32,

    /// Whether to show grid lines
    pub show_grid: bool,
}

/// Chart image encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
}

impl ImageFormat {
    /// File extension, without the dot
    pub const fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            other => Err(format!("unknown image format '{other}' (expected png or svg)")),
        }
    }
}

/// Dashboard output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving `index.html` and the chart images
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Output directory must be a non-empty path"))]
    pub directory: String,

    /// Chart image encoding
    pub image_format: ImageFormat,

    /// Also write every computed summary to `summaries.json`
    pub write_summary_json: bool,

    /// Page title
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(function = "crate::validation::validate_log_level", message = "Log level must be one of: trace, debug, info, warn, error"))]
    pub level: String,

    /// Optional log file path
    pub file: Option<String>,

    /// Whether to use colored, multi-line output on the console
    pub colored: bool,

    /// Whether to emit JSON lines
    pub json: bool,

    /// Whether to include file/line information in logs
    pub include_location: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: "all_data.csv".to_string(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            decomposition_period: 7,
            gap_policy: GapPolicy::Reject,
            wind_order: WindOrder::Compass,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 500,
            background_color: "#FFFFFF".to_string(),
            primary_color: "#E24A33".to_string(),
            font_family: "sans-serif".to_string(),
            title_font_size: 16,
            font_size: 14,
            show_grid: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "dashboard".to_string(),
            image_format: ImageFormat::Png,
            write_summary_json: false,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            colored: true,
            json: false,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Converts to the subscriber settings of `aqdash-common`.
    pub fn to_subscriber_config(&self) -> aqdash_common::LoggingConfig {
        aqdash_common::LoggingConfig {
            level: self.level.clone(),
            json_format: self.json,
            pretty_format: self.colored,
            file_path: self.file.clone(),
            include_location: self.include_location,
            ..aqdash_common::LoggingConfig::default()
        }
    }
}

impl Config {
    /// Comprehensive validation of the entire configuration
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()
    }
}
