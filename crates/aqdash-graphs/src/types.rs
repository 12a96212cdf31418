//! Graph types and data structures

use serde::{Deserialize, Serialize};

/// Supported graph types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphType {
    VerticalBar,
    HorizontalBar,
    Line,
    Heatmap,
}

/// Graph configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    pub graph_type: GraphType,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub style: StyleConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            graph_type: GraphType::VerticalBar,
            title: "Graph".to_string(),
            width: 1200,
            height: 500,
            x_label: None,
            y_label: None,
            style: StyleConfig::default(),
        }
    }
}

/// Color scheme for graphs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColorScheme {
    Default,
    /// Sequential white-to-dark-red ramp
    Reds,
    Monochrome,
    Custom(Vec<String>),
}

/// Font configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontConfig {
    pub family: String,
    pub size: u32,
}

impl FontConfig {
    /// Family and size in the form plotters accepts as a font.
    pub fn spec(&self) -> (&str, f64) {
        (self.family.as_str(), f64::from(self.size))
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 14,
        }
    }
}

/// Margin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginConfig {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            top: 20,
            right: 20,
            bottom: 50,
            left: 70,
        }
    }
}

/// Grid line configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub show_x: bool,
    pub show_y: bool,
    pub color: Option<String>,
}

impl GridConfig {
    pub fn hidden() -> Self {
        Self {
            show_x: false,
            show_y: false,
            color: None,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            show_x: true,
            show_y: true,
            color: Some("#E5E5E5".to_string()),
        }
    }
}

/// Comprehensive styling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    pub color_scheme: ColorScheme,
    pub background_color: Option<String>,
    pub title_font: FontConfig,
    pub axis_font: FontConfig,
    pub label_font: FontConfig,
    pub margins: MarginConfig,
    pub grid: GridConfig,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            color_scheme: ColorScheme::Default,
            background_color: Some("#FFFFFF".to_string()),
            title_font: FontConfig {
                family: "sans-serif".to_string(),
                size: 16,
            },
            axis_font: FontConfig::default(),
            label_font: FontConfig {
                family: "sans-serif".to_string(),
                size: 12,
            },
            margins: MarginConfig::default(),
            grid: GridConfig::default(),
        }
    }
}
