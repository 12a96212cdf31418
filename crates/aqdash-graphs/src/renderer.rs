//! Graph rendering trait and output backends

use crate::{ColorScheme, GraphConfig, StyleConfig};
use aqdash_common::{AqError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// ColorBrewer "Reds", nine classes from light to dark.
pub const REDS: [RGBColor; 9] = [
    RGBColor(255, 245, 240),
    RGBColor(254, 224, 210),
    RGBColor(252, 187, 161),
    RGBColor(252, 146, 114),
    RGBColor(251, 106, 74),
    RGBColor(239, 59, 44),
    RGBColor(203, 24, 29),
    RGBColor(165, 15, 21),
    RGBColor(103, 0, 13),
];

/// Image encodings a graph can be written as, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Svg,
}

impl ImageKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("png") => Ok(Self::Png),
            Some("svg") => Ok(Self::Svg),
            _ => Err(AqError::graph(format!(
                "unsupported image file '{}' (expected .png or .svg)",
                path.display()
            ))),
        }
    }
}

/// Trait for rendering graphs with different types and styling options
pub trait GraphRenderer {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Draw the graph onto an already created drawing area
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, config: &GraphConfig) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static;

    /// Render a graph to a PNG or SVG file, depending on the extension of `path`
    fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()> {
        let size = (config.width, config.height);
        match ImageKind::from_path(path)? {
            ImageKind::Png => {
                let root = BitMapBackend::new(path, size).into_drawing_area();
                self.draw(&root, config)?;
                root.present()?;
            }
            ImageKind::Svg => {
                let root = SVGBackend::new(path, size).into_drawing_area();
                self.draw(&root, config)?;
                root.present()?;
            }
        }

        tracing::info!(graph = self.name(), "Successfully rendered graph to {}", path.display());
        Ok(())
    }

    /// Get the default style configuration for this renderer
    fn default_style(&self) -> StyleConfig {
        StyleConfig::default()
    }

    /// Get colors from color scheme
    fn get_colors(&self, scheme: &ColorScheme) -> Vec<RGBColor> {
        match scheme {
            ColorScheme::Default => vec![
                RGBColor(226, 74, 51),   // Red
                RGBColor(52, 138, 189),  // Blue
                RGBColor(152, 142, 213), // Purple
                RGBColor(119, 119, 119), // Gray
                RGBColor(251, 193, 94),  // Yellow
                RGBColor(142, 186, 66),  // Green
                RGBColor(255, 181, 184), // Pink
            ],
            ColorScheme::Reds => REDS.to_vec(),
            ColorScheme::Monochrome => vec![
                RGBColor(0, 0, 0),
                RGBColor(64, 64, 64),
                RGBColor(128, 128, 128),
                RGBColor(192, 192, 192),
            ],
            ColorScheme::Custom(colors) => colors
                .iter()
                .map(|color_str| self.parse_color(color_str))
                .collect(),
        }
    }

    /// Parse a color string (hex format) to RGBColor
    fn parse_color(&self, color_str: &str) -> RGBColor {
        if let Some(hex) = color_str.strip_prefix('#') {
            if hex.len() == 6 {
                if let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                ) {
                    return RGBColor(r, g, b);
                }
            }
        }
        // Default to black if parsing fails
        RGBColor(0, 0, 0)
    }

    /// Get background color from style config
    fn get_background_color(&self, config: &GraphConfig) -> RGBColor {
        config
            .style
            .background_color
            .as_ref()
            .map(|color| self.parse_color(color))
            .unwrap_or(RGBColor(255, 255, 255))
    }

    /// First color of the configured scheme
    fn get_primary_color(&self, config: &GraphConfig) -> RGBColor {
        self.get_colors(&config.style.color_scheme)
            .first()
            .copied()
            .unwrap_or(RGBColor(226, 74, 51))
    }

    /// Grid line color, a light gray unless configured
    fn get_grid_color(&self, config: &GraphConfig) -> RGBColor {
        config
            .style
            .grid
            .color
            .as_ref()
            .map(|color| self.parse_color(color))
            .unwrap_or(RGBColor(229, 229, 229))
    }
}

/// Axis range with a little headroom above the tallest value, always including zero.
pub(crate) fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let span = (hi - lo).max(1.0);
    let lo = if lo < 0.0 { lo - span * 0.05 } else { 0.0 };
    (lo, hi + span * 0.1)
}
