//! Chart rendering for the aqdash dashboard

pub mod bar_chart;
pub mod heatmap;
pub mod renderer;
pub mod trend_line;
pub mod types;

pub use bar_chart::{BarChartGraph, BarOrientation, CategoryValue};
pub use heatmap::CorrelationHeatmapGraph;
pub use renderer::{GraphRenderer, ImageKind};
pub use trend_line::{DatedValue, TrendLineGraph};
pub use types::*;
