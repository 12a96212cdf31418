//! Date-indexed line chart for the daily PM2.5 trend

use crate::{GraphConfig, GraphRenderer, GraphType};
use aqdash_common::{AqError, Result};
use chrono::{Duration, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

/// A value on a calendar day; `None` breaks the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedValue {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Line chart over consecutive days
#[derive(Debug, Clone)]
pub struct TrendLineGraph {
    pub data: Vec<DatedValue>,
    /// Mark every defined point with a dot
    pub show_points: bool,
    /// strftime pattern of the x axis labels
    pub date_format: String,
}

impl TrendLineGraph {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            show_points: false,
            date_format: "%Y-%m".to_string(),
        }
    }

    /// Create a new graph with custom title and labels
    pub fn with_config(title: &str, x_label: Option<&str>, y_label: Option<&str>) -> (Self, GraphConfig) {
        let graph = Self::new();
        let mut config = GraphConfig {
            title: title.to_string(),
            x_label: x_label.map(|s| s.to_string()),
            y_label: y_label.map(|s| s.to_string()),
            graph_type: GraphType::Line,
            ..Default::default()
        };
        config.style.margins.bottom = 60;

        (graph, config)
    }

    /// Set data, sorted by date
    pub fn set_data(&mut self, mut data: Vec<DatedValue>) {
        data.sort_by_key(|point| point.date);
        self.data = data;
    }

    pub fn add_point(&mut self, date: NaiveDate, value: Option<f64>) {
        self.data.push(DatedValue { date, value });
    }

    fn start_date(&self) -> Option<NaiveDate> {
        self.data.first().map(|point| point.date)
    }

    /// Day offset from the first date, the x coordinate of a point
    fn offset(&self, date: NaiveDate) -> f64 {
        self.start_date()
            .map(|start| (date - start).num_days() as f64)
            .unwrap_or(0.0)
    }

    /// Runs of consecutive defined points, each drawn as its own line
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for point in &self.data {
            match point.value {
                Some(v) => current.push((self.offset(point.date), v)),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    /// Y range padded by 5% of the span on both sides
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut values = self.data.iter().filter_map(|point| point.value);
        let first = values.next()?;
        let (lo, hi) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let padding = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
        Some((lo - padding, hi + padding))
    }

    fn format_offset(&self, offset: f64) -> String {
        match self.start_date() {
            Some(start) => (start + Duration::days(offset.round() as i64))
                .format(&self.date_format)
                .to_string(),
            None => String::new(),
        }
    }
}

impl Default for TrendLineGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphRenderer for TrendLineGraph {
    fn name(&self) -> &'static str {
        "trend line"
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, config: &GraphConfig) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let (y_min, y_max) = self.value_range().ok_or_else(|| {
            AqError::graph(format!("'{}' has no values to plot", config.title))
        })?;
        let x_max = self
            .data
            .last()
            .map(|point| self.offset(point.date))
            .unwrap_or(0.0)
            .max(1.0);

        let bg_color = self.get_background_color(config);
        root.fill(&bg_color)?;

        let mut chart = ChartBuilder::on(root)
            .caption(&config.title, config.style.title_font.spec())
            .margin(config.style.margins.top)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d(0f64..x_max, y_min..y_max)?;

        let format_date = |x: &f64| self.format_offset(*x);
        let grid_color = self.get_grid_color(config);

        let mut mesh = chart.configure_mesh();
        mesh.x_labels(12)
            .x_label_formatter(&format_date)
            .label_style(config.style.label_font.spec())
            .axis_desc_style(config.style.axis_font.spec())
            .light_line_style(grid_color.stroke_width(1))
            .bold_line_style(grid_color.stroke_width(1));
        if let Some(x_label) = &config.x_label {
            mesh.x_desc(x_label);
        }
        if let Some(y_label) = &config.y_label {
            mesh.y_desc(y_label);
        }

        // Apply grid configuration
        if !config.style.grid.show_x {
            mesh.disable_x_mesh();
        }
        if !config.style.grid.show_y {
            mesh.disable_y_mesh();
        }
        mesh.draw()?;

        let primary_color = self.get_primary_color(config);
        for segment in self.segments() {
            if segment.len() == 1 || self.show_points {
                chart.draw_series(
                    segment
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 2, primary_color.filled())),
                )?;
            }
            chart.draw_series(LineSeries::new(segment, primary_color.stroke_width(2)))?;
        }

        Ok(())
    }
}
