//! Categorical bar chart, drawn vertically or horizontally

use crate::renderer::padded_range;
use crate::{GraphConfig, GraphRenderer, GraphType};
use aqdash_common::{AqError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::{Deserialize, Serialize};

/// One labelled bar; bars without a value are left empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryValue {
    pub label: String,
    pub value: Option<f64>,
}

impl CategoryValue {
    pub fn new(label: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarOrientation {
    /// Categories along the x axis
    #[default]
    Vertical,
    /// Categories along the y axis, first category at the bottom
    Horizontal,
}

/// Bar chart over categorical labels
#[derive(Debug, Clone, Default)]
pub struct BarChartGraph {
    pub data: Vec<CategoryValue>,
    pub orientation: BarOrientation,
    /// Print each value next to its bar
    pub show_values: bool,
}

impl BarChartGraph {
    pub fn new(orientation: BarOrientation) -> Self {
        Self {
            data: Vec::new(),
            orientation,
            show_values: false,
        }
    }

    pub fn vertical() -> Self {
        Self::new(BarOrientation::Vertical)
    }

    pub fn horizontal() -> Self {
        Self::new(BarOrientation::Horizontal)
    }

    /// Create a new graph with custom title and labels
    pub fn with_config(
        title: &str,
        x_label: Option<&str>,
        y_label: Option<&str>,
        orientation: BarOrientation,
    ) -> (Self, GraphConfig) {
        let graph = Self::new(orientation);
        let mut config = GraphConfig {
            title: title.to_string(),
            x_label: x_label.map(|s| s.to_string()),
            y_label: y_label.map(|s| s.to_string()),
            graph_type: match orientation {
                BarOrientation::Vertical => GraphType::VerticalBar,
                BarOrientation::Horizontal => GraphType::HorizontalBar,
            },
            ..Default::default()
        };

        // Horizontal bars need room for category names on the left
        if orientation == BarOrientation::Horizontal {
            config.style.margins.left = 90;
            config.style.grid.show_y = false;
        } else {
            config.style.grid.show_x = false;
        }

        (graph, config)
    }

    pub fn with_values_shown(mut self) -> Self {
        self.show_values = true;
        self
    }

    pub fn set_data(&mut self, data: Vec<CategoryValue>) {
        self.data = data;
    }

    pub fn add_bar(&mut self, label: impl Into<String>, value: Option<f64>) {
        self.data.push(CategoryValue::new(label, value));
    }

    pub fn labels(&self) -> Vec<String> {
        self.data.iter().map(|bar| bar.label.clone()).collect()
    }

    /// Value axis range, from zero (or below, for negative values) to above the tallest bar
    pub fn value_range(&self) -> (f64, f64) {
        padded_range(self.data.iter().filter_map(|bar| bar.value))
    }

    fn bars(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(i, bar)| bar.value.map(|v| (i as i32, v)))
    }

    /// Last category index of the segmented axis, at least one so the axis has width
    fn last_index(&self) -> i32 {
        (self.data.len() as i32 - 1).max(1)
    }

    fn draw_vertical<DB>(&self, root: &DrawingArea<DB, Shift>, config: &GraphConfig) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let (lo, hi) = self.value_range();
        let labels = self.labels();

        let mut chart = ChartBuilder::on(root)
            .caption(&config.title, config.style.title_font.spec())
            .margin(config.style.margins.top)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d((0..self.last_index()).into_segmented(), lo..hi)?;

        let format_category = |v: &SegmentValue<i32>| category_label(&labels, v);
        let grid_color = self.get_grid_color(config);

        let mut mesh = chart.configure_mesh();
        mesh.x_labels(labels.len())
            .x_label_formatter(&format_category)
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
        if !config.style.grid.show_x {
            mesh.disable_x_mesh();
        }
        if !config.style.grid.show_y {
            mesh.disable_y_mesh();
        }
        mesh.draw()?;

        let color = self.get_primary_color(config);
        chart.draw_series(
            Histogram::vertical(&chart)
                .style(color.filled())
                .margin(8)
                .data(self.bars()),
        )?;

        if self.show_values {
            let style = TextStyle::from(config.style.label_font.spec().into_font())
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            chart.draw_series(self.bars().map(|(i, v)| {
                Text::new(format!("{v:.1}"), (SegmentValue::CenterOf(i), v), style.clone())
            }))?;
        }

        Ok(())
    }

    fn draw_horizontal<DB>(&self, root: &DrawingArea<DB, Shift>, config: &GraphConfig) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let (lo, hi) = self.value_range();
        let labels = self.labels();

        let mut chart = ChartBuilder::on(root)
            .caption(&config.title, config.style.title_font.spec())
            .margin(config.style.margins.top)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d(lo..hi, (0..self.last_index()).into_segmented())?;

        let format_category = |v: &SegmentValue<i32>| category_label(&labels, v);
        let grid_color = self.get_grid_color(config);

        let mut mesh = chart.configure_mesh();
        mesh.y_labels(labels.len())
            .y_label_formatter(&format_category)
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
        if !config.style.grid.show_x {
            mesh.disable_x_mesh();
        }
        if !config.style.grid.show_y {
            mesh.disable_y_mesh();
        }
        mesh.draw()?;

        let color = self.get_primary_color(config);
        chart.draw_series(
            Histogram::horizontal(&chart)
                .style(color.filled())
                .margin(4)
                .data(self.bars()),
        )?;

        if self.show_values {
            let style = TextStyle::from(config.style.label_font.spec().into_font())
                .pos(Pos::new(HPos::Left, VPos::Center));
            chart.draw_series(self.bars().map(|(i, v)| {
                Text::new(format!(" {v:.1}"), (v, SegmentValue::CenterOf(i)), style.clone())
            }))?;
        }

        Ok(())
    }
}

fn category_label(labels: &[String], value: &SegmentValue<i32>) -> String {
    match value {
        SegmentValue::CenterOf(i) => usize::try_from(*i)
            .ok()
            .and_then(|i| labels.get(i))
            .cloned()
            .unwrap_or_default(),
        _ => String::new(),
    }
}

impl GraphRenderer for BarChartGraph {
    fn name(&self) -> &'static str {
        match self.orientation {
            BarOrientation::Vertical => "vertical bar chart",
            BarOrientation::Horizontal => "horizontal bar chart",
        }
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, config: &GraphConfig) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        if self.bars().next().is_none() {
            return Err(AqError::graph(format!(
                "'{}' has no values to plot",
                config.title
            )));
        }

        let bg_color = self.get_background_color(config);
        root.fill(&bg_color)?;

        match self.orientation {
            BarOrientation::Vertical => self.draw_vertical(root, config),
            BarOrientation::Horizontal => self.draw_horizontal(root, config),
        }
    }
}
