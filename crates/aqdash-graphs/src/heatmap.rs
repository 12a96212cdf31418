//! Annotated heatmap of a correlation matrix

use crate::{ColorScheme, GraphConfig, GraphRenderer, GraphType};
use aqdash_common::{AqError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Fill of cells without a coefficient
const UNDEFINED_CELL: RGBColor = RGBColor(238, 238, 238);

/// Square matrix drawn as colored cells, first row at the top
#[derive(Debug, Clone)]
pub struct CorrelationHeatmapGraph {
    pub labels: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
    /// Print each coefficient inside its cell
    pub annotate: bool,
    pub decimals: usize,
}

impl CorrelationHeatmapGraph {
    pub fn new() -> Self {
        Self {
            labels: Vec::new(),
            values: Vec::new(),
            annotate: true,
            decimals: 2,
        }
    }

    /// Create a new graph with a custom title and the sequential red palette
    pub fn with_config(title: &str) -> (Self, GraphConfig) {
        let graph = Self::new();
        let mut config = GraphConfig {
            title: title.to_string(),
            graph_type: GraphType::Heatmap,
            width: 900,
            height: 800,
            ..Default::default()
        };
        config.style.color_scheme = ColorScheme::Reds;
        config.style.margins.left = 80;

        (graph, config)
    }

    /// Set the matrix; it must be square with one label per row.
    pub fn set_data(&mut self, labels: Vec<String>, values: Vec<Vec<Option<f64>>>) -> Result<()> {
        let n = labels.len();
        if values.len() != n || values.iter().any(|row| row.len() != n) {
            return Err(AqError::graph(format!(
                "heatmap needs a {n}x{n} matrix for {n} labels"
            )));
        }
        self.labels = labels;
        self.values = values;
        Ok(())
    }

    /// Smallest and largest defined value
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .flatten()
            .flatten()
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            })
    }

    fn format_value(&self, value: f64) -> String {
        format!("{value:.prec$}", prec = self.decimals)
    }

    /// Label of the row drawn at segment `y`, rows being drawn bottom-up
    fn row_label(&self, value: &SegmentValue<i32>) -> String {
        match value {
            SegmentValue::CenterOf(y) => usize::try_from(*y)
                .ok()
                .and_then(|y| self.labels.len().checked_sub(y + 1))
                .and_then(|row| self.labels.get(row))
                .cloned()
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn column_label(&self, value: &SegmentValue<i32>) -> String {
        match value {
            SegmentValue::CenterOf(x) => usize::try_from(*x)
                .ok()
                .and_then(|x| self.labels.get(x))
                .cloned()
                .unwrap_or_default(),
            _ => String::new(),
        }
    }
}

impl Default for CorrelationHeatmapGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Linear interpolation along `ramp`, `lo` mapping to the first color and `hi` to the last.
pub fn cell_color(value: f64, lo: f64, hi: f64, ramp: &[RGBColor]) -> RGBColor {
    let Some(last) = ramp.len().checked_sub(1) else {
        return UNDEFINED_CELL;
    };
    let t = if hi > lo {
        ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
    } else {
        1.0
    };

    let position = t * last as f64;
    let index = (position.floor() as usize).min(last);
    let next = (index + 1).min(last);
    let fraction = position - index as f64;

    let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * fraction).round() as u8;
    let (a, b) = (ramp[index], ramp[next]);
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// Black on light cells, white on dark ones.
pub fn text_color(background: RGBColor) -> &'static RGBColor {
    let luminance =
        0.299 * f64::from(background.0) + 0.587 * f64::from(background.1) + 0.114 * f64::from(background.2);
    if luminance > 140.0 {
        &BLACK
    } else {
        &WHITE
    }
}

impl GraphRenderer for CorrelationHeatmapGraph {
    fn name(&self) -> &'static str {
        "correlation heatmap"
    }

    fn default_style(&self) -> crate::StyleConfig {
        crate::StyleConfig {
            color_scheme: ColorScheme::Reds,
            ..Default::default()
        }
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, config: &GraphConfig) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let (lo, hi) = self.value_range().ok_or_else(|| {
            AqError::graph(format!("'{}' has no values to plot", config.title))
        })?;
        let n = self.labels.len() as i32;
        let last = (n - 1).max(1);

        let bg_color = self.get_background_color(config);
        root.fill(&bg_color)?;

        let mut chart = ChartBuilder::on(root)
            .caption(&config.title, config.style.title_font.spec())
            .margin(config.style.margins.top)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d((0..last).into_segmented(), (0..last).into_segmented())?;

        let format_column = |v: &SegmentValue<i32>| self.column_label(v);
        let format_row = |v: &SegmentValue<i32>| self.row_label(v);

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(self.labels.len())
            .y_labels(self.labels.len())
            .x_label_formatter(&format_column)
            .y_label_formatter(&format_row)
            .label_style(config.style.label_font.spec())
            .draw()?;

        let ramp = self.get_colors(&config.style.color_scheme);
        let mut cells = Vec::with_capacity(self.labels.len() * self.labels.len());
        let mut annotations = Vec::new();
        for (i, row) in self.values.iter().enumerate() {
            let y = n - 1 - i as i32;
            for (j, value) in row.iter().enumerate() {
                let x = j as i32;
                let fill = value.map_or(UNDEFINED_CELL, |v| cell_color(v, lo, hi, &ramp));
                cells.push(Rectangle::new(
                    [
                        (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                        (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
                    ],
                    fill.filled(),
                ));
                if let (true, Some(v)) = (self.annotate, value) {
                    annotations.push((self.format_value(*v), x, y, text_color(fill)));
                }
            }
        }
        chart.draw_series(cells)?;

        let (family, size) = config.style.label_font.spec();
        chart.draw_series(annotations.into_iter().map(|(text, x, y, color)| {
            let style = TextStyle::from((family, size).into_font())
                .color(color)
                .pos(Pos::new(HPos::Center, VPos::Center));
            Text::new(text, (SegmentValue::CenterOf(x), SegmentValue::CenterOf(y)), style)
        }))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::REDS;
    use tempfile::tempdir;

    fn sample() -> CorrelationHeatmapGraph {
        let mut graph = CorrelationHeatmapGraph::new();
        graph
            .set_data(
                vec!["PM2.5".to_string(), "PM10".to_string(), "RAIN".to_string()],
                vec![
                    vec![Some(1.0), Some(0.88), None],
                    vec![Some(0.88), Some(1.0), Some(-0.1)],
                    vec![None, Some(-0.1), Some(1.0)],
                ],
            )
            .unwrap();
        graph
    }

    #[test]
    fn test_with_config_uses_reds() {
        let (graph, config) = CorrelationHeatmapGraph::with_config("Correlation matrix of variables");
        assert!(graph.annotate);
        assert_eq!(config.graph_type, GraphType::Heatmap);
        assert_eq!(config.style.color_scheme, ColorScheme::Reds);
        assert_eq!(graph.default_style().color_scheme, ColorScheme::Reds);
    }

    #[test]
    fn test_set_data_requires_square_matrix() {
        let mut graph = CorrelationHeatmapGraph::new();
        let result = graph.set_data(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Some(1.0), None], vec![Some(1.0)]],
        );
        assert!(matches!(result, Err(AqError::Graph { .. })));
        assert!(graph.labels.is_empty());
    }

    #[test]
    fn test_value_range_ignores_undefined() {
        assert_eq!(sample().value_range(), Some((-0.1, 1.0)));
        assert_eq!(CorrelationHeatmapGraph::new().value_range(), None);
    }

    #[test]
    fn test_cell_color_ends_of_ramp() {
        assert_eq!(cell_color(-0.1, -0.1, 1.0, &REDS), REDS[0]);
        assert_eq!(cell_color(1.0, -0.1, 1.0, &REDS), REDS[8]);
        assert_eq!(cell_color(5.0, 0.0, 1.0, &REDS), REDS[8]);
        assert_eq!(cell_color(0.5, 0.0, 1.0, &REDS), REDS[4]);
        assert_eq!(cell_color(0.3, 0.3, 0.3, &REDS), REDS[8]);
        assert_eq!(cell_color(0.3, 0.0, 1.0, &[]), UNDEFINED_CELL);
    }

    #[test]
    fn test_text_color_contrast() {
        assert_eq!(text_color(REDS[0]), &BLACK);
        assert_eq!(text_color(REDS[8]), &WHITE);
    }

    #[test]
    fn test_axis_labels() {
        let graph = sample();
        assert_eq!(graph.column_label(&SegmentValue::CenterOf(0)), "PM2.5");
        assert_eq!(graph.column_label(&SegmentValue::CenterOf(3)), "");
        // rows are drawn bottom-up, so the top segment holds the first label
        assert_eq!(graph.row_label(&SegmentValue::CenterOf(2)), "PM2.5");
        assert_eq!(graph.row_label(&SegmentValue::CenterOf(0)), "RAIN");
        assert_eq!(graph.row_label(&SegmentValue::CenterOf(5)), "");
        assert_eq!(graph.row_label(&SegmentValue::Exact(1)), "");
    }

    #[test]
    fn test_format_value() {
        let mut graph = sample();
        assert_eq!(graph.format_value(0.876), "0.88");
        graph.decimals = 1;
        assert_eq!(graph.format_value(-0.14), "-0.1");
    }

    #[test]
    #[ignore = "needs system fonts"]
    fn test_render_heatmap() {
        let dir = tempdir().unwrap();
        let (_, config) = CorrelationHeatmapGraph::with_config("Correlation");
        let path = dir.path().join("correlation.png");

        sample().render_to_file(&config, &path).unwrap();
        assert!(path.exists());
    }
}
