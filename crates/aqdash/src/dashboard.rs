//! Builds the dashboard: load, analyse, render every section, write the page.

use crate::page::{render_page, PageContext};
use crate::sections::SectionId;
use aqdash_analysis::{
    CorrelationMatrix, DailyTrend, HourlySummary, MonthlySummary, PipelineSettings, Report,
    ReportPipeline, WindSummary,
};
use aqdash_common::{AqError, Dataset, Result};
use aqdash_config::Config;
use aqdash_graphs::{
    BarChartGraph, BarOrientation, CategoryValue, ColorScheme, CorrelationHeatmapGraph,
    DatedValue, FontConfig, GraphConfig, GraphRenderer, GridConfig, TrendLineGraph,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Name of the generated page inside the output directory
pub const INDEX_FILE: &str = "index.html";
/// Name of the optional summary export
pub const SUMMARY_FILE: &str = "summaries.json";

const SPAN_FORMAT: &str = "%Y-%m-%d %H:%M";

/// What happened to one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SectionStatus {
    /// Image file name, relative to the page
    Rendered { image: String },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionOutcome {
    pub section: SectionId,
    #[serde(flatten)]
    pub status: SectionStatus,
}

impl SectionOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self.status, SectionStatus::Rendered { .. })
    }
}

/// Files written by a build.
#[derive(Debug, Clone)]
pub struct DashboardOutput {
    pub directory: PathBuf,
    pub index: PathBuf,
    pub summary: Option<PathBuf>,
    /// One entry per section, in page order
    pub sections: Vec<SectionOutcome>,
}

impl DashboardOutput {
    pub fn failed_sections(&self) -> Vec<SectionId> {
        self.sections
            .iter()
            .filter(|outcome| !outcome.is_rendered())
            .map(|outcome| outcome.section)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.sections.iter().all(SectionOutcome::is_rendered)
    }

    pub fn outcome(&self, section: SectionId) -> Option<&SectionOutcome> {
        self.sections.iter().find(|outcome| outcome.section == section)
    }
}

#[derive(Serialize)]
struct SummaryExport<'a> {
    source: String,
    rows: usize,
    monthly: Option<&'a MonthlySummary>,
    daily: Option<&'a DailyTrend>,
    hourly: Option<&'a HourlySummary>,
    wind: Option<&'a WindSummary>,
    correlation: Option<&'a CorrelationMatrix>,
    /// Error message of every section that could not be computed
    errors: BTreeMap<SectionId, String>,
}

/// Dashboard generator
#[derive(Debug, Clone)]
pub struct Dashboard {
    config: Config,
}

impl Dashboard {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn settings(&self) -> PipelineSettings {
        PipelineSettings {
            decomposition_period: self.config.analysis.decomposition_period,
            gap_policy: self.config.analysis.gap_policy,
            wind_order: self.config.analysis.wind_order,
        }
    }

    pub fn output_dir(&self) -> &Path {
        Path::new(&self.config.output.directory)
    }

    /// Path of a section's chart image
    pub fn image_path(&self, section: SectionId) -> PathBuf {
        self.output_dir().join(self.image_name(section))
    }

    fn image_name(&self, section: SectionId) -> String {
        format!(
            "{}.{}",
            section.file_stem(),
            self.config.output.image_format.extension()
        )
    }

    /// Loads the configured CSV and builds the whole dashboard.
    ///
    /// A dataset that cannot be loaded fails the build before anything is
    /// written; later failures only affect their own section.
    #[instrument(skip(self), fields(data = %self.config.data.path))]
    pub fn build(&self) -> Result<DashboardOutput> {
        let dataset = ReportPipeline::load(&self.config.data.path)?;
        self.build_from(&dataset)
    }

    /// Builds the dashboard from an already loaded dataset.
    pub fn build_from(&self, dataset: &Dataset) -> Result<DashboardOutput> {
        let directory = self.output_dir().to_path_buf();
        fs::create_dir_all(&directory)?;

        let report = ReportPipeline::new(self.settings()).run(dataset);
        let sections: Vec<SectionOutcome> = SectionId::ALL
            .iter()
            .map(|&section| self.render_section(section, &report))
            .collect();

        let index = directory.join(INDEX_FILE);
        fs::write(&index, render_page(&self.page_context(dataset), &sections))?;
        info!(path = %index.display(), "Wrote dashboard page");

        let summary = if self.config.output.write_summary_json {
            let path = directory.join(SUMMARY_FILE);
            write_summary(&path, dataset, &report)?;
            info!(path = %path.display(), "Wrote summary export");
            Some(path)
        } else {
            None
        };

        let output = DashboardOutput {
            directory,
            index,
            summary,
            sections,
        };
        let failed = output.failed_sections();
        if failed.is_empty() {
            info!("All sections rendered");
        } else {
            warn!(failed = ?failed, "Dashboard built with failed sections");
        }
        Ok(output)
    }

    fn page_context(&self, dataset: &Dataset) -> PageContext {
        PageContext {
            title: self.config.output.title.clone(),
            source: dataset.source().display().to_string(),
            rows: dataset.len(),
            span: dataset.date_span().map(|(first, last)| {
                (
                    first.format(SPAN_FORMAT).to_string(),
                    last.format(SPAN_FORMAT).to_string(),
                )
            }),
        }
    }

    fn render_section(&self, section: SectionId, report: &Report) -> SectionOutcome {
        let path = self.image_path(section);
        let rendered = match section {
            SectionId::Monthly => report
                .monthly
                .as_ref()
                .map(|summary| self.render_monthly(summary, &path)),
            SectionId::DailyTrend => report
                .daily
                .as_ref()
                .map(|trend| self.render_daily(trend, &path)),
            SectionId::Hourly => report
                .hourly
                .as_ref()
                .map(|summary| self.render_hourly(summary, &path)),
            SectionId::WindDirection => report
                .wind
                .as_ref()
                .map(|summary| self.render_wind(summary, &path)),
            SectionId::Correlation => report
                .correlation
                .as_ref()
                .map(|matrix| self.render_correlation(matrix, &path)),
        };

        let status = match rendered {
            Ok(Ok(())) => SectionStatus::Rendered {
                image: self.image_name(section),
            },
            Ok(Err(e)) => {
                warn!(section = %section, error = %e, "Chart rendering failed");
                SectionStatus::Failed {
                    message: format!("Chart could not be rendered: {e}"),
                }
            }
            Err(e) => SectionStatus::Failed {
                message: e.to_string(),
            },
        };
        SectionOutcome { section, status }
    }

    fn render_monthly(&self, summary: &MonthlySummary, path: &Path) -> Result<()> {
        let section = SectionId::Monthly;
        let (graph, mut config) = BarChartGraph::with_config(
            section.chart_title(),
            section.x_label(),
            section.y_label(),
            BarOrientation::Vertical,
        );
        let mut graph = graph.with_values_shown();
        graph.set_data(
            summary
                .entries
                .iter()
                .map(|entry| CategoryValue::new(entry.name, entry.median))
                .collect(),
        );
        self.apply_style(&mut config, true);
        graph.render_to_file(&config, path)
    }

    fn render_daily(&self, trend: &DailyTrend, path: &Path) -> Result<()> {
        let section = SectionId::DailyTrend;
        let (mut graph, mut config) =
            TrendLineGraph::with_config(section.chart_title(), section.x_label(), section.y_label());
        let decomposition = &trend.decomposition;
        graph.set_data(
            decomposition
                .dates
                .iter()
                .zip(&decomposition.trend)
                .map(|(&date, &value)| DatedValue { date, value })
                .collect(),
        );
        self.apply_style(&mut config, true);
        graph.render_to_file(&config, path)
    }

    fn render_hourly(&self, summary: &HourlySummary, path: &Path) -> Result<()> {
        let section = SectionId::Hourly;
        let (mut graph, mut config) = BarChartGraph::with_config(
            section.chart_title(),
            section.x_label(),
            section.y_label(),
            BarOrientation::Horizontal,
        );
        graph.set_data(
            summary
                .entries
                .iter()
                .map(|entry| CategoryValue::new(entry.label.clone(), entry.median))
                .collect(),
        );
        self.apply_style(&mut config, true);
        graph.render_to_file(&config, path)
    }

    fn render_wind(&self, summary: &WindSummary, path: &Path) -> Result<()> {
        let section = SectionId::WindDirection;
        let (mut graph, mut config) = BarChartGraph::with_config(
            section.chart_title(),
            section.x_label(),
            section.y_label(),
            BarOrientation::Vertical,
        );
        graph.set_data(
            summary
                .entries
                .iter()
                .map(|entry| CategoryValue::new(entry.direction.clone(), entry.median))
                .collect(),
        );
        self.apply_style(&mut config, true);
        graph.render_to_file(&config, path)
    }

    fn render_correlation(&self, matrix: &CorrelationMatrix, path: &Path) -> Result<()> {
        let (mut graph, mut config) =
            CorrelationHeatmapGraph::with_config(SectionId::Correlation.chart_title());
        graph.set_data(matrix.labels(), matrix.values().to_vec())?;
        self.apply_style(&mut config, false);
        config.width = self.config.graph.width * 3 / 4;
        config.height = self.config.graph.width * 2 / 3;
        graph.render_to_file(&config, path)
    }

    /// Applies the configured size, fonts and colors. `single_color` replaces
    /// the color scheme with the configured primary color.
    fn apply_style(&self, config: &mut GraphConfig, single_color: bool) {
        let graph = &self.config.graph;
        config.width = graph.width;
        config.height = graph.height;

        let style = &mut config.style;
        style.background_color = Some(graph.background_color.clone());
        style.title_font = FontConfig {
            family: graph.font_family.clone(),
            size: graph.title_font_size,
        };
        style.axis_font = FontConfig {
            family: graph.font_family.clone(),
            size: graph.font_size,
        };
        style.label_font = FontConfig {
            family: graph.font_family.clone(),
            size: graph.font_size.saturating_sub(2).max(8),
        };
        if single_color {
            style.color_scheme = ColorScheme::Custom(vec![graph.primary_color.clone()]);
        }
        if !graph.show_grid {
            style.grid = GridConfig::hidden();
        }
    }
}

fn write_summary(path: &Path, dataset: &Dataset, report: &Report) -> Result<()> {
    let mut errors = BTreeMap::new();
    let mut record = |section: SectionId, error: Option<&AqError>| {
        if let Some(e) = error {
            errors.insert(section, e.to_string());
        }
    };
    record(SectionId::Monthly, report.monthly.as_ref().err());
    record(SectionId::DailyTrend, report.daily.as_ref().err());
    record(SectionId::Hourly, report.hourly.as_ref().err());
    record(SectionId::WindDirection, report.wind.as_ref().err());
    record(SectionId::Correlation, report.correlation.as_ref().err());

    let export = SummaryExport {
        source: dataset.source().display().to_string(),
        rows: dataset.len(),
        monthly: report.monthly.as_ref().ok(),
        daily: report.daily.as_ref().ok(),
        hourly: report.hourly.as_ref().ok(),
        wind: report.wind.as_ref().ok(),
        correlation: report.correlation.as_ref().ok(),
        errors,
    };

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &export).map_err(std::io::Error::from)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqdash_config::ImageFormat;

    fn config_in(dir: &Path) -> Config {
        let mut config = Config::default();
        config.output.directory = dir.display().to_string();
        config
    }

    #[test]
    fn test_image_paths_follow_format() {
        let mut config = config_in(Path::new("out"));
        let dashboard = Dashboard::new(config.clone());
        assert_eq!(
            dashboard.image_path(SectionId::DailyTrend),
            Path::new("out").join("daily_trend.png")
        );

        config.output.image_format = ImageFormat::Svg;
        let dashboard = Dashboard::new(config);
        assert_eq!(
            dashboard.image_path(SectionId::WindDirection),
            Path::new("out").join("wind_direction.svg")
        );
    }

    #[test]
    fn test_settings_come_from_analysis_config() {
        let mut config = Config::default();
        config.analysis.decomposition_period = 3;
        config.analysis.gap_policy = aqdash_common::GapPolicy::Interpolate;
        let settings = Dashboard::new(config).settings();
        assert_eq!(settings.decomposition_period, 3);
        assert_eq!(settings.gap_policy, aqdash_common::GapPolicy::Interpolate);
    }

    #[test]
    fn test_apply_style() {
        let mut config = Config::default();
        config.graph.show_grid = false;
        config.graph.primary_color = "#336699".to_string();
        config.graph.font_size = 9;
        let dashboard = Dashboard::new(config);

        let (_, mut graph_config) =
            BarChartGraph::with_config("t", None, None, BarOrientation::Vertical);
        dashboard.apply_style(&mut graph_config, true);
        assert_eq!(
            graph_config.style.color_scheme,
            ColorScheme::Custom(vec!["#336699".to_string()])
        );
        assert!(!graph_config.style.grid.show_x && !graph_config.style.grid.show_y);
        assert_eq!(graph_config.style.label_font.size, 8);

        let (_, mut heatmap_config) = CorrelationHeatmapGraph::with_config("t");
        dashboard.apply_style(&mut heatmap_config, false);
        assert_eq!(heatmap_config.style.color_scheme, ColorScheme::Reds);
    }

    #[test]
    fn test_section_outcome_serialization() {
        let outcome = SectionOutcome {
            section: SectionId::Hourly,
            status: SectionStatus::Failed {
                message: "boom".to_string(),
            },
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["section"], "hourly");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["message"], "boom");
    }
}
