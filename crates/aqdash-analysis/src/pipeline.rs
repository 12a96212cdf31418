//! Load once, then compute every summary from the same dataset.

use crate::correlation::{correlation_matrix, CorrelationMatrix};
use crate::daily::{daily_medians, DailySeries};
use crate::decomposition::{Decomposition, SeasonalDecomposer, DEFAULT_PERIOD};
use crate::hourly::{hourly_summary, HourlySummary};
use crate::loader::CsvLoader;
use crate::monthly::{monthly_summary, MonthlySummary};
use crate::wind::{wind_summary, WindSummary};
use aqdash_common::{Dataset, GapPolicy, Result, WindOrder};
use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Knobs of the analysis steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub decomposition_period: usize,
    pub gap_policy: GapPolicy,
    pub wind_order: WindOrder,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            decomposition_period: DEFAULT_PERIOD,
            gap_policy: GapPolicy::default(),
            wind_order: WindOrder::default(),
        }
    }
}

/// The daily series together with its decomposition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTrend {
    pub series: DailySeries,
    pub decomposition: Decomposition,
}

/// Outcome of every section. A failed section carries its own error.
#[derive(Debug)]
pub struct Report {
    pub monthly: Result<MonthlySummary>,
    pub daily: Result<DailyTrend>,
    pub hourly: Result<HourlySummary>,
    pub wind: Result<WindSummary>,
    pub correlation: Result<CorrelationMatrix>,
}

impl Report {
    /// Names of the sections that failed, in section order.
    pub fn failed_sections(&self) -> Vec<&'static str> {
        [
            ("monthly", self.monthly.is_err()),
            ("daily", self.daily.is_err()),
            ("hourly", self.hourly.is_err()),
            ("wind", self.wind.is_err()),
            ("correlation", self.correlation.is_err()),
        ]
        .into_iter()
        .filter_map(|(name, failed)| failed.then_some(name))
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.failed_sections().is_empty()
    }
}

/// Runs the five summaries over one immutable dataset.
#[derive(Debug, Clone, Default)]
pub struct ReportPipeline {
    settings: PipelineSettings,
}

impl ReportPipeline {
    pub fn new(settings: PipelineSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Loads the dataset; failure here is fatal for the whole report.
    pub fn load(path: impl AsRef<Path>) -> Result<Dataset> {
        CsvLoader::new().load(path)
    }

    /// Computes every section. Never fails as a whole.
    #[instrument(skip_all, fields(rows = dataset.len()))]
    pub fn run(&self, dataset: &Dataset) -> Report {
        let report = Report {
            monthly: section("monthly", || monthly_summary(dataset)),
            daily: section("daily", || self.daily_trend(dataset)),
            hourly: section("hourly", || hourly_summary(dataset)),
            wind: section("wind", || wind_summary(dataset, self.settings.wind_order)),
            correlation: section("correlation", || correlation_matrix(dataset)),
        };

        let failed = report.failed_sections();
        info!(
            succeeded = 5 - failed.len(),
            failed = failed.len(),
            "Report computed"
        );
        report
    }

    /// Daily medians and their decomposition.
    pub fn daily_trend(&self, dataset: &Dataset) -> Result<DailyTrend> {
        let series = daily_medians(dataset)?;
        let decomposition = SeasonalDecomposer::new(self.settings.decomposition_period)
            .with_gap_policy(self.settings.gap_policy)
            .decompose(&series)?;
        Ok(DailyTrend {
            series,
            decomposition,
        })
    }
}

fn section<T>(name: &str, compute: impl FnOnce() -> Result<T>) -> Result<T> {
    let result = compute();
    if let Err(err) = &result {
        warn!(section = name, error = %err, "Section failed");
    }
    result
}
