//! # aqdash analysis
//!
//! Loads the hourly air-quality readings and computes the dashboard summaries:
//! monthly, daily (with seasonal decomposition), hourly and wind-direction
//! PM2.5 medians plus the correlation matrix of all measurements.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod correlation;
pub mod daily;
pub mod decomposition;
pub mod hourly;
pub mod loader;
pub mod monthly;
pub mod pipeline;
pub mod stats;
pub mod wind;

pub use correlation::{correlation_matrix, correlation_matrix_for, CorrelationMatrix};
pub use daily::{daily_medians, DailyMedian, DailySeries};
pub use decomposition::{Decomposition, SeasonalDecomposer, DEFAULT_PERIOD};
pub use hourly::{hourly_summary, HourlyMedian, HourlySummary};
pub use loader::{CsvLoader, REQUIRED_COLUMNS};
pub use monthly::{monthly_summary, MonthlyMedian, MonthlySummary};
pub use pipeline::{DailyTrend, PipelineSettings, Report, ReportPipeline};
pub use wind::{wind_summary, WindMedian, WindSummary};
