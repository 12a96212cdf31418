//! Median PM2.5 per calendar month, pooled across years.

use crate::stats::{group_medians, round_half_even};
use aqdash_common::{month_name, AqError, Dataset, Result};
use serde::Serialize;
use tracing::debug;

/// One bar of the monthly chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMedian {
    /// 1-based month number
    pub month: u32,
    pub name: &'static str,
    /// Median rounded to one decimal place; `None` when every reading was missing
    pub median: Option<f64>,
}

/// Monthly medians in calendar order. Months without readings are absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MonthlySummary {
    pub entries: Vec<MonthlyMedian>,
}

impl MonthlySummary {
    /// Median for a month name, e.g. `"January"`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .and_then(|entry| entry.median)
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Groups readings by month number and takes the PM2.5 median of each group.
pub fn monthly_summary(dataset: &Dataset) -> Result<MonthlySummary> {
    if dataset.is_empty() {
        return Err(AqError::insufficient_data("monthly summary needs readings", 1, 0));
    }

    let groups = group_medians(dataset.readings().iter().map(|r| (r.month, r.pm25())));

    let entries: Vec<MonthlyMedian> = groups
        .into_iter()
        .filter_map(|(month, median)| {
            month_name(month).map(|name| MonthlyMedian {
                month,
                name,
                median: median.map(|m| round_half_even(m, 1)),
            })
        })
        .collect();

    debug!(months = entries.len(), "Computed monthly medians");
    Ok(MonthlySummary { entries })
}
