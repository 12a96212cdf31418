//! Median PM2.5 per hour of the day.

use crate::stats::group_medians;
use aqdash_common::{hour_label, AqError, Dataset, Result};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyMedian {
    /// Hour of day, 0-23
    pub hour: u32,
    /// 12-hour clock label, e.g. `"3 PM"`
    pub label: String,
    pub median: Option<f64>,
}

/// Hourly medians in ascending hour order. Hours without readings are absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HourlySummary {
    pub entries: Vec<HourlyMedian>,
}

impl HourlySummary {
    pub fn get(&self, hour: u32) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.hour == hour)
            .and_then(|entry| entry.median)
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.label.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn hourly_summary(dataset: &Dataset) -> Result<HourlySummary> {
    if dataset.is_empty() {
        return Err(AqError::insufficient_data("hourly summary needs readings", 1, 0));
    }

    let groups = group_medians(dataset.readings().iter().map(|r| (r.hour, r.pm25())));

    let entries: Vec<HourlyMedian> = groups
        .into_iter()
        .filter_map(|(hour, median)| {
            hour_label(hour).map(|label| HourlyMedian {
                hour,
                label,
                median,
            })
        })
        .collect();

    debug!(hours = entries.len(), "Computed hourly medians");
    Ok(HourlySummary { entries })
}
