//! Median PM2.5 per wind direction.

use crate::stats::group_medians;
use aqdash_common::{compass_index, AqError, Dataset, Result, WindOrder, COMPASS_POINTS};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindMedian {
    pub direction: String,
    pub median: Option<f64>,
}

/// One entry per distinct direction label; readings without a label are dropped.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WindSummary {
    pub entries: Vec<WindMedian>,
}

impl WindSummary {
    pub fn get(&self, direction: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.direction == direction)
            .and_then(|entry| entry.median)
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.direction.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compares two direction labels under `order`.
pub fn compare_directions(order: WindOrder, a: &str, b: &str) -> Ordering {
    match order {
        WindOrder::Lexical => a.cmp(b),
        WindOrder::Compass => {
            let rank = |label: &str| compass_index(label).unwrap_or(COMPASS_POINTS.len());
            rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
        }
    }
}

pub fn wind_summary(dataset: &Dataset, order: WindOrder) -> Result<WindSummary> {
    let groups = group_medians(
        dataset
            .readings()
            .iter()
            .filter_map(|r| r.wd.as_deref().map(|wd| (wd.to_string(), r.pm25()))),
    );

    if groups.is_empty() {
        return Err(AqError::insufficient_data(
            "no readings carry a wind direction",
            1,
            0,
        ));
    }

    let mut entries: Vec<WindMedian> = groups
        .into_iter()
        .map(|(direction, median)| WindMedian { direction, median })
        .collect();
    entries.sort_by(|a, b| compare_directions(order, &a.direction, &b.direction));

    debug!(directions = entries.len(), ?order, "Computed wind direction medians");
    Ok(WindSummary { entries })
}
