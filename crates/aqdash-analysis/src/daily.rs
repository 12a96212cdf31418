//! Daily resampling of the hourly PM2.5 readings.

use crate::stats::median;
use aqdash_common::{AqError, Dataset, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyMedian {
    pub date: NaiveDate,
    pub median: Option<f64>,
}

/// A median for every calendar day from the first reading to the last.
///
/// Days with no valid PM2.5 reading are kept with a `None` median.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DailySeries {
    pub days: Vec<DailyMedian>,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.days.iter().map(|d| d.date).collect()
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.days.iter().map(|d| d.median).collect()
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.days
            .iter()
            .find(|d| d.date == date)
            .and_then(|d| d.median)
    }

    /// Days whose median is missing.
    pub fn gaps(&self) -> Vec<NaiveDate> {
        self.days
            .iter()
            .filter(|d| d.median.is_none())
            .map(|d| d.date)
            .collect()
    }
}

/// Resamples the readings to a contiguous daily median series.
pub fn daily_medians(dataset: &Dataset) -> Result<DailySeries> {
    let (first, last) = dataset
        .date_span()
        .ok_or_else(|| AqError::insufficient_data("daily series needs readings", 1, 0))?;

    let mut buckets: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for reading in dataset.readings() {
        if let Some(value) = reading.pm25() {
            buckets.entry(reading.day_date()).or_default().push(value);
        }
    }

    let days: Vec<DailyMedian> = first
        .date()
        .iter_days()
        .take_while(|date| *date <= last.date())
        .map(|date| DailyMedian {
            date,
            median: buckets.get(&date).and_then(|values| median(values)),
        })
        .collect();

    debug!(
        days = days.len(),
        gaps = days.iter().filter(|d| d.median.is_none()).count(),
        "Resampled readings to daily medians"
    );
    Ok(DailySeries { days })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqdash_common::test_utils::{dataset, ReadingBuilder};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_medians_per_day() {
        let ds = dataset(vec![
            ReadingBuilder::at(2014, 1, 1, 0).pm25(10.0).build(),
            ReadingBuilder::at(2014, 1, 1, 5).pm25(30.0).build(),
            ReadingBuilder::at(2014, 1, 1, 9).pm25(20.0).build(),
            ReadingBuilder::at(2014, 1, 2, 0).pm25(4.0).build(),
            ReadingBuilder::at(2014, 1, 2, 1).pm25(6.0).build(),
        ]);
        let series = daily_medians(&ds).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.get(date(2014, 1, 1)), Some(20.0));
        assert_eq!(series.get(date(2014, 1, 2)), Some(5.0));
    }

    #[test]
    fn test_missing_days_are_kept() {
        let ds = dataset(vec![
            ReadingBuilder::at(2014, 2, 27, 0).pm25(10.0).build(),
            ReadingBuilder::at(2014, 3, 2, 12).pm25(40.0).build(),
            ReadingBuilder::at(2014, 2, 28, 3).build(),
        ]);
        let series = daily_medians(&ds).unwrap();

        assert_eq!(
            series.dates(),
            vec![date(2014, 2, 27), date(2014, 2, 28), date(2014, 3, 1), date(2014, 3, 2)]
        );
        assert_eq!(series.values(), vec![Some(10.0), None, None, Some(40.0)]);
        assert_eq!(series.gaps(), vec![date(2014, 2, 28), date(2014, 3, 1)]);
    }

    #[test]
    fn test_single_day() {
        let ds = dataset(vec![ReadingBuilder::at(2016, 7, 4, 8).pm25(3.5).build()]);
        let series = daily_medians(&ds).unwrap();
        assert_eq!(series.values(), vec![Some(3.5)]);
    }

    #[test]
    fn test_empty_dataset() {
        assert!(daily_medians(&dataset(Vec::new())).is_err());
    }
}
