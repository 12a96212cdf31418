//! Additive seasonal decomposition of the daily series.
//!
//! The series is split into `observed = trend + seasonal + resid`:
//!
//! * **trend** is a centered moving average of length `period` (odd periods)
//!   or `period + 1` with half weights on both ends (even periods). The first
//!   and last `filter_len / 2` values are undefined.
//! * **seasonal** repeats, for each phase `t mod period`, the mean of the
//!   detrended values at that phase, shifted so one full cycle sums to zero.
//! * **resid** is whatever is left, and is undefined wherever the trend is.

use crate::daily::DailySeries;
use aqdash_common::{AqError, GapPolicy, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

/// Default season length in days.
pub const DEFAULT_PERIOD: usize = 7;

/// The four components of a decomposed series, aligned on `dates`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decomposition {
    pub period: usize,
    pub dates: Vec<NaiveDate>,
    /// The series that was decomposed, after any gap filling
    pub observed: Vec<f64>,
    pub trend: Vec<Option<f64>>,
    pub seasonal: Vec<f64>,
    pub resid: Vec<Option<f64>>,
}

impl Decomposition {
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// `(date, trend)` for every day the trend is defined.
    pub fn trend_points(&self) -> Vec<(NaiveDate, f64)> {
        self.dates
            .iter()
            .zip(&self.trend)
            .filter_map(|(date, trend)| trend.map(|t| (*date, t)))
            .collect()
    }
}

/// Splits a daily series into trend, seasonal and residual components.
#[derive(Debug, Clone, Copy)]
pub struct SeasonalDecomposer {
    period: usize,
    gap_policy: GapPolicy,
}

impl Default for SeasonalDecomposer {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD)
    }
}

impl SeasonalDecomposer {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            gap_policy: GapPolicy::default(),
        }
    }

    pub fn with_gap_policy(mut self, gap_policy: GapPolicy) -> Self {
        self.gap_policy = gap_policy;
        self
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Decomposes a daily series.
    pub fn decompose(&self, series: &DailySeries) -> Result<Decomposition> {
        let dates = series.dates();
        let values = series.values();
        self.decompose_values(&dates, &values)
    }

    /// Decomposes `values`, one per entry of `dates`.
    pub fn decompose_values(
        &self,
        dates: &[NaiveDate],
        values: &[Option<f64>],
    ) -> Result<Decomposition> {
        if self.period < 2 {
            return Err(AqError::analysis(format!(
                "decomposition period must be at least 2, got {}",
                self.period
            )));
        }
        if dates.len() != values.len() {
            return Err(AqError::analysis(format!(
                "{} dates for {} values",
                dates.len(),
                values.len()
            )));
        }

        let observed = self.fill_gaps(dates, values)?;

        let required = 2 * self.period;
        if observed.len() < required {
            return Err(AqError::insufficient_data(
                format!(
                    "seasonal decomposition with period {} needs two complete cycles",
                    self.period
                ),
                required,
                observed.len(),
            ));
        }

        let trend = centered_moving_average(&observed, self.period);
        let seasonal = seasonal_component(&observed, &trend, self.period);
        let resid = observed
            .iter()
            .zip(&trend)
            .zip(&seasonal)
            .map(|((x, t), s)| t.map(|t| x - t - s))
            .collect();

        debug!(
            days = observed.len(),
            period = self.period,
            "Decomposed daily series"
        );

        Ok(Decomposition {
            period: self.period,
            dates: dates.to_vec(),
            observed,
            trend,
            seasonal,
            resid,
        })
    }

    fn fill_gaps(&self, dates: &[NaiveDate], values: &[Option<f64>]) -> Result<Vec<f64>> {
        let first_gap = values.iter().position(Option::is_none);
        let Some(first_gap) = first_gap else {
            return Ok(values.iter().flatten().copied().collect());
        };

        let gap_date = dates.get(first_gap).copied();
        match self.gap_policy {
            GapPolicy::Reject => Err(AqError::missing_values(
                match gap_date {
                    Some(date) => format!("daily series has no PM2.5 median on {date}"),
                    None => "daily series has missing days".to_string(),
                },
                gap_date,
            )),
            GapPolicy::Interpolate => {
                let gaps = values.iter().filter(|v| v.is_none()).count();
                warn!(gaps, first = ?gap_date, "Interpolating missing days before decomposition");
                interpolate(values).ok_or_else(|| {
                    AqError::missing_values("daily series has no PM2.5 medians at all", gap_date)
                })
            }
        }
    }
}

/// Linear interpolation between known neighbours; leading and trailing gaps
/// take the nearest known value. `None` if nothing is known.
pub fn interpolate(values: &[Option<f64>]) -> Option<Vec<f64>> {
    let known: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect();
    let (&(first_index, first_value), &(last_index, last_value)) =
        (known.first()?, known.last()?);

    let mut filled = Vec::with_capacity(values.len());
    let mut next = 0;
    for (i, value) in values.iter().enumerate() {
        if let Some(v) = value {
            filled.push(*v);
            continue;
        }
        if i < first_index {
            filled.push(first_value);
        } else if i > last_index {
            filled.push(last_value);
        } else {
            while known[next + 1].0 < i {
                next += 1;
            }
            let (i0, v0) = known[next];
            let (i1, v1) = known[next + 1];
            let fraction = (i - i0) as f64 / (i1 - i0) as f64;
            filled.push(v0 + (v1 - v0) * fraction);
        }
    }
    Some(filled)
}

/// Filter weights of the centered moving average for `period`.
fn trend_weights(period: usize) -> Vec<f64> {
    let p = period as f64;
    if period % 2 == 0 {
        let mut weights = vec![1.0 / p; period + 1];
        weights[0] = 0.5 / p;
        weights[period] = 0.5 / p;
        weights
    } else {
        vec![1.0 / p; period]
    }
}

fn centered_moving_average(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let weights = trend_weights(period);
    let half = weights.len() / 2;
    let n = values.len();

    (0..n)
        .map(|t| {
            if t < half || t + half >= n {
                return None;
            }
            let window = &values[t - half..=t + half];
            Some(window.iter().zip(&weights).map(|(x, w)| x * w).sum())
        })
        .collect()
}

fn seasonal_component(values: &[f64], trend: &[Option<f64>], period: usize) -> Vec<f64> {
    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (t, (x, trend)) in values.iter().zip(trend).enumerate() {
        if let Some(trend) = trend {
            sums[t % period] += x - trend;
            counts[t % period] += 1;
        }
    }

    let phase_means: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(sum, count)| if *count == 0 { 0.0 } else { sum / *count as f64 })
        .collect();
    let overall = phase_means.iter().sum::<f64>() / period as f64;

    (0..values.len())
        .map(|t| phase_means[t % period] - overall)
        .collect()
}
