//! Small numeric helpers shared by the aggregators.
//!
//! Missing observations are `None` (or NaN) and are skipped, so a group whose
//! values are all missing has a missing median rather than zero.

use std::collections::BTreeMap;

/// Median of the finite values, or `None` if there are none.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Groups `(key, value)` pairs and takes the median of each group.
///
/// Every key seen appears in the output, even when all of its values are missing.
pub fn group_medians<K, I>(pairs: I) -> BTreeMap<K, Option<f64>>
where
    K: Ord,
    I: IntoIterator<Item = (K, Option<f64>)>,
{
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for (key, value) in pairs {
        let bucket = groups.entry(key).or_default();
        if let Some(v) = value {
            bucket.push(v);
        }
    }

    groups
        .into_iter()
        .map(|(key, values)| (key, median(&values)))
        .collect()
}

/// Rounds to `decimals` places, sending exact halves to the even neighbour.
pub fn round_half_even(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Pearson correlation over the pairs where both sides are present.
///
/// Returns `None` for fewer than two complete pairs or a zero-variance side.
pub fn pearson<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (Option<f64>, Option<f64>)>,
{
    let complete: Vec<(f64, f64)> = pairs
        .into_iter()
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((x, y)),
            _ => None,
        })
        .collect();

    if complete.len() < 2 {
        return None;
    }

    let n = complete.len() as f64;
    let mean_x = complete.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = complete.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in &complete {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    let divisor = (sxx * syy).sqrt();
    if divisor == 0.0 || !divisor.is_finite() {
        return None;
    }
    Some((sxy / divisor).clamp(-1.0, 1.0))
}
