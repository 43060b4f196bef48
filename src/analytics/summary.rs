//! Central tendency, dispersion, percentiles, and percentile ranks.

use serde::Serialize;

/// Basic descriptive statistics for one series of values.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    pub std_dev: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

/// The standard report percentiles.
#[derive(Debug, Clone, Serialize)]
pub struct Percentiles {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
}

/// Where one value stands within a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentileRank {
    /// Percentage of values strictly less than this one.
    pub percent: f64,
    /// 1-based rank: (count strictly less) + 1. Tied values share both the
    /// below-count and the rank, so this is not a dense rank.
    pub rank: usize,
}

/// Arithmetic mean. 0.0 for empty input; callers that must distinguish
/// emptiness check before calling.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance given a pre-computed mean. 0.0 for empty input.
pub fn variance(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation given a pre-computed mean.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    variance(values, mean).sqrt()
}

/// Linear-interpolation percentile: rank = p/100 * (n-1), interpolated
/// between the adjacent order statistics. `None` for empty input.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Most frequent value. Ties resolve to the smallest tied value, which
/// keeps the result deterministic across runs and platforms.
fn mode(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut best_value = sorted[0];
    let mut best_count = 0usize;
    let mut i = 0usize;
    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        // Strictly-greater keeps the smallest value among equal counts,
        // since runs are visited in ascending order.
        if j - i > best_count {
            best_count = j - i;
            best_value = sorted[i];
        }
        i = j;
    }
    best_value
}

/// Full descriptive summary of a series. `None` for empty input.
pub fn describe(values: &[f64]) -> Option<Summary> {
    if values.is_empty() {
        return None;
    }
    let mean_val = mean(values);
    let variance_val = variance(values, mean_val);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(Summary {
        mean: mean_val,
        median: percentile(values, 50.0)?,
        mode: mode(values),
        std_dev: variance_val.sqrt(),
        variance: variance_val,
        min,
        max,
        range: max - min,
    })
}

/// The p25/p50/p75/p90/p95 set used by the percentile report. `None` for
/// empty input.
pub fn percentiles(values: &[f64]) -> Option<Percentiles> {
    Some(Percentiles {
        p25: percentile(values, 25.0)?,
        p50: percentile(values, 50.0)?,
        p75: percentile(values, 75.0)?,
        p90: percentile(values, 90.0)?,
        p95: percentile(values, 95.0)?,
    })
}

/// Rank of `value` within `values`. `None` for empty input.
pub fn percentile_rank(value: f64, values: &[f64]) -> Option<PercentileRank> {
    if values.is_empty() {
        return None;
    }
    let below = values.iter().filter(|&&v| v < value).count();
    Some(PercentileRank {
        percent: below as f64 / values.len() as f64 * 100.0,
        rank: below + 1,
    })
}
