//! Outlier detection via the IQR and Z-score methods.

use serde::Serialize;
use tracing::debug;

use crate::analytics::summary::{mean, percentile, stddev};

/// Fewer points than this and quartiles are too unstable to call
/// anything an outlier.
pub const IQR_MIN_SAMPLES: usize = 4;

/// Default Z-score cutoff.
pub const DEFAULT_Z_THRESHOLD: f64 = 2.0;

/// Result of IQR outlier detection. With fewer than [`IQR_MIN_SAMPLES`]
/// points the bounds are `None` and both outlier lists are empty; that is
/// a normal result, not an error.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IqrOutliers {
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
    pub lower_outliers: Vec<f64>,
    pub upper_outliers: Vec<f64>,
}

impl IqrOutliers {
    pub fn count(&self) -> usize {
        self.lower_outliers.len() + self.upper_outliers.len()
    }
}

/// A value flagged by the Z-score method, with its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZScoreOutlier {
    pub value: f64,
    pub z_score: f64,
}

/// Flags values strictly outside `Q1 - 1.5*IQR .. Q3 + 1.5*IQR`, with
/// quartiles from the linear-interpolation percentile definition.
pub fn detect_outliers_iqr(values: &[f64]) -> IqrOutliers {
    if values.len() < IQR_MIN_SAMPLES {
        debug!(n = values.len(), "too few points for IQR outlier detection");
        return IqrOutliers::default();
    }

    // len >= 4, so the quartiles exist.
    let q1 = percentile(values, 25.0).unwrap_or_default();
    let q3 = percentile(values, 75.0).unwrap_or_default();
    let iqr = q3 - q1;

    let lower_bound = q1 - 1.5 * iqr;
    let upper_bound = q3 + 1.5 * iqr;

    IqrOutliers {
        lower_bound: Some(lower_bound),
        upper_bound: Some(upper_bound),
        lower_outliers: values.iter().copied().filter(|&v| v < lower_bound).collect(),
        upper_outliers: values.iter().copied().filter(|&v| v > upper_bound).collect(),
    }
}

/// Flags values whose |z| exceeds `threshold`. A zero standard deviation
/// (all values equal) yields no outliers rather than a division error.
pub fn detect_outliers_zscore(values: &[f64], threshold: f64) -> Vec<ZScoreOutlier> {
    let m = mean(values);
    let sd = stddev(values, m);
    if sd == 0.0 {
        return Vec::new();
    }

    values
        .iter()
        .filter_map(|&value| {
            let z_score = (value - m) / sd;
            if z_score.abs() > threshold {
                Some(ZScoreOutlier { value, z_score })
            } else {
                None
            }
        })
        .collect()
}
