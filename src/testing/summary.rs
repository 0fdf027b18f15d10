//! Per-group descriptive statistics.

use crate::error::{StatsError, StatsResult};
use serde::Serialize;
use single_utilities::traits::FloatOps;

/// Mean and unbiased sample variance of one group of observations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub n: usize,
    pub mean: f64,
    /// Sample variance with Bessel's correction (divides by `n - 1`).
    pub variance: f64,
}

impl SummaryStats {
    /// Summarise a group of observations.
    ///
    /// Requires at least two observations, otherwise the sample variance is undefined and
    /// [`StatsError::InsufficientData`] is returned. Values that cannot be represented as
    /// `f64` are rejected with [`StatsError::InvalidParameter`].
    pub fn from_values<T>(values: &[T]) -> StatsResult<Self>
    where
        T: FloatOps,
    {
        if values.len() < 2 {
            return Err(StatsError::InsufficientData(format!(
                "sample variance needs at least 2 observations, got {}",
                values.len()
            )));
        }

        let mut converted = Vec::with_capacity(values.len());
        for (i, value) in values.iter().enumerate() {
            let v = value.to_f64().ok_or_else(|| {
                StatsError::InvalidParameter(format!(
                    "observation {} is not representable as f64",
                    i
                ))
            })?;
            converted.push(v);
        }

        Ok(Self::from_f64(&converted))
    }

    // A rounded mean leaves tiny residuals for constant decimal groups (three 0.1s sum to
    // 0.30000000000000004), so constant groups are pinned to exactly 0.
    fn from_f64(values: &[f64]) -> Self {
        let n = values.len();
        let n_f = n as f64;
        let mean = values.iter().sum::<f64>() / n_f;
        let variance = if values.iter().all(|&x| x == values[0]) {
            0.0
        } else {
            values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (n_f - 1.0)
        };

        SummaryStats { n, mean, variance }
    }
}
