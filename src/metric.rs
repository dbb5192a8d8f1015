//! Metrics
//!
//! Out-of-fold error metrics. Pairs where either side is missing are skipped.
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CvBootError;
use crate::utils::items_to_strings;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    RootMeanSquaredError,
    MeanAbsoluteError,
}

impl Metric {
    pub fn calculate(&self, y: &[f64], yhat: &[f64]) -> f64 {
        match self {
            Metric::RootMeanSquaredError => root_mean_squared_error(y, yhat),
            Metric::MeanAbsoluteError => mean_absolute_error(y, yhat),
        }
    }
}

impl FromStr for Metric {
    type Err = CvBootError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RootMeanSquaredError" | "RMSE" => Ok(Metric::RootMeanSquaredError),
            "MeanAbsoluteError" | "MAE" => Ok(Metric::MeanAbsoluteError),
            _ => Err(CvBootError::InvalidConfiguration(
                "metric".to_string(),
                items_to_strings(vec!["RootMeanSquaredError", "MeanAbsoluteError"]),
                s.to_string(),
            )),
        }
    }
}

fn complete_pairs<'a>(y: &'a [f64], yhat: &'a [f64]) -> impl Iterator<Item = (f64, f64)> + 'a {
    y.iter()
        .zip(yhat)
        .filter(|(a, b)| !a.is_nan() && !b.is_nan())
        .map(|(a, b)| (*a, *b))
}

/// RMSE over complete pairs, `NaN` when there are none.
pub fn root_mean_squared_error(y: &[f64], yhat: &[f64]) -> f64 {
    let (sse, n) = complete_pairs(y, yhat).fold((0.0, 0usize), |(s, n), (a, b)| (s + (a - b).powi(2), n + 1));
    if n == 0 {
        f64::NAN
    } else {
        (sse / n as f64).sqrt()
    }
}

/// MAE over complete pairs, `NaN` when there are none.
pub fn mean_absolute_error(y: &[f64], yhat: &[f64]) -> f64 {
    let (sae, n) = complete_pairs(y, yhat).fold((0.0, 0usize), |(s, n), (a, b)| (s + (a - b).abs(), n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sae / n as f64
    }
}
