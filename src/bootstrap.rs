//! Bootstrap
//!
//! Percentile confidence interval for the mean of a set of predictions.
//!
//! Each resample draws `n` values with replacement from the full pool, missing
//! values included, and averages the non-missing ones. A resample made only of
//! missing values has no mean and is left out of the quantiles. Resample `r`
//! always draws from sub-stream `r` of the seed, so the interval only depends
//! on the seed and the inputs, never on the pool size.
use crate::errors::CvBootError;
use crate::pool::Execution;
use crate::sampler::{substream, ReplacementSampler, Sampler};
use crate::utils::{mean_ignore_missing, quantiles, validate_float_parameter, validate_positive_count};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub const DEFAULT_RESAMPLES: usize = 500;
pub const DEFAULT_LOWER: f64 = 0.025;
pub const DEFAULT_UPPER: f64 = 0.975;

/// Bootstrap parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Number of resamples.
    pub resamples: usize,
    /// Lower quantile of the resample-mean distribution.
    pub lower: f64,
    /// Upper quantile of the resample-mean distribution.
    pub upper: f64,
    /// Global seed the per-resample sub-streams derive from.
    pub seed: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        BootstrapConfig {
            resamples: DEFAULT_RESAMPLES,
            lower: DEFAULT_LOWER,
            upper: DEFAULT_UPPER,
            seed: 0,
        }
    }
}

impl BootstrapConfig {
    pub fn set_resamples(mut self, resamples: usize) -> Self {
        self.resamples = resamples;
        self
    }

    pub fn set_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.lower = lower;
        self.upper = upper;
        self
    }

    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), CvBootError> {
        validate_positive_count(self.resamples, "resamples")?;
        validate_float_parameter(self.lower, 0.0, 1.0, "lower")?;
        validate_float_parameter(self.upper, 0.0, 1.0, "upper")?;
        if self.lower >= self.upper {
            return Err(CvBootError::InvalidConfiguration(
                "lower".to_string(),
                format!("a value below upper ({})", self.upper),
                self.lower.to_string(),
            ));
        }
        Ok(())
    }
}

/// Percentile bootstrap interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// Mean of the non-missing predictions.
    pub estimate: f64,
    /// Resamples whose mean entered the quantiles.
    pub valid_resamples: usize,
    /// Resamples made only of missing values.
    pub missing_resamples: usize,
}

/// Means of `config.resamples` bootstrap resamples, `NaN` where a resample was all missing.
///
/// The result is indexed by resample number.
pub fn resample_means(
    predictions: &[f64],
    config: &BootstrapConfig,
    execution: &Execution,
) -> Result<Vec<f64>, CvBootError> {
    config.validate()?;
    if predictions.is_empty() {
        return Err(CvBootError::EmptyPredictions);
    }
    let index: Vec<usize> = (0..predictions.len()).collect();
    execution.map_indexed(config.resamples, |r| {
        let mut rng = substream(config.seed, r as u64);
        let drawn = ReplacementSampler::new().sample(&mut rng, &index);
        Ok(mean_ignore_missing(drawn.into_iter().map(|i| predictions[i])).unwrap_or(f64::NAN))
    })
}

/// Bootstrap confidence interval for the mean of `predictions`.
///
/// * `predictions` - Values to resample; order does not matter.
/// * `config` - Resample count, quantile bounds and seed.
/// * `execution` - Whether resamples run inline or on a worker pool.
pub fn bootstrap_ci(
    predictions: &[f64],
    config: &BootstrapConfig,
    execution: &Execution,
) -> Result<ConfidenceInterval, CvBootError> {
    let start = Instant::now();
    let means = resample_means(predictions, config, execution)?;
    let missing_resamples = means.iter().filter(|m| m.is_nan()).count();
    if missing_resamples == means.len() {
        return Err(CvBootError::NoValidResamples(means.len()));
    }
    if missing_resamples > 0 {
        warn!(
            "{} of {} resamples drew only missing predictions and were excluded.",
            missing_resamples,
            means.len()
        );
    }

    let q = quantiles(&means, &[config.lower, config.upper]);
    let estimate = mean_ignore_missing(predictions.iter().copied()).unwrap_or(f64::NAN);
    info!(
        "Bootstrapped {} resamples in {:.3}s: [{:.4}, {:.4}].",
        means.len(),
        start.elapsed().as_secs_f32(),
        q[0],
        q[1]
    );
    Ok(ConfidenceInterval {
        lower: q[0],
        upper: q[1],
        estimate,
        valid_resamples: means.len() - missing_resamples,
        missing_resamples,
    })
}
