//! Pipeline Configuration
//!
//! Every knob the cross-validation and bootstrap stages consume, with serde
//! defaults so a partial JSON document is enough.
use crate::bootstrap::{BootstrapConfig, DEFAULT_LOWER, DEFAULT_RESAMPLES, DEFAULT_UPPER};
use crate::errors::CvBootError;
use crate::loader::{LoadOptions, DEFAULT_TARGET};
use crate::metric::Metric;
use crate::pool::{Execution, DEFAULT_NUM_THREADS};
use crate::utils::validate_positive_count;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_FOLDS: usize = 5;

fn default_folds() -> usize {
    DEFAULT_FOLDS
}
fn default_resamples() -> usize {
    DEFAULT_RESAMPLES
}
fn default_lower() -> f64 {
    DEFAULT_LOWER
}
fn default_upper() -> f64 {
    DEFAULT_UPPER
}
fn default_num_threads() -> usize {
    DEFAULT_NUM_THREADS
}
fn default_seed() -> u64 {
    1234
}
fn default_parallel() -> bool {
    true
}
fn default_target() -> String {
    DEFAULT_TARGET.to_string()
}
fn default_metric() -> Metric {
    Metric::RootMeanSquaredError
}

/// Configuration for a [`crate::Pipeline`] run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of cross-validation folds.
    #[serde(default = "default_folds")]
    pub folds: usize,
    /// Number of bootstrap resamples.
    #[serde(default = "default_resamples")]
    pub resamples: usize,
    /// Lower quantile of the interval.
    #[serde(default = "default_lower")]
    pub lower: f64,
    /// Upper quantile of the interval.
    #[serde(default = "default_upper")]
    pub upper: f64,
    /// Worker pool size.
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
    /// Global seed for the bootstrap sub-streams.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Evaluate folds on the worker pool.
    #[serde(default = "default_parallel")]
    pub parallel_folds: bool,
    /// Draw resamples on the worker pool.
    #[serde(default = "default_parallel")]
    pub parallel_bootstrap: bool,
    /// Name of the target column.
    #[serde(default = "default_target")]
    pub target: String,
    /// Metric reported for the pooled out-of-fold error.
    #[serde(default = "default_metric")]
    pub metric: Metric,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            folds: default_folds(),
            resamples: default_resamples(),
            lower: default_lower(),
            upper: default_upper(),
            num_threads: default_num_threads(),
            seed: default_seed(),
            parallel_folds: default_parallel(),
            parallel_bootstrap: default_parallel(),
            target: default_target(),
            metric: default_metric(),
        }
    }
}

impl PipelineConfig {
    // Set methods for parameters

    pub fn set_folds(mut self, folds: usize) -> Self {
        self.folds = folds;
        self
    }

    pub fn set_resamples(mut self, resamples: usize) -> Self {
        self.resamples = resamples;
        self
    }

    /// Set the interval quantiles.
    /// * `lower` - Lower quantile, in `[0, 1)`.
    /// * `upper` - Upper quantile, above `lower` and at most 1.
    pub fn set_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.lower = lower;
        self.upper = upper;
        self
    }

    pub fn set_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Turn the worker pool on or off for both stages.
    pub fn set_parallel(mut self, parallel: bool) -> Self {
        self.parallel_folds = parallel;
        self.parallel_bootstrap = parallel;
        self
    }

    pub fn set_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn set_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Check everything that can be checked without the data.
    ///
    /// The upper limit on `folds` depends on the row count and is checked by the
    /// cross-validator.
    pub fn validate(&self) -> Result<(), CvBootError> {
        if self.folds < 2 {
            return Err(CvBootError::InvalidConfiguration(
                "folds".to_string(),
                "an integer of at least 2".to_string(),
                self.folds.to_string(),
            ));
        }
        validate_positive_count(self.num_threads, "num_threads")?;
        self.bootstrap_config().validate()
    }

    pub fn bootstrap_config(&self) -> BootstrapConfig {
        BootstrapConfig {
            resamples: self.resamples,
            lower: self.lower,
            upper: self.upper,
            seed: self.seed,
        }
    }

    pub fn fold_execution(&self) -> Execution {
        self.execution(self.parallel_folds)
    }

    pub fn bootstrap_execution(&self) -> Execution {
        self.execution(self.parallel_bootstrap)
    }

    fn execution(&self, parallel: bool) -> Execution {
        if parallel {
            Execution::parallel(self.num_threads)
        } else {
            Execution::Sequential
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::default().set_target(self.target.clone())
    }
}

/// IO
pub trait ConfigIO: Serialize + DeserializeOwned + Sized {
    /// Save as a json object to a file.
    ///
    /// * `path` - Path to save to.
    fn save_config<P: AsRef<Path>>(&self, path: P) -> Result<(), CvBootError> {
        fs::write(path, self.json_dump()?).map_err(|e| CvBootError::UnableToWrite(e.to_string()))
    }

    /// Dump as a json object
    fn json_dump(&self) -> Result<String, CvBootError> {
        serde_json::to_string(self).map_err(|e| CvBootError::UnableToWrite(e.to_string()))
    }

    /// Load from Json string
    ///
    /// * `json_str` - String object, which can be serialized to json.
    fn from_json(json_str: &str) -> Result<Self, CvBootError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| CvBootError::UnableToRead(e.to_string()))
    }

    /// Load from a path to a json object.
    ///
    /// * `path` - Path to load from.
    fn load_config<P: AsRef<Path>>(path: P) -> Result<Self, CvBootError> {
        let json_str = fs::read_to_string(path).map_err(|e| CvBootError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}

impl ConfigIO for PipelineConfig {}
impl ConfigIO for LoadOptions {}
