//! Cross-validated linear predictions with bootstrap confidence intervals.
//!
//! A dataset is split into contiguous folds, a least-squares model is fitted on
//! all but one fold and used to predict the held-out rows, and the pooled
//! out-of-fold predictions are bootstrapped into a percentile interval for
//! their mean. Folds and resamples can run on a scoped worker pool; seeded
//! sub-streams keep the bootstrap reproducible however the work is scheduled.

// Modules
pub mod bootstrap;
pub mod config;
pub mod cross_validation;
pub mod data;
pub mod errors;
pub mod folds;
pub mod loader;
pub mod metric;
pub mod model;
pub mod pipeline;
pub mod pool;
pub mod sampler;
pub mod utils;

// Individual classes, and functions
pub use bootstrap::{bootstrap_ci, BootstrapConfig, ConfidenceInterval};
pub use config::{ConfigIO, PipelineConfig};
pub use cross_validation::{cross_validate, PredictionRecord};
pub use data::{Dataset, Matrix};
pub use errors::CvBootError;
pub use loader::{load_csv, LoadOptions};
pub use model::LinearRegression;
pub use pipeline::{Pipeline, PipelineReport};
pub use pool::Execution;
