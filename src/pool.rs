//! Worker pool
//!
//! Units of work (folds, resamples) run either inline or on a rayon pool that
//! lives only for the duration of one call.
use crate::errors::CvBootError;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Default number of worker threads.
pub const DEFAULT_NUM_THREADS: usize = 4;

/// How independent units of work are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Execution {
    /// One unit after another on the calling thread.
    Sequential,
    /// On a dedicated pool of `num_threads` workers.
    Parallel { num_threads: usize },
}

impl Default for Execution {
    fn default() -> Self {
        Execution::Parallel {
            num_threads: DEFAULT_NUM_THREADS,
        }
    }
}

impl Execution {
    pub fn parallel(num_threads: usize) -> Self {
        Execution::Parallel { num_threads }
    }

    pub fn is_parallel(&self) -> bool {
        matches!(self, Execution::Parallel { .. })
    }

    /// Run `op`, inside a freshly built pool when parallel.
    ///
    /// The pool is dropped before this returns, whether `op` succeeded or not.
    pub fn run<R, F>(&self, op: F) -> Result<R, CvBootError>
    where
        F: FnOnce() -> Result<R, CvBootError> + Send,
        R: Send,
    {
        match *self {
            Execution::Sequential => op(),
            Execution::Parallel { num_threads } => {
                if num_threads == 0 {
                    return Err(CvBootError::InvalidConfiguration(
                        "num_threads".to_string(),
                        "a positive integer".to_string(),
                        num_threads.to_string(),
                    ));
                }
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(num_threads)
                    .build()
                    .map_err(|e| {
                        CvBootError::InvalidConfiguration(
                            "num_threads".to_string(),
                            "a buildable worker pool".to_string(),
                            e.to_string(),
                        )
                    })?;
                debug!("Started worker pool with {} threads.", num_threads);
                let res = pool.install(op);
                debug!("Released worker pool.");
                res
            }
        }
    }

    /// Evaluate `f(0..n)`, returning results in index order.
    ///
    /// Stops at the first error.
    pub fn map_indexed<R, F>(&self, n: usize, f: F) -> Result<Vec<R>, CvBootError>
    where
        F: Fn(usize) -> Result<R, CvBootError> + Send + Sync,
        R: Send,
    {
        match self {
            Execution::Sequential => (0..n).map(f).collect(),
            Execution::Parallel { .. } => self.run(|| (0..n).into_par_iter().map(&f).collect()),
        }
    }
}
