//! Model
//!
//! Ordinary least squares regression of the target on every feature column plus
//! an intercept. The solve itself is delegated to `nalgebra`'s SVD.
use crate::data::Matrix;
use crate::errors::CvBootError;
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Relative singular value cutoff below which a direction is treated as null.
const RANK_TOLERANCE: f64 = 1e-10;
/// Convergence threshold of the SVD iteration; `0` iterations means no cap.
const SVD_EPS: f64 = f64::EPSILON;
const SVD_MAX_ITER: usize = 0;

/// A fitted linear model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    intercept: f64,
    coefficients: Vec<f64>,
    rank: usize,
    n_obs: usize,
    r_squared: f64,
}

impl LinearRegression {
    /// Fit the model.
    ///
    /// Rows with a missing feature or a missing target are left out. At least
    /// `cols + 1` complete rows are required.
    ///
    /// * `data` - Feature matrix.
    /// * `y` - Target, one value per row of `data`.
    pub fn fit(data: &Matrix<f64>, y: &[f64]) -> Result<Self, CvBootError> {
        if y.len() != data.rows {
            return Err(CvBootError::InvalidDataset(format!(
                "{} target values for {} rows",
                y.len(),
                data.rows
            )));
        }
        if data.data.len() != data.rows * data.cols {
            return Err(CvBootError::InvalidDataset(format!(
                "{} values cannot form a {} x {} matrix",
                data.data.len(),
                data.rows,
                data.cols
            )));
        }
        if let Some(v) = data.data.iter().chain(y).find(|v| v.is_infinite()) {
            return Err(CvBootError::InvalidDataset(format!("cannot fit on non-finite value {}", v)));
        }
        let complete: Vec<usize> = (0..data.rows)
            .filter(|&i| !y[i].is_nan() && data.get_row_iter(i).all(|v| !v.is_nan()))
            .collect();
        let n_params = data.cols + 1;
        if complete.len() < n_params {
            return Err(CvBootError::InsufficientData {
                rows: complete.len(),
                required: n_params,
            });
        }
        if complete.len() < data.rows {
            debug!("Dropped {} incomplete rows before fitting.", data.rows - complete.len());
        }

        let x = DMatrix::from_fn(complete.len(), n_params, |i, j| {
            if j == 0 {
                1.0
            } else {
                *data.get(complete[i], j - 1)
            }
        });
        let yv = DVector::from_iterator(complete.len(), complete.iter().map(|&i| y[i]));

        let svd = x
            .clone()
            .try_svd(true, true, SVD_EPS, SVD_MAX_ITER)
            .ok_or_else(|| CvBootError::InvalidDataset("singular value decomposition did not converge".to_string()))?;
        let max_sv = svd.singular_values.iter().copied().fold(0.0, f64::max);
        let eps = RANK_TOLERANCE * max_sv.max(f64::MIN_POSITIVE);
        let rank = svd.singular_values.iter().filter(|s| **s > eps).count();
        if rank < n_params {
            warn!(
                "Design matrix is rank deficient ({} of {} columns), using the minimum-norm solution.",
                rank, n_params
            );
        }
        let beta = svd
            .solve(&yv, eps)
            .map_err(|e| CvBootError::InvalidDataset(format!("least squares solve failed: {}", e)))?;

        let fitted = &x * &beta;
        let y_mean = yv.mean();
        let ss_res = (&yv - &fitted).norm_squared();
        let ss_tot = yv.iter().map(|v| (v - y_mean).powi(2)).sum::<f64>();
        let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };

        Ok(LinearRegression {
            intercept: beta[0],
            coefficients: beta.iter().skip(1).copied().collect(),
            rank,
            n_obs: complete.len(),
            r_squared,
        })
    }

    /// Predict each row of `data`, in row order.
    ///
    /// A row with any missing feature gets a missing (`NaN`) prediction.
    pub fn predict(&self, data: &Matrix<f64>) -> Result<Vec<f64>, CvBootError> {
        if data.cols != self.coefficients.len() || data.data.len() != data.rows * data.cols {
            return Err(CvBootError::InvalidDataset(format!(
                "model was fitted on {} columns, got {}",
                self.coefficients.len(),
                data.cols
            )));
        }
        Ok((0..data.rows)
            .map(|i| {
                data.get_row_iter(i)
                    .zip(&self.coefficients)
                    .fold(self.intercept, |acc, (x, b)| acc + x * b)
            })
            .collect())
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Numerical rank of the design matrix, intercept included.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Number of complete rows the model was fitted on.
    pub fn n_obs(&self) -> usize {
        self.n_obs
    }

    /// Coefficient of determination on the training rows.
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }
}
