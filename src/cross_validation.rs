//! Cross Validation
//!
//! K-fold evaluation of the linear model over contiguous row blocks.
//!
//! Every fold owns its training copy and its fitted model; the only thing the
//! folds share is the read-only dataset, so they can run on the worker pool in
//! any order. Folds are tagged with their label, so the result does not rely on
//! completion order. Within a fold, predictions keep row order.
use crate::data::Dataset;
use crate::errors::CvBootError;
use crate::folds::FoldAssignment;
use crate::metric::{mean_absolute_error, root_mean_squared_error};
use crate::model::LinearRegression;
use crate::pool::Execution;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// One out-of-fold prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Row of the dataset the prediction is for.
    pub row: usize,
    /// Fold label in `1..=k`.
    pub fold: usize,
    /// Predicted target, `NaN` when the row has a missing feature.
    pub prediction: f64,
}

/// Per-fold error summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldSummary {
    pub fold: usize,
    pub test_rows: usize,
    pub missing_predictions: usize,
    pub rmse: f64,
    pub mae: f64,
}

/// Run k-fold cross-validation.
///
/// Returns one record per row. Under `Execution::Sequential` the records are
/// fold-major; callers must not rely on cross-fold order otherwise.
///
/// * `dataset` - Data to evaluate on.
/// * `k` - Number of folds, `2 <= k <= n_rows`.
/// * `execution` - Whether folds run inline or on a worker pool.
pub fn cross_validate(
    dataset: &Dataset,
    k: usize,
    execution: &Execution,
) -> Result<Vec<PredictionRecord>, CvBootError> {
    let start = Instant::now();
    let folds = FoldAssignment::contiguous(dataset.n_rows(), k)?;
    info!(
        "Cross-validating {} rows over {} folds ({:?}).",
        dataset.n_rows(),
        k,
        execution
    );

    let per_fold = execution.map_indexed(folds.k(), |i| evaluate_fold(dataset, &folds, i + 1))?;
    let records: Vec<PredictionRecord> = per_fold.into_iter().flatten().collect();

    info!(
        "Cross-validation produced {} predictions in {:.3}s.",
        records.len(),
        start.elapsed().as_secs_f32()
    );
    Ok(records)
}

/// Fit on every fold but `fold` and predict the held-out block.
fn evaluate_fold(
    dataset: &Dataset,
    folds: &FoldAssignment,
    fold: usize,
) -> Result<Vec<PredictionRecord>, CvBootError> {
    let test_rows = folds.test_rows(fold);
    let train_rows = folds.train_rows(fold);
    if test_rows.is_empty() || train_rows.is_empty() {
        return Err(CvBootError::EmptyFold {
            fold,
            training_rows: train_rows.len(),
            test_rows: test_rows.len(),
        });
    }

    let train = dataset.subset(&train_rows).map_err(|e| e.in_fold(fold))?;
    let model = LinearRegression::fit(&train.matrix(), train.target()).map_err(|e| e.in_fold(fold))?;
    let test = dataset.subset(&test_rows).map_err(|e| e.in_fold(fold))?;
    let preds = model.predict(&test.matrix()).map_err(|e| e.in_fold(fold))?;
    debug!(
        "Fold {}: trained on {} rows (r2 {:.4}), predicted {} rows.",
        fold,
        model.n_obs(),
        model.r_squared(),
        preds.len()
    );

    Ok(test_rows
        .into_iter()
        .zip(preds)
        .map(|(row, prediction)| PredictionRecord { row, fold, prediction })
        .collect())
}

/// Predicted values of `records`, in record order.
pub fn prediction_values(records: &[PredictionRecord]) -> Vec<f64> {
    records.iter().map(|r| r.prediction).collect()
}

/// Summarise the out-of-fold error of each fold against the dataset target.
///
/// Fails when a record points past the last row of `dataset`.
pub fn fold_summaries(dataset: &Dataset, records: &[PredictionRecord]) -> Result<Vec<FoldSummary>, CvBootError> {
    if let Some(r) = records.iter().find(|r| r.row >= dataset.n_rows()) {
        return Err(CvBootError::InvalidDataset(format!(
            "prediction for row {} but the dataset has {} rows",
            r.row,
            dataset.n_rows()
        )));
    }
    let k = records.iter().map(|r| r.fold).max().unwrap_or(0);
    Ok((1..=k)
        .filter_map(|fold| {
            let (y, yhat): (Vec<f64>, Vec<f64>) = records
                .iter()
                .filter(|r| r.fold == fold)
                .map(|r| (dataset.target()[r.row], r.prediction))
                .unzip();
            if y.is_empty() {
                return None;
            }
            Some(FoldSummary {
                fold,
                test_rows: y.len(),
                missing_predictions: yhat.iter().filter(|p| p.is_nan()).count(),
                rmse: root_mean_squared_error(&y, &yhat),
                mae: mean_absolute_error(&y, &yhat),
            })
        })
        .collect())
}
