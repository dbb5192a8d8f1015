//! Pipeline
//!
//! Dataset → cross-validated predictions → bootstrap interval, in one call.
use crate::bootstrap::{bootstrap_ci, ConfidenceInterval};
use crate::config::PipelineConfig;
use crate::cross_validation::{cross_validate, fold_summaries, prediction_values, FoldSummary, PredictionRecord};
use crate::data::Dataset;
use crate::errors::CvBootError;
use crate::loader::load_csv;
use crate::utils::fmt_vec_output;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

/// Everything one run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub n_rows: usize,
    pub n_features: usize,
    pub folds: usize,
    pub predictions: Vec<PredictionRecord>,
    pub fold_summaries: Vec<FoldSummary>,
    /// Pooled out-of-fold error under the configured metric.
    pub cv_error: f64,
    pub missing_predictions: usize,
    pub interval: ConfidenceInterval,
    pub cv_seconds: f32,
    pub bootstrap_seconds: f32,
}

impl PipelineReport {
    pub fn to_json(&self) -> Result<String, CvBootError> {
        serde_json::to_string_pretty(self).map_err(|e| CvBootError::UnableToWrite(e.to_string()))
    }
}

/// Runs the cross-validation and bootstrap stages under one configuration.
pub struct Pipeline {
    pub cfg: PipelineConfig,
}

impl Default for Pipeline {
    fn default() -> Self {
        Pipeline::new(PipelineConfig::default())
    }
}

impl Pipeline {
    pub fn new(cfg: PipelineConfig) -> Self {
        Pipeline { cfg }
    }

    /// Run both stages on `dataset`. Any failure aborts the run.
    pub fn run(&self, dataset: &Dataset) -> Result<PipelineReport, CvBootError> {
        self.cfg.validate()?;

        let start = Instant::now();
        let predictions = cross_validate(dataset, self.cfg.folds, &self.cfg.fold_execution())?;
        let cv_seconds = start.elapsed().as_secs_f32();

        let summaries = fold_summaries(dataset, &predictions)?;
        let values = prediction_values(&predictions);
        let actual: Vec<f64> = predictions.iter().map(|r| dataset.target()[r.row]).collect();
        let cv_error = self.cfg.metric.calculate(&actual, &values);
        let missing_predictions = values.iter().filter(|v| v.is_nan()).count();
        info!(
            "Out-of-fold {:?}: {:.4} (per fold: {}).",
            self.cfg.metric,
            cv_error,
            fmt_vec_output(&summaries.iter().map(|s| s.rmse).collect::<Vec<_>>())
        );

        let start = Instant::now();
        let interval = bootstrap_ci(&values, &self.cfg.bootstrap_config(), &self.cfg.bootstrap_execution())?;
        let bootstrap_seconds = start.elapsed().as_secs_f32();

        Ok(PipelineReport {
            n_rows: dataset.n_rows(),
            n_features: dataset.n_features(),
            folds: self.cfg.folds,
            predictions,
            fold_summaries: summaries,
            cv_error,
            missing_predictions,
            interval,
            cv_seconds,
            bootstrap_seconds,
        })
    }

    /// Load a delimited file with the configured target, then run.
    pub fn run_csv<P: AsRef<Path>>(&self, path: P) -> Result<PipelineReport, CvBootError> {
        let dataset = load_csv(path, &self.cfg.load_options())?;
        self.run(&dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::Metric;
    use approx::assert_relative_eq;
    use std::io::Write;

    fn scenario() -> Dataset {
        Dataset::new(
            vec!["x".to_string()],
            vec![vec![1.0, 2.0, 3.0, 4.0]],
            "y",
            vec![2.0, 4.0, 6.0, 8.0],
        )
        .unwrap()
    }

    #[test]
    fn test_scenario_exact_fit() {
        let report = Pipeline::new(PipelineConfig::default().set_folds(2)).run(&scenario()).unwrap();
        assert_eq!(report.predictions.len(), 4);
        assert_relative_eq!(report.cv_error, 0.0, epsilon = 1e-9);
        assert_relative_eq!(report.interval.estimate, 5.0, epsilon = 1e-9);
        assert!(report.interval.lower < 5.0 && report.interval.upper > 5.0);
        assert!(report.interval.lower >= 2.0 - 1e-9 && report.interval.upper <= 8.0 + 1e-9);
        assert_eq!(report.missing_predictions, 0);
        assert!(report.to_json().unwrap().contains("\"interval\""));
    }

    #[test]
    fn test_invalid_configuration_aborts() {
        let ds = scenario();
        for cfg in [
            PipelineConfig::default().set_folds(1),
            PipelineConfig::default().set_folds(2).set_resamples(0),
            PipelineConfig::default().set_folds(5),
        ] {
            assert!(matches!(
                Pipeline::new(cfg).run(&ds),
                Err(CvBootError::InvalidConfiguration(..))
            ));
        }
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let seq = Pipeline::new(PipelineConfig::default().set_parallel(false));
        let par = Pipeline::new(PipelineConfig::default().set_num_threads(3));
        let a = seq.run_csv("resources/spending.csv").unwrap();
        let b = par.run_csv("resources/spending.csv").unwrap();
        assert_eq!(a.interval, b.interval);
        assert_relative_eq!(a.cv_error, b.cv_error, epsilon = 1e-9);
        assert_eq!(a.predictions.len(), a.n_rows);
        assert!(a.missing_predictions > 0);
        assert_eq!(a.fold_summaries.len(), 5);
    }

    #[test]
    fn test_metric_choice() {
        let cfg = PipelineConfig::default().set_metric(Metric::MeanAbsoluteError).set_parallel(false);
        let report = Pipeline::new(cfg).run_csv("resources/spending.csv").unwrap();
        assert!(report.cv_error.is_finite() && report.cv_error > 0.0);
    }

    #[test]
    fn test_overflowing_input_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "x,totpay").unwrap();
        for i in 0..20 {
            let x = if i == 3 { "1e400".to_string() } else { i.to_string() };
            writeln!(file, "{},{}", x, 2 * i).unwrap();
        }
        let pipeline = Pipeline::new(PipelineConfig::default().set_parallel(false));
        assert!(matches!(
            pipeline.run_csv(file.path()),
            Err(CvBootError::InvalidDataset(_))
        ));
    }
}
