//! Errors
//!
//! Custom error types used throughout the `cvboot` crate.
use thiserror::Error;

/// Errors that can occur while loading data, cross-validating, or bootstrapping.
#[derive(Debug, Error)]
pub enum CvBootError {
    /// Not enough complete rows to fit the linear model.
    #[error("Insufficient data to fit the model: {rows} complete rows available, at least {required} required.")]
    InsufficientData { rows: usize, required: usize },
    /// A fold ended up with no training rows or no held-out rows.
    #[error("Fold {fold} is empty: {training_rows} training rows and {test_rows} held-out rows.")]
    EmptyFold {
        fold: usize,
        training_rows: usize,
        test_rows: usize,
    },
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidConfiguration(String, String, String),
    /// Fitting or predicting a fold failed.
    #[error("Cross-validation failed on fold {fold}: {source}")]
    FoldFailed {
        fold: usize,
        #[source]
        source: Box<CvBootError>,
    },
    /// No predictions were handed to the bootstrap.
    #[error("Cannot bootstrap an empty set of predictions.")]
    EmptyPredictions,
    /// Every resample mean was missing.
    #[error("All {0} bootstrap resamples consisted only of missing values.")]
    NoValidResamples(usize),
    /// Dataset shape problems.
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),
    /// A required column is not in the header.
    #[error("Column {0} was not found in the input.")]
    MissingColumn(String),
    /// The target column holds a value that is neither numeric nor missing.
    #[error("Target column {column} has non-numeric value {value:?} on row {row}.")]
    NonNumericTarget { column: String, row: usize, value: String },
    /// Unable to read a file.
    #[error("Unable to read from {0}")]
    UnableToRead(String),
    /// Unable to write a file.
    #[error("Unable to write to {0}")]
    UnableToWrite(String),
    /// Error bubbling up from the delimited-file reader.
    #[error("Malformed delimited input: {0}")]
    Csv(#[from] csv::Error),
}

impl CvBootError {
    /// Attach the fold number to an error raised while processing that fold.
    pub(crate) fn in_fold(self, fold: usize) -> Self {
        match self {
            e @ CvBootError::EmptyFold { .. } => e,
            e @ CvBootError::FoldFailed { .. } => e,
            e => CvBootError::FoldFailed {
                fold,
                source: Box::new(e),
            },
        }
    }

    /// The fold this error was raised in, if any.
    pub fn fold(&self) -> Option<usize> {
        match self {
            CvBootError::EmptyFold { fold, .. } | CvBootError::FoldFailed { fold, .. } => Some(*fold),
            _ => None,
        }
    }
}
