//! Data
//!
//! The in-memory table the pipeline works on: a column-major block of numeric
//! feature columns plus a single numeric target. Missing values are stored as `NaN`.
use crate::errors::CvBootError;

/// Contiguous Column Major Matrix view.
///
/// Borrows a dense block of values laid out column after column, which lets
/// a single column be handed out as a slice.
pub struct Matrix<'a, T> {
    /// The raw data stored in a single slice.
    pub data: &'a [T],
    /// Number of rows in the matrix.
    pub rows: usize,
    /// Number of columns in the matrix.
    pub cols: usize,
}

impl<'a, T> Matrix<'a, T> {
    /// Create a new Matrix, checking that `data` holds exactly `rows * cols` values.
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Result<Self, CvBootError> {
        if data.len() != rows * cols {
            return Err(CvBootError::InvalidDataset(format!(
                "{} values cannot form a {} x {} matrix",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Matrix { data, rows, cols })
    }

    /// Get a single reference to an item in the matrix.
    ///
    /// * `i` - The ith row of the data to get.
    /// * `j` - the jth column of the data to get.
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.data[j * self.rows + i]
    }

    /// Get access to a row of the data, as an iterator.
    pub fn get_row_iter(&self, row: usize) -> std::iter::StepBy<std::iter::Skip<std::slice::Iter<'a, T>>> {
        self.data.iter().skip(row).step_by(self.rows.max(1))
    }

    /// Get an entire column in the matrix.
    ///
    /// * `col` - The index of the column to get.
    pub fn get_col(&self, col: usize) -> &[T] {
        &self.data[col * self.rows..(col + 1) * self.rows]
    }
}

/// Immutable table of numeric features and a numeric target.
///
/// Built once, then shared read-only (`&Dataset`) between every fold.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    feature_names: Vec<String>,
    target_name: String,
    /// Column-major feature values.
    features: Vec<f64>,
    target: Vec<f64>,
    rows: usize,
}

impl Dataset {
    /// Build a dataset from feature columns and a target.
    ///
    /// * `feature_names` - One name per column in `columns`.
    /// * `columns` - Feature columns, each with one value per row.
    /// * `target_name` - Name of the target column.
    /// * `target` - Target values, one per row.
    pub fn new(
        feature_names: Vec<String>,
        columns: Vec<Vec<f64>>,
        target_name: impl Into<String>,
        target: Vec<f64>,
    ) -> Result<Self, CvBootError> {
        let rows = target.len();
        if rows == 0 {
            return Err(CvBootError::InvalidDataset("dataset has no rows".to_string()));
        }
        if feature_names.len() != columns.len() {
            return Err(CvBootError::InvalidDataset(format!(
                "{} feature names for {} columns",
                feature_names.len(),
                columns.len()
            )));
        }
        if let Some((name, col)) = feature_names.iter().zip(&columns).find(|(_, c)| c.len() != rows) {
            return Err(CvBootError::InvalidDataset(format!(
                "column {} has {} values, target has {}",
                name,
                col.len(),
                rows
            )));
        }
        for (name, col) in feature_names.iter().zip(&columns) {
            check_finite(name, col)?;
        }
        let target_name = target_name.into();
        check_finite(&target_name, &target)?;
        let features = columns.into_iter().flatten().collect();
        Ok(Dataset {
            feature_names,
            target_name,
            features,
            target,
            rows,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.rows
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// Borrow the feature block as a column-major matrix.
    pub fn matrix(&self) -> Matrix<'_, f64> {
        Matrix {
            data: &self.features,
            rows: self.rows,
            cols: self.n_features(),
        }
    }

    /// Copy the selected rows, in the order given, into a new dataset.
    pub fn subset(&self, rows: &[usize]) -> Result<Dataset, CvBootError> {
        if let Some(r) = rows.iter().find(|&&r| r >= self.rows) {
            return Err(CvBootError::InvalidDataset(format!(
                "row {} is out of range for {} rows",
                r, self.rows
            )));
        }
        let mut features = Vec::with_capacity(rows.len() * self.n_features());
        for col in 0..self.n_features() {
            let column = &self.features[col * self.rows..(col + 1) * self.rows];
            features.extend(rows.iter().map(|&r| column[r]));
        }
        Ok(Dataset {
            feature_names: self.feature_names.clone(),
            target_name: self.target_name.clone(),
            features,
            target: rows.iter().map(|&r| self.target[r]).collect(),
            rows: rows.len(),
        })
    }
}

/// Missing values are `NaN`; infinities are rejected.
fn check_finite(name: &str, values: &[f64]) -> Result<(), CvBootError> {
    match values.iter().position(|v| v.is_infinite()) {
        Some(row) => Err(CvBootError::InvalidDataset(format!(
            "column {} has a non-finite value on row {}",
            name, row
        ))),
        None => Ok(()),
    }
}
