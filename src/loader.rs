//! Loader
//!
//! Reads a delimited file with a header row into a [`Dataset`].
//!
//! Numeric columns are kept as they are. A column holding any non-missing value
//! that does not parse as a number is treated as categorical and expanded into
//! treatment dummies: levels are sorted, the first is the reference, and every
//! other level gets a `{column}{level}` indicator column. Missing categorical
//! values make all of that column's indicators missing.
use crate::data::Dataset;
use crate::errors::CvBootError;
use hashbrown::HashMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub const DEFAULT_TARGET: &str = "totpay";

fn default_target() -> String {
    DEFAULT_TARGET.to_string()
}
fn default_missing_markers() -> Vec<String> {
    vec![String::new(), "NA".to_string()]
}
fn default_delimiter() -> u8 {
    b','
}

/// Options controlling how a delimited file becomes a [`Dataset`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Name of the target column.
    #[serde(default = "default_target")]
    pub target: String,
    /// Field values read as missing, compared after trimming.
    #[serde(default = "default_missing_markers")]
    pub missing_markers: Vec<String>,
    /// Columns left out of the feature set.
    #[serde(default)]
    pub drop_columns: Vec<String>,
    /// Field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            target: default_target(),
            missing_markers: default_missing_markers(),
            drop_columns: Vec::new(),
            delimiter: default_delimiter(),
        }
    }
}

impl LoadOptions {
    pub fn set_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn set_drop_columns(mut self, drop_columns: Vec<String>) -> Self {
        self.drop_columns = drop_columns;
        self
    }

    pub fn set_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn is_missing(&self, value: &str) -> bool {
        let v = value.trim();
        self.missing_markers.iter().any(|m| m == v)
    }
}

/// Load a dataset from a delimited file on disk.
pub fn load_csv<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Dataset, CvBootError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CvBootError::UnableToRead(format!("{}: {}", path.display(), e)))?;
    let dataset = read_csv(BufReader::new(file), options)?;
    info!(
        "Loaded {} rows and {} feature columns from {}.",
        dataset.n_rows(),
        dataset.n_features(),
        path.display()
    );
    Ok(dataset)
}

/// Load a dataset from any reader producing delimited text.
pub fn read_csv<R: Read>(reader: R, options: &LoadOptions) -> Result<Dataset, CvBootError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let target_index = headers
        .iter()
        .position(|h| *h == options.target)
        .ok_or_else(|| CvBootError::MissingColumn(options.target.clone()))?;
    if let Some(missing) = options.drop_columns.iter().find(|c| !headers.contains(*c)) {
        return Err(CvBootError::MissingColumn(missing.clone()));
    }
    let feature_indices: Vec<usize> = (0..headers.len())
        .filter(|&i| i != target_index && !options.drop_columns.contains(&headers[i]))
        .collect();

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); feature_indices.len()];
    let mut target = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let record = result?;
        let value = &record[target_index];
        target.push(if options.is_missing(value) {
            f64::NAN
        } else {
            value.trim().parse::<f64>().map_err(|_| CvBootError::NonNumericTarget {
                column: options.target.clone(),
                row,
                value: value.to_string(),
            })?
        });
        for (col, &idx) in feature_indices.iter().enumerate() {
            raw[col].push(record[idx].trim().to_string());
        }
    }

    let mut names = Vec::new();
    let mut columns = Vec::new();
    for (col, &idx) in feature_indices.iter().enumerate() {
        let encoded = encode_column(&headers[idx], &raw[col], options);
        for (name, values) in encoded {
            names.push(name);
            columns.push(values);
        }
    }
    Dataset::new(names, columns, options.target.clone(), target)
}

/// Turn one raw column into one numeric column, or a set of dummies when categorical.
fn encode_column(name: &str, values: &[String], options: &LoadOptions) -> Vec<(String, Vec<f64>)> {
    let parsed: Option<Vec<f64>> = values
        .iter()
        .map(|v| {
            if options.is_missing(v) {
                Some(f64::NAN)
            } else {
                v.parse::<f64>().ok()
            }
        })
        .collect();
    if let Some(numeric) = parsed {
        return vec![(name.to_string(), numeric)];
    }

    let mut levels: Vec<&str> = values
        .iter()
        .filter(|v| !options.is_missing(v))
        .map(|v| v.as_str())
        .collect();
    levels.sort_unstable();
    levels.dedup();
    debug!("Column {} is categorical with {} levels.", name, levels.len());

    let position: HashMap<&str, usize> = levels.iter().enumerate().map(|(i, l)| (*l, i)).collect();
    levels
        .iter()
        .enumerate()
        .skip(1)
        .map(|(level_idx, level)| {
            let dummy = values
                .iter()
                .map(|v| match position.get(v.as_str()) {
                    Some(&p) if p == level_idx => 1.0,
                    Some(_) => 0.0,
                    None => f64::NAN,
                })
                .collect();
            (format!("{}{}", name, level), dummy)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_numeric_and_categorical() {
        let text = "age,region,totpay\n30,south,100\n41,north,\n,west,250.5\n52,NA,90\n";
        let ds = read_csv(text.as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(ds.n_rows(), 4);
        assert_eq!(ds.feature_names(), &["age", "regionsouth", "regionwest"]);
        assert_eq!(ds.target()[0], 100.0);
        assert!(ds.target()[1].is_nan());
        assert_eq!(ds.target()[2], 250.5);

        let m = ds.matrix();
        assert!(m.get(2, 0).is_nan());
        assert_eq!(m.get_col(1)[..3], [1.0, 0.0, 0.0]);
        assert_eq!(m.get_col(2)[..3], [0.0, 0.0, 1.0]);
        assert!(m.get(3, 1).is_nan() && m.get(3, 2).is_nan());
    }

    #[test]
    fn test_missing_target_column() {
        let text = "a,b\n1,2\n";
        let res = read_csv(text.as_bytes(), &LoadOptions::default());
        assert!(matches!(res, Err(CvBootError::MissingColumn(c)) if c == "totpay"));
    }

    #[test]
    fn test_non_numeric_target() {
        let text = "a,totpay\n1,2\n3,lots\n";
        let res = read_csv(text.as_bytes(), &LoadOptions::default());
        assert!(matches!(res, Err(CvBootError::NonNumericTarget { row: 1, .. })));
    }

    #[test]
    fn test_drop_columns_and_delimiter() {
        let text = "id;x;y\n1;2;3\n2;4;5\n";
        let opts = LoadOptions::default()
            .set_target("y")
            .set_delimiter(b';')
            .set_drop_columns(vec!["id".to_string()]);
        let ds = read_csv(text.as_bytes(), &opts).unwrap();
        assert_eq!(ds.feature_names(), &["x"]);
        assert_eq!(ds.target_name(), "y");

        let opts = opts.set_drop_columns(vec!["nope".to_string()]);
        assert!(matches!(
            read_csv(text.as_bytes(), &opts),
            Err(CvBootError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_load_csv_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "x,totpay").unwrap();
        writeln!(file, "1,2").unwrap();
        writeln!(file, "2,4").unwrap();
        let ds = load_csv(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(ds.n_rows(), 2);
        assert!(matches!(
            load_csv("does/not/exist.csv", &LoadOptions::default()),
            Err(CvBootError::UnableToRead(_))
        ));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let text = "x,totpay\n1,2\n3\n";
        assert!(matches!(
            read_csv(text.as_bytes(), &LoadOptions::default()),
            Err(CvBootError::Csv(_))
        ));
    }

    #[test]
    fn test_overflowing_value_rejected() {
        let mut text = String::from("x,totpay\n");
        for i in 0..20 {
            let x = if i == 3 { "1e400".to_string() } else { i.to_string() };
            text.push_str(&format!("{},{}\n", x, 2 * i));
        }
        let res = read_csv(text.as_bytes(), &LoadOptions::default());
        assert!(matches!(res, Err(CvBootError::InvalidDataset(m)) if m.contains("row 3")));

        let text = "x,totpay\n1,2\n2,inf\n3,6\n";
        assert!(matches!(
            read_csv(text.as_bytes(), &LoadOptions::default()),
            Err(CvBootError::InvalidDataset(_))
        ));
    }

    #[test]
    fn test_resource_file() {
        let ds = load_csv("resources/spending.csv", &LoadOptions::default()).unwrap();
        assert!(ds.n_rows() >= 100);
        assert!(ds.feature_names().iter().any(|n| n.starts_with("region")));
    }
}
