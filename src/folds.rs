//! Folds
//!
//! Contiguous block partition of row order into `k` folds labelled `1..=k`.
use crate::errors::CvBootError;

/// Fold label of each row, `label(i) = floor(i * k / n) + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldAssignment {
    labels: Vec<usize>,
    k: usize,
}

impl FoldAssignment {
    /// Partition `n` rows into `k` contiguous folds.
    ///
    /// Requires `2 <= k <= n`.
    pub fn contiguous(n: usize, k: usize) -> Result<Self, CvBootError> {
        validate_folds(k, n)?;
        let labels = (0..n).map(|i| i * k / n + 1).collect();
        Ok(FoldAssignment { labels, k })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Rows held out in `fold`, in row order.
    pub fn test_rows(&self, fold: usize) -> Vec<usize> {
        self.rows_where(|l| l == fold)
    }

    /// Rows used for training when `fold` is held out, in row order.
    pub fn train_rows(&self, fold: usize) -> Vec<usize> {
        self.rows_where(|l| l != fold)
    }

    fn rows_where(&self, keep: impl Fn(usize) -> bool) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| keep(**l))
            .map(|(i, _)| i)
            .collect()
    }
}

pub fn validate_folds(k: usize, n: usize) -> Result<(), CvBootError> {
    if k < 2 || k > n {
        return Err(CvBootError::InvalidConfiguration(
            "folds".to_string(),
            format!("an integer between 2 and the number of rows ({})", n),
            k.to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_contiguous() {
        let folds = FoldAssignment::contiguous(10, 4).unwrap();
        assert_eq!(folds.labels(), &[1, 1, 1, 2, 2, 3, 3, 3, 4, 4]);
        assert_eq!(folds.test_rows(2), vec![3, 4]);
        assert_eq!(folds.train_rows(4), vec![0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_partition_covers_every_row_once() {
        for n in 2..60 {
            for k in 2..=n {
                let folds = FoldAssignment::contiguous(n, k).unwrap();
                let mut seen = vec![0usize; n];
                let mut sizes = Vec::with_capacity(k);
                for f in 1..=k {
                    let rows = folds.test_rows(f);
                    assert!(!rows.is_empty(), "fold {} empty for n={} k={}", f, n, k);
                    assert!(rows.windows(2).all(|w| w[1] == w[0] + 1), "fold {} not contiguous", f);
                    sizes.push(rows.len());
                    for r in rows {
                        seen[r] += 1;
                    }
                }
                assert!(seen.iter().all(|c| *c == 1), "n={} k={}", n, k);
                let (min, max) = (sizes.iter().min().unwrap(), sizes.iter().max().unwrap());
                assert!(max - min <= 1, "unbalanced folds for n={} k={}: {:?}", n, k, sizes);
            }
        }
    }

    #[test]
    fn test_invalid_fold_counts() {
        assert!(matches!(
            FoldAssignment::contiguous(10, 1),
            Err(CvBootError::InvalidConfiguration(..))
        ));
        assert!(matches!(
            FoldAssignment::contiguous(3, 4),
            Err(CvBootError::InvalidConfiguration(..))
        ));
        assert!(FoldAssignment::contiguous(3, 3).is_ok());
    }
}
