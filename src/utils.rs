use crate::errors::CvBootError;

/// Create a string of all available items.
pub fn items_to_strings(items: Vec<&str>) -> String {
    items.join(", ")
}

pub fn fmt_vec_output(v: &[f64]) -> String {
    v.iter().map(|n| format!("{:.4}", n)).collect::<Vec<_>>().join(", ")
}

// Validation
pub fn validate_float_parameter(value: f64, min: f64, max: f64, parameter: &str) -> Result<(), CvBootError> {
    if value.is_nan() || value < min || max < value {
        let ex_msg = format!("real value within range {} and {}", min, max);
        Err(CvBootError::InvalidConfiguration(
            parameter.to_string(),
            ex_msg,
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

pub fn validate_positive_count(value: usize, parameter: &str) -> Result<(), CvBootError> {
    if value == 0 {
        Err(CvBootError::InvalidConfiguration(
            parameter.to_string(),
            "a positive integer".to_string(),
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Arithmetic mean of the non-missing values, `None` when every value is missing.
#[inline]
pub fn mean_ignore_missing(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Empirical quantiles with linear interpolation between order statistics.
///
/// For `m` sorted values the `p` quantile sits at position `h = (m - 1) * p`
/// and is interpolated between `x[floor(h)]` and `x[floor(h) + 1]`.
/// Missing values are skipped; an empty input yields an empty result.
///
/// * `v` - Values to compute quantiles of.
/// * `probs` - Probabilities in `[0, 1]`.
pub fn quantiles(v: &[f64], probs: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = v.iter().copied().filter(|x| !x.is_nan()).collect();
    if sorted.is_empty() {
        return Vec::new();
    }
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));
    let last = sorted.len() - 1;
    probs
        .iter()
        .map(|p| {
            let h = last as f64 * p.clamp(0.0, 1.0);
            let lo = h.floor() as usize;
            let hi = (lo + 1).min(last);
            let frac = h - lo as f64;
            sorted[lo] + frac * (sorted[hi] - sorted[lo])
        })
        .collect()
}
