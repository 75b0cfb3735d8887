//! Null-skipping statistics for sparse daily metrics.
//!
//! Aggregation never treats a missing cell as zero: callers collect the
//! values that were actually logged and pass only those in. An empty
//! slice therefore means "nothing logged" and yields `None`.

/// Round to one decimal place, half away from zero.
///
/// Applying it twice gives the same result as applying it once, so
/// already-rounded table values can be passed through again safely.
///
/// # Examples
///
/// ```
/// use fitdash_core::numeric::round1;
///
/// assert_eq!(round1(185.25), 185.3);
/// assert_eq!(round1(round1(185.25)), 185.3);
/// ```
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to the nearest whole number, half away from zero.
pub fn round_whole(value: f64) -> f64 {
    value.round()
}

/// Arithmetic mean of the logged values.
///
/// Returns `None` when nothing was logged.
///
/// # Examples
///
/// ```
/// use fitdash_core::numeric::mean;
///
/// assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
/// assert_eq!(mean(&[]), None);
/// ```
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator) of the logged values.
///
/// Returns `None` when fewer than two values were logged, since the
/// spread of a single observation is undefined.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let sum_sq: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}
