//! Regression evaluation metrics.
//!
//! All functions take predictions first and ground truth second, matching the
//! order the model trainer calls them in.

/// Mean absolute error: `(1/n) · Σ|t - p|`.
///
/// # Panics
/// Panics if the slices have different lengths or are empty.
#[must_use]
pub fn mae(y_pred: &[f64], y_true: &[f64]) -> f64 {
    assert_eq!(y_pred.len(), y_true.len(), "vectors must have same length");
    assert!(!y_true.is_empty(), "vectors cannot be empty");
    let n = y_true.len() as f64;
    y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).abs())
        .sum::<f64>()
        / n
}

/// Mean squared error: `(1/n) · Σ(t - p)²`.
///
/// # Panics
/// Panics if the slices have different lengths or are empty.
#[must_use]
pub fn mse(y_pred: &[f64], y_true: &[f64]) -> f64 {
    assert_eq!(y_pred.len(), y_true.len(), "vectors must have same length");
    assert!(!y_true.is_empty(), "vectors cannot be empty");
    let n = y_true.len() as f64;
    y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p) * (t - p))
        .sum::<f64>()
        / n
}

/// Root mean squared error.
#[must_use]
pub fn rmse(y_pred: &[f64], y_true: &[f64]) -> f64 {
    mse(y_pred, y_true).sqrt()
}

/// Mean absolute percentage error, in percent.
///
/// Targets are expected to be non-zero (prices are, after ingestion drops
/// missing targets).
#[must_use]
pub fn mape(y_pred: &[f64], y_true: &[f64]) -> f64 {
    assert_eq!(y_pred.len(), y_true.len(), "vectors must have same length");
    assert!(!y_true.is_empty(), "vectors cannot be empty");
    let n = y_true.len() as f64;
    y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| ((t - p) / t).abs())
        .sum::<f64>()
        / n
        * 100.0
}

/// Coefficient of determination: `R² = 1 - SS_res / SS_tot`.
///
/// Returns 0 when the targets are constant (`SS_tot == 0`).
///
/// # Panics
/// Panics if the slices have different lengths.
#[must_use]
pub fn r_squared(y_pred: &[f64], y_true: &[f64]) -> f64 {
    assert_eq!(y_pred.len(), y_true.len(), "vectors must have same length");

    let n = y_true.len() as f64;
    let y_mean = y_true.iter().sum::<f64>() / n;

    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p) * (t - p))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - y_mean) * (t - y_mean)).sum();

    if ss_tot == 0.0 {
        return 0.0;
    }
    1.0 - ss_res / ss_tot
}
