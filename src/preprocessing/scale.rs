//! Standard scaler (z-score normalization).
//!
//! Transforms features by removing the mean and scaling to unit variance:
//!
//! ```text
//! z = (x - u) / s
//! ```
//!
//! where `u` is the per-column mean and `s` the per-column population
//! standard deviation. Centering can be disabled (`with_mean(false)`), which
//! is how one-hot encoded blocks are scaled without destroying sparsity.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::frame::Matrix;
use crate::preprocessing::traits::{FittedTransformer, Transformer};

/// Standard scaler (unfitted).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StandardScaler {
    with_mean: bool,
    with_std: bool,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
        }
    }
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to center data by the mean.
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.with_mean = with_mean;
        self
    }

    /// Set whether to scale data to unit variance.
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.with_std = with_std;
        self
    }
}

impl Transformer for StandardScaler {
    type Input = Matrix;
    type Output = Matrix;
    type Fitted = FittedStandardScaler;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted> {
        let (rows, cols) = data.shape();
        if rows == 0 {
            return Err(PipelineError::EmptyData(
                "cannot fit standard scaler on empty data".to_string(),
            ));
        }

        let mut mean = vec![0.0; cols];
        if self.with_mean {
            for row in 0..rows {
                for (col, m) in mean.iter_mut().enumerate() {
                    *m += data.get(row, col);
                }
            }
            for m in &mut mean {
                *m /= rows as f64;
            }
        }

        let mut std = vec![1.0; cols];
        if self.with_std {
            // Population standard deviation around the per-column mean, which
            // is computed here even when centering is disabled.
            let mut col_mean = vec![0.0; cols];
            for row in 0..rows {
                for (col, m) in col_mean.iter_mut().enumerate() {
                    *m += data.get(row, col);
                }
            }
            for m in &mut col_mean {
                *m /= rows as f64;
            }
            for (col, s) in std.iter_mut().enumerate() {
                let mut acc = 0.0;
                for row in 0..rows {
                    let d = data.get(row, col) - col_mean[col];
                    acc += d * d;
                }
                let var = acc / rows as f64;
                let sd = var.sqrt();
                // Constant features keep their value instead of dividing by 0.
                *s = if sd == 0.0 { 1.0 } else { sd };
            }
        }

        Ok(FittedStandardScaler {
            with_mean: self.with_mean,
            with_std: self.with_std,
            mean,
            std,
            n_features: cols,
        })
    }
}

/// Fitted standard scaler ready for inference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedStandardScaler {
    with_mean: bool,
    with_std: bool,
    mean: Vec<f64>,
    std: Vec<f64>,
    n_features: usize,
}

impl FittedStandardScaler {
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn std(&self) -> &[f64] {
        &self.std
    }
}

impl FittedTransformer for FittedStandardScaler {
    type Input = Matrix;
    type Output = Matrix;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output> {
        let (rows, cols) = data.shape();
        if cols != self.n_features {
            return Err(PipelineError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: cols,
            });
        }

        let mut out = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let mut v = data.get(row, col);
                if self.with_mean {
                    v -= self.mean[col];
                }
                if self.with_std {
                    v /= self.std[col];
                }
                out.push(v);
            }
        }
        Ok(Matrix::new(out, rows, cols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_scaler_centers_and_scales() {
        // Column: [1, 3] -> mean 2, population std 1
        let data = Matrix::new(vec![1.0, 3.0], 2, 1);
        let fitted = StandardScaler::new().fit(&data).unwrap();
        assert_eq!(fitted.mean(), &[2.0]);
        assert_eq!(fitted.std(), &[1.0]);

        let scaled = fitted.transform(&data).unwrap();
        assert_eq!(scaled.row(0), &[-1.0]);
        assert_eq!(scaled.row(1), &[1.0]);
    }

    #[test]
    fn test_standard_scaler_no_centering() {
        let data = Matrix::new(vec![0.0, 2.0, 4.0], 3, 1);
        let fitted = StandardScaler::new().with_mean(false).fit(&data).unwrap();

        // std of [0, 2, 4] around mean 2 is sqrt(8/3)
        let expected_std = (8.0f64 / 3.0).sqrt();
        let scaled = fitted.transform(&data).unwrap();
        assert!((scaled.get(0, 0) - 0.0).abs() < 1e-12);
        assert!((scaled.get(2, 0) - 4.0 / expected_std).abs() < 1e-12);
    }

    #[test]
    fn test_standard_scaler_constant_column() {
        let data = Matrix::new(vec![7.0, 7.0, 7.0], 3, 1);
        let fitted = StandardScaler::new().fit(&data).unwrap();
        // Zero variance: division guard keeps output finite.
        let scaled = fitted.transform(&data).unwrap();
        assert_eq!(scaled.row(0), &[0.0]);
    }

    #[test]
    fn test_standard_scaler_feature_mismatch() {
        let data = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let fitted = StandardScaler::new().fit(&data).unwrap();
        let result = fitted.transform(&Matrix::zeros(1, 3));
        assert!(matches!(
            result,
            Err(PipelineError::FeatureMismatch {
                expected_features: 2,
                got_features: 3
            })
        ));
    }

    #[test]
    fn test_standard_scaler_empty_data() {
        let result = StandardScaler::new().fit(&Matrix::zeros(0, 2));
        assert!(result.is_err());
    }

    #[test]
    fn test_standard_scaler_transform_is_deterministic() {
        let data = Matrix::new(vec![1.0, 5.0, 9.0, 13.0], 4, 1);
        let fitted = StandardScaler::new().fit(&data).unwrap();
        let a = fitted.transform(&data).unwrap();
        let b = fitted.transform(&data).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_standard_scaler_serialization_roundtrip() {
        let data = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let fitted = StandardScaler::new().fit(&data).unwrap();

        let bytes = bincode::serialize(&fitted).unwrap();
        let restored: FittedStandardScaler = bincode::deserialize(&bytes).unwrap();
        assert_eq!(
            restored.transform(&data).unwrap(),
            fitted.transform(&data).unwrap()
        );
    }
}
