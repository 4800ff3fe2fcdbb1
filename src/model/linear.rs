//! Linear regression model with state encoded at the type level.
//!
//! - `LinearModel<Unfitted>` (alias [`LinearRegression`]) exposes the
//!   forward/backward surface the trainer drives.
//! - `LinearModel<Fitted>` is inference-only: it predicts and its parameters
//!   serialize for the object store.
//!
//! This enforces, at compile time, that `predict` cannot be called on an
//! untrained model.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use crate::error::{PipelineError, Result};
use crate::frame::Matrix;
use crate::model::{Fitted, Unfitted};

/// Parameters of a linear model: one weight per feature plus a bias.
///
/// This is the persisted representation of a trained model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl LinearParams {
    /// Zero-initialized parameters for the given feature count.
    pub fn zeros(n_features: usize) -> Self {
        Self {
            weights: vec![0.0; n_features],
            bias: 0.0,
        }
    }
}

/// A linear model, unfitted or fitted depending on `S`.
#[derive(Clone, Debug)]
pub struct LinearModel<S> {
    params: LinearParams,
    _state: PhantomData<S>,
}

/// Alias for an unfitted linear regression model, the form the trainer takes.
pub type LinearRegression = LinearModel<Unfitted>;

impl LinearModel<Unfitted> {
    /// Create an untrained model with zero-initialized weights.
    pub fn new(n_features: usize) -> Self {
        Self {
            params: LinearParams::zeros(n_features),
            _state: PhantomData,
        }
    }

    /// Construct from explicit parameters (warm start or testing).
    pub fn from_params(params: LinearParams) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    pub fn params(&self) -> &LinearParams {
        &self.params
    }

    pub fn update_params(&mut self, params: LinearParams) {
        self.params = params;
    }

    /// Batch forward pass: `X @ w + b`.
    pub fn forward(&self, x: &Matrix) -> Vec<f64> {
        let (rows, _) = x.shape();
        (0..rows)
            .map(|row| {
                x.row(row)
                    .iter()
                    .zip(&self.params.weights)
                    .map(|(xi, wi)| xi * wi)
                    .sum::<f64>()
                    + self.params.bias
            })
            .collect()
    }

    /// Gradients of the loss w.r.t. parameters given the gradient w.r.t. the
    /// predictions: `∇w = X^T · grad`, `∇b = Σ grad`.
    pub fn backward(&self, x: &Matrix, grad_output: &[f64]) -> LinearParams {
        let (rows, cols) = x.shape();
        let mut grad_weights = vec![0.0; cols];
        let mut grad_bias = 0.0;
        for row in 0..rows {
            let g = grad_output[row];
            for (col, gw) in grad_weights.iter_mut().enumerate() {
                *gw += x.get(row, col) * g;
            }
            grad_bias += g;
        }
        LinearParams {
            weights: grad_weights,
            bias: grad_bias,
        }
    }

    /// Freeze into the inference-only form.
    pub fn into_fitted(self) -> LinearModel<Fitted> {
        LinearModel {
            params: self.params,
            _state: PhantomData,
        }
    }
}

impl LinearModel<Fitted> {
    /// Reconstruct a fitted model from persisted parameters.
    pub fn from_params(params: LinearParams) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    pub fn params(&self) -> &LinearParams {
        &self.params
    }

    /// Predict on a single sample (feature vector).
    pub fn predict(&self, input: &[f64]) -> Result<f64> {
        if input.len() != self.params.weights.len() {
            return Err(PipelineError::FeatureMismatch {
                expected_features: self.params.weights.len(),
                got_features: input.len(),
            });
        }
        Ok(input
            .iter()
            .zip(&self.params.weights)
            .map(|(xi, wi)| xi * wi)
            .sum::<f64>()
            + self.params.bias)
    }

    /// Predict on a batch of samples.
    pub fn predict_batch(&self, input: &Matrix) -> Result<Vec<f64>> {
        let (rows, cols) = input.shape();
        if cols != self.params.weights.len() {
            return Err(PipelineError::FeatureMismatch {
                expected_features: self.params.weights.len(),
                got_features: cols,
            });
        }
        Ok((0..rows)
            .map(|row| {
                input
                    .row(row)
                    .iter()
                    .zip(&self.params.weights)
                    .map(|(xi, wi)| xi * wi)
                    .sum::<f64>()
                    + self.params.bias
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_model_is_zero_initialized() {
        let model = LinearRegression::new(3);
        assert_eq!(model.params().weights, vec![0.0, 0.0, 0.0]);
        assert_eq!(model.params().bias, 0.0);
    }

    #[test]
    fn test_forward_correctness() {
        // w = [2, 3], b = 1; X = [[1, 0], [0, 1]] -> [3, 4]
        let model = LinearRegression::from_params(LinearParams {
            weights: vec![2.0, 3.0],
            bias: 1.0,
        });
        let x = Matrix::new(vec![1.0, 0.0, 0.0, 1.0], 2, 2);
        assert_eq!(model.forward(&x), vec![3.0, 4.0]);
    }

    #[test]
    fn test_backward_gradients() {
        let model = LinearRegression::new(2);
        // X = [[1, 2], [3, 4]], grad = [0.5, 0.25]
        let x = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let grads = model.backward(&x, &[0.5, 0.25]);

        // grad_w = X^T @ grad = [1.25, 2.0], grad_b = 0.75
        assert!((grads.weights[0] - 1.25).abs() < 1e-12);
        assert!((grads.weights[1] - 2.0).abs() < 1e-12);
        assert!((grads.bias - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_predict_single_sample() {
        let model = LinearModel::<Fitted>::from_params(LinearParams {
            weights: vec![2.0, 3.0],
            bias: 1.0,
        });
        // y = 2*1 + 3*2 + 1 = 9
        assert_eq!(model.predict(&[1.0, 2.0]).unwrap(), 9.0);
    }

    #[test]
    fn test_predict_batch() {
        let model = LinearModel::<Fitted>::from_params(LinearParams {
            weights: vec![1.0, 2.0],
            bias: 3.0,
        });
        let batch = Matrix::new(vec![1.0, 1.0, 2.0, 2.0], 2, 2);
        assert_eq!(model.predict_batch(&batch).unwrap(), vec![6.0, 9.0]);
    }

    #[test]
    fn test_predict_feature_mismatch() {
        let model = LinearModel::<Fitted>::from_params(LinearParams::zeros(2));
        assert!(matches!(
            model.predict(&[1.0, 2.0, 3.0]),
            Err(PipelineError::FeatureMismatch {
                expected_features: 2,
                got_features: 3
            })
        ));
    }

    #[test]
    fn test_into_fitted_preserves_params() {
        let unfitted = LinearRegression::from_params(LinearParams {
            weights: vec![1.0],
            bias: 0.5,
        });
        let fitted = unfitted.into_fitted();
        assert_eq!(fitted.params().weights, vec![1.0]);
        assert_eq!(fitted.params().bias, 0.5);
    }

    #[test]
    fn test_params_serialization_roundtrip() {
        let params = LinearParams {
            weights: vec![0.1, 0.2, 0.3],
            bias: 0.05,
        };
        let bytes = bincode::serialize(&params).unwrap();
        let restored: LinearParams = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored, params);
    }
}
