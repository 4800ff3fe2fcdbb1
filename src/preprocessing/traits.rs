//! Core traits for preprocessing transformers.
//!
//! Two central traits, mirroring the fit/transform split:
//! - [`Transformer`]: unfitted, carries hyperparameters, can learn from data.
//! - [`FittedTransformer`]: after fitting; applies learned parameters and is
//!   serializable for deployment.

use crate::error::Result;

/// Trait for unfitted transformers with hyperparameters.
///
/// A transformer learns parameters from training data and can then transform
/// new data using those learned parameters. This trait represents the
/// configurable, unfitted state.
pub trait Transformer: Clone {
    /// Input data type for fitting and transformation.
    type Input;
    /// Output data type after transformation.
    type Output;
    /// The corresponding fitted transformer type.
    type Fitted: FittedTransformer<Input = Self::Input, Output = Self::Output>;

    /// Fit the transformer to the training data.
    ///
    /// # Errors
    /// Returns an error if the data is empty or has an incompatible shape.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted>;

    /// Fit the transformer and transform the same data in one step.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output> {
        self.fit(data)?.transform(data)
    }
}

/// Trait for fitted transformers ready for inference.
///
/// After fitting, a transformer contains learned parameters (e.g. per-column
/// mean and std for a standard scaler) and applies them to new data without
/// re-learning anything.
pub trait FittedTransformer: Clone {
    /// Input data type for transformation.
    type Input;
    /// Output data type after transformation.
    type Output;

    /// Transform data using learned parameters.
    ///
    /// # Errors
    /// Returns an error if the input shape does not match what was fitted, or
    /// if a value cannot be represented by the learned parameters (e.g. an
    /// unseen category).
    fn transform(&self, data: &Self::Input) -> Result<Self::Output>;
}
