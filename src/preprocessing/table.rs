//! Column-wise composite transformer.
//!
//! A [`TableTransformer`] owns one [`FeaturePipeline`] per input feature,
//! fits each on its named column and horizontally concatenates the
//! per-feature output blocks into one dense matrix. Frame columns that are
//! not listed by any pipeline are dropped.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::frame::{Frame, Matrix};
use crate::preprocessing::pipeline::{FeaturePipeline, FittedFeaturePipeline};
use crate::preprocessing::traits::{FittedTransformer, Transformer};

/// Composite transformer over named frame columns (unfitted).
#[derive(Clone, Debug, Default)]
pub struct TableTransformer {
    pipelines: Vec<FeaturePipeline>,
}

impl TableTransformer {
    /// Create a new empty composite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a feature pipeline. Order determines output column order.
    pub fn add(mut self, pipeline: FeaturePipeline) -> Self {
        self.pipelines.push(pipeline);
        self
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

impl Transformer for TableTransformer {
    type Input = Frame;
    type Output = Matrix;
    type Fitted = FittedTableTransformer;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted> {
        if self.pipelines.is_empty() {
            return Err(PipelineError::InvalidParameter(
                "cannot fit an empty table transformer".to_string(),
            ));
        }
        if data.n_rows() == 0 {
            return Err(PipelineError::EmptyData(
                "cannot fit table transformer on an empty frame".to_string(),
            ));
        }

        let mut fitted = Vec::with_capacity(self.pipelines.len());
        let mut n_features_out = 0;
        for pipeline in &self.pipelines {
            let column = data.require_column(pipeline.column())?;
            let fitted_pipeline = pipeline.fit(column)?;
            n_features_out += fitted_pipeline.n_features_out();
            fitted.push(fitted_pipeline);
        }

        Ok(FittedTableTransformer {
            pipelines: fitted,
            n_features_out,
        })
    }
}

/// Fitted composite transformer ready for inference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedTableTransformer {
    pipelines: Vec<FittedFeaturePipeline>,
    n_features_out: usize,
}

impl FittedTableTransformer {
    /// Total width of the transformed output.
    pub fn n_features_out(&self) -> usize {
        self.n_features_out
    }

    /// Names of the input columns, in output order.
    pub fn feature_columns(&self) -> Vec<&str> {
        self.pipelines.iter().map(|p| p.column()).collect()
    }
}

impl FittedTransformer for FittedTableTransformer {
    type Input = Frame;
    type Output = Matrix;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output> {
        let mut blocks = Vec::with_capacity(self.pipelines.len());
        for pipeline in &self.pipelines {
            let column = data.require_column(pipeline.column())?;
            blocks.push(pipeline.transform(column)?);
        }
        Matrix::hcat(&blocks)
    }
}
