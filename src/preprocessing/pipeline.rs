//! Per-feature preprocessing chain: impute, then encode, then scale.
//!
//! A [`FeaturePipeline`] is bound to one named column and applies its steps in
//! the fixed order the composite transformer expects. Steps are optional: a
//! numeric feature may only impute and scale, a pre-clean categorical feature
//! may only encode.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::frame::{Column, Matrix};
use crate::preprocessing::encode::{FittedOneHotEncoder, OneHotEncoder};
use crate::preprocessing::impute::{
    CategoryImputer, CategoryStrategy, FittedCategoryImputer, FittedNumericImputer,
    NumericImputer, NumericStrategy,
};
use crate::preprocessing::scale::{FittedStandardScaler, StandardScaler};
use crate::preprocessing::traits::{FittedTransformer, Transformer};

/// Imputation step of a feature pipeline (unfitted).
#[derive(Clone, Debug)]
pub enum ImputeStep {
    Numeric(NumericImputer),
    Category(CategoryImputer),
}

/// Imputation step of a feature pipeline (fitted).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum FittedImputeStep {
    Numeric(FittedNumericImputer),
    Category(FittedCategoryImputer),
}

impl FittedImputeStep {
    fn transform(&self, data: &Column) -> Result<Column> {
        match self {
            FittedImputeStep::Numeric(imputer) => imputer.transform(data),
            FittedImputeStep::Category(imputer) => imputer.transform(data),
        }
    }
}

/// Preprocessing chain for a single named column (unfitted).
#[derive(Clone, Debug)]
pub struct FeaturePipeline {
    column: String,
    impute: Option<ImputeStep>,
    encode: Option<OneHotEncoder>,
    scale: Option<StandardScaler>,
}

impl FeaturePipeline {
    /// Start an empty pipeline for the given column.
    pub fn new(column: &str) -> Self {
        Self {
            column: column.to_string(),
            impute: None,
            encode: None,
            scale: None,
        }
    }

    /// Name of the column this pipeline consumes.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Add a numeric imputation step.
    pub fn impute_numeric(mut self, strategy: NumericStrategy) -> Self {
        self.impute = Some(ImputeStep::Numeric(NumericImputer::new(strategy)));
        self
    }

    /// Add a categorical imputation step.
    pub fn impute_category(mut self, strategy: CategoryStrategy) -> Self {
        self.impute = Some(ImputeStep::Category(CategoryImputer::new(strategy)));
        self
    }

    /// Add a one-hot encoding step with default (error-on-unknown) handling.
    pub fn one_hot(self) -> Self {
        self.encode(OneHotEncoder::new())
    }

    /// Add a one-hot encoding step.
    pub fn encode(mut self, encoder: OneHotEncoder) -> Self {
        self.encode = Some(encoder);
        self
    }

    /// Add a scaling step.
    pub fn scale(mut self, scaler: StandardScaler) -> Self {
        self.scale = Some(scaler);
        self
    }
}

/// A numeric column as a single-column matrix; text columns are only valid
/// ahead of an encoding step.
fn column_to_matrix(column: &Column) -> Result<Matrix> {
    match column {
        Column::Float(values) => Ok(Matrix::new(values.clone(), values.len(), 1)),
        Column::Text(_) => Err(PipelineError::SchemaMismatch {
            expected: "numeric column (text columns need an encoding step)".to_string(),
            got: "text column".to_string(),
        }),
    }
}

impl Transformer for FeaturePipeline {
    type Input = Column;
    type Output = Matrix;
    type Fitted = FittedFeaturePipeline;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted> {
        let result: Result<FittedFeaturePipeline> = (|| {
            let mut current = data.clone();

            let impute = match &self.impute {
                Some(ImputeStep::Numeric(imputer)) => {
                    let fitted = imputer.fit(&current)?;
                    current = fitted.transform(&current)?;
                    Some(FittedImputeStep::Numeric(fitted))
                }
                Some(ImputeStep::Category(imputer)) => {
                    let fitted = imputer.fit(&current)?;
                    current = fitted.transform(&current)?;
                    Some(FittedImputeStep::Category(fitted))
                }
                None => None,
            };

            let (encode, mut block) = match &self.encode {
                Some(encoder) => {
                    let fitted = encoder.fit(&current)?;
                    let block = fitted.transform(&current)?;
                    (Some(fitted), block)
                }
                None => (None, column_to_matrix(&current)?),
            };

            let scale = match &self.scale {
                Some(scaler) => {
                    let fitted = scaler.fit(&block)?;
                    block = fitted.transform(&block)?;
                    Some(fitted)
                }
                None => None,
            };

            Ok(FittedFeaturePipeline {
                column: self.column.clone(),
                impute,
                encode,
                scale,
                n_features_out: block.n_cols(),
            })
        })();
        result.map_err(|e| e.in_column(&self.column))
    }
}

/// Fitted preprocessing chain for a single column.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedFeaturePipeline {
    column: String,
    impute: Option<FittedImputeStep>,
    encode: Option<FittedOneHotEncoder>,
    scale: Option<FittedStandardScaler>,
    n_features_out: usize,
}

impl FittedFeaturePipeline {
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Width of this pipeline's output block.
    pub fn n_features_out(&self) -> usize {
        self.n_features_out
    }
}

impl FittedTransformer for FittedFeaturePipeline {
    type Input = Column;
    type Output = Matrix;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output> {
        let result: Result<Matrix> = (|| {
            let mut current = data.clone();
            if let Some(impute) = &self.impute {
                current = impute.transform(&current)?;
            }
            let mut block = match &self.encode {
                Some(encode) => encode.transform(&current)?,
                None => column_to_matrix(&current)?,
            };
            if let Some(scale) = &self.scale {
                block = scale.transform(&block)?;
            }
            Ok(block)
        })();
        result.map_err(|e| e.in_column(&self.column))
    }
}
