//! Imputation transformers for completing missing values.
//!
//! [`NumericImputer`] fills `NaN` cells of numeric columns; supports mean,
//! median, most-frequent and constant strategies. [`CategoryImputer`] fills
//! `None` cells of text columns with the most frequent value or a constant.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{PipelineError, Result};
use crate::frame::Column;
use crate::preprocessing::traits::{FittedTransformer, Transformer};

/// Strategy for imputing missing numeric values.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub enum NumericStrategy {
    /// Replace missing values with the column mean.
    #[default]
    Mean,
    /// Replace missing values with the column median.
    Median,
    /// Replace missing values with the most frequent value.
    MostFrequent,
    /// Replace missing values with a constant.
    Constant(f64),
}

/// Strategy for imputing missing categorical values.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CategoryStrategy {
    /// Replace missing values with the most frequent category.
    MostFrequent,
    /// Replace missing values with a fixed category.
    Constant(String),
}

/// Numeric imputer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct NumericImputer {
    strategy: NumericStrategy,
}

impl NumericImputer {
    pub fn new(strategy: NumericStrategy) -> Self {
        Self { strategy }
    }
}

/// Compute the fill value for one numeric column, ignoring NaN cells.
fn numeric_fill(values: &[f64], strategy: &NumericStrategy) -> f64 {
    let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if present.is_empty() {
        // All values missing: fall back to 0 (constants keep their value).
        return match strategy {
            NumericStrategy::Constant(v) => *v,
            _ => 0.0,
        };
    }
    match strategy {
        NumericStrategy::Mean => present.iter().sum::<f64>() / present.len() as f64,
        NumericStrategy::Median => {
            let mut sorted = present.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let n = sorted.len();
            if n % 2 == 0 {
                (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
            } else {
                sorted[n / 2]
            }
        }
        NumericStrategy::MostFrequent => {
            let mut counts: HashMap<u64, usize> = HashMap::new();
            for &v in &present {
                *counts.entry(v.to_bits()).or_insert(0) += 1;
            }
            counts
                .into_iter()
                .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
                .map(|(bits, _)| f64::from_bits(bits))
                .unwrap_or(0.0)
        }
        NumericStrategy::Constant(v) => *v,
    }
}

impl Transformer for NumericImputer {
    type Input = Column;
    type Output = Column;
    type Fitted = FittedNumericImputer;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted> {
        let values = data.as_float().ok_or_else(|| PipelineError::SchemaMismatch {
            expected: "numeric column".to_string(),
            got: "text column".to_string(),
        })?;
        if values.is_empty() {
            return Err(PipelineError::EmptyData(
                "cannot fit numeric imputer on empty column".to_string(),
            ));
        }
        Ok(FittedNumericImputer {
            fill: numeric_fill(values, &self.strategy),
        })
    }
}

/// Fitted numeric imputer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedNumericImputer {
    fill: f64,
}

impl FittedNumericImputer {
    /// The learned fill value.
    pub fn fill(&self) -> f64 {
        self.fill
    }
}

impl FittedTransformer for FittedNumericImputer {
    type Input = Column;
    type Output = Column;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output> {
        let values = data.as_float().ok_or_else(|| PipelineError::SchemaMismatch {
            expected: "numeric column".to_string(),
            got: "text column".to_string(),
        })?;
        Ok(Column::Float(
            values
                .iter()
                .map(|&v| if v.is_nan() { self.fill } else { v })
                .collect(),
        ))
    }
}

/// Categorical imputer (unfitted).
#[derive(Clone, Debug)]
pub struct CategoryImputer {
    strategy: CategoryStrategy,
}

impl CategoryImputer {
    pub fn new(strategy: CategoryStrategy) -> Self {
        Self { strategy }
    }
}

impl Transformer for CategoryImputer {
    type Input = Column;
    type Output = Column;
    type Fitted = FittedCategoryImputer;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted> {
        let values = data.as_text().ok_or_else(|| PipelineError::SchemaMismatch {
            expected: "text column".to_string(),
            got: "numeric column".to_string(),
        })?;
        if values.is_empty() {
            return Err(PipelineError::EmptyData(
                "cannot fit category imputer on empty column".to_string(),
            ));
        }
        let fill = match &self.strategy {
            CategoryStrategy::Constant(value) => value.clone(),
            CategoryStrategy::MostFrequent => {
                let mut counts: HashMap<&str, usize> = HashMap::new();
                for value in values.iter().flatten() {
                    *counts.entry(value.as_str()).or_insert(0) += 1;
                }
                counts
                    .into_iter()
                    // Ties broken by name so the fit is deterministic.
                    .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(a.0)))
                    .map(|(value, _)| value.to_string())
                    .ok_or_else(|| {
                        PipelineError::EmptyData(
                            "cannot compute most frequent category of an all-missing column"
                                .to_string(),
                        )
                    })?
            }
        };
        Ok(FittedCategoryImputer { fill })
    }
}

/// Fitted categorical imputer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedCategoryImputer {
    fill: String,
}

impl FittedCategoryImputer {
    /// The learned fill category.
    pub fn fill(&self) -> &str {
        &self.fill
    }
}

impl FittedTransformer for FittedCategoryImputer {
    type Input = Column;
    type Output = Column;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output> {
        let values = data.as_text().ok_or_else(|| PipelineError::SchemaMismatch {
            expected: "text column".to_string(),
            got: "numeric column".to_string(),
        })?;
        Ok(Column::Text(
            values
                .iter()
                .map(|v| Some(v.clone().unwrap_or_else(|| self.fill.clone())))
                .collect(),
        ))
    }
}
