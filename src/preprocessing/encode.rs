//! One-hot encoding for categorical features.
//!
//! The encoder learns the unique values observed during fitting and maps each
//! value to an indicator vector over those categories. Both text columns
//! (`brand_model`, `gearbox`, ...) and numeric columns treated as categorical
//! (`manufacture_date`) are supported.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{PipelineError, Result};
use crate::frame::{Column, Matrix};
use crate::preprocessing::traits::{FittedTransformer, Transformer};

/// Strategy for handling unknown categories during transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum HandleUnknown {
    /// Raise an error when an unknown category is encountered.
    #[default]
    Error,
    /// Ignore unknown categories (the indicator row stays all-zero).
    Ignore,
}

/// Categories learned from one column, in sorted order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Categories {
    Text(Vec<String>),
    Number(Vec<f64>),
}

impl Categories {
    fn len(&self) -> usize {
        match self {
            Categories::Text(v) => v.len(),
            Categories::Number(v) => v.len(),
        }
    }
}

/// One-hot encoder (unfitted).
#[derive(Clone, Debug, Default)]
pub struct OneHotEncoder {
    handle_unknown: HandleUnknown,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the strategy for handling unknown categories.
    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.handle_unknown = strategy;
        self
    }
}

impl Transformer for OneHotEncoder {
    type Input = Column;
    type Output = Matrix;
    type Fitted = FittedOneHotEncoder;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted> {
        if data.is_empty() {
            return Err(PipelineError::EmptyData(
                "cannot fit one-hot encoder on empty column".to_string(),
            ));
        }
        let categories = match data {
            Column::Text(values) => {
                let mut unique: Vec<String> = Vec::new();
                let mut seen: HashSet<&str> = HashSet::new();
                for value in values {
                    let value = value.as_deref().ok_or_else(|| {
                        PipelineError::InvalidParameter(
                            "one-hot encoder input contains missing values; impute first"
                                .to_string(),
                        )
                    })?;
                    if seen.insert(value) {
                        unique.push(value.to_string());
                    }
                }
                unique.sort();
                Categories::Text(unique)
            }
            Column::Float(values) => {
                let mut seen: HashSet<u64> = HashSet::new();
                for &value in values {
                    if value.is_nan() {
                        return Err(PipelineError::InvalidParameter(
                            "one-hot encoder input contains missing values; impute first"
                                .to_string(),
                        ));
                    }
                    seen.insert(value.to_bits());
                }
                let mut unique: Vec<f64> = seen.into_iter().map(f64::from_bits).collect();
                unique.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                Categories::Number(unique)
            }
        };
        Ok(FittedOneHotEncoder {
            categories,
            handle_unknown: self.handle_unknown,
        })
    }
}

/// Fitted one-hot encoder ready for inference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedOneHotEncoder {
    categories: Categories,
    handle_unknown: HandleUnknown,
}

impl FittedOneHotEncoder {
    /// Categories learned during fit, in sorted order.
    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    /// Width of the encoded output.
    pub fn n_features_out(&self) -> usize {
        self.categories.len()
    }

    fn category_index(&self, data: &Column, row: usize) -> Result<Option<usize>> {
        match (&self.categories, data) {
            (Categories::Text(cats), Column::Text(values)) => {
                let value = values[row].as_deref().ok_or_else(|| {
                    PipelineError::InvalidParameter(
                        "one-hot encoder input contains missing values; impute first".to_string(),
                    )
                })?;
                match cats.binary_search_by(|c| c.as_str().cmp(value)) {
                    Ok(idx) => Ok(Some(idx)),
                    Err(_) => self.unknown(value.to_string()),
                }
            }
            (Categories::Number(cats), Column::Float(values)) => {
                let value = values[row];
                match cats.iter().position(|&c| c == value) {
                    Some(idx) => Ok(Some(idx)),
                    None => self.unknown(format!("{}", value)),
                }
            }
            _ => Err(PipelineError::SchemaMismatch {
                expected: "column of the type seen during fit".to_string(),
                got: "column of the other type".to_string(),
            }),
        }
    }

    fn unknown(&self, value: String) -> Result<Option<usize>> {
        match self.handle_unknown {
            HandleUnknown::Error => Err(PipelineError::UnseenCategory {
                column: String::new(),
                value,
            }),
            HandleUnknown::Ignore => Ok(None),
        }
    }
}

impl FittedTransformer for FittedOneHotEncoder {
    type Input = Column;
    type Output = Matrix;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output> {
        let rows = data.len();
        let cols = self.categories.len();
        let mut out = vec![0.0; rows * cols];
        for row in 0..rows {
            if let Some(idx) = self.category_index(data, row)? {
                out[row * cols + idx] = 1.0;
            }
        }
        Ok(Matrix::new(out, rows, cols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(values: &[&str]) -> Column {
        Column::Text(values.iter().map(|v| Some(v.to_string())).collect())
    }

    #[test]
    fn test_one_hot_text_categories_sorted() {
        let col = text(&["MT", "AT", "MT"]);
        let fitted = OneHotEncoder::new().fit(&col).unwrap();
        assert_eq!(
            fitted.categories(),
            &Categories::Text(vec!["AT".to_string(), "MT".to_string()])
        );
        assert_eq!(fitted.n_features_out(), 2);

        let encoded = fitted.transform(&col).unwrap();
        assert_eq!(encoded.row(0), &[0.0, 1.0]);
        assert_eq!(encoded.row(1), &[1.0, 0.0]);
        assert_eq!(encoded.row(2), &[0.0, 1.0]);
    }

    #[test]
    fn test_one_hot_numeric_categories() {
        let col = Column::Float(vec![2015.0, 2018.0, 2015.0]);
        let fitted = OneHotEncoder::new().fit(&col).unwrap();
        assert_eq!(
            fitted.categories(),
            &Categories::Number(vec![2015.0, 2018.0])
        );

        let encoded = fitted.transform(&col).unwrap();
        assert_eq!(encoded.shape(), (3, 2));
        assert_eq!(encoded.row(1), &[0.0, 1.0]);
    }

    #[test]
    fn test_one_hot_unknown_errors_by_default() {
        let fitted = OneHotEncoder::new().fit(&text(&["AT", "MT"])).unwrap();
        let result = fitted.transform(&text(&["CVT"]));
        match result {
            Err(PipelineError::UnseenCategory { value, .. }) => assert_eq!(value, "CVT"),
            other => panic!("expected unseen-category error, got {other:?}"),
        }
    }

    #[test]
    fn test_one_hot_unknown_ignore_outputs_zeros() {
        let fitted = OneHotEncoder::new()
            .with_handle_unknown(HandleUnknown::Ignore)
            .fit(&text(&["AT", "MT"]))
            .unwrap();
        let encoded = fitted.transform(&text(&["CVT"])).unwrap();
        assert_eq!(encoded.row(0), &[0.0, 0.0]);
    }

    #[test]
    fn test_one_hot_missing_values_rejected() {
        let col = Column::Text(vec![Some("AT".to_string()), None]);
        assert!(OneHotEncoder::new().fit(&col).is_err());
    }

    #[test]
    fn test_one_hot_column_type_mismatch() {
        let fitted = OneHotEncoder::new().fit(&text(&["AT"])).unwrap();
        let result = fitted.transform(&Column::Float(vec![1.0]));
        assert!(matches!(result, Err(PipelineError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_one_hot_empty_column() {
        assert!(OneHotEncoder::new().fit(&Column::Text(vec![])).is_err());
    }

    #[test]
    fn test_one_hot_serialization_roundtrip() {
        let col = text(&["petrol", "diesel", "petrol"]);
        let fitted = OneHotEncoder::new().fit(&col).unwrap();

        let bytes = bincode::serialize(&fitted).unwrap();
        let restored: FittedOneHotEncoder = bincode::deserialize(&bytes).unwrap();

        assert_eq!(restored.categories(), fitted.categories());
        assert_eq!(
            restored.transform(&col).unwrap(),
            fitted.transform(&col).unwrap()
        );
    }
}
