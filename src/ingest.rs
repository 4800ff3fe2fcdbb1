//! Data ingestion: raw listings CSV in, clean/train/test CSV artifacts out.
//!
//! Cleaning contract, in order: drop identifier columns, restrict to the
//! dominant brands, drop rows without a target price, merge `brand` and
//! `model` into `brand_model`, turn the `-1` seats sentinel into a missing
//! value, then split 80/20 within each `condition` subset with a fixed seed
//! and write the three artifacts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};
use crate::frame::{Column, Frame};
use crate::model_selection::train_test_split;

/// Seed used for the train/test shuffles.
pub const SPLIT_SEED: u64 = 42;

/// Cumulative frequency share the kept brand prefix must reach.
const BRAND_COVERAGE: f64 = 0.9;

/// Identifier and timestamp columns that never reach the model.
const DROPPED_COLUMNS: &[&str] = &["id", "list_id", "list_time"];

/// File locations and split settings for ingestion.
#[derive(Clone, Debug)]
pub struct IngestionConfig {
    pub raw_data_path: PathBuf,
    pub clean_data_path: PathBuf,
    pub train_data_path: PathBuf,
    pub test_data_path: PathBuf,
    pub test_size: f64,
    pub seed: u64,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self::new("data/car.csv", "artifacts")
    }
}

impl IngestionConfig {
    /// Config with the given raw CSV and artifact directory.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(raw_data_path: P, artifacts_dir: Q) -> Self {
        let artifacts = artifacts_dir.as_ref();
        Self {
            raw_data_path: raw_data_path.as_ref().to_path_buf(),
            clean_data_path: artifacts.join("data.csv"),
            train_data_path: artifacts.join("train.csv"),
            test_data_path: artifacts.join("test.csv"),
            test_size: 0.2,
            seed: SPLIT_SEED,
        }
    }
}

/// Batch ingestion step of the training pipeline.
#[derive(Clone, Debug, Default)]
pub struct DataIngestion {
    config: IngestionConfig,
}

impl DataIngestion {
    pub fn new(config: IngestionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IngestionConfig {
        &self.config
    }

    /// Run ingestion; returns the clean/train/test artifact paths.
    pub fn run(&self) -> Result<(PathBuf, PathBuf, PathBuf)> {
        let mut df = Frame::read_csv(&self.config.raw_data_path)?;
        df.drop_columns(DROPPED_COLUMNS);

        let brand_values = self.text_column(&df, "brand")?.to_vec();
        let kept = dominant_brands(&brand_values, BRAND_COVERAGE);
        let mask: Vec<bool> = brand_values
            .iter()
            .map(|b| b.as_deref().is_some_and(|b| kept.iter().any(|k| k == b)))
            .collect();
        let df = df.filter(&mask);
        log::info!(
            "kept {} dominant brands covering >= {:.0}% of listings, {} rows remain",
            kept.len(),
            BRAND_COVERAGE * 100.0,
            df.n_rows()
        );

        let price = df
            .require_column("price")?
            .as_float()
            .ok_or_else(|| PipelineError::SchemaMismatch {
                expected: "numeric price column".to_string(),
                got: "text price column".to_string(),
            })?;
        let mask: Vec<bool> = price.iter().map(|p| !p.is_nan()).collect();
        let mut df = df.filter(&mask);

        merge_brand_model(&mut df)?;

        if let Some(Column::Float(seats)) = df.column_mut("seats") {
            // -1 is the upstream sentinel for an unknown seat count.
            for v in seats.iter_mut() {
                if *v == -1.0 {
                    *v = f64::NAN;
                }
            }
        }

        df.write_csv(&self.config.clean_data_path)?;
        log::info!("wrote {} cleaned rows", df.n_rows());

        let condition = self.text_column(&df, "condition")?.to_vec();
        let used = df.filter(&by_condition(&condition, "used"));
        let new = df.filter(&by_condition(&condition, "new"));
        log::info!(
            "split by condition: {} used, {} new",
            used.n_rows(),
            new.n_rows()
        );

        let (train_used, test_used) = train_test_split(&used, self.config.test_size, self.config.seed)?;
        let (train_new, test_new) = train_test_split(&new, self.config.test_size, self.config.seed)?;

        let train = train_used.concat(&train_new)?;
        let test = test_used.concat(&test_new)?;

        train.write_csv(&self.config.train_data_path)?;
        test.write_csv(&self.config.test_data_path)?;
        log::info!(
            "ingestion complete: {} train rows, {} test rows",
            train.n_rows(),
            test.n_rows()
        );

        Ok((
            self.config.clean_data_path.clone(),
            self.config.train_data_path.clone(),
            self.config.test_data_path.clone(),
        ))
    }

    fn text_column<'a>(&self, df: &'a Frame, name: &str) -> Result<&'a [Option<String>]> {
        df.require_column(name)?
            .as_text()
            .ok_or_else(|| PipelineError::SchemaMismatch {
                expected: format!("text column {:?}", name),
                got: "numeric column".to_string(),
            })
    }
}

fn by_condition(values: &[Option<String>], wanted: &str) -> Vec<bool> {
    values
        .iter()
        .map(|v| v.as_deref() == Some(wanted))
        .collect()
}

/// The smallest prefix of brands, by descending frequency, whose cumulative
/// share of all rows reaches `coverage`.
///
/// Ties in frequency are broken by brand name so the result is deterministic.
/// Missing brands count toward the denominator but are never kept.
pub fn dominant_brands(brands: &[Option<String>], coverage: f64) -> Vec<String> {
    let total = brands.len() as f64;
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for brand in brands.iter().flatten() {
        *counts.entry(brand.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    let mut kept = Vec::new();
    let mut cumulative = 0.0;
    for (brand, count) in ranked {
        kept.push(brand.to_string());
        cumulative += count as f64 / total;
        if cumulative >= coverage {
            break;
        }
    }
    kept
}

fn merge_brand_model(df: &mut Frame) -> Result<()> {
    let brands = df.require_column("brand")?.as_text().ok_or_else(|| {
        PipelineError::SchemaMismatch {
            expected: "text column \"brand\"".to_string(),
            got: "numeric column".to_string(),
        }
    })?;
    let models = df.require_column("model")?.as_text().ok_or_else(|| {
        PipelineError::SchemaMismatch {
            expected: "text column \"model\"".to_string(),
            got: "numeric column".to_string(),
        }
    })?;

    let merged: Vec<Option<String>> = brands
        .iter()
        .zip(models)
        .map(|(brand, model)| match (brand, model) {
            (Some(brand), Some(model)) => Some(format!("{} {}", brand, model)),
            _ => None,
        })
        .collect();

    df.push_column("brand_model", Column::Text(merged))?;
    df.drop_columns(&["brand", "model"]);
    Ok(())
}
