//! Batch training pipeline: ingestion, transformation, model training.

use std::path::Path;

use crate::error::Result;
use crate::ingest::{DataIngestion, IngestionConfig};
use crate::train::{CandidateScore, ModelTrainer, ModelTrainerConfig};
use crate::transform::{DataTransformation, TransformationConfig};

/// Runs the three training stages in sequence. Any stage failing aborts the
/// run; nothing is retried.
#[derive(Clone, Debug, Default)]
pub struct TrainPipeline {
    ingestion: DataIngestion,
    transformation: DataTransformation,
    trainer: ModelTrainer,
}

impl TrainPipeline {
    /// Pipeline reading the raw CSV at `raw_data_path` and writing every
    /// artifact under `artifacts_dir`.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(raw_data_path: P, artifacts_dir: Q) -> Self {
        Self {
            ingestion: DataIngestion::new(IngestionConfig::new(&raw_data_path, &artifacts_dir)),
            transformation: DataTransformation::new(TransformationConfig::new(&artifacts_dir)),
            trainer: ModelTrainer::new(ModelTrainerConfig::new(&artifacts_dir)),
        }
    }

    /// Run ingestion, transformation and model training; returns the metrics
    /// of the selected model.
    pub fn run(&self) -> Result<CandidateScore> {
        let (clean, train, test) = self.ingestion.run()?;
        let (train_arr, test_arr) = self.transformation.run(&clean, &train, &test)?;
        self.trainer.run(&train_arr, &test_arr)
    }
}
