//! Prediction pipeline: load the persisted artifacts and price one listing.

use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};
use crate::frame::{Column, Frame};
use crate::model::{Fitted, LinearModel, LinearParams};
use crate::preprocessing::{FittedTableTransformer, FittedTransformer};
use crate::store;

/// Artifact locations the prediction side reads from.
#[derive(Clone, Debug)]
pub struct PredictConfig {
    pub preprocessor_path: PathBuf,
    pub model_path: PathBuf,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self::new("artifacts")
    }
}

impl PredictConfig {
    pub fn new<P: AsRef<Path>>(artifacts_dir: P) -> Self {
        let artifacts = artifacts_dir.as_ref();
        Self {
            preprocessor_path: artifacts.join("preprocessor.bin"),
            model_path: artifacts.join("model.bin"),
        }
    }
}

/// One listing to price, shaped like a cleaned training row.
///
/// `brand_model` is the already-merged composite; `condition` travels along
/// but is dropped by the fitted preprocessor exactly as during training.
#[derive(Clone, Debug)]
pub struct Listing {
    pub manufacture_date: i64,
    pub brand_model: String,
    pub origin: String,
    pub vehicle_type: String,
    pub seats: f64,
    pub gearbox: String,
    pub fuel: String,
    pub color: String,
    pub mileage_v2: f64,
    pub condition: String,
}

impl Listing {
    /// One-row frame matching the training-time column layout.
    pub fn to_frame(&self) -> Result<Frame> {
        let mut frame = Frame::new();
        frame.push_column(
            "manufacture_date",
            Column::Float(vec![self.manufacture_date as f64]),
        )?;
        frame.push_column(
            "brand_model",
            Column::Text(vec![Some(self.brand_model.clone())]),
        )?;
        frame.push_column("origin", Column::Text(vec![Some(self.origin.clone())]))?;
        frame.push_column("type", Column::Text(vec![Some(self.vehicle_type.clone())]))?;
        frame.push_column("seats", Column::Float(vec![self.seats]))?;
        frame.push_column("gearbox", Column::Text(vec![Some(self.gearbox.clone())]))?;
        frame.push_column("fuel", Column::Text(vec![Some(self.fuel.clone())]))?;
        frame.push_column("color", Column::Text(vec![Some(self.color.clone())]))?;
        frame.push_column("mileage_v2", Column::Float(vec![self.mileage_v2]))?;
        frame.push_column("condition", Column::Text(vec![Some(self.condition.clone())]))?;
        Ok(frame)
    }
}

/// Loads the fitted preprocessor and model and prices single listings.
#[derive(Clone, Debug, Default)]
pub struct PredictPipeline {
    config: PredictConfig,
}

impl PredictPipeline {
    pub fn new(config: PredictConfig) -> Self {
        Self { config }
    }

    /// Transform one listing with the fitted preprocessor (never re-fit) and
    /// run the model on it.
    ///
    /// # Errors
    /// Fails with [`PipelineError::ArtifactMissing`] before the first
    /// training run, and with [`PipelineError::UnseenCategory`] when the
    /// listing carries a category the encoders never saw.
    pub fn predict(&self, listing: &Listing) -> Result<f64> {
        let preprocessor: FittedTableTransformer =
            store::load_object(&self.config.preprocessor_path)?;
        let params: LinearParams = store::load_object(&self.config.model_path)?;
        let model = LinearModel::<Fitted>::from_params(params);

        let input = listing.to_frame()?;
        let features = preprocessor.transform(&input)?;
        let predictions = model.predict_batch(&features)?;
        predictions
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::EmptyData("prediction produced no output".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::Transformer;
    use crate::transform::build_preprocessor;

    fn sample_listing() -> Listing {
        Listing {
            manufacture_date: 2015,
            brand_model: "Toyota Corolla".to_string(),
            origin: "domestic".to_string(),
            vehicle_type: "sedan".to_string(),
            seats: 4.0,
            gearbox: "MT".to_string(),
            fuel: "petrol".to_string(),
            color: "white".to_string(),
            mileage_v2: 50_000.0,
            condition: "used".to_string(),
        }
    }

    /// Fit the real preprocessor on a two-row frame and persist both
    /// artifacts, with a bias-only model so predictions are known exactly.
    fn write_artifacts(dir: &Path) -> PredictConfig {
        let mut frame = Frame::new();
        frame
            .push_column("manufacture_date", Column::Float(vec![2015.0, 2018.0]))
            .unwrap();
        frame
            .push_column(
                "brand_model",
                Column::Text(vec![
                    Some("Toyota Corolla".to_string()),
                    Some("Honda Civic".to_string()),
                ]),
            )
            .unwrap();
        frame
            .push_column(
                "origin",
                Column::Text(vec![
                    Some("domestic".to_string()),
                    Some("imported".to_string()),
                ]),
            )
            .unwrap();
        frame
            .push_column(
                "type",
                Column::Text(vec![Some("sedan".to_string()), Some("suv".to_string())]),
            )
            .unwrap();
        frame
            .push_column("seats", Column::Float(vec![4.0, 7.0]))
            .unwrap();
        frame
            .push_column(
                "gearbox",
                Column::Text(vec![Some("MT".to_string()), Some("AT".to_string())]),
            )
            .unwrap();
        frame
            .push_column(
                "fuel",
                Column::Text(vec![Some("petrol".to_string()), Some("diesel".to_string())]),
            )
            .unwrap();
        frame
            .push_column(
                "color",
                Column::Text(vec![Some("white".to_string()), Some("black".to_string())]),
            )
            .unwrap();
        frame
            .push_column("mileage_v2", Column::Float(vec![50_000.0, 30_000.0]))
            .unwrap();
        frame
            .push_column(
                "condition",
                Column::Text(vec![Some("used".to_string()), Some("new".to_string())]),
            )
            .unwrap();

        let fitted = build_preprocessor().fit(&frame).unwrap();
        let n_features = fitted.n_features_out();

        let config = PredictConfig::new(dir.join("artifacts"));
        store::save_object(&config.preprocessor_path, &fitted).unwrap();
        store::save_object(
            &config.model_path,
            &LinearParams {
                weights: vec![0.0; n_features],
                bias: 42.0,
            },
        )
        .unwrap();
        config
    }

    #[test]
    fn test_predict_known_listing() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_artifacts(dir.path());
        let pipeline = PredictPipeline::new(config);

        let price = pipeline.predict(&sample_listing()).unwrap();
        // Zero weights: the prediction is exactly the bias.
        assert_eq!(price, 42.0);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = PredictPipeline::new(write_artifacts(dir.path()));
        let listing = sample_listing();
        assert_eq!(
            pipeline.predict(&listing).unwrap(),
            pipeline.predict(&listing).unwrap()
        );
    }

    #[test]
    fn test_predict_before_training_is_artifact_missing() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = PredictPipeline::new(PredictConfig::new(dir.path()));
        let result = pipeline.predict(&sample_listing());
        assert!(matches!(result, Err(PipelineError::ArtifactMissing(_))));
    }

    #[test]
    fn test_predict_unseen_category() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = PredictPipeline::new(write_artifacts(dir.path()));

        let mut listing = sample_listing();
        listing.brand_model = "Lada Niva".to_string();
        let result = pipeline.predict(&listing);
        match result {
            Err(PipelineError::UnseenCategory { column, value }) => {
                assert_eq!(column, "brand_model");
                assert_eq!(value, "Lada Niva");
            }
            other => panic!("expected unseen-category error, got {other:?}"),
        }
    }

    #[test]
    fn test_listing_frame_layout() {
        let frame = sample_listing().to_frame().unwrap();
        assert_eq!(frame.n_rows(), 1);
        assert!(frame.column("brand_model").is_some());
        assert!(frame.column("type").is_some());
        assert!(frame.column("condition").is_some());
    }
}
