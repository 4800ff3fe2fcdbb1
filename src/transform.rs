//! Data transformation: fits the preprocessing composite and produces the
//! dense train/test matrices the model trainer consumes.

use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};
use crate::frame::{Frame, Matrix};
use crate::preprocessing::{
    CategoryStrategy, FeaturePipeline, FittedTransformer, NumericStrategy, StandardScaler,
    TableTransformer, Transformer,
};
use crate::store;

/// Name of the target column carried through the CSV artifacts.
pub const TARGET_COLUMN: &str = "price";

/// Which rows the preprocessor learns its statistics from.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum FitOn {
    /// Fit on the full cleaned set before transforming the splits. Categories
    /// and statistics then cover the test split too, which leaks test-set
    /// information into evaluation.
    #[default]
    Full,
    /// Fit on the train split only; the test split can then contain
    /// categories the encoders error on.
    Train,
}

/// Artifact location and fit policy for the transformation step.
#[derive(Clone, Debug)]
pub struct TransformationConfig {
    pub preprocessor_path: PathBuf,
    pub fit_on: FitOn,
}

impl Default for TransformationConfig {
    fn default() -> Self {
        Self::new("artifacts")
    }
}

impl TransformationConfig {
    pub fn new<P: AsRef<Path>>(artifacts_dir: P) -> Self {
        Self {
            preprocessor_path: artifacts_dir.as_ref().join("preprocessor.bin"),
            fit_on: FitOn::default(),
        }
    }
}

/// The untrained preprocessing composite: one pipeline per feature.
///
/// Categorical features are imputed with a constant, one-hot encoded and
/// scaled without centering; numeric features are imputed with a statistic
/// and scaled with centering. `condition` is intentionally not listed and is
/// dropped by the composite.
pub fn build_preprocessor() -> TableTransformer {
    let sparse_scaler = || StandardScaler::new().with_mean(false);
    TableTransformer::new()
        .add(
            FeaturePipeline::new("brand_model")
                .one_hot()
                .scale(sparse_scaler()),
        )
        .add(
            FeaturePipeline::new("manufacture_date")
                .impute_numeric(NumericStrategy::MostFrequent)
                .one_hot()
                .scale(sparse_scaler()),
        )
        .add(
            FeaturePipeline::new("origin")
                .impute_category(CategoryStrategy::Constant("other".to_string()))
                .one_hot()
                .scale(sparse_scaler()),
        )
        .add(
            FeaturePipeline::new("type")
                .impute_category(CategoryStrategy::Constant("other-shape".to_string()))
                .one_hot()
                .scale(sparse_scaler()),
        )
        .add(
            FeaturePipeline::new("seats")
                .impute_numeric(NumericStrategy::Median)
                .scale(StandardScaler::new()),
        )
        .add(
            FeaturePipeline::new("gearbox")
                .impute_category(CategoryStrategy::Constant("unknown".to_string()))
                .one_hot()
                .scale(sparse_scaler()),
        )
        .add(
            FeaturePipeline::new("fuel")
                .impute_category(CategoryStrategy::Constant("unknown".to_string()))
                .one_hot()
                .scale(sparse_scaler()),
        )
        .add(
            FeaturePipeline::new("color")
                .impute_category(CategoryStrategy::Constant("others".to_string()))
                .one_hot()
                .scale(sparse_scaler()),
        )
        .add(
            FeaturePipeline::new("mileage_v2")
                .impute_numeric(NumericStrategy::Mean)
                .scale(StandardScaler::new()),
        )
}

/// Transformation step of the training pipeline.
#[derive(Clone, Debug, Default)]
pub struct DataTransformation {
    config: TransformationConfig,
}

impl DataTransformation {
    pub fn new(config: TransformationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransformationConfig {
        &self.config
    }

    /// Fit the preprocessor, transform both splits, append the target column
    /// and persist the fitted preprocessor.
    ///
    /// Returns `(train, test)` matrices whose last column is the target.
    pub fn run<P: AsRef<Path>>(
        &self,
        clean_path: P,
        train_path: P,
        test_path: P,
    ) -> Result<(Matrix, Matrix)> {
        let clean = Frame::read_csv(&clean_path)?;
        let train = Frame::read_csv(&train_path)?;
        let test = Frame::read_csv(&test_path)?;
        log::info!(
            "transforming {} train and {} test rows",
            train.n_rows(),
            test.n_rows()
        );

        let clean_features = drop_target(&clean);
        let train_features = drop_target(&train);
        let test_features = drop_target(&test);

        let fit_frame = match self.config.fit_on {
            FitOn::Full => &clean_features,
            FitOn::Train => &train_features,
        };
        let preprocessor = build_preprocessor().fit(fit_frame)?;
        log::info!(
            "fitted preprocessor with {} output features",
            preprocessor.n_features_out()
        );

        let train_x = preprocessor.transform(&train_features)?;
        let test_x = preprocessor.transform(&test_features)?;

        let train_arr = train_x.append_column(&target_values(&train)?)?;
        let test_arr = test_x.append_column(&target_values(&test)?)?;

        store::save_object(&self.config.preprocessor_path, &preprocessor)?;
        log::info!(
            "saved preprocessor to {}",
            self.config.preprocessor_path.display()
        );

        Ok((train_arr, test_arr))
    }
}

fn drop_target(frame: &Frame) -> Frame {
    let mut features = frame.clone();
    features.drop_columns(&[TARGET_COLUMN]);
    features
}

fn target_values(frame: &Frame) -> Result<Vec<f64>> {
    frame
        .require_column(TARGET_COLUMN)?
        .as_float()
        .map(|v| v.to_vec())
        .ok_or_else(|| PipelineError::SchemaMismatch {
            expected: format!("numeric column {:?}", TARGET_COLUMN),
            got: "text column".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::FittedTableTransformer;

    const HEADER: &str =
        "brand_model,manufacture_date,origin,type,seats,gearbox,fuel,color,mileage_v2,condition,price\n";

    fn write_csvs(dir: &Path) -> (PathBuf, PathBuf, PathBuf) {
        // 6 cleaned rows; the first 4 are "train", the last 2 "test".
        let rows = [
            "Toyota Corolla,2015,domestic,sedan,4,MT,petrol,white,50000,used,300",
            "Honda Civic,2018,imported,sedan,4,AT,petrol,black,30000,new,420",
            "Toyota Corolla,2015,domestic,sedan,,MT,petrol,white,55000,used,310",
            "Honda Civic,2018,imported,suv,7,AT,diesel,black,20000,new,500",
            "Toyota Corolla,2018,domestic,sedan,4,AT,petrol,black,10000,used,350",
            "Honda Civic,2015,imported,sedan,4,MT,diesel,white,60000,new,280",
        ];
        let clean = dir.join("data.csv");
        let train = dir.join("train.csv");
        let test = dir.join("test.csv");
        std::fs::write(&clean, format!("{HEADER}{}\n", rows.join("\n"))).unwrap();
        std::fs::write(&train, format!("{HEADER}{}\n", rows[..4].join("\n"))).unwrap();
        std::fs::write(&test, format!("{HEADER}{}\n", rows[4..].join("\n"))).unwrap();
        (clean, train, test)
    }

    #[test]
    fn test_preprocessor_lists_nine_features() {
        let dir = tempfile::tempdir().unwrap();
        let (clean, ..) = write_csvs(dir.path());
        let frame = Frame::read_csv(clean).unwrap();
        let fitted = build_preprocessor().fit(&drop_target(&frame)).unwrap();
        assert_eq!(fitted.feature_columns().len(), 9);
    }

    #[test]
    fn test_run_produces_expected_column_count() {
        let dir = tempfile::tempdir().unwrap();
        let (clean, train, test) = write_csvs(dir.path());
        let transformation = DataTransformation::new(TransformationConfig::new(dir.path()));

        let (train_arr, test_arr) = transformation.run(&clean, &train, &test).unwrap();

        // Category counts over the full set: brand_model 2, year 2, origin 2,
        // type 2, gearbox 2, fuel 2, color 2 -> 14 one-hot columns, plus
        // seats and mileage_v2, plus the target.
        assert_eq!(train_arr.shape(), (4, 17));
        assert_eq!(test_arr.shape(), (2, 17));

        // Target rides along as the last column.
        assert_eq!(train_arr.get(0, 16), 300.0);
        assert_eq!(test_arr.get(1, 16), 280.0);
    }

    #[test]
    fn test_run_persists_reusable_preprocessor() {
        let dir = tempfile::tempdir().unwrap();
        let (clean, train, test) = write_csvs(dir.path());
        let transformation = DataTransformation::new(TransformationConfig::new(dir.path()));
        let (train_arr, _) = transformation.run(&clean, &train, &test).unwrap();

        let loaded: FittedTableTransformer =
            store::load_object(&transformation.config().preprocessor_path).unwrap();

        let train_frame = Frame::read_csv(&train).unwrap();
        let again = loaded.transform(&drop_target(&train_frame)).unwrap();
        let (expected, _) = train_arr.split_last_column().unwrap();
        assert_eq!(again, expected);
    }

    #[test]
    fn test_fit_on_train_errors_on_unseen_test_category() {
        let dir = tempfile::tempdir().unwrap();
        let (clean, train, _) = write_csvs(dir.path());
        // Test split carries a color never present in the train split.
        let test = dir.path().join("test_unseen.csv");
        std::fs::write(
            &test,
            format!(
                "{HEADER}Toyota Corolla,2015,domestic,sedan,4,MT,petrol,purple,50000,used,300\n"
            ),
        )
        .unwrap();

        let mut config = TransformationConfig::new(dir.path());
        config.fit_on = FitOn::Train;
        let transformation = DataTransformation::new(config);

        let result = transformation.run(&clean, &train, &test);
        match result {
            Err(PipelineError::UnseenCategory { column, value }) => {
                assert_eq!(column, "color");
                assert_eq!(value, "purple");
            }
            other => panic!("expected unseen-category error, got {other:?}"),
        }
    }

    #[test]
    fn test_run_missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let transformation = DataTransformation::new(TransformationConfig::new(dir.path()));
        let missing = dir.path().join("missing.csv");
        let result = transformation.run(&missing, &missing, &missing);
        assert!(matches!(result, Err(PipelineError::Io { .. })));
    }
}
