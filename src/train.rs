//! Model trainer: fits the candidate roster, scores each on the test split
//! and persists the best model by R².

use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};
use crate::frame::Matrix;
use crate::metrics;
use crate::model::{LinearParams, LinearRegression};
use crate::store;
use crate::trainer::{Penalty, Trainer};

/// Artifact location for the selected model.
#[derive(Clone, Debug)]
pub struct ModelTrainerConfig {
    pub model_path: PathBuf,
}

impl Default for ModelTrainerConfig {
    fn default() -> Self {
        Self::new("artifacts")
    }
}

impl ModelTrainerConfig {
    pub fn new<P: AsRef<Path>>(artifacts_dir: P) -> Self {
        Self {
            model_path: artifacts_dir.as_ref().join("model.bin"),
        }
    }
}

/// Test-split metrics of one trained candidate.
#[derive(Clone, Debug)]
pub struct CandidateScore {
    pub name: String,
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
    pub mape: f64,
    pub r_squared: f64,
}

/// The fixed candidate roster: the same SGD loop with different penalties.
pub fn default_candidates() -> Vec<(String, Trainer)> {
    vec![
        (
            "linear_regression".to_string(),
            Trainer::builder().build(),
        ),
        (
            "ridge".to_string(),
            Trainer::builder().penalty(Penalty::L2(0.01)).build(),
        ),
        (
            "lasso".to_string(),
            Trainer::builder().penalty(Penalty::L1(0.01)).build(),
        ),
    ]
}

/// Training and selection step of the training pipeline.
#[derive(Clone, Debug, Default)]
pub struct ModelTrainer {
    config: ModelTrainerConfig,
}

impl ModelTrainer {
    pub fn new(config: ModelTrainerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModelTrainerConfig {
        &self.config
    }

    /// Train the default roster and persist the best model.
    ///
    /// Both matrices carry the target as their last column.
    pub fn run(&self, train_arr: &Matrix, test_arr: &Matrix) -> Result<CandidateScore> {
        self.run_with_candidates(default_candidates(), train_arr, test_arr)
    }

    /// Train an explicit roster and persist the best model.
    pub fn run_with_candidates(
        &self,
        candidates: Vec<(String, Trainer)>,
        train_arr: &Matrix,
        test_arr: &Matrix,
    ) -> Result<CandidateScore> {
        if candidates.is_empty() {
            return Err(PipelineError::InvalidParameter(
                "candidate roster is empty".to_string(),
            ));
        }

        let (x_train, y_train) = train_arr.split_last_column()?;
        let (x_test, y_test) = test_arr.split_last_column()?;
        let n_features = x_train.n_cols();

        let mut best: Option<(CandidateScore, LinearParams)> = None;
        for (name, trainer) in candidates {
            let fitted = trainer.fit(LinearRegression::new(n_features), &x_train, &y_train)?;
            let preds = fitted.predict_batch(&x_test)?;

            let score = CandidateScore {
                mae: metrics::mae(&preds, &y_test),
                mse: metrics::mse(&preds, &y_test),
                rmse: metrics::rmse(&preds, &y_test),
                mape: metrics::mape(&preds, &y_test),
                r_squared: metrics::r_squared(&preds, &y_test),
                name,
            };
            log::info!(
                "{}: mae={:.4} mse={:.4} rmse={:.4} mape={:.4} r2={:.4}",
                score.name,
                score.mae,
                score.mse,
                score.rmse,
                score.mape,
                score.r_squared
            );

            // NaN scores rank below everything.
            let ranked = |r2: f64| if r2.is_nan() { f64::NEG_INFINITY } else { r2 };
            let improved = match &best {
                None => true,
                Some((current, _)) => ranked(score.r_squared) > ranked(current.r_squared),
            };
            if improved {
                best = Some((score, fitted.params().clone()));
            }
        }

        let (score, params) = best.ok_or_else(|| {
            PipelineError::InvalidParameter("no candidate produced a score".to_string())
        })?;
        store::save_object(&self.config.model_path, &params)?;
        log::info!(
            "selected {} (r2={:.4}), saved to {}",
            score.name,
            score.r_squared,
            self.config.model_path.display()
        );
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Fitted, LinearModel};

    /// y = x over a single feature; targets ride in the last column.
    fn matrices() -> (Matrix, Matrix) {
        let train = Matrix::new(vec![1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0], 4, 2);
        let test = Matrix::new(vec![5.0, 5.0, 6.0, 6.0], 2, 2);
        (train, test)
    }

    fn converging_candidate() -> (String, Trainer) {
        (
            "converging".to_string(),
            Trainer::builder()
                .learning_rate(0.05)
                .batch_size(4)
                .max_epochs(2000)
                .build(),
        )
    }

    fn untrained_candidate() -> (String, Trainer) {
        ("untrained".to_string(), Trainer::builder().max_epochs(0).build())
    }

    #[test]
    fn test_selects_candidate_with_highest_r_squared() {
        let dir = tempfile::tempdir().unwrap();
        let trainer = ModelTrainer::new(ModelTrainerConfig::new(dir.path()));
        let (train, test) = matrices();

        let score = trainer
            .run_with_candidates(
                vec![untrained_candidate(), converging_candidate()],
                &train,
                &test,
            )
            .unwrap();

        assert_eq!(score.name, "converging");
        assert!(score.r_squared > 0.95);
    }

    #[test]
    fn test_persists_best_model_params() {
        let dir = tempfile::tempdir().unwrap();
        let trainer = ModelTrainer::new(ModelTrainerConfig::new(dir.path()));
        let (train, test) = matrices();

        trainer
            .run_with_candidates(
                vec![converging_candidate(), untrained_candidate()],
                &train,
                &test,
            )
            .unwrap();

        let params: LinearParams = store::load_object(&trainer.config().model_path).unwrap();
        let model = LinearModel::<Fitted>::from_params(params);
        let pred = model.predict(&[5.0]).unwrap();
        assert!((pred - 5.0).abs() < 0.5);
    }

    #[test]
    fn test_untrained_candidate_scores_below_mean_baseline() {
        let dir = tempfile::tempdir().unwrap();
        let trainer = ModelTrainer::new(ModelTrainerConfig::new(dir.path()));
        let (train, test) = matrices();

        let score = trainer
            .run_with_candidates(vec![untrained_candidate()], &train, &test)
            .unwrap();
        assert!(score.r_squared < 0.0);
    }

    #[test]
    fn test_empty_roster_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let trainer = ModelTrainer::new(ModelTrainerConfig::new(dir.path()));
        let (train, test) = matrices();

        let result = trainer.run_with_candidates(vec![], &train, &test);
        assert!(matches!(result, Err(PipelineError::InvalidParameter(_))));
    }

    #[test]
    fn test_default_roster_has_three_candidates() {
        let names: Vec<String> = default_candidates().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["linear_regression", "ridge", "lasso"]);
    }
}
