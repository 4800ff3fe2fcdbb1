//! # carprice
//!
//! Car-price prediction service: a batch training pipeline that cleans a
//! listings CSV, fits a column-wise preprocessing composite and a roster of
//! linear regression candidates, persists the best artifacts, and a thin
//! HTTP endpoint that loads those artifacts to price a single listing.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: transformers and models carry their training
//!   state in the type system (unfitted vs fitted), so inference cannot run
//!   on something that was never fitted.
//! - **Training/Inference Separation**: fitted objects contain only the
//!   parameters inference needs; training logic lives in the trainer.
//! - **Closed Error Set**: every component fails with one of a small set of
//!   error kinds (I/O, schema mismatch, unseen category, missing artifact,
//!   serialization), surfaced distinctly at the service boundary.
//!
//! ## Module Structure
//!
//! - `frame` — column-typed table and dense matrix types
//! - `preprocessing` — imputers, one-hot encoder, scaler, per-feature
//!   pipelines and the column-wise composite
//! - `model` — linear regression with typestate
//! - `trainer` — mini-batch SGD loop with optional L1/L2 penalty
//! - `metrics` — regression metrics (MAE, MSE, RMSE, MAPE, R²)
//! - `model_selection` — seeded train/test splitting
//! - `store` — bincode object store for fitted artifacts
//! - `ingest`, `transform`, `train` — the three training-pipeline stages
//! - `pipeline` — stage orchestration
//! - `predict` — artifact loading and single-listing prediction
//! - `server` — the axum prediction endpoint

pub mod error;

/// Column-typed tables and dense matrices.
pub mod frame;

/// Data preprocessing transformers.
pub mod preprocessing;

/// Regression models with compile-time state tracking.
pub mod model;

/// SGD training loop for the candidate roster.
pub mod trainer;

/// Regression evaluation metrics.
pub mod metrics;

/// Train/test splitting.
pub mod model_selection;

/// Object store for fitted artifacts.
pub mod store;

/// Data ingestion stage.
pub mod ingest;

/// Data transformation stage.
pub mod transform;

/// Model training and selection stage.
pub mod train;

/// Training pipeline orchestration.
pub mod pipeline;

/// Prediction pipeline.
pub mod predict;

/// HTTP prediction endpoint.
pub mod server;

pub use error::{PipelineError, Result};
pub use frame::{Column, Frame, Matrix};
