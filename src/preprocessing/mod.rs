//! Data preprocessing transformers for the training and prediction pipelines.
//!
//! All transformers follow the same type-state split:
//!
//! - unfitted types carry hyperparameters and implement [`Transformer`];
//! - fitted types carry learned parameters, implement [`FittedTransformer`]
//!   and serialize through the object store for reuse at prediction time.
//!
//! # Available transformers
//!
//! | Transformer | Input | Description |
//! |---|---|---|
//! | [`NumericImputer`] | numeric column | fill NaN with mean/median/most-frequent/constant |
//! | [`CategoryImputer`] | text column | fill missing with most-frequent/constant |
//! | [`OneHotEncoder`] | column | indicator vector over observed categories |
//! | [`StandardScaler`] | matrix | z-score scaling, optional centering |
//! | [`FeaturePipeline`] | column | impute → encode → scale for one feature |
//! | [`TableTransformer`] | frame | one feature pipeline per column, h-concatenated |

pub mod encode;
pub mod impute;
pub mod pipeline;
pub mod scale;
pub mod table;
pub mod traits;

pub use encode::{Categories, FittedOneHotEncoder, HandleUnknown, OneHotEncoder};
pub use impute::{
    CategoryImputer, CategoryStrategy, FittedCategoryImputer, FittedNumericImputer,
    NumericImputer, NumericStrategy,
};
pub use pipeline::{FeaturePipeline, FittedFeaturePipeline};
pub use scale::{FittedStandardScaler, StandardScaler};
pub use table::{FittedTableTransformer, TableTransformer};
pub use traits::{FittedTransformer, Transformer};
