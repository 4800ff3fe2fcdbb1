//! Error types for the training and prediction pipelines.

use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Error type shared by every pipeline component.
///
/// The set of kinds is closed on purpose: callers (and the service boundary)
/// can tell an unseen category apart from a missing artifact without parsing
/// message strings.
#[derive(Debug)]
pub enum PipelineError {
    /// I/O failure while reading or writing a file.
    Io { path: String, message: String },
    /// Input data did not have the expected shape or columns.
    SchemaMismatch { expected: String, got: String },
    /// A categorical value was never observed while fitting the encoder.
    UnseenCategory { column: String, value: String },
    /// A persisted artifact (preprocessor or model) is not on disk.
    ArtifactMissing(String),
    /// Serialization or deserialization of a persisted object failed.
    Serialization(String),
    /// Empty data provided where non-empty was required.
    EmptyData(String),
    /// Feature dimension mismatch between fit and transform.
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },
    /// Invalid parameter or malformed cell value.
    InvalidParameter(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Io { path, message } => {
                write!(f, "I/O error on {}: {}", path, message)
            }
            PipelineError::SchemaMismatch { expected, got } => {
                write!(f, "Schema mismatch: expected {}, got {}", expected, got)
            }
            PipelineError::UnseenCategory { column, value } => {
                write!(f, "Unseen category {:?} in column {:?}", value, column)
            }
            PipelineError::ArtifactMissing(path) => {
                write!(f, "Artifact missing: {} (run training first)", path)
            }
            PipelineError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            PipelineError::EmptyData(msg) => {
                write!(f, "Empty data: {}", msg)
            }
            PipelineError::FeatureMismatch {
                expected_features,
                got_features,
            } => {
                write!(
                    f,
                    "Feature mismatch: expected {} features, got {}",
                    expected_features, got_features
                )
            }
            PipelineError::InvalidParameter(msg) => {
                write!(f, "Invalid parameter: {}", msg)
            }
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Io {
            path: String::new(),
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::Io {
            path: String::new(),
            message: err.to_string(),
        }
    }
}

impl From<bincode::Error> for PipelineError {
    fn from(err: bincode::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}

impl PipelineError {
    /// Attach a file path to an I/O error that was produced without one.
    pub fn with_path<P: AsRef<std::path::Path>>(self, path: P) -> Self {
        match self {
            PipelineError::Io { message, .. } => PipelineError::Io {
                path: path.as_ref().display().to_string(),
                message,
            },
            other => other,
        }
    }

    /// Attach a column name to an unseen-category error raised by an encoder
    /// that does not know which feature it belongs to.
    pub fn in_column(self, column: &str) -> Self {
        match self {
            PipelineError::UnseenCategory { value, .. } => PipelineError::UnseenCategory {
                column: column.to_string(),
                value,
            },
            other => other,
        }
    }
}
