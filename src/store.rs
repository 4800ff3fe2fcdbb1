//! Object store for fitted artifacts.
//!
//! Persists any serde-serializable object to a bincode file and restores it
//! later. The caller is trusted to load what it saved: there is no versioning
//! and no schema check.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Serialize `object` to `path`, creating parent directories as needed.
pub fn save_object<T: Serialize, P: AsRef<Path>>(path: P, object: &T) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::from(e).with_path(path))?;
        }
    }
    let bytes = bincode::serialize(object)?;
    std::fs::write(path, bytes).map_err(|e| PipelineError::from(e).with_path(path))?;
    Ok(())
}

/// Deserialize an object previously written by [`save_object`].
///
/// # Errors
/// Returns [`PipelineError::ArtifactMissing`] when the file does not exist
/// (the first-run-before-train condition), and
/// [`PipelineError::Serialization`] when the payload does not decode as `T`.
pub fn load_object<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PipelineError::ArtifactMissing(path.display().to_string()));
    }
    let bytes = std::fs::read(path).map_err(|e| PipelineError::from(e).with_path(path))?;
    Ok(bincode::deserialize(&bytes)?)
}
