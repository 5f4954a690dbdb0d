use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the data path.
///
/// An empty filter result is not represented here: "0 results" is a normal
/// outcome, only a missing dataset is a failure.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HouseError {
    /// Backing file or table missing or unreadable.
    #[error("dataset unavailable ({}): {reason}", .path.display())]
    DatasetUnavailable { path: PathBuf, reason: String },

    /// No trained or persisted model, and not enough data to fit one.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// A record violating the `HouseRecord` invariants.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// Writing to the store or an export target failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl HouseError {
    pub fn dataset_unavailable(path: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        HouseError::DatasetUnavailable {
            path: path.into(),
            reason: format!("{err:#}"),
        }
    }

    pub fn storage(err: &anyhow::Error) -> Self {
        HouseError::Storage(format!("{err:#}"))
    }
}

pub type HouseResult<T> = std::result::Result<T, HouseError>;
