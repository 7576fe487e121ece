// Capsweep Error Types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CapsweepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read directory {path}: {source}")]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Catalog is empty: no parseable files")]
    EmptyCatalog,

    #[error("Identity not found: {0}")]
    IdentityNotFound(String),

    #[error("Scan cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for CapsweepError {
    fn from(err: anyhow::Error) -> Self {
        CapsweepError::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CapsweepError>;
