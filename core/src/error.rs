use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a corpus or reading/writing a persisted index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// No index has been built at this location yet
    #[error("no index found at {0}; run the indexer first")]
    NotBuilt(PathBuf),

    #[error("storage error: {0}")]
    Store(#[from] sled::Error),

    #[error("encoding error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored key or value could not be decoded
    #[error("corrupt index entry in `{table}`: {detail}")]
    Corrupt { table: &'static str, detail: String },
}

pub type Result<T> = std::result::Result<T, IndexError>;
