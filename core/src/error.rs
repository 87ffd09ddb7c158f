use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Debug, Error)]
pub enum IndexError {
    /// The data directory could not be created or opened. Fatal at startup.
    #[error("cannot initialize data directory {path}: {source}")]
    Init {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8 text")]
    Decode { path: PathBuf },

    #[error("{path} does not have an accepted extension")]
    UnsupportedFile { path: PathBuf },

    #[error("unknown document: {0}")]
    UnknownDocument(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl IndexError {
    /// Per-document failures are skipped during ingestion; everything else aborts.
    pub fn is_fatal(&self) -> bool {
        matches!(self, IndexError::Init { .. } | IndexError::Config(_))
    }
}
