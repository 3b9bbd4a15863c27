use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or writing the persisted settings file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read settings from {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write settings to {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to parse settings from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A geometry descriptor that a backend could not decode.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("expected 8 fields in frame descriptor, found {0}")]
    FieldCount(usize),
    #[error("invalid number {0:?} in frame descriptor")]
    Number(String),
}

#[derive(Debug, Error)]
pub enum ActivationError {
    #[error("invalid activation url: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid url scheme {0:?}")]
    Scheme(String),
    #[error("activation url {0} has no scene id")]
    MissingScene(String),
    #[error("failed to dispatch {url}: {source}")]
    Dispatch { url: String, source: io::Error },
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid url scheme {0:?}: expected a lowercase letter followed by [a-z0-9+.-]")]
    Scheme(String),
    #[error("cascade offset must be a finite, non-negative number (got {0})")]
    CascadeOffset(f64),
    #[error("frame key version must be at least 1")]
    FrameKeyVersion,
}
