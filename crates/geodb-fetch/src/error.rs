//! Error types for geodb-fetch.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid download URL '{url}': {source}")]
    InvalidUrl { url: String, source: url::ParseError },

    #[error("request to {url} failed: {source}")]
    Transport { url: String, source: BoxError },

    #[error("received invalid status code {status}: {body}")]
    Status { status: u16, body: String },

    #[error("MD5 of downloaded archive ({actual}) does not match expected MD5 ({expected})")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("cannot {op} '{path}': {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error(transparent)]
    Checksum(#[from] geodb_verify::VerificationError),

    #[error(transparent)]
    Fs(#[from] geodb_fs::Error),
}

impl FetchError {
    /// Network failure or non-200 answer from the distribution service.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Status { .. })
    }

    pub fn is_integrity(&self) -> bool { matches!(self, Self::ChecksumMismatch { .. }) }
}

pub type Result<T> = std::result::Result<T, FetchError>;
