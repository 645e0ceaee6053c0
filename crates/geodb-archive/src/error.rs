use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported archive format: '{0}'")]
    UnsupportedFormat(PathBuf),

    #[error("cannot open archive '{path}': {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("archive is corrupted: {0}")]
    Corrupted(String),

    #[error("archive entry has no usable file name: '{0}'")]
    InvalidPath(PathBuf),

    #[error("cannot {op} database file '{path}': {source}")]
    Extract {
        op: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error(transparent)]
    Checksum(#[from] geodb_verify::VerificationError),
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self { Self::Corrupted(e.to_string()) }
}

pub type Result<T> = std::result::Result<T, Error>;
