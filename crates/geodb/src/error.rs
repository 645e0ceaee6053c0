//! Error types for geodb.

use std::io;
use std::path::PathBuf;

use geodb_fetch::{BoxError, FetchError};
use thiserror::Error;

/// Broad class of a failure, for callers that only need to decide what to tell the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure or a non-200 answer from the distribution service.
    Transport,
    /// The downloaded archive did not match the published checksum.
    Integrity,
    /// Local filesystem failure while fetching or extracting.
    Io,
    /// Work or download directory unusable, caught at construction.
    Setup,
    /// Unknown edition or unusable configuration.
    Config,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot use {role} directory '{path}': {source}")]
    Setup {
        role: &'static str,
        path: PathBuf,
        source: geodb_fs::Error,
    },

    #[error("cannot locate the directory of the running executable: {0}")]
    ExecutableDir(#[source] io::Error),

    #[error("cannot build HTTP client: {0}")]
    HttpClient(#[source] BoxError),

    #[error("unknown edition '{0}'")]
    UnknownEdition(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot read configuration file '{path}': {source}")]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("cannot parse configuration file '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Archive(#[from] geodb_archive::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Setup { .. } | Self::ExecutableDir(_) | Self::HttpClient(_) => ErrorKind::Setup,
            Self::UnknownEdition(_)
            | Self::Config(_)
            | Self::ConfigRead { .. }
            | Self::ConfigParse { .. } => ErrorKind::Config,
            Self::Fetch(e) if e.is_transport() => ErrorKind::Transport,
            Self::Fetch(e) if e.is_integrity() => ErrorKind::Integrity,
            Self::Fetch(FetchError::InvalidUrl { .. }) => ErrorKind::Config,
            Self::Fetch(_) | Self::Archive(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_are_classified() {
        let status = Error::from(FetchError::Status {
            status: 401,
            body: "Invalid license key".into(),
        });
        assert_eq!(status.kind(), ErrorKind::Transport);

        let mismatch = Error::from(FetchError::ChecksumMismatch {
            expected: "abc123".into(),
            actual: "def456".into(),
        });
        assert_eq!(mismatch.kind(), ErrorKind::Integrity);

        let io = Error::from(FetchError::Io {
            op: "create archive file",
            path: PathBuf::from("/nowhere/GeoLite2-City.tar.gz"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        });
        assert_eq!(io.kind(), ErrorKind::Io);
    }

    #[test]
    fn local_errors_are_classified() {
        let corrupted = Error::from(geodb_archive::Error::Corrupted("bad header".into()));
        assert_eq!(corrupted.kind(), ErrorKind::Io);
        assert_eq!(Error::UnknownEdition("GeoLite2-Planet".into()).kind(), ErrorKind::Config);
        assert_eq!(
            Error::ExecutableDir(io::Error::from(io::ErrorKind::NotFound)).kind(),
            ErrorKind::Setup
        );
    }
}
