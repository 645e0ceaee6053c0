use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to create directory '{path}': {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("directory '{path}' is not writable: {source}")]
    NotWritable { path: PathBuf, source: io::Error },

    #[error("cannot resolve absolute path of '{path}': {source}")]
    Resolve { path: PathBuf, source: io::Error },

    #[error("failed to set modification time of '{path}': {source}")]
    SetTimes { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;
