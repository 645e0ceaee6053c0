use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Per-user cache directory for geodb, falling back to the system temp dir.
pub fn default_work_dir() -> PathBuf {
    user_cache().unwrap_or_else(env::temp_dir).join("geodb")
}

fn user_cache() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var_os("LOCALAPPDATA").map(|p| PathBuf::from(p).join("Cache"))
    }
    #[cfg(target_os = "macos")]
    {
        home::home_dir().map(|p| p.join("Library/Caches"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        env::var_os("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .or_else(|| home::home_dir().map(|p| p.join(".cache")))
    }
}

/// Make `dir` absolute, create it and check that files can be created inside it.
pub fn prepare_writable_dir(dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let absolute = std::path::absolute(dir).map_err(|source| Error::Resolve {
        path: dir.to_path_buf(),
        source,
    })?;

    fs::create_dir_all(&absolute).map_err(|source| Error::CreateDir {
        path: absolute.clone(),
        source,
    })?;
    probe_writable(&absolute)?;
    Ok(absolute)
}

/// Create and drop a temp file inside `dir`.
pub fn probe_writable(dir: &Path) -> Result<()> {
    tempfile::Builder::new()
        .prefix(".geodb-probe-")
        .tempfile_in(dir)
        .map(drop)
        .map_err(|source| Error::NotWritable {
            path: dir.to_path_buf(),
            source,
        })
}
