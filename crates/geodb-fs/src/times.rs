use std::path::Path;
use std::time::SystemTime;

use filetime::FileTime;

use crate::{Error, Result};

/// Set both access and modification time of `path` to `modified`.
pub fn set_modified(path: impl AsRef<Path>, modified: SystemTime) -> Result<()> {
    let path = path.as_ref();
    let time = FileTime::from_system_time(modified);
    filetime::set_file_times(path, time, time).map_err(|source| Error::SetTimes {
        path: path.to_path_buf(),
        source,
    })
}
