use std::path::{Path, PathBuf};

/// Extension of the checksum marker sidecar.
pub const MARKER_EXTENSION: &str = "md5";

/// Hidden sidecar next to `base_name` inside `dir`: `{dir}/.{base_name}.{extension}`.
pub fn marker_path(dir: impl AsRef<Path>, base_name: &str, extension: &str) -> PathBuf {
    dir.as_ref().join(format!(".{base_name}.{extension}"))
}
