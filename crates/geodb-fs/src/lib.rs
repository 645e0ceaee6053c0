//! Filesystem primitives backing the geodb on-disk cache.

mod atomic;
mod dir;
mod error;
mod marker;
mod times;

pub use atomic::{AtomicWriteOptions, atomic_write, read_optional_string};
pub use dir::{default_work_dir, prepare_writable_dir, probe_writable};
pub use error::{Error, Result};
pub use marker::{MARKER_EXTENSION, marker_path};
pub use times::set_modified;
