//! Selective extraction of GeoIP database archives.
//!
//! # Architecture
//!
//! - `format.rs` - Archive format from file name or magic bytes
//! - `source/` - Per-format [`EntrySource`] walkers (tar.gz, zip)
//! - `entry.rs` - Pending entries and extracted descriptors
//! - `extract.rs` - Filtering, per-entry checksum skip, extraction

pub use entry::{EntryAction, EntryKind, ExtractedEntry, PendingEntry};
pub use error::{Error, Result};
pub use extract::{DEFAULT_EXTENSIONS, ExtractOptions, Extractor};
pub use format::{ArchiveFormat, detect_format};
pub use source::{EntrySource, TarArchive, TarSource, ZipSource};

mod entry;
mod error;
mod extract;
mod format;
pub mod source;
