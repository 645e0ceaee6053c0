//! Pull-based walkers over archive entries.

mod tar;
mod zip;

pub use self::tar::{TarArchive, TarSource};
pub use self::zip::ZipSource;

use crate::{PendingEntry, Result};

/// A lazy, finite, non-restartable sequence of archive entries.
///
/// Each entry borrows the source, so it must be consumed before the next one
/// is requested. After an `Err` the walk should be abandoned.
pub trait EntrySource {
    fn next_entry(&mut self) -> Option<Result<PendingEntry<'_>>>;
}
