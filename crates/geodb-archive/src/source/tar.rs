use std::io::Read;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use flate2::read::GzDecoder;

use super::EntrySource;
use crate::{EntryKind, Error, PendingEntry, Result};

/// A gzip-compressed tarball; [`entries`](Self::entries) walks it once.
pub struct TarArchive<R: Read> {
    archive: tar::Archive<GzDecoder<R>>,
}

impl<R: Read> TarArchive<R> {
    pub fn new(reader: R) -> Self {
        Self {
            archive: tar::Archive::new(GzDecoder::new(reader)),
        }
    }

    pub fn entries(&mut self) -> Result<TarSource<'_, GzDecoder<R>>> {
        let entries = self
            .archive
            .entries()
            .map_err(|e| Error::Corrupted(e.to_string()))?;
        Ok(TarSource { entries })
    }
}

pub struct TarSource<'a, R: 'a + Read> {
    entries: tar::Entries<'a, R>,
}

impl<'a, R: Read + 'a> EntrySource for TarSource<'a, R> {
    fn next_entry(&mut self) -> Option<Result<PendingEntry<'_>>> {
        let entry = match self.entries.next()? {
            Ok(e) => e,
            Err(e) => return Some(Err(Error::Corrupted(e.to_string()))),
        };

        let path = match entry.path() {
            Ok(p) => p.into_owned(),
            Err(e) => return Some(Err(Error::Corrupted(e.to_string()))),
        };

        let header = entry.header();
        let size = header.size().unwrap_or(0);
        let modified = header
            .mtime()
            .map(|secs| UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap_or(SystemTime::UNIX_EPOCH);
        let entry_type = header.entry_type();
        let kind = if entry_type.is_dir() {
            EntryKind::Directory
        } else if entry_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };

        Some(Ok(PendingEntry::new(path, size, modified, kind, entry)))
    }
}
