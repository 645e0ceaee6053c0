use std::io::{Read, Seek};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;

use super::EntrySource;
use crate::{EntryKind, PendingEntry, Result};

pub struct ZipSource<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
    index: usize,
}

impl<R: Read + Seek> ZipSource<R> {
    pub fn new(reader: R) -> Result<Self> {
        Ok(Self {
            archive: zip::ZipArchive::new(reader)?,
            index: 0,
        })
    }

    pub fn len(&self) -> usize { self.archive.len() }

    pub fn is_empty(&self) -> bool { self.archive.is_empty() }
}

impl<R: Read + Seek> EntrySource for ZipSource<R> {
    fn next_entry(&mut self) -> Option<Result<PendingEntry<'_>>> {
        if self.index >= self.archive.len() {
            return None;
        }

        let file = match self.archive.by_index(self.index) {
            Ok(f) => f,
            Err(e) => return Some(Err(e.into())),
        };
        self.index += 1;

        // Only the base name reaches the filesystem, so unsafe paths need no rejection.
        let path = PathBuf::from(file.name());
        let size = file.size();
        let modified = file
            .last_modified()
            .and_then(to_system_time)
            .unwrap_or(UNIX_EPOCH);
        let kind = if file.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };

        Some(Ok(PendingEntry::new(path, size, modified, kind, file)))
    }
}

/// Zip timestamps carry no zone; they are read as UTC.
fn to_system_time(dt: zip::DateTime) -> Option<SystemTime> {
    let naive = NaiveDate::from_ymd_opt(dt.year().into(), dt.month().into(), dt.day().into())?
        .and_hms_opt(dt.hour().into(), dt.minute().into(), dt.second().into())?;
    Some(naive.and_utc().into())
}
