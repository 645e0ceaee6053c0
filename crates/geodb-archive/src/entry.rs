use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Links, devices and other special entries; never extracted.
    Other,
}

/// An entry yielded by an [`EntrySource`](crate::EntrySource), with its content
/// still unread.
pub struct PendingEntry<'a> {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
    pub kind: EntryKind,
    pub(crate) reader: Box<dyn Read + 'a>,
}

impl<'a> PendingEntry<'a> {
    pub fn new(
        path: PathBuf,
        size: u64,
        modified: SystemTime,
        kind: EntryKind,
        reader: impl Read + 'a,
    ) -> Self {
        Self {
            path,
            size,
            modified,
            kind,
            reader: Box::new(reader),
        }
    }

    pub fn is_file(&self) -> bool { self.kind == EntryKind::File }

    pub fn is_directory(&self) -> bool { self.kind == EntryKind::Directory }

    /// Base name of the in-archive path; nested directories are flattened.
    pub fn file_name(&self) -> Result<String> {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidPath(self.path.clone()))
    }

    pub fn has_extension(&self, extensions: &[String]) -> bool {
        extension_of(&self.path).is_some_and(|ext| extensions.iter().any(|e| e == ext))
    }

    pub fn into_reader(self) -> Box<dyn Read + 'a> { self.reader }
}

impl fmt::Debug for PendingEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingEntry")
            .field("path", &self.path)
            .field("size", &self.size)
            .field("modified", &self.modified)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

fn extension_of(path: &Path) -> Option<&str> { path.extension().and_then(|e| e.to_str()) }

/// Whether an entry's bytes were written during this run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryAction {
    Extracted,
    /// The destination already held identical content.
    UpToDate,
}

/// Descriptor of a payload entry that is now current on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedEntry {
    pub name: String,
    pub size: u64,
    pub modified: SystemTime,
    pub checksum: String,
    pub action: EntryAction,
}

impl ExtractedEntry {
    pub fn was_rewritten(&self) -> bool { self.action == EntryAction::Extracted }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::empty;
    use std::time::UNIX_EPOCH;

    fn entry(path: &str, kind: EntryKind) -> PendingEntry<'static> {
        PendingEntry::new(PathBuf::from(path), 0, UNIX_EPOCH, kind, empty())
    }

    #[test]
    fn file_name_flattens_nested_paths() {
        let e = entry("GeoLite2-City_20240102/GeoLite2-City.mmdb", EntryKind::File);
        assert_eq!(e.file_name().unwrap(), "GeoLite2-City.mmdb");
    }

    #[test]
    fn file_name_of_root_is_invalid() {
        let e = entry("/", EntryKind::Directory);
        assert!(matches!(e.file_name(), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn extension_matching_is_exact() {
        let allowed = vec!["csv".to_string(), "mmdb".to_string()];
        assert!(entry("a/GeoLite2-ASN-Blocks-IPv4.csv", EntryKind::File).has_extension(&allowed));
        assert!(entry("GeoLite2-ASN.mmdb", EntryKind::File).has_extension(&allowed));
        assert!(!entry("a/LICENSE.txt", EntryKind::File).has_extension(&allowed));
        assert!(!entry("a/README", EntryKind::File).has_extension(&allowed));
        assert!(!entry("a/DATA.CSV", EntryKind::File).has_extension(&allowed));
    }

    #[test]
    fn entry_kinds() {
        assert!(entry("a/", EntryKind::Directory).is_directory());
        assert!(entry("a/b.csv", EntryKind::File).is_file());
        assert!(!entry("a/link", EntryKind::Other).is_file());
    }
}
