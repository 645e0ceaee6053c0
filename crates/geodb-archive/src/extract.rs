use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use geodb_verify::{checksum_file, checksum_reader, checksums_match};
use indicatif::HumanBytes;
use tracing::{debug, warn};

use crate::format::ArchiveFormat;
use crate::source::{EntrySource, TarArchive, ZipSource};
use crate::{EntryAction, Error, ExtractedEntry, PendingEntry, Result};

/// Extensions of the payload files worth extracting: CSV tables and MaxMind DB files.
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["csv", "mmdb"];

#[derive(Clone, Debug)]
pub struct ExtractOptions {
    pub extensions: Vec<String>,
    pub preserve_mtime: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            preserve_mtime: true,
        }
    }
}

impl ExtractOptions {
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn preserve_mtime(mut self, preserve: bool) -> Self {
        self.preserve_mtime = preserve;
        self
    }
}

/// Materializes the payload entries of an archive into a download directory.
#[derive(Clone, Debug)]
pub struct Extractor {
    download_dir: PathBuf,
    options: ExtractOptions,
    set_times: fn(&Path, SystemTime) -> geodb_fs::Result<()>,
}

impl Extractor {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: download_dir.into(),
            options: ExtractOptions::default(),
            set_times: set_modified,
        }
    }

    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    pub fn download_dir(&self) -> &Path { &self.download_dir }

    /// Walk the archive at `archive` and bring every payload entry up to date.
    ///
    /// Entries already identical on disk are reported as
    /// [`EntryAction::UpToDate`] without being rewritten. The first I/O error
    /// aborts the walk; files extracted before it are kept.
    pub fn extract(&self, archive: &Path) -> Result<Vec<ExtractedEntry>> {
        let format = ArchiveFormat::of_path(archive)?;
        let file = File::open(archive).map_err(|source| Error::Open {
            path: archive.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);

        match format {
            ArchiveFormat::TarGz => {
                let mut tarball = TarArchive::new(reader);
                let mut source = tarball.entries()?;
                self.extract_from(&mut source)
            }
            ArchiveFormat::Zip => {
                let mut source = ZipSource::new(reader)?;
                self.extract_from(&mut source)
            }
        }
    }

    pub fn extract_from<S: EntrySource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<Vec<ExtractedEntry>> {
        let mut extracted = Vec::new();
        while let Some(entry) = source.next_entry() {
            let entry = entry?;
            if !entry.is_file() || !entry.has_extension(&self.options.extensions) {
                continue;
            }
            extracted.push(self.extract_entry(entry)?);
        }
        Ok(extracted)
    }

    fn extract_entry(&self, entry: PendingEntry<'_>) -> Result<ExtractedEntry> {
        let name = entry.file_name()?;
        let size = entry.size;
        let modified = entry.modified;
        let (checksum, mut spool) = checksum_reader(entry.into_reader())?;

        let modtime: DateTime<Utc> = modified.into();
        let span = tracing::debug_span!(
            "entry",
            db_name = %name,
            db_size = %HumanBytes(size),
            db_modtime = %modtime.to_rfc3339(),
            db_hash = %checksum,
        );
        let _enter = span.enter();

        let destination = self.download_dir.join(&name);
        if destination.exists() && checksums_match(&checksum, &checksum_file(&destination)?) {
            debug!("Database is already up to date");
            return Ok(ExtractedEntry {
                name,
                size,
                modified,
                checksum,
                action: EntryAction::UpToDate,
            });
        }

        debug!("Extracting database");
        let io_err = |op: &'static str| {
            let path = destination.clone();
            move |source: io::Error| Error::Extract { op, path, source }
        };

        let file = File::create(&destination).map_err(io_err("create"))?;
        let mut writer = BufWriter::new(file);
        io::copy(&mut spool, &mut writer).map_err(io_err("extract"))?;
        writer.flush().map_err(io_err("extract"))?;
        drop(writer);

        if self.options.preserve_mtime
            && let Err(e) = (self.set_times)(&destination, modified)
        {
            warn!(error = %e, "Cannot preserve modtime of database file");
        }

        Ok(ExtractedEntry {
            name,
            size,
            modified,
            checksum,
            action: EntryAction::Extracted,
        })
    }
}

fn set_modified(path: &Path, modified: SystemTime) -> geodb_fs::Result<()> {
    geodb_fs::set_modified(path, modified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::{Duration, UNIX_EPOCH};

    use crate::EntryKind;
    use geodb_verify::checksum_bytes;
    use tempfile::tempdir;

    /// In-memory source for exercising the walk without building archives.
    struct VecSource {
        entries: std::vec::IntoIter<(&'static str, EntryKind, Vec<u8>)>,
    }

    impl VecSource {
        fn new(entries: Vec<(&'static str, EntryKind, Vec<u8>)>) -> Self {
            Self {
                entries: entries.into_iter(),
            }
        }
    }

    impl EntrySource for VecSource {
        fn next_entry(&mut self) -> Option<Result<PendingEntry<'_>>> {
            let (path, kind, data) = self.entries.next()?;
            Some(Ok(PendingEntry::new(
                PathBuf::from(path),
                data.len() as u64,
                UNIX_EPOCH + Duration::from_secs(1_700_000_000),
                kind,
                Cursor::new(data),
            )))
        }
    }

    struct FailingSource {
        yielded: bool,
    }

    impl EntrySource for FailingSource {
        fn next_entry(&mut self) -> Option<Result<PendingEntry<'_>>> {
            if self.yielded {
                return Some(Err(Error::Corrupted("unexpected end of archive".into())));
            }
            self.yielded = true;
            Some(Ok(PendingEntry::new(
                PathBuf::from("dir/first.csv"),
                3,
                UNIX_EPOCH,
                EntryKind::File,
                Cursor::new(b"a,b".to_vec()),
            )))
        }
    }

    #[test]
    fn skips_non_payload_entries() {
        let dir = tempdir().unwrap();
        let mut source = VecSource::new(vec![
            ("db/", EntryKind::Directory, vec![]),
            ("db/COPYRIGHT.txt", EntryKind::File, b"(c)".to_vec()),
            ("db/link.mmdb", EntryKind::Other, vec![]),
            ("db/GeoLite2-ASN.mmdb", EntryKind::File, b"mmdb".to_vec()),
        ]);

        let entries = Extractor::new(dir.path()).extract_from(&mut source).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["GeoLite2-ASN.mmdb"]);
        assert!(!dir.path().join("COPYRIGHT.txt").exists());
        assert!(!dir.path().join("link.mmdb").exists());
    }

    #[test]
    fn custom_extensions() {
        let dir = tempdir().unwrap();
        let mut source = VecSource::new(vec![
            ("db/LICENSE.txt", EntryKind::File, b"license".to_vec()),
            ("db/GeoLite2-ASN.mmdb", EntryKind::File, b"mmdb".to_vec()),
        ]);

        let extractor = Extractor::new(dir.path())
            .with_options(ExtractOptions::default().extensions(["txt"]));
        let entries = extractor.extract_from(&mut source).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "LICENSE.txt");
    }

    #[test]
    fn reports_checksum_and_metadata() {
        let dir = tempdir().unwrap();
        let mut source = VecSource::new(vec![(
            "GeoLite2-City_20240102/GeoLite2-City-Locations-en.csv",
            EntryKind::File,
            b"geoname_id,locale_code\n".to_vec(),
        )]);

        let entries = Extractor::new(dir.path()).extract_from(&mut source).unwrap();
        let entry = &entries[0];
        assert_eq!(entry.name, "GeoLite2-City-Locations-en.csv");
        assert_eq!(entry.size, 23);
        assert_eq!(entry.checksum, checksum_bytes(b"geoname_id,locale_code\n"));
        assert_eq!(entry.action, EntryAction::Extracted);
        assert_eq!(entry.modified, UNIX_EPOCH + Duration::from_secs(1_700_000_000));

        let written = dir.path().join("GeoLite2-City-Locations-en.csv");
        assert_eq!(std::fs::read(&written).unwrap(), b"geoname_id,locale_code\n");
        assert_eq!(std::fs::metadata(&written).unwrap().modified().unwrap(), entry.modified);
    }

    #[test]
    fn mtime_is_left_alone_when_disabled() {
        let dir = tempdir().unwrap();
        let mut source = VecSource::new(vec![("a.csv", EntryKind::File, b"x".to_vec())]);

        let extractor = Extractor::new(dir.path())
            .with_options(ExtractOptions::default().preserve_mtime(false));
        let entries = extractor.extract_from(&mut source).unwrap();

        let on_disk = std::fs::metadata(dir.path().join("a.csv")).unwrap().modified().unwrap();
        assert_ne!(on_disk, entries[0].modified);
    }

    fn refuse_times(path: &Path, _: SystemTime) -> geodb_fs::Result<()> {
        Err(geodb_fs::Error::SetTimes {
            path: path.to_path_buf(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        })
    }

    #[test]
    fn mtime_failure_does_not_fail_extraction() {
        let dir = tempdir().unwrap();
        let mut source = VecSource::new(vec![
            ("db/GeoLite2-ASN-Blocks-IPv4.csv", EntryKind::File, b"network,asn\n".to_vec()),
            ("db/GeoLite2-ASN.mmdb", EntryKind::File, b"mmdb".to_vec()),
        ]);
        let extractor = Extractor {
            set_times: refuse_times,
            ..Extractor::new(dir.path())
        };

        let entries = extractor.extract_from(&mut source).unwrap();

        assert_eq!(entries.len(), 2);
        for entry in &entries {
            assert_eq!(entry.action, EntryAction::Extracted);
            assert_eq!(entry.modified, UNIX_EPOCH + Duration::from_secs(1_700_000_000));
        }
        assert_eq!(std::fs::read(dir.path().join("GeoLite2-ASN.mmdb")).unwrap(), b"mmdb");
    }

    #[test]
    fn error_aborts_walk_without_rollback() {
        let dir = tempdir().unwrap();
        let mut source = FailingSource { yielded: false };

        let err = Extractor::new(dir.path()).extract_from(&mut source).unwrap_err();
        assert!(matches!(err, Error::Corrupted(_)));
        assert_eq!(std::fs::read(dir.path().join("first.csv")).unwrap(), b"a,b");
    }

    #[test]
    fn missing_download_dir_is_an_extract_error() {
        let dir = tempdir().unwrap();
        let mut source = VecSource::new(vec![("a.csv", EntryKind::File, b"x".to_vec())]);

        let err = Extractor::new(dir.path().join("absent"))
            .extract_from(&mut source)
            .unwrap_err();
        assert!(matches!(err, Error::Extract { op: "create", .. }));
    }
}
