use std::env;
use std::io;
use std::path::{Path, PathBuf};

use geodb_archive::{ExtractOptions, ExtractedEntry, Extractor};
use geodb_fetch::{FetchOutcome, HttpClient};
use geodb_fs::prepare_writable_dir;
use tracing::{debug, info, info_span};

use crate::{Client, Edition, Error, Result};

/// Keeps the databases of one edition current in a download directory.
pub struct Downloader<'c, C: HttpClient> {
    client: &'c Client<C>,
    edition: Edition,
    download_dir: PathBuf,
    options: ExtractOptions,
}

impl<'c, C: HttpClient> Downloader<'c, C> {
    /// An empty `download_dir` means the directory of the running executable.
    /// The directory is created and probed for writability here, once.
    pub fn new(
        client: &'c Client<C>,
        edition: Edition,
        download_dir: impl AsRef<Path>,
    ) -> Result<Self> {
        let requested = download_dir.as_ref();
        let dir = if requested.as_os_str().is_empty() {
            executable_dir()?
        } else {
            requested.to_path_buf()
        };
        let download_dir = prepare_writable_dir(&dir).map_err(|source| Error::Setup {
            role: "download",
            path: dir,
            source,
        })?;

        Ok(Self {
            client,
            edition,
            download_dir,
            options: ExtractOptions::default(),
        })
    }

    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    pub fn edition(&self) -> &Edition { &self.edition }

    pub fn download_dir(&self) -> &Path { &self.download_dir }

    /// Fetch the published checksum, bring the archive up to date, then
    /// extract its databases. Each step runs only if the previous succeeded.
    ///
    /// Returns every payload entry in archive order, including those whose
    /// destination was already current.
    pub fn download(&self) -> Result<Vec<ExtractedEntry>> {
        let span = info_span!("download", edition_id = self.edition.id());
        let _guard = span.enter();

        let edition = self.edition.fetch_ref();
        let fetch = self.client.fetcher();

        let expected = fetch.expected_checksum(edition)?;
        let archive = self.client.archive_path(&self.edition);
        let marker = self.client.marker_path(&self.edition);

        match fetch.fetch_archive(edition, &expected, &archive, &marker)? {
            FetchOutcome::AlreadyValid => debug!(db_hash = %expected, "Archive unchanged"),
            FetchOutcome::Downloaded { bytes } => {
                info!(db_hash = %expected, bytes, "Archive downloaded")
            }
        }

        let entries = Extractor::new(&self.download_dir)
            .with_options(self.options.clone())
            .extract(&archive)?;

        let rewritten = entries.iter().filter(|e| e.was_rewritten()).count();
        info!(
            extracted = rewritten,
            up_to_date = entries.len() - rewritten,
            dir = %self.download_dir.display(),
            "Edition up to date"
        );
        Ok(entries)
    }

    pub fn cached_checksum(&self) -> Result<Option<String>> {
        self.client.cached_checksum(&self.edition)
    }
}

fn executable_dir() -> Result<PathBuf> {
    let exe = env::current_exe().map_err(Error::ExecutableDir)?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        Error::ExecutableDir(io::Error::new(
            io::ErrorKind::NotFound,
            format!("'{}' has no parent directory", exe.display()),
        ))
    })
}
