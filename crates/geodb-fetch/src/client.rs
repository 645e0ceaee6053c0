use std::fs::File;
use std::io::{self, BufWriter, Read};
use std::path::Path;

use geodb_fs::AtomicWriteOptions;
use geodb_verify::{checksum_file, checksums_match};
use tracing::{debug, info};
use url::Url;

use crate::endpoint::{Endpoint, redact};
use crate::error::{FetchError, Result};
use crate::http::{HttpClient, HttpResponse};

/// Maximum number of bytes of an error body kept for diagnostics.
const ERROR_BODY_LIMIT: u64 = 4096;

/// What [`DownloadClient::fetch_archive`] had to do to make the archive valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The archive on disk already matched the expected checksum.
    AlreadyValid,
    /// The archive was downloaded and verified.
    Downloaded { bytes: u64 },
}

/// Identifies one downloadable bundle: the edition id and its archive suffix.
#[derive(Clone, Copy, Debug)]
pub struct EditionRef<'a> {
    pub id: &'a str,
    pub suffix: &'a str,
}

/// Talks to the distribution service on behalf of one license key.
pub struct DownloadClient<C: HttpClient> {
    http: C,
    endpoint: Endpoint,
}

impl<C: HttpClient> DownloadClient<C> {
    pub fn new(http: C, endpoint: Endpoint) -> Self { Self { http, endpoint } }

    pub fn endpoint(&self) -> &Endpoint { &self.endpoint }

    /// Checksum the service publishes for the current archive of `edition`.
    pub fn expected_checksum(&self, edition: EditionRef<'_>) -> Result<String> {
        let url = self.endpoint.checksum_url(edition.id, edition.suffix)?;
        let mut response = self.get_ok(&url)?;

        let mut body = String::new();
        response
            .body
            .read_to_string(&mut body)
            .map_err(|source| FetchError::Transport {
                url: redact(&url),
                source: Box::new(source),
            })?;

        let checksum = body.trim().to_string();
        debug!(edition_id = edition.id, hash = %checksum, "Retrieved expected archive checksum");
        Ok(checksum)
    }

    /// Make sure `archive` holds the bundle whose checksum is `expected`.
    ///
    /// Skips the transfer when the archive on disk already matches. After any
    /// success the checksum is written to `marker`; on a mismatch the marker is
    /// left untouched.
    pub fn fetch_archive(
        &self,
        edition: EditionRef<'_>,
        expected: &str,
        archive: &Path,
        marker: &Path,
    ) -> Result<FetchOutcome> {
        let outcome = if archive.exists() && checksums_match(expected, &checksum_file(archive)?) {
            debug!(
                edition_id = edition.id,
                hash = expected,
                "Archive already downloaded and valid. Skipping download"
            );
            FetchOutcome::AlreadyValid
        } else {
            let bytes = self.download_archive(edition, archive)?;
            let actual = checksum_file(archive)?;
            if !checksums_match(expected, &actual) {
                return Err(FetchError::ChecksumMismatch {
                    expected: expected.to_string(),
                    actual,
                });
            }
            FetchOutcome::Downloaded { bytes }
        };

        write_marker(marker, expected)?;
        Ok(outcome)
    }

    fn download_archive(&self, edition: EditionRef<'_>, archive: &Path) -> Result<u64> {
        info!(
            edition_id = edition.id,
            "Downloading {} archive...",
            archive.file_name().unwrap_or_default().to_string_lossy()
        );

        let url = self.endpoint.download_url(edition.id, edition.suffix)?;
        let mut response = self.get_ok(&url)?;

        let io_err = |op: &'static str| {
            move |source: io::Error| FetchError::Io {
                op,
                path: archive.to_path_buf(),
                source,
            }
        };

        let file = File::create(archive).map_err(io_err("create archive file"))?;
        let mut writer = BufWriter::new(file);
        let bytes = io::copy(&mut response.body, &mut writer).map_err(io_err("download archive"))?;
        writer
            .into_inner()
            .map_err(|e| e.into_error())
            .and_then(|file| file.sync_all())
            .map_err(io_err("flush archive file"))?;

        debug!(edition_id = edition.id, bytes, "Archive written");
        Ok(bytes)
    }

    fn get_ok(&self, url: &Url) -> Result<HttpResponse> {
        let response = self
            .http
            .get(url, &self.endpoint.headers())
            .map_err(|source| FetchError::Transport {
                url: redact(url),
                source: Box::new(source),
            })?;

        if response.is_ok() {
            return Ok(response);
        }

        let status = response.status;
        let mut raw = Vec::new();
        let body = match response.body.take(ERROR_BODY_LIMIT).read_to_end(&mut raw) {
            Ok(_) => String::from_utf8_lossy(&raw).trim().to_string(),
            Err(e) => format!("<response body unreadable: {e}>"),
        };
        Err(FetchError::Status { status, body })
    }
}

/// Last checksum recorded in `marker`, `None` when no marker exists yet.
pub fn cached_checksum(marker: &Path) -> Result<Option<String>> {
    Ok(geodb_fs::read_optional_string(marker)?.map(|s| s.trim().to_string()))
}

fn write_marker(marker: &Path, checksum: &str) -> Result<()> {
    geodb_fs::atomic_write(marker, checksum.as_bytes(), AtomicWriteOptions::new())?;
    Ok(())
}
