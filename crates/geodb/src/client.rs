use std::path::{Path, PathBuf};

use geodb_fetch::{DownloadClient, Endpoint, HttpClient, ReqwestClient, cached_checksum};
use geodb_fs::{MARKER_EXTENSION, marker_path, prepare_writable_dir};
use tracing::debug;

use crate::{ClientConfig, Edition, Error, Result};

/// Connection to the distribution service plus the work directory holding
/// archives and their checksum markers.
pub struct Client<C: HttpClient = ReqwestClient> {
    fetch: DownloadClient<C>,
    work_dir: PathBuf,
}

impl Client<ReqwestClient> {
    /// Client over blocking `reqwest`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = ReqwestClient::with_timeout(config.timeout)
            .map_err(|e| Error::HttpClient(Box::new(e)))?;
        Self::with_http(http, config)
    }
}

impl<C: HttpClient> Client<C> {
    /// Client over any transport. The work directory is created and probed here.
    pub fn with_http(http: C, config: ClientConfig) -> Result<Self> {
        let work_dir = prepare_writable_dir(&config.work_dir).map_err(|source| Error::Setup {
            role: "work",
            path: config.work_dir.clone(),
            source,
        })?;
        debug!(work_dir = %work_dir.display(), "Work directory ready");

        let mut endpoint = Endpoint::new(config.base_url, config.license_key);
        if let Some(user_agent) = config.user_agent {
            endpoint = endpoint.user_agent(user_agent);
        }

        Ok(Self {
            fetch: DownloadClient::new(http, endpoint),
            work_dir,
        })
    }

    pub fn work_dir(&self) -> &Path { &self.work_dir }

    pub(crate) fn fetcher(&self) -> &DownloadClient<C> { &self.fetch }

    /// Where the archive of `edition` is kept between runs.
    pub fn archive_path(&self, edition: &Edition) -> PathBuf {
        self.work_dir.join(edition.filename())
    }

    /// Hidden sidecar holding the last verified checksum of the archive.
    pub fn marker_path(&self, edition: &Edition) -> PathBuf {
        marker_path(&self.work_dir, &edition.filename(), MARKER_EXTENSION)
    }

    /// Checksum recorded by the last successful fetch of `edition`.
    pub fn cached_checksum(&self, edition: &Edition) -> Result<Option<String>> {
        Ok(cached_checksum(&self.marker_path(edition))?)
    }
}
