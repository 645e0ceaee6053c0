use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use geodb_fetch::DEFAULT_BASE_URL;
use serde::Deserialize;

use crate::{Edition, Error, Result};

/// User agent sent when none is configured.
pub fn default_user_agent() -> String { format!("geodb/{}", env!("CARGO_PKG_VERSION")) }

/// Everything a [`Client`](crate::Client) needs to talk to the service.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub license_key: String,
    pub user_agent: Option<String>,
    pub work_dir: PathBuf,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(license_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            license_key: license_key.into(),
            user_agent: Some(default_user_agent()),
            work_dir: geodb_fs::default_work_dir(),
            timeout: None,
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `None` sends no `User-Agent` header.
    pub fn user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Settings read from a TOML file or assembled from command-line flags.
///
/// ```toml
/// edition-ids = ["GeoLite2-City", "GeoLite2-ASN-CSV"]
/// license-key = "..."
/// download-path = "/var/lib/geoip"
/// timeout-secs = 120
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub edition_ids: Vec<String>,
    pub license_key: Option<String>,
    pub download_path: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Values set in `over` win; everything else keeps `self`.
    pub fn overlay(self, over: Self) -> Self {
        Self {
            edition_ids: if over.edition_ids.is_empty() {
                self.edition_ids
            } else {
                over.edition_ids
            },
            license_key: over.license_key.or(self.license_key),
            download_path: over.download_path.or(self.download_path),
            work_dir: over.work_dir.or(self.work_dir),
            base_url: over.base_url.or(self.base_url),
            user_agent: over.user_agent.or(self.user_agent),
            timeout_secs: over.timeout_secs.or(self.timeout_secs),
        }
    }

    /// Parsed editions, in the order given. Empty lists are rejected.
    pub fn editions(&self) -> Result<Vec<Edition>> {
        let editions = self
            .edition_ids
            .iter()
            .flat_map(|ids| ids.split(','))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Edition>>>()?;
        if editions.is_empty() {
            return Err(Error::Config("no edition ids given".into()));
        }
        Ok(editions)
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(self.license_key.clone().unwrap_or_default())
            .timeout(self.timeout_secs.map(Duration::from_secs));
        if let Some(base_url) = &self.base_url {
            config = config.base_url(base_url.clone());
        }
        if let Some(user_agent) = &self.user_agent {
            config = config.user_agent(Some(user_agent.clone()));
        }
        if let Some(work_dir) = &self.work_dir {
            config = config.work_dir(work_dir.clone());
        }
        config
    }

    /// Download directory; empty means the directory of the executable.
    pub fn download_path(&self) -> PathBuf { self.download_path.clone().unwrap_or_default() }
}
