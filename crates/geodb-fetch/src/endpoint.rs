use url::Url;

use crate::error::{FetchError, Result};

/// Default location of the GeoIP distribution service.
pub const DEFAULT_BASE_URL: &str = "https://download.maxmind.com";

/// Extension appended to an archive suffix to request its checksum instead.
pub const CHECKSUM_SUFFIX: &str = "md5";

const DOWNLOAD_PATH: &str = "app/geoip_download";

/// Where and as whom to download: base URL, license key and user agent.
#[derive(Clone, Debug)]
pub struct Endpoint {
    base_url: String,
    license_key: String,
    user_agent: Option<String>,
}

impl Endpoint {
    pub fn new(base_url: impl Into<String>, license_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            license_key: license_key.into(),
            user_agent: None,
        }
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        let user_agent = user_agent.into();
        self.user_agent = (!user_agent.is_empty()).then_some(user_agent);
        self
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    /// `{base_url}/app/geoip_download?license_key=…&edition_id=…&suffix=…`
    pub fn download_url(&self, edition_id: &str, suffix: &str) -> Result<Url> {
        let raw = format!("{}/{DOWNLOAD_PATH}", self.base_url.trim_end_matches('/'));
        Url::parse_with_params(
            &raw,
            &[
                ("license_key", self.license_key.as_str()),
                ("edition_id", edition_id),
                ("suffix", suffix),
            ],
        )
        .map_err(|source| FetchError::InvalidUrl { url: raw, source })
    }

    /// URL of the published checksum for an archive suffix.
    pub fn checksum_url(&self, edition_id: &str, archive_suffix: &str) -> Result<Url> {
        self.download_url(edition_id, &format!("{archive_suffix}.{CHECKSUM_SUFFIX}"))
    }

    pub fn headers(&self) -> Vec<(String, String)> {
        self.user_agent
            .iter()
            .map(|ua| ("User-Agent".to_string(), ua.clone()))
            .collect()
    }
}

/// Copy of `url` safe to log or put in an error: the license key is masked.
pub fn redact(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "license_key" { "***".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
