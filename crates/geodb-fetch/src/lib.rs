//! Checksum-gated download of GeoIP archives.
//!
//! # Architecture
//!
//! - [`Endpoint`] - Base URL, license key and user agent, URL construction
//! - [`HttpClient`] - Blocking transport abstraction ([`ReqwestClient`] in production)
//! - [`DownloadClient`] - Expected checksum lookup and conditional archive fetch
//!
//! # Key Features
//!
//! - **Skip on match**: an archive on disk with the expected checksum is never re-downloaded
//! - **Integrity gate**: a freshly written archive is re-hashed and rejected on mismatch
//! - **Mechanism-only**: no retries; retry policy belongs to the caller

mod client;
mod endpoint;
mod error;
mod http;
pub mod mock;

pub use client::{DownloadClient, EditionRef, FetchOutcome, cached_checksum};
pub use endpoint::{CHECKSUM_SUFFIX, DEFAULT_BASE_URL, Endpoint, redact};
pub use error::{BoxError, FetchError, Result};
pub use http::{HttpClient, HttpResponse};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
