//! Keeps local GeoIP databases in sync with the MaxMind distribution service.
//!
//! A [`Downloader`] runs one edition through three gated steps:
//!
//! 1. ask the service for the MD5 of the current archive,
//! 2. download the archive unless the copy in the work directory already
//!    matches, verify it, and record the checksum in a hidden marker,
//! 3. extract the `.csv` and `.mmdb` files, leaving destination files that
//!    already match untouched.
//!
//! ```no_run
//! use geodb::{Client, ClientConfig, Downloader, Edition};
//!
//! let client = Client::new(ClientConfig::new("license-key"))?;
//! let entries = Downloader::new(&client, Edition::GEOLITE2_CITY, "/var/lib/geoip")?.download()?;
//! for entry in entries {
//!     println!("{} {}", entry.name, entry.checksum);
//! }
//! # Ok::<(), geodb::Error>(())
//! ```

mod client;
mod config;
mod downloader;
mod edition;
mod error;

pub use client::Client;
pub use config::{ClientConfig, FileConfig, default_user_agent};
pub use downloader::Downloader;
pub use edition::Edition;
pub use error::{Error, ErrorKind, Result};
pub use geodb_archive::{ArchiveFormat, EntryAction, ExtractOptions, ExtractedEntry};
pub use geodb_fetch::{HttpClient, ReqwestClient, mock};
