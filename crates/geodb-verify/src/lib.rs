//! Checksum primitives for downloaded GeoIP archives.
//!
//! The distribution service publishes an MD5 digest next to every archive, so
//! the same digest is used for the whole archive and for each extracted entry.
//!
//! # Example
//!
//! ```
//! use std::io::Read;
//! use geodb_verify::{checksum_bytes, checksum_reader};
//!
//! let (checksum, mut spool) = checksum_reader(&b"hello world"[..]).unwrap();
//! assert_eq!(checksum, checksum_bytes(b"hello world"));
//!
//! let mut replay = Vec::new();
//! spool.read_to_end(&mut replay).unwrap();
//! assert_eq!(replay, b"hello world");
//! ```

pub use self::checksum::{
    SPOOL_THRESHOLD, Spool, checksum_bytes, checksum_file, checksum_reader,
    checksum_reader_with_threshold, checksums_match,
};
pub use self::error::{Result, VerificationError};
pub use self::hasher::{DigestHasher, Hasher, Md5Hasher};
pub use self::reader::HashingReader;

mod checksum;
mod error;
mod hasher;
mod reader;
