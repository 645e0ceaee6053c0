use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use tempfile::SpooledTempFile;

use crate::{HashingReader, Md5Hasher, Result, VerificationError};

/// Entries up to this size are spooled in memory; larger ones spill to a temp file.
pub const SPOOL_THRESHOLD: usize = 32 * 1024 * 1024;

/// MD5 of a whole file as lowercase hex.
pub fn checksum_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let read_err = |source| VerificationError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_err)?;
    let mut reader = HashingReader::new(BufReader::new(file), Md5Hasher::new());
    io::copy(&mut reader, &mut io::sink()).map_err(read_err)?;
    Ok(reader.finalize_hex())
}

/// MD5 of an in-memory buffer as lowercase hex.
pub fn checksum_bytes(data: &[u8]) -> String { hex::encode(Md5Hasher::digest(data)) }

/// Consume `reader`, returning its checksum and a [`Spool`] that replays the consumed bytes.
pub fn checksum_reader<R: Read>(reader: R) -> Result<(String, Spool)> {
    checksum_reader_with_threshold(reader, SPOOL_THRESHOLD)
}

pub fn checksum_reader_with_threshold<R: Read>(
    reader: R,
    threshold: usize,
) -> Result<(String, Spool)> {
    let mut spool = Spool::with_threshold(threshold);
    let mut reader = HashingReader::new(reader, Md5Hasher::new());
    let len = io::copy(&mut reader, &mut spool.inner)?;
    spool.inner.seek(SeekFrom::Start(0))?;
    spool.len = len;
    Ok((reader.finalize_hex(), spool))
}

/// Case-insensitive comparison of two hex digests, ignoring surrounding whitespace.
pub fn checksums_match(a: &str, b: &str) -> bool { a.trim().eq_ignore_ascii_case(b.trim()) }

/// Replayable buffer of bytes already consumed from a stream.
pub struct Spool {
    inner: SpooledTempFile,
    len: u64,
}

impl Spool {
    fn with_threshold(threshold: usize) -> Self {
        Self {
            inner: SpooledTempFile::new(threshold),
            len: 0,
        }
    }

    pub fn len(&self) -> u64 { self.len }

    pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Whether the bytes were spilled to a temporary file.
    pub fn is_spilled(&self) -> bool { self.inner.is_rolled() }
}

impl Read for Spool {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> { self.inner.read(buf) }
}
