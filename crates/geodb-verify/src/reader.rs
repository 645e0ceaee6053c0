use std::io::{self, Read};

use crate::{Hasher, Result, VerificationError};

/// Streaming reader that hashes data as it passes through.
pub struct HashingReader<R, H> {
    reader: R,
    hasher: H,
    bytes_read: u64,
}

impl<R, H> HashingReader<R, H> {
    pub fn new(reader: R, hasher: H) -> Self {
        Self {
            reader,
            hasher,
            bytes_read: 0,
        }
    }

    pub fn bytes_read(&self) -> u64 { self.bytes_read }
}

impl<R: Read, H: Hasher> Read for HashingReader<R, H> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n > 0 {
            self.hasher.update(&buf[..n]);
            self.bytes_read += n as u64;
        }
        Ok(n)
    }
}

impl<R, H: Hasher> HashingReader<R, H> {
    /// Digest of everything read so far, lowercase hex.
    pub fn finalize_hex(self) -> String { hex::encode(self.hasher.finalize()) }

    /// Compare the digest of everything read so far against `expected` (hex).
    pub fn finish(self, expected: &str) -> Result<String> {
        let actual = self.finalize_hex();
        if crate::checksums_match(expected, &actual) {
            Ok(actual)
        } else {
            Err(VerificationError::Mismatch {
                expected: expected.to_string(),
                actual,
            })
        }
    }
}
