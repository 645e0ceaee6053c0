use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use crate::Error;

/// Archive formats published by the distribution service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    TarGz,
    Zip,
}

impl ArchiveFormat {
    /// Suffix used in file names and in the `suffix` query parameter.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
        }
    }

    /// Format implied by a file name ending, if any.
    pub fn from_file_name(name: &str) -> Option<Self> {
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if name.ends_with(".zip") {
            Some(Self::Zip)
        } else {
            None
        }
    }

    /// Format of the archive at `path`: by name first, then by magic bytes.
    pub fn of_path(path: &Path) -> crate::Result<Self> {
        let by_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(Self::from_file_name);
        if let Some(format) = by_name {
            return Ok(format);
        }

        let mut header = [0u8; 4];
        let n = File::open(path)
            .and_then(|mut f| read_prefix(&mut f, &mut header))
            .map_err(|source| Error::Open {
                path: path.to_path_buf(),
                source,
            })?;
        detect_format(&header[..n]).ok_or_else(|| Error::UnsupportedFormat(path.to_path_buf()))
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.suffix()) }
}

impl FromStr for ArchiveFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tar.gz" | "tgz" => Ok(Self::TarGz),
            "zip" => Ok(Self::Zip),
            other => Err(format!("unknown archive suffix '{other}'")),
        }
    }
}

pub fn detect_format(data: &[u8]) -> Option<ArchiveFormat> {
    match data {
        [0x50, 0x4B, 0x03, 0x04, ..] => Some(ArchiveFormat::Zip),
        [0x1F, 0x8B, ..] => Some(ArchiveFormat::TarGz),
        _ => None,
    }
}

fn read_prefix<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}
