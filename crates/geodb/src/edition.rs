use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use geodb_archive::ArchiveFormat;
use geodb_fetch::EditionRef;

use crate::Error;

/// A dataset variant published by the distribution service.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Edition {
    id: Cow<'static, str>,
    format: ArchiveFormat,
}

impl Edition {
    pub const GEOLITE2_ASN: Self = Self::known("GeoLite2-ASN", ArchiveFormat::TarGz);
    pub const GEOLITE2_ASN_CSV: Self = Self::known("GeoLite2-ASN-CSV", ArchiveFormat::Zip);
    pub const GEOLITE2_CITY: Self = Self::known("GeoLite2-City", ArchiveFormat::TarGz);
    pub const GEOLITE2_CITY_CSV: Self = Self::known("GeoLite2-City-CSV", ArchiveFormat::Zip);
    pub const GEOLITE2_COUNTRY: Self = Self::known("GeoLite2-Country", ArchiveFormat::TarGz);
    pub const GEOLITE2_COUNTRY_CSV: Self = Self::known("GeoLite2-Country-CSV", ArchiveFormat::Zip);

    pub const KNOWN: [Self; 6] = [
        Self::GEOLITE2_ASN,
        Self::GEOLITE2_ASN_CSV,
        Self::GEOLITE2_CITY,
        Self::GEOLITE2_CITY_CSV,
        Self::GEOLITE2_COUNTRY,
        Self::GEOLITE2_COUNTRY_CSV,
    ];

    const fn known(id: &'static str, format: ArchiveFormat) -> Self {
        Self {
            id: Cow::Borrowed(id),
            format,
        }
    }

    /// An edition the service offers but this crate does not list.
    pub fn custom(id: impl Into<String>, format: ArchiveFormat) -> Self {
        Self {
            id: Cow::Owned(id.into()),
            format,
        }
    }

    /// Identifier sent as `edition_id`.
    pub fn id(&self) -> &str { &self.id }

    pub fn format(&self) -> ArchiveFormat { self.format }

    /// Archive suffix sent as `suffix`, e.g. `tar.gz`.
    pub fn suffix(&self) -> &'static str { self.format.suffix() }

    /// Local file name of the archive: `{id}.{suffix}`.
    pub fn filename(&self) -> String { format!("{}.{}", self.id, self.suffix()) }

    pub(crate) fn fetch_ref(&self) -> EditionRef<'_> {
        EditionRef {
            id: self.id(),
            suffix: self.suffix(),
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.id) }
}

impl FromStr for Edition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        Self::KNOWN
            .into_iter()
            .find(|e| e.id() == id)
            .ok_or_else(|| Error::UnknownEdition(id.to_string()))
    }
}
