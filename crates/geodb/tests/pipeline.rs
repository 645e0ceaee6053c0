use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use flate2::Compression;
use flate2::write::GzEncoder;
use geodb::mock::MockHttpClient;
use geodb::{Client, ClientConfig, Downloader, Edition, EntryAction, ErrorKind};
use geodb_verify::{checksum_bytes, checksum_file};
use tempfile::TempDir;

const MMDB: &[u8] = b"\xab\xcd\xefMaxMind.com city database";
const CSV: &[u8] = b"network,geoname_id\n1.0.0.0/24,2077456\n";

struct Fixture {
    mock: Arc<MockHttpClient>,
    client: Client<Arc<MockHttpClient>>,
    download: TempDir,
    _work: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let work = tempfile::tempdir().unwrap();
        let download = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockHttpClient::new());
        let config = ClientConfig::new("test-key")
            .base_url("https://download.example.com")
            .work_dir(work.path());
        let client = Client::with_http(Arc::clone(&mock), config).unwrap();
        Self {
            mock,
            client,
            download,
            _work: work,
        }
    }

    fn downloader(&self) -> Downloader<'_, Arc<MockHttpClient>> {
        Downloader::new(&self.client, Edition::GEOLITE2_CITY, self.download.path()).unwrap()
    }

    /// Publish `archive` together with its real MD5.
    fn publish(&self, archive: &[u8]) -> String {
        let checksum = checksum_bytes(archive);
        self.mock.respond("tar.gz.md5", 200, format!("{checksum}\n"));
        self.mock.respond("tar.gz", 200, archive.to_vec());
        checksum
    }
}

fn city_archive(mmdb: &[u8]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    let entries: [(&str, &[u8]); 3] = [
        ("GeoLite2-City_20240102/GeoLite2-City.mmdb", mmdb),
        (
            "GeoLite2-City_20240102/COPYRIGHT.txt",
            b"Database and Contents Copyright (c) MaxMind, Inc.",
        ),
        ("GeoLite2-City_20240102/blocks.csv", CSV),
    ];
    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_mode(0o644);
        header.set_mtime(1_704_164_646);
        header.set_size(data.len() as u64);
        builder.append_data(&mut header, name, data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

fn read(path: &Path) -> Vec<u8> { fs::read(path).unwrap() }

#[test]
fn first_run_downloads_and_extracts_payload() {
    let fx = Fixture::new();
    let checksum = fx.publish(&city_archive(MMDB));

    let entries = fx.downloader().download().unwrap();

    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["GeoLite2-City.mmdb", "blocks.csv"]);
    assert!(entries.iter().all(|e| e.action == EntryAction::Extracted));
    assert_eq!(read(&fx.download.path().join("GeoLite2-City.mmdb")), MMDB);
    assert!(!fx.download.path().join("COPYRIGHT.txt").exists());

    let marker = fx.client.marker_path(&Edition::GEOLITE2_CITY);
    assert_eq!(fs::read_to_string(marker).unwrap(), checksum);
    assert_eq!(checksum_file(fx.client.archive_path(&Edition::GEOLITE2_CITY)).unwrap(), checksum);

    let requests = fx.mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].query("suffix").as_deref(), Some("tar.gz.md5"));
    assert_eq!(requests[1].query("suffix").as_deref(), Some("tar.gz"));
    assert_eq!(requests[1].query("edition_id").as_deref(), Some("GeoLite2-City"));
}

#[test]
fn second_run_is_idempotent() {
    let fx = Fixture::new();
    fx.publish(&city_archive(MMDB));
    let first = fx.downloader().download().unwrap();
    fx.mock.clear_requests();

    let second = fx.downloader().download().unwrap();

    assert_eq!(fx.mock.count("tar.gz.md5"), 1);
    assert_eq!(fx.mock.count("tar.gz"), 0);
    assert!(second.iter().all(|e| e.action == EntryAction::UpToDate));
    let summary = |entries: &[geodb::ExtractedEntry]| {
        entries
            .iter()
            .map(|e| (e.name.clone(), e.size, e.checksum.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(summary(&first), summary(&second));
}

#[test]
fn valid_archive_on_disk_skips_transfer() {
    let fx = Fixture::new();
    let archive = city_archive(MMDB);
    fs::write(fx.client.archive_path(&Edition::GEOLITE2_CITY), &archive).unwrap();
    let checksum = checksum_bytes(&archive);
    fx.mock.respond("tar.gz.md5", 200, checksum.clone());

    let entries = fx.downloader().download().unwrap();

    assert_eq!(fx.mock.count("tar.gz"), 0);
    assert_eq!(entries.len(), 2);
    assert_eq!(fx.downloader().cached_checksum().unwrap(), Some(checksum));
}

#[test]
fn new_release_replaces_databases() {
    let fx = Fixture::new();
    fx.publish(&city_archive(MMDB));
    fx.downloader().download().unwrap();

    let updated = b"\xab\xcd\xefMaxMind.com city database, next week";
    let checksum = fx.publish(&city_archive(updated));
    let entries = fx.downloader().download().unwrap();

    assert_eq!(entries[0].action, EntryAction::Extracted);
    assert_eq!(entries[0].checksum, checksum_bytes(updated));
    assert_eq!(entries[1].action, EntryAction::UpToDate);
    assert_eq!(read(&fx.download.path().join("GeoLite2-City.mmdb")), updated);
    assert_eq!(fx.downloader().cached_checksum().unwrap(), Some(checksum));
}

#[test]
fn corrupted_download_is_rejected() {
    let fx = Fixture::new();
    let good = city_archive(MMDB);
    let expected = checksum_bytes(&good);
    let mut corrupted = good.clone();
    let last = corrupted.len() - 1;
    corrupted[last] ^= 0xff;
    fx.mock.respond("tar.gz.md5", 200, expected.clone());
    fx.mock.respond("tar.gz", 200, corrupted.clone());

    let err = fx.downloader().download().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Integrity);
    let message = err.to_string();
    assert!(message.contains(&expected));
    assert!(message.contains(&checksum_bytes(&corrupted)));
    assert!(!fx.client.marker_path(&Edition::GEOLITE2_CITY).exists());
    assert!(!fx.download.path().join("GeoLite2-City.mmdb").exists());
}

#[test]
fn integrity_failure_keeps_previous_marker() {
    let fx = Fixture::new();
    let previous = fx.publish(&city_archive(MMDB));
    fx.downloader().download().unwrap();

    fx.mock.respond("tar.gz.md5", 200, "abc123");
    let err = fx.downloader().download().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Integrity);
    assert!(err.to_string().contains("abc123"));
    assert_eq!(fx.downloader().cached_checksum().unwrap(), Some(previous));
    assert_eq!(read(&fx.download.path().join("GeoLite2-City.mmdb")), MMDB);
}

#[test]
fn checksum_status_error_stops_pipeline() {
    let fx = Fixture::new();
    fx.mock.respond("tar.gz.md5", 401, "Invalid license key");

    let err = fx.downloader().download().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().contains("401"));
    assert_eq!(fx.mock.count("tar.gz"), 0);
}

#[test]
fn transport_failure_does_not_leak_license_key() {
    let fx = Fixture::new();
    fx.mock.fail("tar.gz.md5", "connection reset");

    let err = fx.downloader().download().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(!err.to_string().contains("test-key"));
}

#[test]
fn missing_archive_is_transport_error() {
    let fx = Fixture::new();
    fx.mock.respond("tar.gz.md5", 200, checksum_bytes(b"anything"));

    let err = fx.downloader().download().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(!fx.client.marker_path(&Edition::GEOLITE2_CITY).exists());
}

#[test]
fn download_dir_that_is_a_file_fails_setup() {
    let fx = Fixture::new();
    let file = fx.download.path().join("occupied");
    File::create(&file).unwrap();

    let err = Downloader::new(&fx.client, Edition::GEOLITE2_CITY, &file).err().unwrap();

    assert_eq!(err.kind(), ErrorKind::Setup);
    assert!(fx.mock.requests().is_empty());
}
