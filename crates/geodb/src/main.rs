use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use geodb::{Client, Downloader, Edition, FileConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Download and update MaxMind GeoIP databases.
#[derive(Parser, Debug)]
#[command(name = "geodb", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Comma separated edition ids, e.g. GeoLite2-City,GeoLite2-ASN-CSV
    #[arg(long, env = "GEODB_EDITION_IDS", value_delimiter = ',', global = true)]
    edition_ids: Vec<String>,

    #[arg(long, env = "GEODB_LICENSE_KEY", hide_env_values = true, global = true)]
    license_key: Option<String>,

    /// Directory receiving the extracted databases [default: executable directory]
    #[arg(long, env = "GEODB_DOWNLOAD_PATH", global = true)]
    download_path: Option<PathBuf>,

    /// Directory holding archives and checksum markers
    #[arg(long, global = true)]
    work_dir: Option<PathBuf>,

    #[arg(long, global = true)]
    base_url: Option<String>,

    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// TOML file with the same keys as the long flags
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `geodb=trace` [default: RUST_LOG or info]
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, Default)]
enum Command {
    /// Bring the databases up to date (default)
    #[default]
    Download,
    /// Print the last verified archive checksum of each edition
    Status,
}

impl Cli {
    fn settings(&self) -> anyhow::Result<FileConfig> {
        let file = match &self.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(file.overlay(FileConfig {
            edition_ids: self.edition_ids.clone(),
            license_key: self.license_key.clone(),
            download_path: self.download_path.clone(),
            work_dir: self.work_dir.clone(),
            base_url: self.base_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout_secs: None,
        }))
    }
}

fn init_tracing(level: Option<&str>, json: bool) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref(), cli.log_json);

    let settings = cli.settings()?;
    let editions = settings.editions()?;
    let config = settings.client_config();

    match cli.command.unwrap_or_default() {
        Command::Download => {
            if config.license_key.is_empty() {
                bail!("a license key is required (--license-key or GEODB_LICENSE_KEY)");
            }
            let client = Client::new(config).context("cannot initialize client")?;
            download_all(&client, &editions, &settings.download_path())
        }
        Command::Status => {
            let client = Client::new(config).context("cannot initialize client")?;
            for edition in &editions {
                let checksum = client.cached_checksum(edition)?;
                println!("{edition}\t{}", checksum.as_deref().unwrap_or("not downloaded"));
            }
            Ok(())
        }
    }
}

fn download_all(client: &Client, editions: &[Edition], download_path: &Path) -> anyhow::Result<()> {
    let mut failed = Vec::new();
    for edition in editions {
        let result =
            Downloader::new(client, edition.clone(), download_path).and_then(|d| d.download());
        match result {
            Ok(entries) => {
                for entry in &entries {
                    info!(
                        edition_id = edition.id(),
                        db_name = %entry.name,
                        action = ?entry.action,
                        "Database ready"
                    );
                }
            }
            Err(e) => {
                error!(edition_id = edition.id(), kind = ?e.kind(), "{e}");
                failed.push(edition.id().to_string());
            }
        }
    }

    if !failed.is_empty() {
        bail!("{} of {} editions failed: {}", failed.len(), editions.len(), failed.join(", "));
    }
    Ok(())
}
