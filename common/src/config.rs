//! # Configuration
//!
//! Operator settings loaded from an optional TOML file. Every field has a
//! default so an empty (or absent) file yields a working configuration.
//!
//! Secrets are absent from the file format: device and archive
//! passwords are supplied at runtime through [`Credentials`].

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use pnet::ipnetwork::Ipv4Network;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::network::cidr;
use crate::network::target::DEFAULT_MAX_TARGETS;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file: {path}: {error}")]
    CouldNotRead { path: String, error: std::io::Error },
    #[error("Invalid TOML in config file: {path}: {error}")]
    InvalidToml {
        path: String,
        error: toml::de::Error,
    },
}

/// Login material for a device or an archive host.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub issue: IssueConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ScanConfig {
    /// Hosts scanned at the same time. `1` visits them strictly one by one.
    #[serde(default = "Defaults::concurrency")]
    pub concurrency: usize,
    /// Applied separately to session setup and to each command.
    #[serde(default = "Defaults::host_timeout", with = "humantime_serde")]
    pub host_timeout: Duration,
    /// Interfaces addressed inside this network are management interfaces.
    #[serde(
        default = "Defaults::management_prefix",
        deserialize_with = "deserialize_network"
    )]
    pub management_prefix: Ipv4Network,
    #[serde(default)]
    pub sort_interfaces: bool,
    #[serde(default = "Defaults::max_targets")]
    pub max_targets: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProbeConfig {
    #[serde(default = "Defaults::probe_count")]
    pub count: u16,
    #[serde(default = "Defaults::probe_interval", with = "humantime_serde")]
    pub interval: Duration,
    #[serde(default = "Defaults::probe_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ReportConfig {
    #[serde(default = "Defaults::report_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveKind {
    #[default]
    Directory,
    Scp,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ArchiveConfig {
    #[serde(default)]
    pub kind: ArchiveKind,
    /// Local directory for `directory`, remote directory for `scp`.
    #[serde(default = "Defaults::archive_directory")]
    pub directory: PathBuf,
    #[serde(default)]
    pub host: Option<IpAddr>,
    #[serde(default = "Defaults::archive_port")]
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct IssueConfig {
    /// Place the management interface into the management VRF.
    #[serde(default)]
    pub vrf_forwarding: bool,
    #[serde(default = "Defaults::admin_username")]
    pub admin_username: String,
}

pub struct Defaults;

impl Defaults {
    pub fn concurrency() -> usize {
        4
    }
    pub fn host_timeout() -> Duration {
        Duration::from_secs(15)
    }
    pub fn management_prefix() -> Ipv4Network {
        Ipv4Network::new(Ipv4Addr::new(10, 49, 0, 0), 16)
            .expect("BUG: default management prefix is invalid")
    }
    pub fn max_targets() -> u64 {
        DEFAULT_MAX_TARGETS
    }
    pub fn probe_count() -> u16 {
        2
    }
    pub fn probe_interval() -> Duration {
        Duration::from_millis(200)
    }
    pub fn probe_timeout() -> Duration {
        Duration::from_secs(1)
    }
    pub fn report_path() -> PathBuf {
        "output.csv".into()
    }
    pub fn archive_directory() -> PathBuf {
        "backups".into()
    }
    pub fn archive_port() -> u16 {
        22
    }
    pub fn admin_username() -> String {
        "admin".into()
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: Defaults::concurrency(),
            host_timeout: Defaults::host_timeout(),
            management_prefix: Defaults::management_prefix(),
            sort_interfaces: false,
            max_targets: Defaults::max_targets(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            count: Defaults::probe_count(),
            interval: Defaults::probe_interval(),
            timeout: Defaults::probe_timeout(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: Defaults::report_path(),
        }
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            kind: ArchiveKind::default(),
            directory: Defaults::archive_directory(),
            host: None,
            port: Defaults::archive_port(),
            username: None,
        }
    }
}

impl Default for IssueConfig {
    fn default() -> Self {
        Self {
            vrf_forwarding: false,
            admin_username: Defaults::admin_username(),
        }
    }
}

fn deserialize_network<'de, D>(deserializer: D) -> Result<Ipv4Network, D::Error>
where
    D: Deserializer<'de>,
{
    let net_str: String = Deserialize::deserialize(deserializer)?;
    cidr::parse_network(&net_str).map_err(serde::de::Error::custom)
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let cfg = std::fs::read_to_string(path).map_err(|error| ConfigError::CouldNotRead {
            path: path.to_string_lossy().to_string(),
            error,
        })?;
        let parsed = Self::from_toml(&cfg).map_err(|error| ConfigError::InvalidToml {
            path: path.to_string_lossy().to_string(),
            error,
        })?;
        debug!("loaded settings from {}", path.display());
        Ok(parsed)
    }

    pub fn from_toml(cfg: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<Self>(cfg)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
