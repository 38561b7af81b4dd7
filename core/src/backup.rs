//! # Configuration Backup
//!
//! Probe, pull `show running-config`, name the file after the device and hand
//! it to the archive. Runs over an address range with the same per-host
//! isolation as the inventory scan.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use futures::StreamExt;
use futures::stream;
use tracing::{Instrument, debug_span, info, info_span, warn};

use ioskit_common::config::{Credentials, ScanConfig};
use ioskit_common::device::Outcome;
use ioskit_common::network::target;
use ioskit_common::session::{ArchiveSink, Command, CommandOutput, ReachabilityProbe, SessionConnector};
use ioskit_common::{Error, Result};
use ioskit_protocols::running_config;

use crate::inventory::{close_session, open_session, run_command};

const UNKNOWN_HOSTNAME: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    pub address: Ipv4Addr,
    pub outcome: Outcome,
    pub hostname: Option<String>,
    pub filename: Option<String>,
    pub failure: Option<String>,
}

impl BackupRecord {
    fn failure(address: Ipv4Addr, reason: impl Into<String>) -> Self {
        Self {
            address,
            outcome: Outcome::Failure,
            hostname: None,
            filename: None,
            failure: Some(reason.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupRun {
    pub records: Vec<BackupRecord>,
    pub success_count: usize,
    pub error_count: usize,
}

impl BackupRun {
    fn push(&mut self, record: BackupRecord) {
        match record.outcome {
            Outcome::Success => self.success_count += 1,
            Outcome::Failure => self.error_count += 1,
        }
        self.records.push(record);
    }

    pub fn total_devices(&self) -> usize {
        self.records.len()
    }
}

/// Called once per finished host, in address order.
pub type BackupCallback = Box<dyn Fn(&BackupRecord) + Send + Sync>;

pub struct ConfigBackup {
    probe: Arc<dyn ReachabilityProbe>,
    connector: Arc<dyn SessionConnector>,
    archive: Arc<dyn ArchiveSink>,
    host_timeout: Duration,
    concurrency: usize,
    max_targets: u64,
    on_record: Option<BackupCallback>,
}

impl ConfigBackup {
    pub fn new(
        probe: Arc<dyn ReachabilityProbe>,
        connector: Arc<dyn SessionConnector>,
        archive: Arc<dyn ArchiveSink>,
        cfg: &ScanConfig,
    ) -> Self {
        Self {
            probe,
            connector,
            archive,
            host_timeout: cfg.host_timeout,
            concurrency: cfg.concurrency.max(1),
            max_targets: cfg.max_targets,
            on_record: None,
        }
    }

    pub fn with_progress(mut self, on_record: BackupCallback) -> Self {
        self.on_record = Some(on_record);
        self
    }

    /// Backs up every device in `expression`, in address order.
    pub async fn run(&self, expression: &str, credentials: &Credentials) -> Result<BackupRun> {
        let targets = target::expand_with_limit(expression, self.max_targets)?;
        let span = info_span!("backup", targets = targets.len());

        async {
            let mut records = stream::iter(targets)
                .map(|address| self.backup(address, credentials))
                .buffered(self.concurrency);

            let mut run = BackupRun::default();
            while let Some(record) = records.next().await {
                if let Some(on_record) = &self.on_record {
                    on_record(&record);
                }
                run.push(record);
            }

            info!(
                "Backup completed: {} devices, {} archived, {} failed",
                run.total_devices(),
                run.success_count,
                run.error_count
            );
            Ok(run)
        }
        .instrument(span)
        .await
    }

    /// Backs up one device. Never fails; problems end up in the record.
    pub async fn backup(&self, address: Ipv4Addr, credentials: &Credentials) -> BackupRecord {
        let span = debug_span!("host", %address);
        async {
            match self.try_backup(address, credentials).await {
                Ok(record) => record,
                Err(e) => {
                    warn!("{e}");
                    BackupRecord::failure(address, e.to_string())
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn try_backup(&self, address: Ipv4Addr, credentials: &Credentials) -> Result<BackupRecord> {
        if !self.probe.probe(address).await? {
            return Ok(BackupRecord::failure(
                address,
                format!("Device {address} is unreachable"),
            ));
        }

        let config = self.running_config(address, credentials).await?;
        let hostname = running_config::hostname(&config)
            .unwrap_or(UNKNOWN_HOSTNAME)
            .to_string();
        let filename = backup_filename(&hostname, Local::now());

        self.archive.store(&filename, config.as_bytes()).await?;
        info!("Configuration of {hostname} backed up as {filename}");

        Ok(BackupRecord {
            address,
            outcome: Outcome::Success,
            hostname: Some(hostname),
            filename: Some(filename),
            failure: None,
        })
    }

    async fn running_config(&self, address: Ipv4Addr, credentials: &Credentials) -> Result<String> {
        let mut session =
            open_session(self.connector.as_ref(), address, credentials, self.host_timeout).await?;
        let command = Command::ShowRunningConfig;
        let result = run_command(session.as_mut(), address, command, self.host_timeout).await;
        close_session(session.as_mut(), self.host_timeout).await;

        match result? {
            CommandOutput::Raw(text) => Ok(text),
            _ => Err(Error::CommandError {
                address,
                command: command.to_string(),
                reason: "expected raw configuration text".into(),
            }),
        }
    }
}

pub fn backup_filename(hostname: &str, at: DateTime<Local>) -> String {
    format!("{hostname}_{}_running_config.txt", at.format("%Y%m%d_%H%M%S"))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
