//! # Device Inventory Collector
//!
//! Drives one command session per host and folds everything that can go
//! wrong into the returned [`DeviceRecord`]. Nothing raised by the session
//! layer escapes [`InventoryCollector::collect`].

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use pnet::ipnetwork::Ipv4Network;
use tokio::time::timeout;
use tracing::{Instrument, debug, debug_span, error, warn};

use ioskit_common::config::{Credentials, ScanConfig};
use ioskit_common::device::{DeviceRecord, InterfaceFacts, ManagementBinding, VersionFacts};
use ioskit_common::session::{Command, CommandOutput, RemoteSession, SessionConnector};
use ioskit_common::{Error, Result};
use ioskit_protocols::{ParseError, interfaces, version};

pub struct InventoryCollector {
    connector: Arc<dyn SessionConnector>,
    management_prefix: Ipv4Network,
    sort_interfaces: bool,
    host_timeout: Duration,
}

impl InventoryCollector {
    pub fn new(connector: Arc<dyn SessionConnector>, cfg: &ScanConfig) -> Self {
        Self {
            connector,
            management_prefix: cfg.management_prefix,
            sort_interfaces: cfg.sort_interfaces,
            host_timeout: cfg.host_timeout,
        }
    }

    /// Scans one device. Always returns a record; failures are captured in it.
    pub async fn collect(&self, address: Ipv4Addr, credentials: &Credentials) -> DeviceRecord {
        let span = debug_span!("host", %address);
        async {
            match self.try_collect(address, credentials).await {
                Ok(record) => record,
                Err(e) => {
                    if e.is_per_host() {
                        warn!("{e}");
                    } else {
                        error!("{e}");
                    }
                    DeviceRecord::failure(address, e.to_string())
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn try_collect(&self, address: Ipv4Addr, credentials: &Credentials) -> Result<DeviceRecord> {
        let mut session =
            open_session(self.connector.as_ref(), address, credentials, self.host_timeout).await?;
        let result = self.query(session.as_mut(), address).await;
        close_session(session.as_mut(), self.host_timeout).await;
        result
    }

    async fn query(&self, session: &mut dyn RemoteSession, address: Ipv4Addr) -> Result<DeviceRecord> {
        let facts = self.version_facts(session, address).await?;
        let interfaces = self.interface_facts(session, address).await?;

        let management =
            ManagementBinding::select(&interfaces, &self.management_prefix, self.sort_interfaces);
        match &management {
            Some(mgmt) => debug!("management interface {} ({})", mgmt.interface, mgmt.address),
            None => debug!("no interface inside {}", self.management_prefix),
        }

        Ok(DeviceRecord::success(address, facts, management))
    }

    async fn version_facts(
        &self,
        session: &mut dyn RemoteSession,
        address: Ipv4Addr,
    ) -> Result<VersionFacts> {
        let command = Command::ShowVersion;
        match run_command(session, address, command, self.host_timeout).await? {
            CommandOutput::Version(facts) => Ok(facts),
            CommandOutput::Raw(text) => {
                version::parse(&text).map_err(|e| parse_failure(address, command, e))
            }
            other => Err(unexpected_output(address, command, &other)),
        }
    }

    async fn interface_facts(
        &self,
        session: &mut dyn RemoteSession,
        address: Ipv4Addr,
    ) -> Result<Vec<InterfaceFacts>> {
        let command = Command::ShowIpInterfaceBrief;
        match run_command(session, address, command, self.host_timeout).await? {
            CommandOutput::Interfaces(rows) => Ok(rows),
            CommandOutput::Raw(text) => {
                interfaces::parse(&text).map_err(|e| parse_failure(address, command, e))
            }
            other => Err(unexpected_output(address, command, &other)),
        }
    }
}

/// Opens a session, treating a timeout like any other connection failure.
pub(crate) async fn open_session(
    connector: &dyn SessionConnector,
    address: Ipv4Addr,
    credentials: &Credentials,
    limit: Duration,
) -> Result<Box<dyn RemoteSession>> {
    debug!("opening session to {address}");
    match timeout(limit, connector.open(address, credentials)).await {
        Ok(result) => result,
        Err(_elapsed) => Err(Error::ConnectionError {
            address,
            reason: format!("timed out after {}s", limit.as_secs_f64()),
        }),
    }
}

/// Runs one command, treating a timeout like a command failure.
pub(crate) async fn run_command(
    session: &mut dyn RemoteSession,
    address: Ipv4Addr,
    command: Command,
    limit: Duration,
) -> Result<CommandOutput> {
    debug!("running '{command}'");
    match timeout(limit, session.run(command)).await {
        Ok(result) => result,
        Err(_elapsed) => Err(Error::CommandError {
            address,
            command: command.to_string(),
            reason: format!("timed out after {}s", limit.as_secs_f64()),
        }),
    }
}

pub(crate) async fn close_session(session: &mut dyn RemoteSession, limit: Duration) {
    if timeout(limit, session.close()).await.is_err() {
        warn!("session close timed out");
    }
}

fn parse_failure(address: Ipv4Addr, command: Command, e: ParseError) -> Error {
    Error::CommandError {
        address,
        command: command.to_string(),
        reason: e.to_string(),
    }
}

fn unexpected_output(address: Ipv4Addr, command: Command, output: &CommandOutput) -> Error {
    let kind = match output {
        CommandOutput::Raw(_) => "raw text",
        CommandOutput::Version(_) => "version record",
        CommandOutput::Interfaces(_) => "interface table",
    };
    Error::CommandError {
        address,
        command: command.to_string(),
        reason: format!("unexpected {kind} in response"),
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
