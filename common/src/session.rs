//! # Collaborator Ports
//!
//! Traits the engine depends on to reach the outside world. Concrete
//! implementations live in `ioskit-core`; tests substitute in-memory fakes.

use std::fmt;
use std::net::Ipv4Addr;

use async_trait::async_trait;

use crate::config::Credentials;
use crate::device::{InterfaceFacts, VersionFacts};
use crate::error::Result;

/// Commands the engine knows how to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    ShowVersion,
    ShowIpInterfaceBrief,
    ShowRunningConfig,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShowVersion => "show version",
            Self::ShowIpInterfaceBrief => "show ip interface brief",
            Self::ShowRunningConfig => "show running-config",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a session returns for a command: raw text or a parsed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Raw(String),
    Version(VersionFacts),
    Interfaces(Vec<InterfaceFacts>),
}

/// An open command session to one device.
#[async_trait]
pub trait RemoteSession: Send {
    /// Fails with [`crate::Error::CommandError`].
    async fn run(&mut self, command: Command) -> Result<CommandOutput>;

    /// Releases the session. Calling it more than once is a no-op.
    async fn close(&mut self);
}

/// Opens [`RemoteSession`]s.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    /// Fails with [`crate::Error::ConnectionError`].
    async fn open(
        &self,
        address: Ipv4Addr,
        credentials: &Credentials,
    ) -> Result<Box<dyn RemoteSession>>;
}

/// Liveness check.
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// `Ok(false)` is a clean "not alive"; transport trouble is
    /// [`crate::Error::ProbeError`].
    async fn probe(&self, address: Ipv4Addr) -> Result<bool>;
}

/// Destination for archived artifacts.
#[async_trait]
pub trait ArchiveSink: Send + Sync {
    async fn store(&self, filename: &str, content: &[u8]) -> Result<()>;
}
