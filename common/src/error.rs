use std::net::Ipv4Addr;

/// Every failure the engine can report.
///
/// Per-host variants ([`Error::ConnectionError`], [`Error::CommandError`]) are
/// turned into failed records by the collector; the others reach the caller.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid address range '{input}': {reason}")]
    InvalidRangeFormat { input: String, reason: String },

    #[error("invalid address '{input}': {reason}. Use 10.10.10.1/24 or 10.10.10.1 255.255.255.0")]
    InvalidAddressFormat { input: String, reason: String },

    #[error("invalid interface name '{0}'")]
    InvalidInterfaceName(String),

    #[error("reachability check of {address} failed: {reason}")]
    ProbeError { address: Ipv4Addr, reason: String },

    #[error("ICMP probing unavailable: {0}")]
    ProbeUnavailable(String),

    #[error("IP address {0} is already in use")]
    AddressInUse(Ipv4Addr),

    #[error("could not connect to {address}: {reason}")]
    ConnectionError { address: Ipv4Addr, reason: String },

    #[error("command '{command}' failed on {address}: {reason}")]
    CommandError {
        address: Ipv4Addr,
        command: String,
        reason: String,
    },

    #[error("no device records to export")]
    EmptyReportError,

    #[error("failed to write report: {0}")]
    ReportWrite(String),

    #[error("archive upload of '{filename}' failed: {reason}")]
    Archive { filename: String, reason: String },
}

impl Error {
    pub fn invalid_range(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRangeFormat {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_address(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidAddressFormat {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// True for failures that belong to a single host rather than the request.
    pub fn is_per_host(&self) -> bool {
        matches!(
            self,
            Self::ConnectionError { .. } | Self::CommandError { .. } | Self::ProbeError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
