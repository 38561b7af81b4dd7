//! # Device Models
//!
//! Facts reported by a device and the per-address record a scan produces.

use std::fmt;
use std::net::Ipv4Addr;

use pnet::ipnetwork::Ipv4Network;

/// Rendered in place of every value a device did not report.
pub const NOT_AVAILABLE: &str = "N/A";

/// Identity facts extracted from `show version`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionFacts {
    pub hostname: Option<String>,
    pub version: Option<String>,
    pub uptime: Option<String>,
    pub chassis: Option<String>,
    pub serial: Option<String>,
}

/// One row of `show ip interface brief`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceFacts {
    pub name: String,
    pub address: Option<Ipv4Addr>,
    pub status: String,
    pub protocol: String,
}

/// The interface chosen as the management one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementBinding {
    pub interface: String,
    pub address: Ipv4Addr,
    pub status: String,
    pub protocol: String,
}

impl ManagementBinding {
    /// Picks the first interface whose address lies in `prefix`.
    ///
    /// Order is whatever `interfaces` yields unless `sort_by_name` is set.
    pub fn select(
        interfaces: &[InterfaceFacts],
        prefix: &Ipv4Network,
        sort_by_name: bool,
    ) -> Option<Self> {
        let mut candidates: Vec<&InterfaceFacts> = interfaces.iter().collect();
        if sort_by_name {
            candidates.sort_by(|a, b| a.name.cmp(&b.name));
        }

        candidates.into_iter().find_map(|iface| {
            let address = iface.address.filter(|addr| prefix.contains(*addr))?;
            Some(Self {
                interface: iface.name.clone(),
                address,
                status: iface.status.clone(),
                protocol: iface.protocol.clone(),
            })
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    Failure,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Failure => f.write_str("error"),
        }
    }
}

/// Result of scanning one address. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    pub address: Ipv4Addr,
    pub outcome: Outcome,
    pub facts: VersionFacts,
    pub management: Option<ManagementBinding>,
    pub failure: Option<String>,
}

impl DeviceRecord {
    pub fn success(
        address: Ipv4Addr,
        facts: VersionFacts,
        management: Option<ManagementBinding>,
    ) -> Self {
        Self {
            address,
            outcome: Outcome::Success,
            facts,
            management,
            failure: None,
        }
    }

    pub fn failure(address: Ipv4Addr, reason: impl Into<String>) -> Self {
        Self {
            address,
            outcome: Outcome::Failure,
            facts: VersionFacts::default(),
            management: None,
            failure: Some(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    pub fn hostname(&self) -> &str {
        or_na(&self.facts.hostname)
    }

    pub fn platform(&self) -> &str {
        or_na(&self.facts.chassis)
    }

    pub fn version(&self) -> &str {
        or_na(&self.facts.version)
    }

    pub fn serial(&self) -> &str {
        or_na(&self.facts.serial)
    }

    pub fn uptime(&self) -> &str {
        or_na(&self.facts.uptime)
    }

    pub fn management_interface(&self) -> &str {
        self.management
            .as_ref()
            .map_or(NOT_AVAILABLE, |mgmt| mgmt.interface.as_str())
    }

    pub fn management_address(&self) -> String {
        self.management
            .as_ref()
            .map_or_else(|| NOT_AVAILABLE.to_string(), |mgmt| mgmt.address.to_string())
    }
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NOT_AVAILABLE)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    fn iface(name: &str, address: Option<[u8; 4]>) -> InterfaceFacts {
        InterfaceFacts {
            name: name.to_string(),
            address: address.map(Ipv4Addr::from),
            status: "up".to_string(),
            protocol: "up".to_string(),
        }
    }

    fn mgmt_prefix() -> Ipv4Network {
        Ipv4Network::new(Ipv4Addr::new(10, 49, 0, 0), 16).unwrap()
    }

    #[test]
    fn select_first_match_in_given_order() {
        let interfaces = vec![
            iface("Vlan1", None),
            iface("GigabitEthernet0/0/1", Some([10, 49, 1, 2])),
            iface("GigabitEthernet0/0/0", Some([10, 49, 1, 1])),
        ];
        let binding = ManagementBinding::select(&interfaces, &mgmt_prefix(), false).unwrap();
        assert_eq!(binding.interface, "GigabitEthernet0/0/1");
        assert_eq!(binding.address, Ipv4Addr::new(10, 49, 1, 2));
    }

    #[test]
    fn select_sorted_by_name() {
        let interfaces = vec![
            iface("GigabitEthernet0/0/1", Some([10, 49, 1, 2])),
            iface("GigabitEthernet0/0/0", Some([10, 49, 1, 1])),
        ];
        let binding = ManagementBinding::select(&interfaces, &mgmt_prefix(), true).unwrap();
        assert_eq!(binding.interface, "GigabitEthernet0/0/0");
    }

    #[test]
    fn select_none_outside_prefix() {
        let interfaces = vec![iface("Gi1", Some([192, 168, 1, 1])), iface("Gi2", None)];
        assert!(ManagementBinding::select(&interfaces, &mgmt_prefix(), false).is_none());
    }

    #[test]
    fn failure_record_renders_sentinels() {
        let record = DeviceRecord::failure(Ipv4Addr::new(10, 0, 0, 1), "timed out");
        assert_eq!(record.outcome.to_string(), "error");
        assert_eq!(record.hostname(), NOT_AVAILABLE);
        assert_eq!(record.management_interface(), NOT_AVAILABLE);
        assert_eq!(record.management_address(), NOT_AVAILABLE);
        assert_eq!(record.failure.as_deref(), Some("timed out"));
    }
}
