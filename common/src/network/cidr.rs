//! Addresses with a prefix length, as typed when provisioning an interface.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use pnet::ipnetwork::{self, Ipv4Network};

use crate::error::{Error, Result};

/// A host address together with the network it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceAddress {
    network: Ipv4Network,
}

impl InterfaceAddress {
    pub fn new(address: Ipv4Addr, prefix: u8) -> Result<Self> {
        let network = Ipv4Network::new(address, prefix)
            .map_err(|e| Error::invalid_address(&format!("{address}/{prefix}"), e.to_string()))?;
        Ok(Self { network })
    }

    pub fn address(&self) -> Ipv4Addr {
        self.network.ip()
    }

    pub fn prefix(&self) -> u8 {
        self.network.prefix()
    }

    pub fn netmask(&self) -> Ipv4Addr {
        self.network.mask()
    }

    /// First usable address of the containing network.
    ///
    /// `None` for /31 and /32, which have no address besides the host itself
    /// to act as a gateway.
    pub fn first_usable(&self) -> Option<Ipv4Addr> {
        if self.prefix() >= 31 {
            return None;
        }
        let network: u32 = self.network.network().into();
        Some(Ipv4Addr::from(network + 1))
    }
}

impl fmt::Display for InterfaceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address(), self.prefix())
    }
}

impl FromStr for InterfaceAddress {
    type Err = Error;

    /// Accepts `X.X.X.X/NN` or `X.X.X.X M.M.M.M`; the latter is normalized to
    /// the prefix form before validation.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = normalize(s)?;
        let Some((ip_str, prefix_str)) = normalized.split_once('/') else {
            return Err(Error::invalid_address(s, "missing prefix length"));
        };

        let address = ip_str
            .parse::<Ipv4Addr>()
            .map_err(|e| Error::invalid_address(s, format!("'{ip_str}': {e}")))?;
        let prefix = prefix_str
            .parse::<u8>()
            .map_err(|e| Error::invalid_address(s, format!("prefix '{prefix_str}': {e}")))?;

        Self::new(address, prefix).map_err(|_| Error::invalid_address(s, format!("prefix {prefix} > 32")))
    }
}

/// Rewrites the dotted-mask form into prefix notation.
fn normalize(s: &str) -> Result<String> {
    let s = s.trim();
    if s.contains('/') {
        return Ok(s.replace(' ', ""));
    }

    let tokens: Vec<&str> = s.split_whitespace().collect();
    let [ip_str, mask_str] = tokens.as_slice() else {
        return Err(Error::invalid_address(s, "expected an address with a prefix or a netmask"));
    };

    let mask = mask_str
        .parse::<Ipv4Addr>()
        .map_err(|e| Error::invalid_address(s, format!("netmask '{mask_str}': {e}")))?;
    let prefix = ipnetwork::ipv4_mask_to_prefix(mask)
        .map_err(|_| Error::invalid_address(s, format!("netmask {mask} is not contiguous")))?;

    Ok(format!("{ip_str}/{prefix}"))
}

/// Parses a network such as `10.49.0.0/16`.
pub fn parse_network(s: &str) -> Result<Ipv4Network> {
    s.trim()
        .parse::<Ipv4Network>()
        .map_err(|e| Error::invalid_address(s, e.to_string()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
