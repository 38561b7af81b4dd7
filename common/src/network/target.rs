//! # Scan Target Model
//!
//! Parses the textual address-range expression an operator types in.
//!
//! Supported forms:
//! * A single IPv4 address (e.g., `10.10.10.1`).
//! * An inclusive IPv4 range (e.g., `10.10.10.1 - 10.10.10.254`).
//!
//! Both sides of a range must be complete IPv4 literals; whitespace around
//! either side is ignored.

use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::network::range::{Ipv4Range, TargetList};

/// Upper bound on the number of addresses a single expression may expand to.
pub const DEFAULT_MAX_TARGETS: u64 = 4096;

/// A validated address-range expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressRange {
    /// A single host.
    Host { target_addr: Ipv4Addr },
    /// An inclusive range of hosts, `start <= end`.
    Range { ipv4_range: Ipv4Range },
}

impl AddressRange {
    pub fn len(&self) -> u64 {
        match self {
            Self::Host { .. } => 1,
            Self::Range { ipv4_range } => ipv4_range.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_targets(&self) -> TargetList {
        match self {
            Self::Host { target_addr } => TargetList::single(*target_addr),
            Self::Range { ipv4_range } => TargetList::from(*ipv4_range),
        }
    }
}

impl FromStr for AddressRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_range(s, "expression is empty"));
        }

        let parts: Vec<&str> = trimmed.split('-').collect();
        match parts.as_slice() {
            [single] => parse_host(single, s),
            [start, end] => parse_ip_range(start, end, s),
            _ => Err(Error::invalid_range(s, "expected 'A' or 'A - B'")),
        }
    }
}

/// Expands `expression` into the ordered list of addresses to visit.
pub fn expand(expression: &str) -> Result<TargetList> {
    expand_with_limit(expression, DEFAULT_MAX_TARGETS)
}

/// Like [`expand`], rejecting expressions that cover more than `max_targets` addresses.
pub fn expand_with_limit(expression: &str, max_targets: u64) -> Result<TargetList> {
    let range: AddressRange = expression.parse()?;
    let count = range.len();
    if count > max_targets {
        return Err(Error::invalid_range(
            expression,
            format!("covers {count} addresses, limit is {max_targets}"),
        ));
    }
    Ok(range.to_targets())
}

fn parse_host(literal: &str, original: &str) -> Result<AddressRange> {
    let target_addr = parse_literal(literal, original)?;
    Ok(AddressRange::Host { target_addr })
}

fn parse_ip_range(start_str: &str, end_str: &str, original: &str) -> Result<AddressRange> {
    let start_addr = parse_literal(start_str, original)?;
    let end_addr = parse_literal(end_str, original)?;

    let ipv4_range = Ipv4Range::new(start_addr, end_addr);
    if ipv4_range.is_reversed() {
        return Err(Error::invalid_range(
            original,
            format!("end {end_addr} is lower than start {start_addr}"),
        ));
    }

    Ok(AddressRange::Range { ipv4_range })
}

fn parse_literal(literal: &str, original: &str) -> Result<Ipv4Addr> {
    let literal = literal.trim();
    literal
        .parse::<Ipv4Addr>()
        .map_err(|e| Error::invalid_range(original, format!("'{literal}' is not an IPv4 address: {e}")))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
