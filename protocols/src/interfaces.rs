//! `show ip interface brief`

use std::net::Ipv4Addr;

use ioskit_common::device::InterfaceFacts;
use tracing::debug;

use crate::{ParseError, ensure_accepted};

const HEADER: &str = "Interface";

/// Rows come back in the order the device printed them.
pub fn parse(output: &str) -> Result<Vec<InterfaceFacts>, ParseError> {
    ensure_accepted(output)?;

    let mut lines = output.lines().map(str::trim).skip_while(|line| !is_header(line));
    if lines.next().is_none() {
        return Err(ParseError::MissingHeader(HEADER));
    }

    Ok(lines.filter(|line| !line.is_empty()).filter_map(parse_row).collect())
}

fn is_header(line: &str) -> bool {
    line.starts_with(HEADER) && line.contains("IP-Address")
}

/// `Name  Address  OK?  Method  Status...  Protocol`; status may span words
/// (`administratively down`).
fn parse_row(line: &str) -> Option<InterfaceFacts> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 6 {
        debug!("skipping short interface row: {line}");
        return None;
    }

    let (protocol, middle) = tokens[4..].split_last()?;
    Some(InterfaceFacts {
        name: tokens[0].to_string(),
        address: tokens[1].parse::<Ipv4Addr>().ok(),
        status: middle.join(" "),
        protocol: protocol.to_string(),
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
