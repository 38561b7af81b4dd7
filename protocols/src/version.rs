//! `show version`

use ioskit_common::device::VersionFacts;

use crate::{ParseError, ensure_accepted};

const UPTIME_MARKER: &str = " uptime is ";
const SERIAL_MARKER: &str = "Processor board ID";

pub fn parse(output: &str) -> Result<VersionFacts, ParseError> {
    ensure_accepted(output)?;
    let mut facts = VersionFacts::default();

    for line in output.lines().map(str::trim) {
        if facts.version.is_none() && line.starts_with("Cisco IOS") {
            facts.version = software_version(line);
        }

        if facts.hostname.is_none() {
            if let Some((host, uptime)) = line.split_once(UPTIME_MARKER) {
                facts.hostname = non_empty(host);
                facts.uptime = non_empty(uptime);
            }
        }

        if facts.chassis.is_none() && is_chassis_line(line) {
            facts.chassis = line.split_whitespace().nth(1).map(str::to_string);
        }

        if facts.serial.is_none() {
            if let Some(rest) = line.strip_prefix(SERIAL_MARKER) {
                facts.serial = rest.split_whitespace().next().map(str::to_string);
            }
        }
    }

    Ok(facts)
}

/// `..., Version 15.2(4)M7, RELEASE SOFTWARE (fc2)` -> `15.2(4)M7`
fn software_version(line: &str) -> Option<String> {
    let (_, rest) = line.split_once("Version ")?;
    rest.split(|c: char| c == ',' || c.is_whitespace())
        .next()
        .and_then(non_empty)
}

fn is_chassis_line(line: &str) -> bool {
    line.to_ascii_lowercase().starts_with("cisco ") && line.contains("bytes of memory")
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
