//! Parsers for Cisco IOS command output.
//!
//! Each parser is lenient: fields a device does not print stay `None`.
//! Only output IOS itself flags as an error (`% Invalid input ...`) fails.

pub mod interfaces;
pub mod running_config;
pub mod version;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("device rejected the command: {0}")]
    CommandRejected(String),
    #[error("output has no '{0}' header")]
    MissingHeader(&'static str),
}

/// Fails when the device answered with an IOS error marker.
pub(crate) fn ensure_accepted(output: &str) -> Result<(), ParseError> {
    match output.lines().map(str::trim).find(|line| line.starts_with('%')) {
        Some(line) => Err(ParseError::CommandRejected(line.to_string())),
        None => Ok(()),
    }
}
