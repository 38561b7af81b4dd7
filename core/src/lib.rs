//! # ioskit-core
//!
//! The engine behind `ioskit`: per-device inventory collection, the batch
//! scan that fans it out over an address range, CSV reporting, configuration
//! backup, and bootstrap configuration issuance. The [`network`] module holds
//! the concrete SSH, ICMP and archive adapters.

pub mod backup;
pub mod inventory;
pub mod issuer;
pub mod network;
pub mod report;
pub mod scanner;
