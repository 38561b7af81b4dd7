//! # ioskit-common
//!
//! Shared vocabulary of the workspace: the domain models produced by a scan,
//! the error taxonomy, configuration, and the collaborator traits that the
//! engine in `ioskit-core` drives.

pub mod config;
pub mod device;
pub mod error;
pub mod network;
pub mod run;
pub mod session;

pub use error::{Error, Result};
