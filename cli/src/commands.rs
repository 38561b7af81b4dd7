pub mod backup;
pub mod issue;
pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use ioskit_common::config::{Config, Credentials};

#[derive(Parser)]
#[command(name = "ioskit")]
#[command(version, about = "Batch inventory, backup and bootstrap tooling for Cisco IOS devices.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML settings file
    #[arg(short, long, global = true, env = "IOSKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Less output; repeat to only print the summary
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect inventory from every device in a range and write a CSV report
    #[command(alias = "s")]
    Scan {
        /// Single address or "first - last"
        range: String,

        #[command(flatten)]
        login: LoginArgs,

        /// Report file, overrides [report].path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Devices contacted at the same time
        #[arg(short = 'j', long)]
        concurrency: Option<usize>,

        /// Per-host time limit, e.g. "15s"
        #[arg(short, long, value_parser = humantime::parse_duration)]
        timeout: Option<Duration>,

        /// Also store the report in the configured archive
        #[arg(long)]
        archive: bool,

        #[command(flatten)]
        archive_login: ArchiveLoginArgs,
    },
    /// Pull running configurations into the configured archive
    #[command(alias = "b")]
    Backup {
        range: String,

        #[command(flatten)]
        login: LoginArgs,

        #[command(flatten)]
        archive_login: ArchiveLoginArgs,
    },
    /// Print a bootstrap configuration for a new device
    #[command(alias = "i")]
    Issue {
        /// e.g. "GigabitEthernet0/0"
        interface: String,

        /// "10.49.2.11/24" or "10.49.2.11 255.255.255.0"
        address: String,

        /// Put the interface into the Mgmt-vrf
        #[arg(long)]
        vrf_forwarding: bool,

        /// Secret for the local admin account
        #[arg(long, env = "IOSKIT_BOOTSTRAP_SECRET", hide_env_values = true)]
        admin_secret: String,
    },
}

#[derive(Args)]
pub struct LoginArgs {
    #[arg(short, long, env = "IOSKIT_USERNAME")]
    pub username: Option<String>,

    #[arg(short, long, env = "IOSKIT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl LoginArgs {
    pub fn credentials(&self) -> anyhow::Result<Credentials> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Ok(Credentials::new(username, password)),
            _ => bail!("device credentials missing: set IOSKIT_USERNAME and IOSKIT_PASSWORD"),
        }
    }
}

#[derive(Args)]
pub struct ArchiveLoginArgs {
    #[arg(long, env = "IOSKIT_ARCHIVE_PASSWORD", hide_env_values = true)]
    pub archive_password: Option<String>,
}

impl ArchiveLoginArgs {
    /// Only meaningful for remote archives; `None` if either half is missing.
    pub fn credentials(&self, cfg: &Config) -> Option<Credentials> {
        let username = cfg.archive.username.as_ref()?;
        let password = self.archive_password.as_ref()?;
        Some(Credentials::new(username, password))
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::load(path).context("unable to load settings"),
            None => Ok(Config::default()),
        }
    }
}
