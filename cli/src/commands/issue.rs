use std::sync::Arc;

use anyhow::Context;

use ioskit_common::config::Config;
use ioskit_core::issuer::{BootstrapAccount, ConfigIssuer};
use ioskit_core::network::icmp::IcmpProbe;

use crate::terminal::print;

pub struct IssueRequest {
    pub interface: String,
    pub address: String,
    pub vrf_forwarding: bool,
    pub admin_secret: String,
}

/// Prints the bootstrap configuration on stdout so it can be piped or pasted.
pub async fn issue(request: IssueRequest, cfg: &Config, quiet: u8) -> anyhow::Result<()> {
    let probe = Arc::new(IcmpProbe::new(&cfg.probe)?);
    let account = BootstrapAccount {
        username: cfg.issue.admin_username.clone(),
        secret: request.admin_secret,
    };
    let issuer = ConfigIssuer::new(probe, account)
        .with_vrf_forwarding(request.vrf_forwarding || cfg.issue.vrf_forwarding);

    let config = issuer
        .issue(&request.interface, &request.address)
        .await
        .context("no configuration issued")?;

    print::header("bootstrap configuration", quiet);
    print!("{}", config.text);
    Ok(())
}
