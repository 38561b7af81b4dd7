use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use async_trait::async_trait;
use surge_ping::{Client, Config, PingIdentifier, PingSequence, SurgeError};
use tokio::time::sleep;
use tracing::debug;

use ioskit_common::config::ProbeConfig;
use ioskit_common::session::ReachabilityProbe;
use ioskit_common::{Error, Result};

/// ICMP echo probe. A host is alive if any of `count` requests is answered.
pub struct IcmpProbe {
    client: Client,
    count: u16,
    interval: Duration,
    timeout: Duration,
}

impl IcmpProbe {
    /// Needs raw or datagram ICMP sockets; fails with
    /// [`Error::ProbeUnavailable`] when the process is not allowed to open them.
    pub fn new(cfg: &ProbeConfig) -> Result<Self> {
        let client = Client::new(&Config::default())
            .map_err(|e| Error::ProbeUnavailable(format!("unable to open ICMP socket: {e}")))?;

        Ok(Self {
            client,
            count: cfg.count.max(1),
            interval: cfg.interval,
            timeout: cfg.timeout,
        })
    }
}

#[async_trait]
impl ReachabilityProbe for IcmpProbe {
    async fn probe(&self, address: Ipv4Addr) -> Result<bool> {
        let mut pinger = self
            .client
            .pinger(IpAddr::V4(address), PingIdentifier(rand::random()))
            .await;
        pinger.timeout(self.timeout);

        for seq in 0..self.count {
            if seq > 0 {
                sleep(self.interval).await;
            }
            match pinger.ping(PingSequence(seq), &[]).await {
                Ok((_, rtt)) => {
                    debug!("{address} answered in {rtt:?}");
                    return Ok(true);
                }
                Err(SurgeError::Timeout { .. }) => continue,
                Err(e) => {
                    return Err(Error::ProbeError {
                        address,
                        reason: e.to_string(),
                    });
                }
            }
        }

        debug!("{address} did not answer {} echo requests", self.count);
        Ok(false)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
