#![cfg(test)]
//! A scripted lab: devices keyed by address that answer with canned IOS output.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ioskit_common::config::Credentials;
use ioskit_common::session::{
    ArchiveSink, Command, CommandOutput, ReachabilityProbe, RemoteSession, SessionConnector,
};
use ioskit_common::{Error, Result};

#[derive(Clone)]
pub struct LabDevice {
    pub hostname: &'static str,
    pub platform: &'static str,
    pub serial: &'static str,
    pub mgmt_address: Ipv4Addr,
}

impl LabDevice {
    fn show_version(&self) -> String {
        format!(
            "Cisco IOS XE Software, Version 16.12.05\n\
             Technical Support: http://www.cisco.com/techsupport\n\
             {host} uptime is 12 weeks, 2 days, 4 hours, 1 minute\n\
             cisco {platform} (X86) processor with 868521K/6147K bytes of memory.\n\
             Processor board ID {serial}\n",
            host = self.hostname,
            platform = self.platform,
            serial = self.serial,
        )
    }

    fn show_ip_interface_brief(&self) -> String {
        format!(
            "Interface              IP-Address      OK? Method Status                Protocol\n\
             GigabitEthernet0/0     {mgmt:<15} YES NVRAM  up                    up\n\
             GigabitEthernet1/0/1   unassigned      YES unset  down                  down\n\
             Vlan20                 172.16.20.1     YES NVRAM  up                    up\n",
            mgmt = self.mgmt_address.to_string(),
        )
    }

    fn show_running_config(&self) -> String {
        format!("!\nversion 16.12\n!\nhostname {}\n!\nend\n", self.hostname)
    }
}

/// Every address not registered refuses SSH and ignores pings.
#[derive(Default)]
pub struct Lab {
    devices: HashMap<Ipv4Addr, LabDevice>,
    pub logins: AtomicUsize,
    pub closes: Arc<AtomicUsize>,
}

impl Lab {
    pub fn with_device(mut self, address: Ipv4Addr, device: LabDevice) -> Self {
        self.devices.insert(address, device);
        self
    }
}

struct LabSession {
    device: LabDevice,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl SessionConnector for Lab {
    async fn open(&self, address: Ipv4Addr, _: &Credentials) -> Result<Box<dyn RemoteSession>> {
        self.logins.fetch_add(1, Ordering::SeqCst);
        let device = self.devices.get(&address).ok_or(Error::ConnectionError {
            address,
            reason: "Connection refused".into(),
        })?;
        Ok(Box::new(LabSession {
            device: device.clone(),
            closes: self.closes.clone(),
        }))
    }
}

#[async_trait]
impl RemoteSession for LabSession {
    async fn run(&mut self, command: Command) -> Result<CommandOutput> {
        let text = match command {
            Command::ShowVersion => self.device.show_version(),
            Command::ShowIpInterfaceBrief => self.device.show_ip_interface_brief(),
            Command::ShowRunningConfig => self.device.show_running_config(),
        };
        Ok(CommandOutput::Raw(text))
    }

    async fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ReachabilityProbe for Lab {
    async fn probe(&self, address: Ipv4Addr) -> Result<bool> {
        Ok(self.devices.contains_key(&address))
    }
}

/// Probe that reports a fixed set of addresses as alive.
pub struct StaticProbe(pub Vec<Ipv4Addr>);

#[async_trait]
impl ReachabilityProbe for StaticProbe {
    async fn probe(&self, address: Ipv4Addr) -> Result<bool> {
        Ok(self.0.contains(&address))
    }
}

#[derive(Default)]
pub struct MemoryArchive {
    pub stored: Mutex<Vec<(String, Vec<u8>)>>,
}

#[async_trait]
impl ArchiveSink for MemoryArchive {
    async fn store(&self, filename: &str, content: &[u8]) -> Result<()> {
        self.stored
            .lock()
            .unwrap()
            .push((filename.to_string(), content.to_vec()));
        Ok(())
    }
}

pub fn creds() -> Credentials {
    Credentials::new("netops", "from-the-environment")
}
