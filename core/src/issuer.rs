//! # Bootstrap Configuration Issuer
//!
//! Turns an interface name and an address into the command sequence that
//! gives a freshly racked device management reachability. Issuance is refused
//! when the address already answers on the network.

use std::fmt;
use std::net::Ipv4Addr;
use std::sync::Arc;

use tracing::{info, warn};

use ioskit_common::network::cidr::InterfaceAddress;
use ioskit_common::session::ReachabilityProbe;
use ioskit_common::{Error, Result};

pub const MGMT_VRF: &str = "Mgmt-vrf";

/// Local account created on the device.
#[derive(Clone, PartialEq, Eq)]
pub struct BootstrapAccount {
    pub username: String,
    pub secret: String,
}

impl fmt::Debug for BootstrapAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapAccount")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Validated inputs of one issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapPlan {
    pub interface: String,
    pub address: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub gateway: Ipv4Addr,
}

impl BootstrapPlan {
    /// Parses and derives everything the template needs. No I/O.
    pub fn new(interface: &str, address_with_prefix: &str) -> Result<Self> {
        let interface: String = interface.chars().filter(|c| *c != ' ').collect();
        if interface.is_empty() {
            return Err(Error::InvalidInterfaceName(interface));
        }

        let iface: InterfaceAddress = address_with_prefix.parse()?;
        let gateway = iface.first_usable().ok_or_else(|| {
            Error::invalid_address(
                address_with_prefix,
                format!("/{} leaves no usable gateway address", iface.prefix()),
            )
        })?;

        Ok(Self {
            interface,
            address: iface.address(),
            netmask: iface.netmask(),
            gateway,
        })
    }
}

/// A rendered configuration together with the values that went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub plan: BootstrapPlan,
    pub text: String,
}

pub struct ConfigIssuer {
    probe: Arc<dyn ReachabilityProbe>,
    account: BootstrapAccount,
    vrf_forwarding: bool,
}

impl ConfigIssuer {
    pub fn new(probe: Arc<dyn ReachabilityProbe>, account: BootstrapAccount) -> Self {
        Self {
            probe,
            account,
            vrf_forwarding: false,
        }
    }

    /// Binds the interface into the management VRF as well.
    pub fn with_vrf_forwarding(mut self, enabled: bool) -> Self {
        self.vrf_forwarding = enabled;
        self
    }

    pub async fn issue(&self, interface: &str, address_with_prefix: &str) -> Result<BootstrapConfig> {
        let plan = BootstrapPlan::new(interface, address_with_prefix)?;

        if self.probe.probe(plan.address).await? {
            warn!("{} answers on the network, refusing to issue", plan.address);
            return Err(Error::AddressInUse(plan.address));
        }
        info!("The IP address {} is free", plan.address);

        let text = render(&plan, &self.account, self.vrf_forwarding);
        Ok(BootstrapConfig { plan, text })
    }
}

pub fn render(plan: &BootstrapPlan, account: &BootstrapAccount, vrf_forwarding: bool) -> String {
    let vrf_line = if vrf_forwarding {
        format!("vrf forwarding {MGMT_VRF}\n")
    } else {
        String::new()
    };

    format!(
        "enable\n\
         configure terminal\n\
         vrf definition {MGMT_VRF}\n\
         address-family ipv4\n\
         exit\n\
         exit\n\
         interface {interface}\n\
         {vrf_line}\
         ip address {address} {netmask}\n\
         no shut\n\
         cdp enable\n\
         exit\n\
         ip domain name cisco.com\n\
         ip route vrf {MGMT_VRF} 0.0.0.0 0.0.0.0 {gateway}\n\
         hostname auto-provisioned\n\
         crypto key generate rsa modulus 2048\n\
         username {username} privilege 15 password {secret}\n\
         line vty 0 4\n\
         transport input ssh\n\
         login local\n\
         exit\n",
        interface = plan.interface,
        address = plan.address,
        netmask = plan.netmask,
        gateway = plan.gateway,
        username = account.username,
        secret = account.secret,
    )
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    const EXPECTED: &str = "enable
configure terminal
vrf definition Mgmt-vrf
address-family ipv4
exit
exit
interface GigabitEthernet0/0/0
ip address 192.168.1.10 255.255.255.0
no shut
cdp enable
exit
ip domain name cisco.com
ip route vrf Mgmt-vrf 0.0.0.0 0.0.0.0 192.168.1.1
hostname auto-provisioned
crypto key generate rsa modulus 2048
username admin privilege 15 password cisco
line vty 0 4
transport input ssh
login local
exit
";

    enum Answer {
        Alive,
        Silent,
        Broken,
    }

    struct FixedProbe(Answer);

    #[async_trait]
    impl ReachabilityProbe for FixedProbe {
        async fn probe(&self, address: Ipv4Addr) -> Result<bool> {
            match self.0 {
                Answer::Alive => Ok(true),
                Answer::Silent => Ok(false),
                Answer::Broken => Err(Error::ProbeError {
                    address,
                    reason: "socket permission denied".into(),
                }),
            }
        }
    }

    fn account() -> BootstrapAccount {
        BootstrapAccount {
            username: "admin".into(),
            secret: "cisco".into(),
        }
    }

    fn issuer(answer: Answer) -> ConfigIssuer {
        ConfigIssuer::new(Arc::new(FixedProbe(answer)), account())
    }

    #[test]
    fn plan_derives_mask_and_gateway() {
        let plan = BootstrapPlan::new("GigabitEthernet0/0/0", "192.168.1.10/24").unwrap();
        assert_eq!(plan.netmask, Ipv4Addr::new(255, 255, 255, 0));
        assert_eq!(plan.gateway, Ipv4Addr::new(192, 168, 1, 1));
    }

    #[test]
    fn plan_normalizes_interface_and_mask_form() {
        let plan = BootstrapPlan::new("Gig 0/0/1", "10.10.10.1 255.255.255.0").unwrap();
        assert_eq!(plan.interface, "Gig0/0/1");
        assert_eq!(plan.address, Ipv4Addr::new(10, 10, 10, 1));
        assert_eq!(plan.gateway, Ipv4Addr::new(10, 10, 10, 1));
    }

    #[test]
    fn plan_rejects_bad_input() {
        assert!(matches!(
            BootstrapPlan::new("  ", "10.0.0.5/24"),
            Err(Error::InvalidInterfaceName(_))
        ));
        assert!(matches!(
            BootstrapPlan::new("Gi1", "10.0.0.5"),
            Err(Error::InvalidAddressFormat { .. })
        ));
        assert!(matches!(
            BootstrapPlan::new("Gi1", "10.0.0.5/32"),
            Err(Error::InvalidAddressFormat { .. })
        ));
    }

    #[tokio::test]
    async fn free_address_renders_template_verbatim() {
        let config = issuer(Answer::Silent)
            .issue("GigabitEthernet0/0/0", "192.168.1.10/24")
            .await
            .unwrap();
        assert_eq!(config.text, EXPECTED);
    }

    #[tokio::test]
    async fn vrf_forwarding_follows_interface_line() {
        let config = issuer(Answer::Silent)
            .with_vrf_forwarding(true)
            .issue("GigabitEthernet0/0/0", "192.168.1.10/24")
            .await
            .unwrap();
        let expected = EXPECTED.replace(
            "interface GigabitEthernet0/0/0\n",
            "interface GigabitEthernet0/0/0\nvrf forwarding Mgmt-vrf\n",
        );
        assert_eq!(config.text, expected);
    }

    #[tokio::test]
    async fn live_address_is_refused() {
        let result = issuer(Answer::Alive)
            .issue("GigabitEthernet0/0/0", "192.168.1.10/24")
            .await;
        assert_eq!(
            result,
            Err(Error::AddressInUse(Ipv4Addr::new(192, 168, 1, 10)))
        );
    }

    #[tokio::test]
    async fn probe_failure_is_distinct() {
        let result = issuer(Answer::Broken)
            .issue("GigabitEthernet0/0/0", "192.168.1.10/24")
            .await;
        assert!(matches!(result, Err(Error::ProbeError { .. })));
    }
}
