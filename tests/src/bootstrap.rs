#![cfg(test)]
use std::net::Ipv4Addr;
use std::sync::Arc;

use ioskit_common::Error;
use ioskit_common::config::Config;
use ioskit_core::issuer::{BootstrapAccount, ConfigIssuer};

use crate::lab::StaticProbe;

fn issuer(alive: Vec<Ipv4Addr>) -> ConfigIssuer {
    let cfg = Config::default();
    let account = BootstrapAccount {
        username: cfg.issue.admin_username,
        secret: "s3cr3t-from-env".into(),
    };
    ConfigIssuer::new(Arc::new(StaticProbe(alive)), account)
}

#[tokio::test]
async fn free_address_gets_a_full_configuration() {
    let config = issuer(vec![])
        .issue("Gigabit Ethernet 0/0", "10.49.2.11/24")
        .await
        .unwrap();

    assert_eq!(config.plan.interface, "GigabitEthernet0/0");
    assert_eq!(config.plan.gateway, Ipv4Addr::new(10, 49, 2, 1));
    assert!(config.text.contains("interface GigabitEthernet0/0\n"));
    assert!(config.text.contains("ip address 10.49.2.11 255.255.255.0\n"));
    assert!(config.text.contains("ip route vrf Mgmt-vrf 0.0.0.0 0.0.0.0 10.49.2.1\n"));
    assert!(config.text.contains("username admin privilege 15 password s3cr3t-from-env\n"));
    assert!(!config.text.contains("vrf forwarding"));
}

#[tokio::test]
async fn dotted_mask_matches_prefix_form() {
    let slash = issuer(vec![]).issue("Gi0/0", "10.49.2.11/24").await.unwrap();
    let dotted = issuer(vec![])
        .issue("Gi0/0", "10.49.2.11 255.255.255.0")
        .await
        .unwrap();
    assert_eq!(slash, dotted);
}

#[tokio::test]
async fn live_address_is_refused() {
    let taken = Ipv4Addr::new(10, 49, 2, 11);
    let err = issuer(vec![taken])
        .issue("Gi0/0", "10.49.2.11/24")
        .await
        .unwrap_err();
    assert_eq!(err, Error::AddressInUse(taken));
    assert_eq!(err.to_string(), "IP address 10.49.2.11 is already in use");
}

#[tokio::test]
async fn vrf_variant_places_interface_in_mgmt_vrf() {
    let config = issuer(vec![])
        .with_vrf_forwarding(true)
        .issue("GigabitEthernet0/0", "10.49.2.11/24")
        .await
        .unwrap();
    assert!(config
        .text
        .contains("interface GigabitEthernet0/0\nvrf forwarding Mgmt-vrf\nip address"));
}
