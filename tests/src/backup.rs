#![cfg(test)]
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use ioskit_common::config::ScanConfig;
use ioskit_common::device::Outcome;
use ioskit_core::backup::ConfigBackup;
use ioskit_core::network::archive::DirectoryArchive;

use crate::lab::{Lab, LabDevice, creds};

fn core_router() -> LabDevice {
    LabDevice {
        hostname: "core-rtr-01",
        platform: "ISR4431/K9",
        serial: "FDO21120ABC",
        mgmt_address: Ipv4Addr::new(10, 49, 0, 1),
    }
}

#[tokio::test]
async fn reachable_devices_land_in_the_backup_folder() {
    let lab = Arc::new(Lab::default().with_device(Ipv4Addr::new(10, 20, 0, 2), core_router()));
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("backups");
    let archive = Arc::new(DirectoryArchive::new(&folder));

    let service = ConfigBackup::new(lab.clone(), lab.clone(), archive, &ScanConfig::default());
    let run = service.run("10.20.0.1-10.20.0.2", &creds()).await.unwrap();

    assert_eq!(run.total_devices(), 2);
    assert_eq!(run.success_count, 1);
    assert_eq!(run.error_count, 1);
    assert_eq!(run.records[0].outcome, Outcome::Failure);
    assert_eq!(
        run.records[0].failure.as_deref(),
        Some("Device 10.20.0.1 is unreachable")
    );
    // The silent host is never logged into.
    assert_eq!(lab.logins.load(Ordering::SeqCst), 1);
    assert_eq!(lab.closes.load(Ordering::SeqCst), 1);

    let filename = run.records[1].filename.clone().unwrap();
    assert!(filename.starts_with("core-rtr-01_"));
    let saved = std::fs::read_to_string(folder.join(&filename)).unwrap();
    assert!(saved.contains("hostname core-rtr-01"));
}
