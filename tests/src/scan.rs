#![cfg(test)]
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use ioskit_common::Error;
use ioskit_common::config::{Config, ScanConfig};
use ioskit_common::device::Outcome;
use ioskit_core::inventory::InventoryCollector;
use ioskit_core::report;
use ioskit_core::scanner::ScanOrchestrator;

use crate::lab::{Lab, LabDevice, MemoryArchive, creds};

fn edge_switch() -> LabDevice {
    LabDevice {
        hostname: "edge-sw-02",
        platform: "C9200L-48P-4G",
        serial: "JAE24150XYZ",
        mgmt_address: Ipv4Addr::new(10, 49, 7, 2),
    }
}

fn orchestrator(lab: Arc<Lab>, cfg: &ScanConfig) -> ScanOrchestrator {
    let collector = Arc::new(InventoryCollector::new(lab, cfg));
    ScanOrchestrator::new(collector, cfg)
}

#[tokio::test]
async fn mixed_range_produces_one_row_per_device() {
    let lab = Arc::new(Lab::default().with_device(Ipv4Addr::new(10, 10, 10, 2), edge_switch()));
    let cfg = ScanConfig::default();

    let run = orchestrator(lab.clone(), &cfg)
        .run("10.10.10.1 - 10.10.10.3", &creds())
        .await
        .unwrap();

    assert_eq!(run.total_devices(), 3);
    assert_eq!(run.success_count(), 1);
    assert_eq!(run.error_count(), 2);
    assert_eq!(
        run.message(),
        "Health check completed: 3 devices scanned, 1 successful, 2 failed"
    );
    assert_eq!(lab.logins.load(Ordering::SeqCst), 3);
    assert_eq!(lab.closes.load(Ordering::SeqCst), 1);

    let good = run.record_for(Ipv4Addr::new(10, 10, 10, 2)).unwrap();
    assert_eq!(good.outcome, Outcome::Success);
    assert_eq!(good.management_interface(), "GigabitEthernet0/0");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output.csv");
    report::export(&run, &path).unwrap();
    let csv = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = csv.split("\r\n").filter(|l| !l.is_empty()).collect();

    assert_eq!(
        lines,
        vec![
            "IP Address,Hostname,Platform,Version,Serial Number,Management Interface,Management IP,Uptime,Status",
            "10.10.10.1,N/A,N/A,N/A,N/A,N/A,N/A,N/A,error",
            "10.10.10.2,edge-sw-02,C9200L-48P-4G,16.12.05,JAE24150XYZ,GigabitEthernet0/0,10.49.7.2,\"12 weeks, 2 days, 4 hours, 1 minute\",success",
            "10.10.10.3,N/A,N/A,N/A,N/A,N/A,N/A,N/A,error",
        ]
    );
}

#[tokio::test]
async fn management_prefix_comes_from_settings() {
    let cfg = Config::from_toml(
        r#"
[scan]
management_prefix = "172.16.0.0/16"
concurrency = 2
"#,
    )
    .unwrap();

    let lab = Arc::new(Lab::default().with_device(Ipv4Addr::new(10, 10, 10, 5), edge_switch()));
    let run = orchestrator(lab, &cfg.scan)
        .run("10.10.10.5", &creds())
        .await
        .unwrap();

    let record = &run.records()[0];
    assert_eq!(record.management_interface(), "Vlan20");
    assert_eq!(record.management_address(), "172.16.20.1");
}

#[tokio::test]
async fn oversized_range_is_rejected_before_login() {
    let lab = Arc::new(Lab::default());
    let cfg = ScanConfig {
        max_targets: 16,
        ..ScanConfig::default()
    };

    let err = orchestrator(lab.clone(), &cfg)
        .run("10.0.0.1-10.0.1.1", &creds())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidRangeFormat { .. }));
    assert_eq!(lab.logins.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn archived_report_matches_exported_bytes() {
    let lab = Arc::new(Lab::default().with_device(Ipv4Addr::new(10, 10, 10, 2), edge_switch()));
    let run = orchestrator(lab, &ScanConfig::default())
        .run("10.10.10.2", &creds())
        .await
        .unwrap();

    let archive = MemoryArchive::default();
    let filename = report::archive(&run, &archive).await.unwrap();
    assert!(filename.starts_with("CNS_HealthCheck_"));
    assert!(filename.ends_with(".csv"));

    let stored = archive.stored.lock().unwrap();
    assert_eq!(stored[0].0, filename);
    assert_eq!(stored[0].1, report::to_bytes(run.records()).unwrap());
}
