use colored::*;

use ioskit_common::device::{DeviceRecord, NOT_AVAILABLE};
use ioskit_core::backup::BackupRecord;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

fn value(text: &str) -> ColoredString {
    if text == NOT_AVAILABLE {
        text.color(colors::MISSING)
    } else {
        text.color(colors::TEXT_DEFAULT)
    }
}

pub fn outcome_tag(success: bool) -> ColoredString {
    if success {
        "ok".color(colors::SUCCESS).bold()
    } else {
        "failed".color(colors::FAILURE).bold()
    }
}

pub fn record_to_details(record: &DeviceRecord) -> Vec<Detail> {
    if let Some(reason) = &record.failure {
        return vec![("Error".into(), reason.as_str().color(colors::FAILURE))];
    }

    let mut details: Vec<Detail> = vec![
        ("Platform".into(), value(record.platform())),
        ("Version".into(), value(record.version())),
        ("Serial".into(), value(record.serial())),
        ("Uptime".into(), value(record.uptime())),
    ];

    match &record.management {
        Some(mgmt) => {
            let address = mgmt.address.to_string().color(colors::IPV4_ADDR);
            details.push(("Mgmt".into(), format!("{} {address}", mgmt.interface).normal()));
            details.push((
                "Link".into(),
                format!("{}/{}", mgmt.status, mgmt.protocol).color(colors::TEXT_DEFAULT),
            ));
        }
        None => details.push(("Mgmt".into(), value(NOT_AVAILABLE))),
    }

    details
}

pub fn backup_to_details(record: &BackupRecord) -> Vec<Detail> {
    match (&record.failure, &record.filename) {
        (Some(reason), _) => vec![("Error".into(), reason.as_str().color(colors::FAILURE))],
        (None, Some(filename)) => vec![("File".into(), filename.as_str().color(colors::TEXT_DEFAULT))],
        (None, None) => vec![],
    }
}
