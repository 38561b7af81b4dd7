use std::sync::Arc;
use std::time::Instant;

use colored::*;
use tracing::{Instrument, info_span};

use ioskit_common::config::{Config, Credentials};
use ioskit_common::network::target;
use ioskit_core::backup::{BackupRun, ConfigBackup};
use ioskit_core::network::archive;
use ioskit_core::network::icmp::IcmpProbe;
use ioskit_core::network::ssh::SshConnector;

use crate::mprint;
use crate::terminal::{colors, format, print, spinner};

pub async fn backup(
    range: &str,
    credentials: &Credentials,
    archive_credentials: Option<Credentials>,
    cfg: &Config,
    quiet: u8,
) -> anyhow::Result<()> {
    let probe = Arc::new(IcmpProbe::new(&cfg.probe)?);
    let connector = Arc::new(SshConnector::default());
    let sink = Arc::from(archive::from_config(&cfg.archive, archive_credentials)?);
    let total = target::expand_with_limit(range, cfg.scan.max_targets)?.len();

    let span = info_span!("backup", indicatif.pb_show = true);
    spinner::device_progress(&span, total as u64, "pulling configurations");
    let bar = span.clone();
    let service = ConfigBackup::new(probe, connector, sink, &cfg.scan).with_progress(Box::new(
        move |record| spinner::device_done(&bar, &record.address.to_string()),
    ));

    let start_time = Instant::now();
    let run = service.run(range, credentials).instrument(span).await?;

    print_results(&run, quiet);
    print_summary(&run, start_time, quiet);
    Ok(())
}

fn print_results(run: &BackupRun, quiet: u8) {
    if quiet > 1 {
        return;
    }

    print::header("configuration backup", quiet);
    for (idx, record) in run.records.iter().enumerate() {
        let name = match &record.hostname {
            Some(hostname) => format!("{} {hostname}", record.address),
            None => record.address.to_string(),
        };
        let success = record.failure.is_none();
        print::tree_head(idx, &name, format::outcome_tag(success));
        print::as_tree_one_level(&format::backup_to_details(record));
        if idx + 1 != run.total_devices() {
            mprint!();
        }
    }
}

fn print_summary(run: &BackupRun, start_time: Instant, quiet: u8) {
    let ok: ColoredString = format!("{} archived", run.success_count).green().bold();
    let failed: ColoredString = format!("{} failed", run.error_count).red().bold();
    let total_time: ColoredString = spinner::finished_in(start_time.elapsed()).yellow().bold();
    let output: String = format!("{} devices: {ok}, {failed} in {total_time}", run.total_devices())
        .color(colors::TEXT_DEFAULT)
        .to_string();

    if quiet == 0 {
        print::fat_separator();
    }
    print::centerln(&output);
}
