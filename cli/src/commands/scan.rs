use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use colored::*;
use tracing::{Instrument, info_span, warn};

use ioskit_common::config::{Config, Credentials};
use ioskit_common::network::target;
use ioskit_common::run::ScanRun;
use ioskit_core::inventory::InventoryCollector;
use ioskit_core::network::archive;
use ioskit_core::network::ssh::SshConnector;
use ioskit_core::report;
use ioskit_core::scanner::ScanOrchestrator;

use crate::mprint;
use crate::terminal::{colors, format, print, spinner};

pub struct ScanJob {
    pub range: String,
    pub credentials: Credentials,
    pub output: PathBuf,
    pub archive_credentials: Option<Credentials>,
    pub archive: bool,
}

pub async fn scan(job: ScanJob, cfg: &Config, quiet: u8) -> anyhow::Result<()> {
    let total = target::expand_with_limit(&job.range, cfg.scan.max_targets)?.len();

    let connector = Arc::new(SshConnector::default());
    let collector = Arc::new(InventoryCollector::new(connector, &cfg.scan));

    let span = info_span!("inventory", indicatif.pb_show = true);
    spinner::device_progress(&span, total as u64, "collecting inventory");
    let bar = span.clone();
    let orchestrator = ScanOrchestrator::new(collector, &cfg.scan).with_progress(Box::new(
        move |record| spinner::device_done(&bar, &record.address.to_string()),
    ));

    let start_time = Instant::now();
    let run = orchestrator
        .run(&job.range, &job.credentials)
        .instrument(span)
        .await?;

    print_results(&run, quiet);

    report::export(&run, &job.output)
        .with_context(|| format!("could not write {}", job.output.display()))?;

    if job.archive {
        let sink = archive::from_config(&cfg.archive, job.archive_credentials)?;
        if let Err(e) = report::archive(&run, sink.as_ref()).await {
            warn!("Report kept locally only: {e}");
        }
    }

    print_summary(&run, start_time, quiet);
    Ok(())
}

fn print_results(run: &ScanRun, quiet: u8) {
    if quiet > 1 {
        return;
    }
    if quiet > 0 {
        mprint!();
    }

    print::header("device inventory", quiet);
    for (idx, record) in run.records().iter().enumerate() {
        let name = format!("{} {}", record.address, record.hostname());
        print::tree_head(idx, &name, format::outcome_tag(record.is_success()));
        print::as_tree_one_level(&format::record_to_details(record));
        if idx + 1 != run.total_devices() {
            mprint!();
        }
    }
}

fn print_summary(run: &ScanRun, start_time: Instant, quiet: u8) {
    let ok: ColoredString = format!("{} successful", run.success_count()).green().bold();
    let failed: ColoredString = format!("{} failed", run.error_count()).red().bold();
    let total_time: ColoredString = spinner::finished_in(start_time.elapsed()).yellow().bold();
    let output: String = format!(
        "{} devices: {ok}, {failed} in {total_time}",
        run.total_devices()
    )
    .color(colors::TEXT_DEFAULT)
    .to_string();

    if quiet == 0 {
        print::fat_separator();
    }
    print::centerln(&output);
    if quiet == 0 {
        print::end_of_program();
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
