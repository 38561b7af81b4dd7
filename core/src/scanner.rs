//! # Batch Scan Orchestrator
//!
//! Expands the target expression, hands every address to the
//! [`InventoryCollector`] and aggregates the records into a [`ScanRun`].
//!
//! Hosts are collected with bounded concurrency, yet records are appended in
//! ascending address order regardless of which host answers first. A single
//! host can only ever produce its own record; there is no path by which one
//! failure aborts the batch.

use std::sync::Arc;

use futures::StreamExt;
use futures::stream;
use tracing::{Instrument, info, info_span};

use ioskit_common::Result;
use ioskit_common::config::{Credentials, ScanConfig};
use ioskit_common::device::DeviceRecord;
use ioskit_common::network::target;
use ioskit_common::run::ScanRun;

use crate::inventory::InventoryCollector;

/// Called once per finished host, in report order.
pub type RecordCallback = Box<dyn Fn(&DeviceRecord) + Send + Sync>;

pub struct ScanOrchestrator {
    collector: Arc<InventoryCollector>,
    concurrency: usize,
    max_targets: u64,
    on_record: Option<RecordCallback>,
}

impl ScanOrchestrator {
    pub fn new(collector: Arc<InventoryCollector>, cfg: &ScanConfig) -> Self {
        Self {
            collector,
            concurrency: cfg.concurrency.max(1),
            max_targets: cfg.max_targets,
            on_record: None,
        }
    }

    pub fn with_progress(mut self, on_record: RecordCallback) -> Self {
        self.on_record = Some(on_record);
        self
    }

    /// Scans every address in `expression`.
    ///
    /// Fails only when the expression itself is invalid, before any session
    /// is opened.
    pub async fn run(&self, expression: &str, credentials: &Credentials) -> Result<ScanRun> {
        let targets = target::expand_with_limit(expression, self.max_targets)?;
        let span = info_span!("scan", targets = targets.len());

        async {
            let unit = if targets.len() == 1 { "device" } else { "devices" };
            info!("Scanning {} {unit} from '{}'", targets.len(), expression.trim());

            let mut records = stream::iter(targets)
                .map(|address| self.collector.collect(address, credentials))
                .buffered(self.concurrency);

            let mut run = ScanRun::new();
            while let Some(record) = records.next().await {
                if let Some(on_record) = &self.on_record {
                    on_record(&record);
                }
                run.push(record);
            }

            let run = run.finalize();
            info!("{}", run.message());
            Ok(run)
        }
        .instrument(span)
        .await
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
