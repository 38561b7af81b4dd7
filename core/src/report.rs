//! # Inventory Report
//!
//! Serializes device records as CSV. The file export and the in-memory byte
//! export share one writer, so both produce identical headers and columns.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;

use ioskit_common::device::DeviceRecord;
use ioskit_common::run::ScanRun;
use ioskit_common::session::ArchiveSink;
use ioskit_common::{Error, Result};

pub const HEADERS: [&str; 9] = [
    "IP Address",
    "Hostname",
    "Platform",
    "Version",
    "Serial Number",
    "Management Interface",
    "Management IP",
    "Uptime",
    "Status",
];

/// Writes `records` as CSV into `writer`. Refuses an empty record set.
pub fn write_records<W: Write>(records: &[DeviceRecord], writer: W) -> Result<()> {
    if records.is_empty() {
        return Err(Error::EmptyReportError);
    }

    let mut table = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    table.write_record(HEADERS).map_err(report_error)?;
    for record in records {
        let address = record.address.to_string();
        let mgmt_address = record.management_address();
        let status = record.outcome.to_string();
        table.write_record([
            address.as_str(),
            record.hostname(),
            record.platform(),
            record.version(),
            record.serial(),
            record.management_interface(),
            mgmt_address.as_str(),
            record.uptime(),
            status.as_str(),
        ])
        .map_err(report_error)?;
    }

    table.flush().map_err(|e| Error::ReportWrite(e.to_string()))
}

/// CSV bytes for a caller-supplied record set; touches no disk.
pub fn to_bytes(records: &[DeviceRecord]) -> Result<Vec<u8>> {
    let mut buffer: Vec<u8> = Vec::new();
    write_records(records, &mut buffer)?;
    Ok(buffer)
}

/// Writes the run to `path`, replacing whatever was there.
///
/// The file is written next to its destination and moved into place, so a
/// failed export never leaves a truncated report behind.
pub fn export(run: &ScanRun, path: &Path) -> Result<PathBuf> {
    let bytes = to_bytes(run.records())?;

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(io_error)?;
    staged.write_all(&bytes).map_err(io_error)?;
    staged
        .persist(path)
        .map_err(|e| Error::ReportWrite(e.error.to_string()))?;

    info!("Report with {} rows written to {}", run.total_devices(), path.display());
    Ok(path.to_path_buf())
}

/// Hands the CSV to `sink` under a timestamped name and returns that name.
pub async fn archive(run: &ScanRun, sink: &dyn ArchiveSink) -> Result<String> {
    let bytes = to_bytes(run.records())?;
    let filename = report_filename(Local::now());
    sink.store(&filename, &bytes).await?;
    info!("Report archived as {filename}");
    Ok(filename)
}

pub fn report_filename(at: DateTime<Local>) -> String {
    format!("CNS_HealthCheck_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

fn report_error(e: csv::Error) -> Error {
    Error::ReportWrite(e.to_string())
}

fn io_error(e: io::Error) -> Error {
    Error::ReportWrite(e.to_string())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
