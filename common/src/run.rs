//! Aggregate of one batch run.

use std::net::Ipv4Addr;

use crate::device::{DeviceRecord, Outcome};

/// All records of one scan plus its counters.
///
/// Records are appended in target order and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanRun {
    records: Vec<DeviceRecord>,
    success_count: usize,
    error_count: usize,
    message: String,
}

impl ScanRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: DeviceRecord) {
        match record.outcome {
            Outcome::Success => self.success_count += 1,
            Outcome::Failure => self.error_count += 1,
        }
        self.records.push(record);
    }

    /// Seals the run and writes the summary message.
    pub fn finalize(mut self) -> Self {
        self.message = format!(
            "Health check completed: {} devices scanned, {} successful, {} failed",
            self.total_devices(),
            self.success_count,
            self.error_count
        );
        self
    }

    pub fn records(&self) -> &[DeviceRecord] {
        &self.records
    }

    pub fn record_for(&self, address: Ipv4Addr) -> Option<&DeviceRecord> {
        self.records.iter().find(|r| r.address == address)
    }

    pub fn total_devices(&self) -> usize {
        self.records.len()
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl FromIterator<DeviceRecord> for ScanRun {
    fn from_iter<I: IntoIterator<Item = DeviceRecord>>(iter: I) -> Self {
        let mut run = Self::new();
        for record in iter {
            run.push(record);
        }
        run.finalize()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::VersionFacts;

    #[test]
    fn counters_follow_outcomes() {
        let run: ScanRun = [
            DeviceRecord::failure(Ipv4Addr::new(10, 0, 0, 1), "refused"),
            DeviceRecord::success(Ipv4Addr::new(10, 0, 0, 2), VersionFacts::default(), None),
            DeviceRecord::failure(Ipv4Addr::new(10, 0, 0, 3), "refused"),
        ]
        .into_iter()
        .collect();

        assert_eq!(run.total_devices(), 3);
        assert_eq!(run.success_count(), 1);
        assert_eq!(run.error_count(), 2);
        assert_eq!(
            run.message(),
            "Health check completed: 3 devices scanned, 1 successful, 2 failed"
        );
        assert!(run.record_for(Ipv4Addr::new(10, 0, 0, 2)).unwrap().is_success());
    }
}
