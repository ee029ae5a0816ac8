//! Pipeline run statistics
//!
//! Workers bump lock-free counters while a run is in flight; the run returns a
//! plain snapshot once every worker has finished.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counters shared by every worker of one run
#[derive(Debug, Default)]
pub(crate) struct PipelineCounters {
    lines_read: AtomicU64,
    rows_filtered: AtomicU64,
    parse_errors: AtomicU64,
    records_filtered: AtomicU64,
    unmatched_records: AtomicU64,
    contributions: AtomicU64,
}

impl PipelineCounters {
    pub(crate) fn line_read(&self) {
        self.lines_read.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn row_filtered(&self) {
        self.rows_filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn parse_error(&self) {
        self.parse_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_filtered(&self) {
        self.records_filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn unmatched(&self) {
        self.unmatched_records.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn contributed(&self, groups: usize) {
        self.contributions.fetch_add(groups as u64, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, groups: usize, duration: Duration) -> PipelineStats {
        PipelineStats {
            lines_read: self.lines_read.load(Ordering::Relaxed),
            rows_filtered: self.rows_filtered.load(Ordering::Relaxed),
            parse_errors: self.parse_errors.load(Ordering::Relaxed),
            records_filtered: self.records_filtered.load(Ordering::Relaxed),
            unmatched_records: self.unmatched_records.load(Ordering::Relaxed),
            contributions: self.contributions.load(Ordering::Relaxed),
            groups: groups as u64,
            duration,
        }
    }
}

/// Statistics of one completed pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Lines produced by the source
    pub lines_read: u64,

    /// Lines dropped by a row filter
    pub rows_filtered: u64,

    /// Lines that could not be parsed and were skipped
    pub parse_errors: u64,

    /// Parsed records dropped by a record filter
    pub records_filtered: u64,

    /// Records that resolved to no group
    pub unmatched_records: u64,

    /// Record-to-group contributions (a fan-out record counts once per group)
    pub contributions: u64,

    /// Groups in the result
    pub groups: u64,

    /// Wall-clock time of the run
    pub duration: Duration,
}

impl PipelineStats {
    /// Records that reached the accumulator at least once
    pub fn records_matched(&self) -> u64 {
        self.lines_read
            .saturating_sub(self.rows_filtered)
            .saturating_sub(self.parse_errors)
            .saturating_sub(self.records_filtered)
            .saturating_sub(self.unmatched_records)
    }

    /// Lines processed per second
    pub fn throughput(&self) -> f64 {
        if self.duration.is_zero() {
            0.0
        } else {
            self.lines_read as f64 / self.duration.as_secs_f64()
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Read {} lines: {} row-filtered, {} unparseable, {} record-filtered, {} unmatched, {} matched into {} groups in {:.2}s",
            self.lines_read,
            self.rows_filtered,
            self.parse_errors,
            self.records_filtered,
            self.unmatched_records,
            self.records_matched(),
            self.groups,
            self.duration.as_secs_f64()
        )
    }
}
