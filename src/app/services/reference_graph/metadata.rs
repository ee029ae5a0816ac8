//! Reference graph load statistics
//!
//! Every load stage reports how many rows it read, how many produced or
//! linked an entity, and why the rest were dropped.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Statistics of one load stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageStats {
    /// Stage name used in summaries
    pub stage: String,

    /// Rows produced by the source
    pub rows_read: usize,

    /// Rows that created or linked an entity
    pub rows_linked: usize,

    /// Header, marker, blank and filtered-out rows
    pub rows_skipped: usize,

    /// Rows that referenced an entity missing from the graph
    pub rows_unmatched: usize,

    /// Rows that could not be decoded
    pub parse_errors: usize,

    /// Fallback matches where more than one area qualified
    pub ambiguous_matches: usize,

    /// Time taken by the stage
    pub duration: Duration,
}

impl StageStats {
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            ..Self::default()
        }
    }

    /// Share of read rows that linked, as a percentage
    pub fn link_rate(&self) -> f64 {
        if self.rows_read == 0 {
            0.0
        } else {
            (self.rows_linked as f64 / self.rows_read as f64) * 100.0
        }
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{}: {} rows, {} linked ({:.1}%), {} skipped, {} unmatched, {} unparseable",
            self.stage,
            self.rows_read,
            self.rows_linked,
            self.link_rate(),
            self.rows_skipped,
            self.rows_unmatched,
            self.parse_errors
        );
        if self.ambiguous_matches > 0 {
            summary.push_str(&format!(", {} ambiguous", self.ambiguous_matches));
        }
        summary.push_str(&format!(" in {:.2}s", self.duration.as_secs_f64()));
        summary
    }
}

/// Statistics of a complete graph load, one entry per stage in load order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphLoadStats {
    pub population: StageStats,
    pub county_links: StageStats,
    pub station_master: StageStats,
    pub station_activity: StageStats,

    /// Wall-clock time of the whole load including index builds
    pub total_duration: Duration,
}

impl GraphLoadStats {
    pub fn stages(&self) -> [&StageStats; 4] {
        [
            &self.population,
            &self.county_links,
            &self.station_master,
            &self.station_activity,
        ]
    }

    pub fn total_parse_errors(&self) -> usize {
        self.stages().iter().map(|s| s.parse_errors).sum()
    }

    pub fn summary(&self) -> String {
        let mut lines: Vec<String> = self.stages().iter().map(|s| s.summary()).collect();
        lines.push(format!(
            "Reference data loaded in {:.2}s",
            self.total_duration.as_secs_f64()
        ));
        lines.join("\n")
    }
}
