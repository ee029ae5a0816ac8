//! Row and record filters for the aggregation pipeline
//!
//! Row filters see the raw text line before parsing; record filters see the
//! parsed observation. Both are plain predicates: `true` keeps the item.

use crate::app::models::{Key, RainfallObservation, clean_string};
use crate::constants::{OBSERVATION_DELIMITER, OBSERVATION_FILE_HEADER, observation_columns};
use std::collections::HashSet;
use std::ops::RangeInclusive;

/// Predicate over a raw source line
pub trait RowFilter: Send + Sync {
    fn name(&self) -> &str;
    fn accept(&self, line: &str) -> bool;
}

/// Predicate over a parsed record
pub trait RecordFilter<R>: Send + Sync {
    fn name(&self) -> &str;
    fn accept(&self, record: &R) -> bool;
}

// =============================================================================
// Row Filters
// =============================================================================

/// Drops every line containing the file header
#[derive(Debug, Clone)]
pub struct HeaderExclude {
    header: String,
}

impl HeaderExclude {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }
}

impl Default for HeaderExclude {
    fn default() -> Self {
        Self::new(OBSERVATION_FILE_HEADER)
    }
}

impl RowFilter for HeaderExclude {
    fn name(&self) -> &str {
        "exclude header"
    }

    fn accept(&self, line: &str) -> bool {
        !line.contains(&self.header)
    }
}

/// Keeps lines whose leading station id is in the set of interest
#[derive(Debug, Clone)]
pub struct StationInclude {
    stations: HashSet<Key>,
}

impl StationInclude {
    pub fn new(stations: impl IntoIterator<Item = Key>) -> Self {
        Self {
            stations: stations.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl RowFilter for StationInclude {
    fn name(&self) -> &str {
        "include known stations"
    }

    fn accept(&self, line: &str) -> bool {
        line.split(OBSERVATION_DELIMITER)
            .nth(observation_columns::STATION_ID)
            .map(|id| self.stations.contains(&Key::new(clean_string(id))))
            .unwrap_or(false)
    }
}

// =============================================================================
// Record Filters
// =============================================================================

/// Keeps observations whose date contains the target year-month token
#[derive(Debug, Clone)]
pub struct MonthWindowInclude {
    year_month: String,
}

impl MonthWindowInclude {
    pub fn new(year_month: impl Into<String>) -> Self {
        Self {
            year_month: year_month.into(),
        }
    }
}

impl RecordFilter<RainfallObservation> for MonthWindowInclude {
    fn name(&self) -> &str {
        "include target month"
    }

    fn accept(&self, record: &RainfallObservation) -> bool {
        record.year_month_day().contains(&self.year_month)
    }
}

/// Drops observations whose hour falls in an inclusive window
#[derive(Debug, Clone)]
pub struct HourWindowExclude {
    hours: RangeInclusive<u8>,
}

impl HourWindowExclude {
    pub fn new(start: u8, end: u8) -> Self {
        Self { hours: start..=end }
    }
}

impl RecordFilter<RainfallObservation> for HourWindowExclude {
    fn name(&self) -> &str {
        "exclude hour window"
    }

    fn accept(&self, record: &RainfallObservation) -> bool {
        !self.hours.contains(&record.hour())
    }
}
