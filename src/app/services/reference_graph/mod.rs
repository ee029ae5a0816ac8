//! Linked reference graph of statistical areas, counties and weather stations
//!
//! The graph is loaded once from four reference sources, in order:
//!
//! 1. population by area - the authoritative set of areas
//! 2. county ↔ area linkage - exact county/state join onto known areas
//! 3. station master list - stations linked to areas through their county
//! 4. station activity list - city/state substring fallback for stations
//!    the county join missed
//!
//! After loading, the graph is read-only. Entities reference each other by
//! [`Key`] only; a station's state is derived through its county.
//!
//! - [`builder`] - Load stages and index construction
//! - [`parser`] - Row decoding for each reference source
//! - [`query`] - Join lookups used by the calculators
//! - [`metadata`] - Per-stage load statistics

use crate::app::models::{County, Key, PopulationRecord, WeatherStation};
use std::collections::HashMap;

pub mod builder;
pub mod metadata;
pub mod parser;
pub mod query;

#[cfg(test)]
pub mod tests;

pub use builder::{GraphOptions, GraphSources};
pub use metadata::{GraphLoadStats, StageStats};

/// In-memory reference graph
#[derive(Debug, Clone, Default)]
pub struct ReferenceGraph {
    /// Population records indexed by area key
    pub(crate) areas: HashMap<Key, PopulationRecord>,

    /// Counties from the linkage file and the station master list
    pub(crate) counties: HashMap<Key, County>,

    /// Every station of the master list, linked or not
    pub(crate) stations: HashMap<Key, WeatherStation>,

    /// Station → areas fan-out, each list ordered by area id
    pub(crate) station_areas: HashMap<Key, Vec<Key>>,
}

impl ReferenceGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    pub fn population(&self, area: &Key) -> Option<&PopulationRecord> {
        self.areas.get(area)
    }

    pub fn populations(&self) -> impl Iterator<Item = &PopulationRecord> {
        self.areas.values()
    }

    pub fn county(&self, county: &Key) -> Option<&County> {
        self.counties.get(county)
    }

    pub fn counties(&self) -> impl Iterator<Item = &County> {
        self.counties.values()
    }

    pub fn station(&self, station: &Key) -> Option<&WeatherStation> {
        self.stations.get(station)
    }

    pub fn stations(&self) -> impl Iterator<Item = &WeatherStation> {
        self.stations.values()
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    pub fn county_count(&self) -> usize {
        self.counties.len()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Stations linked to at least one area
    pub fn linked_station_count(&self) -> usize {
        self.station_areas.len()
    }
}
