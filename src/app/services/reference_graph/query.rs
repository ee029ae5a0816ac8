//! Join lookups over the loaded graph
//!
//! These are the only lookups the calculators perform per record; they are
//! all key-indexed.

use super::ReferenceGraph;
use crate::app::models::{EntityRef, Key, Keyed, PopulationRecord, UsState, clean_string};
use std::collections::BTreeSet;

impl ReferenceGraph {
    /// Areas a station contributes to, ordered by area id
    ///
    /// Empty for unknown or unlinked stations.
    pub fn areas_for_station(&self, station: &Key) -> &[Key] {
        self.station_areas
            .get(station)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Keys of every station linked to at least one area
    pub fn stations_with_areas(&self) -> impl Iterator<Item = &Key> {
        self.station_areas.keys()
    }

    /// State of a station, derived through its county
    ///
    /// `None` when the station is unknown or has no county.
    pub fn station_state(&self, station: &Key) -> Option<UsState> {
        let county = self.stations.get(station)?.county()?;
        self.counties.get(county).map(|county| county.state())
    }

    /// Areas a county belongs to
    pub fn county_areas(&self, county: &Key) -> Option<&BTreeSet<Key>> {
        self.counties.get(county).map(|county| county.areas())
    }

    /// Population records sorted by area id
    pub fn populations_by_id(&self) -> Vec<&PopulationRecord> {
        let mut records: Vec<&PopulationRecord> = self.areas.values().collect();
        records.sort_by_key(|record| record.area().area_id());
        records
    }

    /// Look up every entity whose key matches `key` after cleaning
    ///
    /// Keys of different entity kinds can coincide (a station id is never a
    /// county key, but a state abbreviation is a valid lookup alongside
    /// anything else), so all matches are returned.
    pub fn find(&self, key: &str) -> Vec<EntityRef<'_>> {
        let key = Key::new(clean_string(key));
        let mut found = Vec::new();

        if let Some(record) = self.areas.get(&key) {
            found.push(EntityRef::Population(record));
        }
        if let Some(county) = self.counties.get(&key) {
            found.push(EntityRef::County(county));
        }
        if let Some(station) = self.stations.get(&key) {
            found.push(EntityRef::Station(station));
        }

        let state = UsState::find_by_abbreviation(key.as_str());
        if !state.is_unknown() && state.key() == &key {
            found.push(EntityRef::State(state));
        }

        found
    }
}
