//! Data models for rainfall statistics
//!
//! This module contains the entity types of the reference graph (statistical
//! areas, counties, weather stations, population records), the rainfall
//! observation record, and the name normalization rules every key derivation
//! relies on.

pub mod census;
pub mod key;
pub mod precipitation;
pub mod state;
pub mod weather;

pub use census::{AreaType, City, County, PopulationRecord, ProjectionYears, StatisticalArea};
pub use key::{Key, Keyed};
pub use precipitation::Inches;
pub use state::UsState;
pub use weather::{RainfallObservation, WeatherStation};

// =============================================================================
// Name Normalization
// =============================================================================

/// Trim padding, drop double quotes and upper-case
///
/// This is the normalization applied to every identifier and name read from
/// an input source.
pub fn clean_string(input: &str) -> String {
    input.trim().replace('"', "").to_uppercase()
}

/// [`clean_string`] with all inner whitespace removed
///
/// Used for the city and state tokens of area keys, so that "Round Rock" and
/// "ROUNDROCK" compare equal.
pub fn normalize_token(input: &str) -> String {
    clean_string(input)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

// =============================================================================
// Entity Variants
// =============================================================================

/// Borrowed view of any entity held by the reference graph
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Population(&'a PopulationRecord),
    County(&'a County),
    Station(&'a WeatherStation),
    State(UsState),
}

impl<'a> EntityRef<'a> {
    /// Short, human-readable entity kind
    pub fn kind(&self) -> &'static str {
        match self {
            EntityRef::Population(_) => "statistical area",
            EntityRef::County(_) => "county",
            EntityRef::Station(_) => "weather station",
            EntityRef::State(_) => "state",
        }
    }

    pub fn key(&self) -> &'a Key {
        match *self {
            EntityRef::Population(record) => record.key(),
            EntityRef::County(county) => county.key(),
            EntityRef::Station(station) => station.key(),
            EntityRef::State(state) => state.static_key(),
        }
    }
}
