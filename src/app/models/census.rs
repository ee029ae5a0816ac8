//! Census entities: statistical areas, counties, cities and population records

use super::key::{Key, Keyed};
use super::state::UsState;
use super::{clean_string, normalize_token};
use crate::constants::census_years;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// =============================================================================
// Statistical Area Type
// =============================================================================

/// Census statistical area classification, based on the population of the area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaType {
    Metropolitan,
    Micropolitan,
}

impl AreaType {
    /// Title of the marker row that opens a block of areas of this type
    pub fn title(&self) -> &'static str {
        match self {
            AreaType::Metropolitan => "Metropolitan statistical area",
            AreaType::Micropolitan => "Micropolitan statistical area",
        }
    }

    /// Match a marker row title
    pub fn find_by_title(title: &str) -> Option<AreaType> {
        let title = title.trim();
        [AreaType::Metropolitan, AreaType::Micropolitan]
            .into_iter()
            .find(|area_type| area_type.title().eq_ignore_ascii_case(title))
    }
}

impl fmt::Display for AreaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

// =============================================================================
// Area Name Parsing
// =============================================================================

/// City and state segments of an area title such as "Austin-Round Rock, TX"
#[derive(Debug, Clone, PartialEq)]
pub struct AreaNameParts {
    /// Cleaned city names ("AUSTIN", "ROUND ROCK")
    pub cities: Vec<String>,
    /// Cleaned state abbreviations ("TX")
    pub states: Vec<String>,
}

impl AreaNameParts {
    /// Split an area title into its city list and state list
    ///
    /// Returns `None` when the title has no state segment or an empty
    /// city segment.
    pub fn parse(title: &str) -> Option<Self> {
        let mut segments = title.split(',');
        let city_segment = segments.next()?;
        let state_segment = segments.next()?;

        let cities: Vec<String> = city_segment.split('-').map(clean_string).collect();
        let states: Vec<String> = state_segment.split('-').map(clean_string).collect();

        if cities.iter().all(String::is_empty) || states.iter().all(String::is_empty) {
            return None;
        }

        Some(Self { cities, states })
    }

    /// Deterministic area key, e.g. `AUSTIN-ROUNDROCK,TX`
    pub fn key(&self) -> Key {
        let cities: Vec<String> = self.cities.iter().map(|c| normalize_token(c)).collect();
        let states: Vec<String> = self.states.iter().map(|s| normalize_token(s)).collect();
        Key::new(format!("{},{}", cities.join("-"), states.join("-")))
    }
}

/// Derive the area key for a title, if the title is well formed
pub fn area_key_for(title: &str) -> Option<Key> {
    AreaNameParts::parse(title).map(|parts| parts.key())
}

// =============================================================================
// City
// =============================================================================

/// A city named in a statistical area title
///
/// Key format: `NAME,ST` in upper case, e.g. `AUSTIN,TX`; the state part is
/// empty when the state is not known.
#[derive(Debug, Clone, PartialEq)]
pub struct City {
    key: Key,
    name: String,
    state: UsState,
}

impl City {
    pub fn new(name: &str, state: Option<UsState>) -> Self {
        let name = clean_string(name);
        let state = state.unwrap_or(UsState::Unknown);
        let key = Key::new(format!("{},{}", name, state.abbreviation()));
        Self { key, name, state }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> UsState {
        self.state
    }
}

impl Keyed for City {
    fn key(&self) -> &Key {
        &self.key
    }
}

// =============================================================================
// Statistical Area
// =============================================================================

/// A Census Metropolitan or Micropolitan Statistical Area
///
/// The key is derived once from the title by normalizing its city list and
/// state list. Counties and weather stations are linked by key during graph
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticalArea {
    key: Key,
    area_id: u32,
    name: String,
    area_type: AreaType,
    is_puerto_rico_area: bool,
    cities: Vec<City>,
    states: Vec<UsState>,
    counties: BTreeSet<Key>,
    weather_stations: BTreeSet<Key>,
}

impl StatisticalArea {
    /// Create an area from its census title
    ///
    /// # Errors
    /// Returns `Error::Parse` when the title lacks a city or state segment.
    pub fn new(
        area_id: u32,
        name: &str,
        area_type: AreaType,
        is_puerto_rico_area: bool,
    ) -> Result<Self> {
        let parts = AreaNameParts::parse(name).ok_or_else(|| {
            Error::parse("statistical area", name, "title has no 'cities, states' layout")
        })?;

        let cities = parts
            .cities
            .iter()
            .filter(|city| !city.is_empty())
            .map(|city| City::new(city, None))
            .collect();

        let mut states = Vec::new();
        for abbreviation in &parts.states {
            let state = UsState::find_by_abbreviation(abbreviation);
            if !states.contains(&state) {
                states.push(state);
            }
        }

        Ok(Self {
            key: parts.key(),
            area_id,
            name: name.trim().to_string(),
            area_type,
            is_puerto_rico_area,
            cities,
            states,
            counties: BTreeSet::new(),
            weather_stations: BTreeSet::new(),
        })
    }

    pub fn area_id(&self) -> u32 {
        self.area_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn area_type(&self) -> AreaType {
        self.area_type
    }

    pub fn is_puerto_rico_area(&self) -> bool {
        self.is_puerto_rico_area
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn states(&self) -> &[UsState] {
        &self.states
    }

    /// Whether the state is one of the area's component states
    pub fn spans_state(&self, state: UsState) -> bool {
        self.states.contains(&state)
    }

    pub fn counties(&self) -> &BTreeSet<Key> {
        &self.counties
    }

    pub fn weather_stations(&self) -> &BTreeSet<Key> {
        &self.weather_stations
    }

    pub(crate) fn add_county(&mut self, county: Key) {
        self.counties.insert(county);
    }

    pub(crate) fn add_weather_station(&mut self, station: Key) {
        self.weather_stations.insert(station);
    }
}

impl Keyed for StatisticalArea {
    fn key(&self) -> &Key {
        &self.key
    }
}

// =============================================================================
// County
// =============================================================================

/// A US county; belongs to exactly one state
///
/// Key format: `NAME,ST`, e.g. `TRAVIS,TX`.
#[derive(Debug, Clone, PartialEq)]
pub struct County {
    key: Key,
    name: String,
    state: UsState,
    areas: BTreeSet<Key>,
    weather_stations: BTreeSet<Key>,
}

impl County {
    pub fn new(name: &str, state: UsState) -> Self {
        let name = clean_string(name);
        let key = Self::key_for(&name, state);
        Self {
            key,
            name,
            state,
            areas: BTreeSet::new(),
            weather_stations: BTreeSet::new(),
        }
    }

    /// Key a county with this name and state would carry
    pub fn key_for(name: &str, state: UsState) -> Key {
        Key::new(format!("{},{}", clean_string(name), state.abbreviation()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> UsState {
        self.state
    }

    /// Areas this county is part of
    pub fn areas(&self) -> &BTreeSet<Key> {
        &self.areas
    }

    pub fn weather_stations(&self) -> &BTreeSet<Key> {
        &self.weather_stations
    }

    pub(crate) fn add_area(&mut self, area: Key) {
        self.areas.insert(area);
    }

    pub(crate) fn add_weather_station(&mut self, station: Key) {
        self.weather_stations.insert(station);
    }
}

impl Keyed for County {
    fn key(&self) -> &Key {
        &self.key
    }
}

// =============================================================================
// Population Record
// =============================================================================

/// Years used to project a census population forward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionYears {
    /// Year of the census the ten-year change is measured from
    pub previous_base_year: i32,
    /// Year of the base population figure
    pub base_year: i32,
    /// Year the current population is projected to
    pub target_year: i32,
}

impl Default for ProjectionYears {
    fn default() -> Self {
        Self {
            previous_base_year: census_years::PREVIOUS_BASE_YEAR,
            base_year: census_years::BASE_YEAR,
            target_year: census_years::TARGET_YEAR,
        }
    }
}

/// Population of one statistical area, projected to the target year
///
/// The current population is always derived from the base population and
/// the average yearly change rate; it cannot be supplied directly.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationRecord {
    area: StatisticalArea,
    base_population: u64,
    base_year: i32,
    average_yearly_change_rate: f64,
    current_population: u64,
    current_year: i32,
}

impl PopulationRecord {
    /// Build a record from a census row
    ///
    /// `ten_year_change_percent` is the percentage change between the previous
    /// and the current base census (e.g. `37.3` for +37.3%).
    pub fn project(
        area: StatisticalArea,
        base_population: f64,
        ten_year_change_percent: f64,
        years: &ProjectionYears,
    ) -> Self {
        let base_population = base_population.round().max(0.0) as u64;
        let census_interval = (years.base_year - years.previous_base_year) as f64;
        let average_yearly_change_rate = ten_year_change_percent / (census_interval * 100.0);
        let current_population = project_population(
            base_population,
            years.base_year,
            average_yearly_change_rate,
            years.target_year,
        );

        Self {
            area,
            base_population,
            base_year: years.base_year,
            average_yearly_change_rate,
            current_population,
            current_year: years.target_year,
        }
    }

    pub fn area(&self) -> &StatisticalArea {
        &self.area
    }

    pub(crate) fn area_mut(&mut self) -> &mut StatisticalArea {
        &mut self.area
    }

    pub fn base_population(&self) -> u64 {
        self.base_population
    }

    pub fn base_year(&self) -> i32 {
        self.base_year
    }

    pub fn average_yearly_change_rate(&self) -> f64 {
        self.average_yearly_change_rate
    }

    pub fn current_population(&self) -> u64 {
        self.current_population
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }
}

impl Keyed for PopulationRecord {
    fn key(&self) -> &Key {
        self.area.key()
    }
}

/// Linear projection: `population + round(population × rate × |years|)`
pub fn project_population(
    population: u64,
    from_year: i32,
    average_yearly_change_rate: f64,
    to_year: i32,
) -> u64 {
    let years = (to_year - from_year).abs() as f64;
    let change = (population as f64 * average_yearly_change_rate * years).round() as i64;
    (population as i64 + change).max(0) as u64
}
