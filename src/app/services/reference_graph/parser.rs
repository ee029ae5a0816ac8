//! Row decoding for the reference sources
//!
//! Census exports are comma separated with quoted titles and thousands
//! separators; station lists are pipe separated.

use crate::app::models::{AreaType, clean_string};
use crate::constants::{
    COMMON_COUNTY_SUFFIXES, PSV_DELIMITER, PUERTO_RICO_MARKER, county_link_columns,
    population_columns, station_activity_columns, station_master_columns,
};
use crate::{Error, Result};
use csv::{ReaderBuilder, StringRecord};
use regex::Regex;
use std::sync::LazyLock;

const POPULATION_SOURCE: &str = "population";
const COUNTY_LINK_SOURCE: &str = "county link";
const STATION_MASTER_SOURCE: &str = "station master";
const STATION_ACTIVITY_SOURCE: &str = "station activity";

static COUNTY_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"\b(?:{})\b", COMMON_COUNTY_SUFFIXES.join("|"));
    Regex::new(&pattern).expect("county suffix pattern is valid")
});

/// Split one comma separated row, honouring quotes
pub fn split_csv_row(line: &str) -> Result<StringRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    reader.read_record(&mut record)?;
    Ok(record)
}

/// Split one pipe separated row
pub fn split_psv_row(line: &str) -> Vec<&str> {
    line.trim().split(PSV_DELIMITER).collect()
}

/// Clean a county name and drop administrative suffixes ("Travis County" → "TRAVIS")
pub fn strip_county_suffix(name: &str) -> String {
    let cleaned = clean_string(name);
    COUNTY_SUFFIX_RE
        .replace_all(&cleaned, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a census number such as `1,716,289` or `37.3`
pub fn parse_census_number(value: &str) -> Option<f64> {
    let digits: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != '%')
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok()
}

fn field<'r>(record: &'r StringRecord, index: usize) -> Option<&'r str> {
    record.get(index).map(str::trim)
}

// =============================================================================
// Population
// =============================================================================

/// Classified row of the population export
#[derive(Debug, Clone, PartialEq)]
pub enum PopulationLine {
    /// Row with an empty title
    Blank,
    /// Marker opening the territory block; areas after it are Puerto Rico areas
    Territory,
    /// Marker opening a block of areas of one type
    AreaType(AreaType),
    /// Candidate data row
    Area(StringRecord),
}

/// Decoded population data row
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationRow {
    pub title: String,
    pub base_population: f64,
    pub ten_year_change_percent: f64,
}

pub fn classify_population_line(line: &str) -> Result<PopulationLine> {
    let record = split_csv_row(line)?;
    let title = field(&record, population_columns::TITLE).unwrap_or("");

    if title.is_empty() {
        Ok(PopulationLine::Blank)
    } else if title.eq_ignore_ascii_case(PUERTO_RICO_MARKER) {
        Ok(PopulationLine::Territory)
    } else if let Some(area_type) = AreaType::find_by_title(title) {
        Ok(PopulationLine::AreaType(area_type))
    } else {
        Ok(PopulationLine::Area(record))
    }
}

pub fn parse_population_row(record: &StringRecord) -> Result<PopulationRow> {
    let row_text = || record.iter().collect::<Vec<_>>().join(",");

    let title = field(record, population_columns::TITLE).unwrap_or("").to_string();

    let base_population = field(record, population_columns::BASE_POPULATION)
        .and_then(parse_census_number)
        .ok_or_else(|| Error::parse(POPULATION_SOURCE, row_text(), "missing or non-numeric base population"))?;

    let ten_year_change_percent = field(record, population_columns::TEN_YEAR_CHANGE_PERCENT)
        .and_then(parse_census_number)
        .ok_or_else(|| Error::parse(POPULATION_SOURCE, row_text(), "missing or non-numeric population change"))?;

    Ok(PopulationRow {
        title,
        base_population,
        ten_year_change_percent,
    })
}

// =============================================================================
// County Link
// =============================================================================

/// Decoded county ↔ area row
#[derive(Debug, Clone, PartialEq)]
pub struct CountyLinkRow {
    pub area_title: String,
    pub county_name: String,
    pub state_name: String,
}

pub fn parse_county_link_line(line: &str) -> Result<CountyLinkRow> {
    let record = split_csv_row(line)?;

    let get = |index: usize, what: &str| {
        field(&record, index)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .ok_or_else(|| Error::parse(COUNTY_LINK_SOURCE, line, format!("missing {}", what)))
    };

    Ok(CountyLinkRow {
        area_title: get(county_link_columns::AREA_TITLE, "area title")?,
        county_name: get(county_link_columns::COUNTY_NAME, "county name")?,
        state_name: get(county_link_columns::STATE_NAME, "state name")?,
    })
}

// =============================================================================
// Stations
// =============================================================================

/// Decoded station master row; county and state are optional
#[derive(Debug, Clone, PartialEq)]
pub struct StationMasterRow {
    pub station_id: String,
    pub station_name: String,
    pub state_abbreviation: Option<String>,
    pub county_name: Option<String>,
}

pub fn parse_station_master_line(line: &str) -> Result<StationMasterRow> {
    let fields = split_psv_row(line);

    if fields.len() <= station_master_columns::STATION_NAME {
        return Err(Error::parse(
            STATION_MASTER_SOURCE,
            line,
            format!("expected at least {} fields, found {}", station_master_columns::STATION_NAME + 1, fields.len()),
        ));
    }

    let station_id = clean_string(fields[station_master_columns::STATION_ID]);
    if station_id.is_empty() {
        return Err(Error::parse(STATION_MASTER_SOURCE, line, "empty station id"));
    }

    let optional = |index: usize| {
        fields
            .get(index)
            .map(|value| clean_string(value))
            .filter(|value| !value.is_empty())
    };

    Ok(StationMasterRow {
        station_id,
        station_name: clean_string(fields[station_master_columns::STATION_NAME]),
        state_abbreviation: optional(station_master_columns::STATE_ABBR),
        county_name: optional(station_master_columns::COUNTY_NAME),
    })
}

/// Decoded station activity row
#[derive(Debug, Clone, PartialEq)]
pub struct StationActivityRow {
    pub station_id: String,
    pub city_name: String,
    pub state_abbreviation: String,
}

impl StationActivityRow {
    /// Location descriptor `CITY,ST`
    pub fn located_at(&self) -> String {
        format!("{},{}", self.city_name, self.state_abbreviation)
    }
}

pub fn parse_station_activity_line(line: &str) -> Result<StationActivityRow> {
    let fields = split_psv_row(line);

    if fields.len() <= station_activity_columns::STATE_ABBR {
        return Err(Error::parse(
            STATION_ACTIVITY_SOURCE,
            line,
            format!("expected at least {} fields, found {}", station_activity_columns::STATE_ABBR + 1, fields.len()),
        ));
    }

    Ok(StationActivityRow {
        station_id: clean_string(fields[station_activity_columns::STATION_ID]),
        city_name: clean_string(fields[station_activity_columns::CITY_NAME]),
        state_abbreviation: clean_string(fields[station_activity_columns::STATE_ABBR]),
    })
}
