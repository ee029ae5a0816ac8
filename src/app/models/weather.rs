//! Weather stations and hourly rainfall observations

use super::clean_string;
use super::key::{Key, Keyed};
use super::precipitation::Inches;
use crate::constants::{
    OBSERVATION_DELIMITER, OBSERVATION_FIELD_COUNT, TRACE_AMOUNT_INDICATOR, observation_columns,
};
use crate::{Error, Result};
use chrono::NaiveDate;

const OBSERVATION_SOURCE: &str = "rainfall observation";

// =============================================================================
// Weather Station
// =============================================================================

/// A WBAN weather station
///
/// County and area links are filled in by the reference graph builder; the
/// station's own source rows never name an area.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherStation {
    key: Key,
    name: String,
    county: Option<Key>,
    area: Option<Key>,
    located_at: Option<String>,
}

impl WeatherStation {
    pub fn new(station_id: &str, name: &str) -> Self {
        Self {
            key: Key::new(clean_string(station_id)),
            name: clean_string(name),
            county: None,
            area: None,
            located_at: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn county(&self) -> Option<&Key> {
        self.county.as_ref()
    }

    /// Statistical area the station resolved to
    pub fn area(&self) -> Option<&Key> {
        self.area.as_ref()
    }

    /// Free-text location, `CITY,ST` from the station activity list
    pub fn located_at(&self) -> Option<&str> {
        self.located_at.as_deref()
    }

    pub(crate) fn set_county(&mut self, county: Key) {
        self.county = Some(county);
    }

    pub(crate) fn set_area(&mut self, area: Key) {
        self.area = Some(area);
    }

    pub(crate) fn set_located_at(&mut self, located_at: String) {
        self.located_at = Some(located_at);
    }
}

impl Keyed for WeatherStation {
    fn key(&self) -> &Key {
        &self.key
    }
}

// =============================================================================
// Rainfall Observation
// =============================================================================

/// One hourly precipitation reading
///
/// Key format: `stationId-date-hour`. Repeated readings share a key but the
/// aggregation pipeline treats every row as its own data point.
#[derive(Debug, Clone, PartialEq)]
pub struct RainfallObservation {
    key: Key,
    station_key: Key,
    year_month_day: String,
    hour: u8,
    precipitation: Inches,
    precipitation_flag: String,
}

impl RainfallObservation {
    /// Decode a comma separated observation row
    ///
    /// An empty precipitation field or a trace amount reads as zero.
    ///
    /// # Errors
    /// Returns `Error::Parse` when the row has too few fields, the date is not
    /// a valid `YYYYMMDD` calendar date, or hour / precipitation are not numeric.
    pub fn parse_line(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split(OBSERVATION_DELIMITER).map(str::trim).collect();
        if fields.len() < OBSERVATION_FIELD_COUNT {
            return Err(Error::parse(
                OBSERVATION_SOURCE,
                line,
                format!(
                    "expected {} fields, found {}",
                    OBSERVATION_FIELD_COUNT,
                    fields.len()
                ),
            ));
        }

        let station_id = clean_string(fields[observation_columns::STATION_ID]);
        if station_id.is_empty() {
            return Err(Error::parse(OBSERVATION_SOURCE, line, "empty station id"));
        }

        let year_month_day = fields[observation_columns::YEAR_MONTH_DAY].to_string();
        if !is_calendar_date(&year_month_day) {
            return Err(Error::parse(
                OBSERVATION_SOURCE,
                line,
                format!("invalid date '{}'", year_month_day),
            ));
        }

        let hour_field = fields[observation_columns::HOUR];
        let hour = hour_field.parse::<u8>().map_err(|e| {
            Error::parse(OBSERVATION_SOURCE, line, format!("invalid hour '{}': {}", hour_field, e))
        })?;

        let precipitation = parse_precipitation(fields[observation_columns::PRECIPITATION])
            .map_err(|reason| Error::parse(OBSERVATION_SOURCE, line, reason))?;

        let key = Key::new(format!("{}-{}-{}", station_id, year_month_day, hour));

        Ok(Self {
            key,
            station_key: Key::new(station_id),
            year_month_day,
            hour,
            precipitation,
            precipitation_flag: fields[observation_columns::PRECIPITATION_FLAG].to_string(),
        })
    }

    /// Key of the reporting station
    pub fn station_key(&self) -> &Key {
        &self.station_key
    }

    /// Observation date as `YYYYMMDD`
    pub fn year_month_day(&self) -> &str {
        &self.year_month_day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Precipitation in inches
    pub fn precipitation(&self) -> Inches {
        self.precipitation
    }

    pub fn precipitation_flag(&self) -> &str {
        &self.precipitation_flag
    }
}

impl Keyed for RainfallObservation {
    fn key(&self) -> &Key {
        &self.key
    }
}

fn is_calendar_date(value: &str) -> bool {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let (Ok(year), Ok(month), Ok(day)) = (
        value[0..4].parse::<i32>(),
        value[4..6].parse::<u32>(),
        value[6..8].parse::<u32>(),
    ) else {
        return false;
    };
    NaiveDate::from_ymd_opt(year, month, day).is_some()
}

fn parse_precipitation(value: &str) -> std::result::Result<Inches, String> {
    if value.is_empty() || value.contains(TRACE_AMOUNT_INDICATOR) {
        return Ok(Inches::ZERO);
    }
    Inches::parse(value)
}
