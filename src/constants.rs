//! Application constants for rainfall statistics
//!
//! This module contains column layouts of the input sources, file markers,
//! census projection years and default calculation settings.

// =============================================================================
// Observation File (QCLCD hourly precipitation)
// =============================================================================

/// Header line of the hourly precipitation file
pub const OBSERVATION_FILE_HEADER: &str = "Wban,YearMonthDay,Hour,Precipitation,PrecipitationFlag";

/// Precipitation value marking a trace amount (too small to measure)
pub const TRACE_AMOUNT_INDICATOR: &str = "T";

/// Field delimiter of the observation file
pub const OBSERVATION_DELIMITER: char = ',';

/// Number of fields an observation row must carry
pub const OBSERVATION_FIELD_COUNT: usize = 5;

/// Fractional digits held exactly by a precipitation amount
pub const PRECIPITATION_DECIMALS: usize = 4;

pub mod observation_columns {
    pub const STATION_ID: usize = 0;
    pub const YEAR_MONTH_DAY: usize = 1;
    pub const HOUR: usize = 2;
    pub const PRECIPITATION: usize = 3;
    pub const PRECIPITATION_FLAG: usize = 4;
}

// =============================================================================
// Census Population File (CPH-T-5 export)
// =============================================================================

pub mod population_columns {
    pub const TITLE: usize = 0;
    pub const BASE_POPULATION: usize = 2;
    pub const TEN_YEAR_CHANGE_PERCENT: usize = 4;
}

/// Title of the territory marker row preceding Puerto Rico areas
pub const PUERTO_RICO_MARKER: &str = "Puerto Rico";

/// Census projection years
pub mod census_years {
    /// Base year of the previous decennial census
    pub const PREVIOUS_BASE_YEAR: i32 = 2000;

    /// Base year of the population figures
    pub const BASE_YEAR: i32 = 2010;

    /// Year the population is projected to
    pub const TARGET_YEAR: i32 = 2015;
}

// =============================================================================
// County ↔ Area Linkage File
// =============================================================================

pub mod county_link_columns {
    pub const AREA_TITLE: usize = 3;
    pub const COUNTY_NAME: usize = 7;
    pub const STATE_NAME: usize = 8;
}

/// Administrative suffixes stripped from county names before matching
pub const COMMON_COUNTY_SUFFIXES: &[&str] = &["COUNTY", "MUNICIPIO", "BOROUGH", "MUNICIPALITY"];

// =============================================================================
// Weather Station Master List (wbanmasterlist.psv)
// =============================================================================

/// Marker contained in the master list header line
pub const STATION_MASTER_HEADER_MARKER: &str = "WBAN_ID";

/// Field delimiter of the pipe-separated station files
pub const PSV_DELIMITER: char = '|';

pub mod station_master_columns {
    pub const STATION_ID: usize = 1;
    pub const STATION_NAME: usize = 2;
    pub const STATE_ABBR: usize = 3;
    pub const COUNTY_NAME: usize = 4;
}

// =============================================================================
// Station Activity List (YYYYMMstation.txt)
// =============================================================================

pub mod station_activity_columns {
    pub const STATION_ID: usize = 0;
    pub const CITY_NAME: usize = 6;
    pub const STATE_ABBR: usize = 7;
}

// =============================================================================
// Calculation Defaults
// =============================================================================

/// Year-month token an observation date must contain for wetness
pub const DEFAULT_TARGET_MONTH: &str = "201505";

/// First hour of the excluded overnight window (inclusive)
pub const DEFAULT_EXCLUDED_HOUR_START: u8 = 0;

/// Last hour of the excluded overnight window (inclusive)
pub const DEFAULT_EXCLUDED_HOUR_END: u8 = 7;

/// Number of lock shards in the concurrent accumulator
pub const ACCUMULATOR_SHARDS: usize = 64;

/// Width of the label column in fixed-width reports
pub const REPORT_LABEL_WIDTH: usize = 50;

/// Width of the value column in fixed-width reports
pub const REPORT_VALUE_WIDTH: usize = 40;

/// Config file name looked up under the user config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name under the user config directory
pub const APP_DIR_NAME: &str = "rainfall-stats";
