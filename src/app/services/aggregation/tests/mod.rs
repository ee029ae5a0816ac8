//! Shared fixtures for aggregation pipeline tests

use crate::app::models::Inches;
use crate::app::services::record_source::InMemorySource;
use crate::constants::OBSERVATION_FILE_HEADER;

pub mod pipeline_tests;

/// Observation source with the standard header followed by `rows`
pub fn observation_source(rows: &[&str]) -> InMemorySource {
    InMemorySource::new(
        "observations",
        std::iter::once(OBSERVATION_FILE_HEADER).chain(rows.iter().copied()),
    )
}

/// Parse a precipitation literal
pub fn inches(value: &str) -> Inches {
    value.parse().unwrap()
}

/// Observation rows over four stations, with hundredths that have no exact
/// binary form
pub const SAMPLE_ROWS: &[&str] = &[
    "13904,20150515,10,0.10,",
    "13904,20150515,11,0.07,",
    "13958,20150516,12,0.30,",
    "13958,20150516,13,T,",
    "13988,20150501,9,1.01,",
    "13904,20150415,10,0.20,",
    "13904,20150515,3,0.03,",
    "03927,20150520,14,0.70,s",
];
