//! Shared fixtures for calculator tests
//!
//! Observations run against the reference graph fixtures: two Austin stations
//! linked by county, Round Rock and DFW linked by the city fallback, Kansas
//! City reporting only a trace, San Juan in Puerto Rico and one station the
//! graph does not know.

use crate::app::services::aggregation::PipelineOptions;
use crate::app::services::calculators::CalculatorSettings;
use crate::app::services::record_source::InMemorySource;
use crate::constants::OBSERVATION_FILE_HEADER;

pub mod wetness_tests;

pub const OBSERVATION_ROWS: &[&str] = &[
    "13904,20150515,10,0.50,",
    "13958,20150515,12,0.30,",
    "13904,20150515,3,1.00,",
    "13904,20150415,10,2.00,",
    "13988,20150501,9,T,",
    "03927,20150520,14,0.25,",
    "93999,20150520,14,0.40,",
    "11641,20150502,11,0.10,",
    "77777,20150515,10,9.99,",
    "bad,row",
];

pub fn observations() -> InMemorySource {
    observations_from(OBSERVATION_ROWS)
}

pub fn observations_from(rows: &[&str]) -> InMemorySource {
    InMemorySource::new(
        "observations",
        std::iter::once(OBSERVATION_FILE_HEADER).chain(rows.iter().copied()),
    )
}

pub fn settings(workers: usize) -> CalculatorSettings {
    CalculatorSettings {
        pipeline: PipelineOptions::default().with_workers(workers),
        ..CalculatorSettings::default()
    }
}
