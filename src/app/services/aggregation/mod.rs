//! Streaming filter/aggregate pipeline
//!
//! Generic engine that folds a stream of observation rows into a grouped,
//! reduced result map.
//!
//! ## Architecture
//!
//! - [`pipeline`] - Pipeline configuration and the parallel run loop
//! - [`filters`] - Row and record predicates
//! - [`accumulator`] - Sharded concurrent map and reducers
//! - [`stats`] - Per-run statistics
//!
//! ## Usage
//!
//! ```rust
//! use rainfall_stats::app::services::aggregation::{HeaderExclude, Pipeline};
//! use rainfall_stats::app::services::record_source::InMemorySource;
//! use rainfall_stats::{Inches, Key, RainfallObservation};
//!
//! # fn example() -> rainfall_stats::Result<()> {
//! let source = InMemorySource::new(
//!     "observations",
//!     ["Wban,YearMonthDay,Hour,Precipitation,PrecipitationFlag", "000123,20150515,10,0.80,"],
//! );
//!
//! let output = Pipeline::new(RainfallObservation::parse_line)
//!     .with_row_filter(HeaderExclude::default())
//!     .group_by(|obs: &RainfallObservation| vec![obs.station_key().clone()])
//!     .run(&source)?;
//!
//! assert_eq!(output.results.get(&Key::new("000123")), Some(&Inches::from_ten_thousandths(8_000)));
//! # Ok(())
//! # }
//! ```

pub mod accumulator;
pub mod filters;
pub mod pipeline;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use accumulator::{Reducer, ShardedMap, Sum};
pub use filters::{
    HeaderExclude, HourWindowExclude, MonthWindowInclude, RecordFilter, RowFilter, StationInclude,
};
pub use pipeline::{Measured, Pipeline, PipelineOptions, PipelineOutput, ResultMap};
pub use stats::PipelineStats;
