//! Statistic calculators
//!
//! Each calculator is one configuration of the aggregation pipeline run
//! against the reference graph. Calculators are chosen by [`CalculatorKind`]
//! and driven through the [`Calculator`] trait.

use crate::app::models::Key;
use crate::app::services::aggregation::{PipelineOptions, PipelineStats, ResultMap};
use crate::app::services::record_source::RecordSource;
use crate::app::services::reference_graph::ReferenceGraph;
use crate::constants::{DEFAULT_EXCLUDED_HOUR_END, DEFAULT_EXCLUDED_HOUR_START, DEFAULT_TARGET_MONTH};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod rainfall_by_state;
pub mod report;
pub mod wetness;

#[cfg(test)]
pub mod tests;

pub use rainfall_by_state::RainfallByStateCalculator;
pub use report::render_report;
pub use wetness::WetnessCalculator;

/// Results of one calculator run
#[derive(Debug, Clone)]
pub struct Calculation {
    pub kind: CalculatorKind,
    /// Final statistic per key; rainfall is summed exactly before conversion
    pub results: ResultMap<f64>,
    pub stats: PipelineStats,
}

/// A statistic computed from the reference graph and an observation source
pub trait Calculator: Send + Sync {
    fn kind(&self) -> CalculatorKind;

    /// Run one aggregation pass over `source`
    fn calculate(&self, graph: &ReferenceGraph, source: &dyn RecordSource) -> Result<Calculation>;

    /// Display label of a result key
    fn label(&self, graph: &ReferenceGraph, key: &Key) -> String;

    /// Column headers of the rendered report
    fn report_headers(&self) -> (&'static str, &'static str);

    /// Fixed-width text report of `calculation`
    fn render(&self, graph: &ReferenceGraph, calculation: &Calculation) -> String {
        let rows = calculation
            .results
            .iter()
            .map(|(key, value)| (self.label(graph, key), *value));
        render_report(self.report_headers(), rows)
    }
}

/// Available statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalculatorKind {
    /// Rainfall × projected population per statistical area
    Wetness,
    /// Total rainfall per state
    RainfallByState,
}

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 2] = [CalculatorKind::Wetness, CalculatorKind::RainfallByState];

    /// Stable name, used for report file names
    pub fn name(&self) -> &'static str {
        match self {
            CalculatorKind::Wetness => "wetness",
            CalculatorKind::RainfallByState => "rainfall-by-state",
        }
    }

    pub fn build(&self, settings: &CalculatorSettings) -> Box<dyn Calculator> {
        match self {
            CalculatorKind::Wetness => Box::new(WetnessCalculator::new(settings.clone())),
            CalculatorKind::RainfallByState => {
                Box::new(RainfallByStateCalculator::new(settings.pipeline.clone()))
            }
        }
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Settings shared by the calculators
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorSettings {
    /// Year-month token (`YYYYMM`) observation dates must contain
    pub target_month: String,

    /// First hour of the excluded window (inclusive)
    pub excluded_hour_start: u8,

    /// Last hour of the excluded window (inclusive)
    pub excluded_hour_end: u8,

    pub pipeline: PipelineOptions,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        Self {
            target_month: DEFAULT_TARGET_MONTH.to_string(),
            excluded_hour_start: DEFAULT_EXCLUDED_HOUR_START,
            excluded_hour_end: DEFAULT_EXCLUDED_HOUR_END,
            pipeline: PipelineOptions::default(),
        }
    }
}
