//! Total rainfall per state

use super::{Calculation, Calculator, CalculatorKind};
use crate::app::models::{Key, RainfallObservation, UsState};
use crate::app::services::aggregation::{HeaderExclude, Pipeline, PipelineOptions};
use crate::app::services::record_source::RecordSource;
use crate::app::services::reference_graph::ReferenceGraph;
use crate::Result;

/// Sums every reading per state, with the state derived station → county → state
///
/// No date or hour restriction applies. Readings from stations without a
/// county contribute nothing.
#[derive(Debug, Clone, Default)]
pub struct RainfallByStateCalculator {
    options: PipelineOptions,
}

impl RainfallByStateCalculator {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }
}

impl Calculator for RainfallByStateCalculator {
    fn kind(&self) -> CalculatorKind {
        CalculatorKind::RainfallByState
    }

    fn calculate(&self, graph: &ReferenceGraph, source: &dyn RecordSource) -> Result<Calculation> {
        let output = Pipeline::new(RainfallObservation::parse_line)
            .with_row_filter(HeaderExclude::default())
            .group_by(|observation: &RainfallObservation| {
                graph
                    .station_state(observation.station_key())
                    .map(|state| vec![state.static_key().clone()])
                    .unwrap_or_default()
            })
            .with_options(self.options.clone())
            .run(source)?;

        Ok(Calculation {
            kind: self.kind(),
            results: output
                .results
                .into_iter()
                .map(|(state, inches)| (state, inches.to_f64()))
                .collect(),
            stats: output.stats,
        })
    }

    fn label(&self, _graph: &ReferenceGraph, key: &Key) -> String {
        UsState::find_by_abbreviation(key.as_str()).name().to_string()
    }

    fn report_headers(&self) -> (&'static str, &'static str) {
        ("State Name", "Rainfall (inches)")
    }
}
