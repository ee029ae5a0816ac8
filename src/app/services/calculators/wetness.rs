//! Population-weighted wetness per statistical area

use super::{Calculation, Calculator, CalculatorKind, CalculatorSettings};
use crate::app::models::{Inches, Key, RainfallObservation};
use crate::app::services::aggregation::{
    HeaderExclude, HourWindowExclude, MonthWindowInclude, Pipeline, ResultMap, StationInclude,
};
use crate::app::services::record_source::RecordSource;
use crate::app::services::reference_graph::ReferenceGraph;
use crate::Result;
use tracing::{info, warn};

/// Sums target-month daytime rainfall per area, then weights it by the area's
/// projected population
///
/// A station linked to several areas contributes its full reading to each.
#[derive(Debug, Clone)]
pub struct WetnessCalculator {
    settings: CalculatorSettings,
}

impl WetnessCalculator {
    pub fn new(settings: CalculatorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CalculatorSettings {
        &self.settings
    }
}

impl Calculator for WetnessCalculator {
    fn kind(&self) -> CalculatorKind {
        CalculatorKind::Wetness
    }

    fn calculate(&self, graph: &ReferenceGraph, source: &dyn RecordSource) -> Result<Calculation> {
        let stations = StationInclude::new(graph.stations_with_areas().cloned());
        info!(
            "Wetness for {} over {} area-linked stations",
            self.settings.target_month,
            stations.len()
        );

        let output = Pipeline::new(RainfallObservation::parse_line)
            .with_row_filter(HeaderExclude::default())
            .with_row_filter(stations)
            .with_record_filter(MonthWindowInclude::new(self.settings.target_month.as_str()))
            .with_record_filter(HourWindowExclude::new(
                self.settings.excluded_hour_start,
                self.settings.excluded_hour_end,
            ))
            .group_by(|observation: &RainfallObservation| {
                graph.areas_for_station(observation.station_key()).to_vec()
            })
            .with_options(self.settings.pipeline.clone())
            .run(source)?;

        Ok(Calculation {
            kind: self.kind(),
            results: weight_by_population(graph, output.results),
            stats: output.stats,
        })
    }

    fn label(&self, graph: &ReferenceGraph, key: &Key) -> String {
        graph
            .population(key)
            .map(|record| record.area().name().to_string())
            .unwrap_or_else(|| key.to_string())
    }

    fn report_headers(&self) -> (&'static str, &'static str) {
        ("MSA", "WetnessValue (Person-inches)")
    }
}

/// Multiply each area's aggregated rainfall by its current population
pub fn weight_by_population(graph: &ReferenceGraph, rainfall: ResultMap<Inches>) -> ResultMap<f64> {
    rainfall
        .into_iter()
        .filter_map(|(area, inches)| match graph.population(&area) {
            Some(record) => {
                let wetness = inches.to_f64() * record.current_population() as f64;
                Some((area, wetness))
            }
            None => {
                warn!("No population record for area {}", area);
                None
            }
        })
        .collect()
}
