//! Reference graph construction
//!
//! Each stage consumes one source and augments the snapshot left by the
//! previous stage. Only the population stage creates areas; later stages
//! ignore rows naming an area that is not already in the graph.

use super::ReferenceGraph;
use super::metadata::{GraphLoadStats, StageStats};
use super::parser::{
    PopulationLine, classify_population_line, parse_county_link_line, parse_population_row,
    parse_station_activity_line, parse_station_master_line, strip_county_suffix,
};
use crate::app::models::census::area_key_for;
use crate::app::models::{
    AreaType, County, Key, Keyed, PopulationRecord, ProjectionYears, StatisticalArea, UsState,
    WeatherStation, clean_string, normalize_token,
};
use crate::app::services::aggregation::ShardedMap;
use crate::app::services::record_source::RecordSource;
use crate::constants::STATION_MASTER_HEADER_MARKER;
use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// The four reference sources, consumed in field order
#[derive(Clone, Copy)]
pub struct GraphSources<'a> {
    pub population: &'a dyn RecordSource,
    pub county_links: &'a dyn RecordSource,
    pub station_master: &'a dyn RecordSource,
    pub station_activity: &'a dyn RecordSource,
}

/// Settings for a graph load
#[derive(Debug, Clone, PartialEq)]
pub struct GraphOptions {
    /// Area types kept from the population source
    pub area_types: Vec<AreaType>,

    /// Years used for the population projection
    pub projection_years: ProjectionYears,

    /// Show a spinner per load stage
    pub show_progress: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            area_types: vec![AreaType::Metropolitan],
            projection_years: ProjectionYears::default(),
            show_progress: false,
        }
    }
}

impl GraphOptions {
    pub fn with_area_types(mut self, area_types: Vec<AreaType>) -> Self {
        self.area_types = area_types;
        self
    }

    pub fn with_projection_years(mut self, years: ProjectionYears) -> Self {
        self.projection_years = years;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}

impl ReferenceGraph {
    /// Load and link all four reference sources
    ///
    /// # Errors
    /// Fails on the first source that cannot be opened or read. Malformed
    /// rows are skipped and counted in the returned statistics.
    pub fn load(sources: GraphSources<'_>, options: &GraphOptions) -> Result<(Self, GraphLoadStats)> {
        let start = Instant::now();
        let mut graph = Self::new();

        let population = graph.load_population(sources.population, options)?;
        let county_links = graph.link_counties(sources.county_links, options)?;
        let station_master = graph.load_station_master(sources.station_master, options)?;
        let station_activity = graph.link_station_activity(sources.station_activity, options)?;
        graph.index_station_areas();

        let stats = GraphLoadStats {
            population,
            county_links,
            station_master,
            station_activity,
            total_duration: start.elapsed(),
        };

        info!(
            "Reference graph ready: {} areas, {} counties, {} stations ({} linked) in {:.2}s",
            graph.area_count(),
            graph.county_count(),
            graph.station_count(),
            graph.linked_station_count(),
            stats.total_duration.as_secs_f64()
        );

        Ok((graph, stats))
    }

    /// Stage 1: population records for the selected area types
    pub fn load_population(
        &mut self,
        source: &dyn RecordSource,
        options: &GraphOptions,
    ) -> Result<StageStats> {
        let start = Instant::now();
        let mut stats = StageStats::new("Population");
        let progress = stage_spinner(source.name(), options.show_progress);

        let mut current_type: Option<AreaType> = None;
        let mut is_puerto_rico_area = false;
        let mut next_area_id: u32 = 0;

        for line in source.lines()? {
            let line = line?;
            stats.rows_read += 1;
            progress.inc(1);

            let record = match classify_population_line(&line) {
                Ok(PopulationLine::Area(record)) => record,
                Ok(PopulationLine::AreaType(area_type)) => {
                    debug!("Entering {} block", area_type);
                    current_type = Some(area_type);
                    stats.rows_skipped += 1;
                    continue;
                }
                Ok(PopulationLine::Territory) => {
                    is_puerto_rico_area = true;
                    stats.rows_skipped += 1;
                    continue;
                }
                Ok(PopulationLine::Blank) => {
                    stats.rows_skipped += 1;
                    continue;
                }
                Err(e) => {
                    debug!("Skipping population row: {}", e);
                    stats.parse_errors += 1;
                    continue;
                }
            };

            // Rows before the first type marker, or of an unselected type
            let Some(area_type) = current_type.filter(|t| options.area_types.contains(t)) else {
                stats.rows_skipped += 1;
                continue;
            };

            let loaded = parse_population_row(&record).and_then(|row| {
                next_area_id += 1;
                let area = StatisticalArea::new(next_area_id, &row.title, area_type, is_puerto_rico_area)?;
                Ok(PopulationRecord::project(
                    area,
                    row.base_population,
                    row.ten_year_change_percent,
                    &options.projection_years,
                ))
            });

            match loaded {
                Ok(population) => {
                    debug!(
                        "Loaded area {} ({} → {})",
                        population.key(),
                        population.base_population(),
                        population.current_population()
                    );
                    if let Some(previous) = self.areas.insert(population.key().clone(), population) {
                        warn!("Duplicate area key {}, keeping the later row", previous.key());
                    }
                    stats.rows_linked += 1;
                }
                Err(e) => {
                    debug!("Skipping population row: {}", e);
                    stats.parse_errors += 1;
                }
            }
        }

        finish_stage(&mut stats, start, &progress);
        Ok(stats)
    }

    /// Stage 2: exact county/state join onto known areas
    pub fn link_counties(
        &mut self,
        source: &dyn RecordSource,
        options: &GraphOptions,
    ) -> Result<StageStats> {
        let start = Instant::now();
        let mut stats = StageStats::new("County links");
        let progress = stage_spinner(source.name(), options.show_progress);

        for line in source.lines()? {
            let line = line?;
            stats.rows_read += 1;
            progress.inc(1);

            let row = match parse_county_link_line(&line) {
                Ok(row) => row,
                Err(e) => {
                    debug!("Skipping county link row: {}", e);
                    stats.parse_errors += 1;
                    continue;
                }
            };

            let Some(area_key) = area_key_for(&row.area_title) else {
                stats.rows_unmatched += 1;
                continue;
            };

            let Some(record) = self.areas.get_mut(&area_key) else {
                stats.rows_unmatched += 1;
                continue;
            };

            let state = UsState::find_by_name(&row.state_name);
            if !record.area().spans_state(state) {
                debug!("County {} is in {}, outside area {}", row.county_name, row.state_name, area_key);
                stats.rows_unmatched += 1;
                continue;
            }

            let county_name = strip_county_suffix(&row.county_name);
            let county_key = County::key_for(&county_name, state);

            self.counties
                .entry(county_key.clone())
                .or_insert_with(|| County::new(&county_name, state))
                .add_area(area_key.clone());
            record.area_mut().add_county(county_key);
            stats.rows_linked += 1;
        }

        finish_stage(&mut stats, start, &progress);
        Ok(stats)
    }

    /// Stage 3: station master list, linked to areas through the station county
    ///
    /// Every station is recorded, whether or not it links. A station whose
    /// county belongs to several areas joins every one of them; its own area
    /// pointer is the candidate with the lowest area id.
    pub fn load_station_master(
        &mut self,
        source: &dyn RecordSource,
        options: &GraphOptions,
    ) -> Result<StageStats> {
        let start = Instant::now();
        let mut stats = StageStats::new("Station master");
        let county_areas = self.county_area_index();
        debug!("County → area index holds {} counties", county_areas.len());

        let progress = stage_spinner(source.name(), options.show_progress);

        for line in source.lines()? {
            let line = line?;
            stats.rows_read += 1;
            progress.inc(1);

            if line.contains(STATION_MASTER_HEADER_MARKER) {
                stats.rows_skipped += 1;
                continue;
            }

            let row = match parse_station_master_line(&line) {
                Ok(row) => row,
                Err(e) => {
                    debug!("Skipping station master row: {}", e);
                    stats.parse_errors += 1;
                    continue;
                }
            };

            let mut station = WeatherStation::new(&row.station_id, &row.station_name);

            if let (Some(state_abbreviation), Some(county_name)) =
                (&row.state_abbreviation, &row.county_name)
            {
                let state = UsState::find_by_abbreviation(state_abbreviation);
                let county_name = strip_county_suffix(county_name);
                let county_key = County::key_for(&county_name, state);

                self.counties
                    .entry(county_key.clone())
                    .or_insert_with(|| County::new(&county_name, state))
                    .add_weather_station(station.key().clone());
                station.set_county(county_key.clone());

                if let Some(area_keys) = county_areas.get(&county_key) {
                    for area_key in area_keys {
                        if let Some(record) = self.areas.get_mut(area_key) {
                            record.area_mut().add_weather_station(station.key().clone());
                        }
                    }
                    if let Some(first) = area_keys.first() {
                        station.set_area(first.clone());
                        stats.rows_linked += 1;
                    }
                } else {
                    stats.rows_unmatched += 1;
                }
            } else {
                stats.rows_unmatched += 1;
            }

            if self.stations.insert(station.key().clone(), station).is_some() {
                debug!("Duplicate station row: {}", line);
            }
        }

        finish_stage(&mut stats, start, &progress);
        Ok(stats)
    }

    /// Stage 4: city/state substring fallback for stations with no area yet
    ///
    /// A candidate area qualifies when its key contains both the station's
    /// city token and state token. Candidates are scanned in area id order and
    /// the first one wins; stations with several candidates are counted as
    /// ambiguous.
    pub fn link_station_activity(
        &mut self,
        source: &dyn RecordSource,
        options: &GraphOptions,
    ) -> Result<StageStats> {
        let start = Instant::now();
        let mut stats = StageStats::new("Station activity");
        let areas_in_id_order = self.area_keys_by_id();
        let progress = stage_spinner(source.name(), options.show_progress);

        for line in source.lines()? {
            let line = line?;
            stats.rows_read += 1;
            progress.inc(1);

            let row = match parse_station_activity_line(&line) {
                Ok(row) => row,
                Err(e) => {
                    debug!("Skipping station activity row: {}", e);
                    stats.parse_errors += 1;
                    continue;
                }
            };

            let station_key = Key::new(clean_string(&row.station_id));
            let Some(station) = self.stations.get_mut(&station_key) else {
                stats.rows_unmatched += 1;
                continue;
            };

            station.set_located_at(row.located_at());
            if let Some(county) = station.county().and_then(|key| self.counties.get_mut(key)) {
                county.add_weather_station(station_key.clone());
            }

            if station.area().is_some() {
                stats.rows_skipped += 1;
                continue;
            }

            let city_token = normalize_token(&row.city_name);
            let state_token = normalize_token(&row.state_abbreviation);
            if city_token.is_empty() || state_token.is_empty() {
                stats.rows_unmatched += 1;
                continue;
            }

            let candidates: Vec<&Key> = areas_in_id_order
                .iter()
                .filter(|key| key.as_str().contains(&city_token) && key.as_str().contains(&state_token))
                .collect();

            let Some(&chosen) = candidates.first() else {
                stats.rows_unmatched += 1;
                continue;
            };

            if candidates.len() > 1 {
                stats.ambiguous_matches += 1;
                warn!(
                    "Station {} ({}) matches {} areas, linking to {}",
                    station_key,
                    row.located_at(),
                    candidates.len(),
                    chosen
                );
            }

            station.set_area(chosen.clone());
            if let Some(record) = self.areas.get_mut(chosen) {
                record.area_mut().add_weather_station(station_key);
            }
            stats.rows_linked += 1;
        }

        finish_stage(&mut stats, start, &progress);
        Ok(stats)
    }

    /// Area keys in ascending area id order
    pub(crate) fn area_keys_by_id(&self) -> Vec<Key> {
        let mut areas: Vec<(u32, &Key)> = self
            .areas
            .iter()
            .map(|(key, record)| (record.area().area_id(), key))
            .collect();
        areas.sort_unstable();
        areas.into_iter().map(|(_, key)| key.clone()).collect()
    }

    /// County → areas index, built in parallel over the areas' counties
    pub(crate) fn county_area_index(&self) -> HashMap<Key, Vec<Key>> {
        let index = ShardedMap::new();
        self.areas.par_iter().for_each(|(area_key, record)| {
            for county in record.area().counties() {
                index.update_with(county.clone(), Vec::new, |areas: &mut Vec<Key>| {
                    areas.push(area_key.clone())
                });
            }
        });
        self.order_by_area_id(index.into_entries())
    }

    /// Rebuild the station → areas fan-out from the areas' station sets
    pub(crate) fn index_station_areas(&mut self) {
        let index = ShardedMap::new();
        self.areas.par_iter().for_each(|(area_key, record)| {
            for station in record.area().weather_stations() {
                index.update_with(station.clone(), Vec::new, |areas: &mut Vec<Key>| {
                    areas.push(area_key.clone())
                });
            }
        });
        self.station_areas = self.order_by_area_id(index.into_entries());
    }

    fn order_by_area_id(&self, mut index: HashMap<Key, Vec<Key>>) -> HashMap<Key, Vec<Key>> {
        let area_id = |key: &Key| {
            self.areas
                .get(key)
                .map(|record| record.area().area_id())
                .unwrap_or(u32::MAX)
        };
        for areas in index.values_mut() {
            areas.sort_by_key(|key| area_id(key));
            areas.dedup();
        }
        index
    }
}

fn stage_spinner(source_name: &str, show_progress: bool) -> ProgressBar {
    if !show_progress {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {pos} rows {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Loading {}", source_name));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn finish_stage(stats: &mut StageStats, start: Instant, progress: &ProgressBar) {
    stats.duration = start.elapsed();
    progress.finish_and_clear();
    info!("{}", stats.summary());
}
