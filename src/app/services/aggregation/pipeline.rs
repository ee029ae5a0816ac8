//! Streaming filter/aggregate engine
//!
//! A [`Pipeline`] turns the rows of a [`RecordSource`] into a key-grouped,
//! reduced result map:
//!
//! ```text
//! line -> row filters -> parser -> record filters -> grouping keys -> reducer
//! ```
//!
//! Rows are processed on a dedicated rayon pool in no particular order. The
//! reducer must be associative and commutative, which makes the result
//! independent of scheduling. Rainfall is aggregated as exact [`Inches`], so
//! the default sum holds that requirement.

use super::accumulator::{Reducer, ShardedMap, Sum};
use super::filters::{RecordFilter, RowFilter};
use super::stats::{PipelineCounters, PipelineStats};
use crate::app::models::{Inches, Key, RainfallObservation};
use crate::app::services::record_source::RecordSource;
use crate::constants::ACCUMULATOR_SHARDS;
use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Records that carry the value the pipeline aggregates
pub trait Measured {
    type Value: Clone + Send;

    fn value(&self) -> Self::Value;
}

impl Measured for RainfallObservation {
    type Value = Inches;

    fn value(&self) -> Inches {
        self.precipitation()
    }
}

/// Ascending `Key → value` map
pub type ResultMap<V> = BTreeMap<Key, V>;

type Parser<'g, R> = Box<dyn Fn(&str) -> Result<R> + Send + Sync + 'g>;
type Grouping<'g, R> = Box<dyn Fn(&R) -> Vec<Key> + Send + Sync + 'g>;

/// Execution settings for a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Worker threads (0 = one per logical CPU)
    pub workers: usize,

    /// Lock shards of the accumulator
    pub shards: usize,

    /// Show a spinner while rows are processed
    pub show_progress: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            workers: 0,
            shards: ACCUMULATOR_SHARDS,
            show_progress: false,
        }
    }
}

impl PipelineOptions {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Worker count with 0 resolved to the CPU count
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        }
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct PipelineOutput<V> {
    pub results: ResultMap<V>,
    pub stats: PipelineStats,
}

/// Configured filter/aggregate pass, reusable across sources
///
/// Lifetime `'g` covers whatever the grouping function borrows, typically the
/// reference graph.
pub struct Pipeline<'g, R: Measured> {
    row_filters: Vec<Box<dyn RowFilter + 'g>>,
    parser: Parser<'g, R>,
    record_filters: Vec<Box<dyn RecordFilter<R> + 'g>>,
    grouping: Grouping<'g, R>,
    reducer: Box<dyn Reducer<R::Value> + 'g>,
    options: PipelineOptions,
}

impl<'g, R: Measured + Send> Pipeline<'g, R> {
    /// Create a pipeline with the given row parser
    ///
    /// Defaults: no filters, no grouping (every record is unmatched), sum reducer.
    pub fn new<P>(parser: P) -> Self
    where
        P: Fn(&str) -> Result<R> + Send + Sync + 'g,
        Sum: Reducer<R::Value>,
    {
        Self {
            row_filters: Vec::new(),
            parser: Box::new(parser),
            record_filters: Vec::new(),
            grouping: Box::new(|_| Vec::new()),
            reducer: Box::new(Sum),
            options: PipelineOptions::default(),
        }
    }

    /// Append a row filter; filters run in insertion order
    pub fn with_row_filter(mut self, filter: impl RowFilter + 'g) -> Self {
        self.row_filters.push(Box::new(filter));
        self
    }

    /// Append a record filter; filters run in insertion order
    pub fn with_record_filter(mut self, filter: impl RecordFilter<R> + 'g) -> Self {
        self.record_filters.push(Box::new(filter));
        self
    }

    /// Resolve each record to zero or more target groups
    pub fn group_by<G>(mut self, grouping: G) -> Self
    where
        G: Fn(&R) -> Vec<Key> + Send + Sync + 'g,
    {
        self.grouping = Box::new(grouping);
        self
    }

    pub fn reduce_with(mut self, reducer: impl Reducer<R::Value> + 'g) -> Self {
        self.reducer = Box::new(reducer);
        self
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Names of the configured filters in execution order
    pub fn filter_names(&self) -> Vec<&str> {
        self.row_filters
            .iter()
            .map(|f| f.name())
            .chain(self.record_filters.iter().map(|f| f.name()))
            .collect()
    }

    /// Run one pass over `source`
    ///
    /// The source stays open for the duration of the pass and is closed on
    /// every exit path.
    ///
    /// # Errors
    /// Any non-recoverable failure (I/O error mid-stream, worker pool
    /// failure) aborts the run and is returned as `Error::Processing` naming
    /// the source. No partial result is returned.
    pub fn run(&self, source: &dyn RecordSource) -> Result<PipelineOutput<R::Value>> {
        let source_name = source.name();
        let start = Instant::now();
        let workers = self.options.effective_workers();

        info!(
            "Aggregating '{}' with {} workers ({} filters)",
            source_name,
            workers,
            self.row_filters.len() + self.record_filters.len()
        );

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("aggregate-{}", index))
            .build()
            .map_err(|e| Error::processing(source_name, e))?;

        let accumulator = ShardedMap::with_shards(self.options.shards);
        let counters = PipelineCounters::default();
        let progress = self.progress_bar(source_name);

        let lines = source
            .lines()
            .map_err(|e| Error::processing(source_name, e))?;

        pool.install(|| {
            lines.par_bridge().try_for_each(|line| {
                let line = line?;
                progress.inc(1);
                self.process_line(&line, &accumulator, &counters)
            })
        })
        .map_err(|e| Error::processing(source_name, e))?;

        progress.finish_and_clear();

        let results: ResultMap<R::Value> = accumulator.into_entries();
        let stats = counters.snapshot(results.len(), start.elapsed());
        info!("{}", stats.summary());

        Ok(PipelineOutput { results, stats })
    }

    fn process_line(
        &self,
        line: &str,
        accumulator: &ShardedMap<Key, R::Value>,
        counters: &PipelineCounters,
    ) -> Result<()> {
        counters.line_read();

        if let Some(filter) = self.row_filters.iter().find(|f| !f.accept(line)) {
            debug!("Row dropped by '{}'", filter.name());
            counters.row_filtered();
            return Ok(());
        }

        let record = match (self.parser)(line) {
            Ok(record) => record,
            Err(e) if e.is_recoverable() => {
                debug!("Skipping row: {}", e);
                counters.parse_error();
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        if self.record_filters.iter().any(|f| !f.accept(&record)) {
            counters.record_filtered();
            return Ok(());
        }

        let groups = (self.grouping)(&record);
        if groups.is_empty() {
            counters.unmatched();
            return Ok(());
        }

        counters.contributed(groups.len());
        let value = record.value();
        for group in groups {
            accumulator.merge(group, value.clone(), self.reducer.as_ref());
        }

        Ok(())
    }

    fn progress_bar(&self, source_name: &str) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {pos} rows {msg}")
        {
            pb.set_style(style);
        }
        pb.set_message(source_name.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    }
}
