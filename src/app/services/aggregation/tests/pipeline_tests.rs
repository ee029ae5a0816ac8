//! Tests for the streaming filter/aggregate pipeline

use super::*;
use crate::app::models::{Inches, Key, RainfallObservation};
use crate::app::services::aggregation::{
    HeaderExclude, HourWindowExclude, MonthWindowInclude, Pipeline, PipelineOptions, Reducer,
    ResultMap, StationInclude,
};
use crate::app::services::record_source::{InMemorySource, RecordSource, SourceLines};
use crate::{Error, Result};

fn by_station<'g>() -> Pipeline<'g, RainfallObservation> {
    Pipeline::new(RainfallObservation::parse_line)
        .with_row_filter(HeaderExclude::default())
        .group_by(|obs: &RainfallObservation| vec![obs.station_key().clone()])
}

fn value(results: &ResultMap<Inches>, key: &str) -> Option<Inches> {
    results.get(&Key::new(key)).copied()
}

/// Source that fails after yielding a few good rows
struct TruncatedSource;

impl RecordSource for TruncatedSource {
    fn name(&self) -> &str {
        "truncated.txt"
    }

    fn lines(&self) -> Result<SourceLines<'_>> {
        let rows = vec![
            Ok("13904,20150515,10,0.50,".to_string()),
            Err(Error::io(
                "Failed to read truncated.txt",
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated"),
            )),
            Ok("13904,20150515,11,0.25,".to_string()),
        ];
        Ok(Box::new(rows.into_iter()))
    }
}

/// Source that cannot be opened
struct UnopenableSource;

impl RecordSource for UnopenableSource {
    fn name(&self) -> &str {
        "missing.txt"
    }

    fn lines(&self) -> Result<SourceLines<'_>> {
        Err(Error::validation("missing.txt", "file does not exist"))
    }
}

#[test]
fn test_sum_by_station() {
    let output = by_station().run(&observation_source(SAMPLE_ROWS)).unwrap();

    assert_eq!(value(&output.results, "13904"), Some(inches("0.40")));
    assert_eq!(value(&output.results, "13958"), Some(inches("0.30")));
    assert_eq!(value(&output.results, "13988"), Some(inches("1.01")));
    assert_eq!(value(&output.results, "03927"), Some(inches("0.70")));

    let stats = &output.stats;
    assert_eq!(stats.lines_read, 9);
    assert_eq!(stats.rows_filtered, 1);
    assert_eq!(stats.parse_errors, 0);
    assert_eq!(stats.contributions, 8);
    assert_eq!(stats.groups, 4);
    assert_eq!(stats.records_matched(), 8);
}

#[test]
fn test_record_filters_apply_month_and_hour_windows() {
    let output = by_station()
        .with_record_filter(MonthWindowInclude::new("201505"))
        .with_record_filter(HourWindowExclude::new(0, 7))
        .run(&observation_source(SAMPLE_ROWS))
        .unwrap();

    assert_eq!(value(&output.results, "13904"), Some(inches("0.17")));
    assert_eq!(value(&output.results, "13958"), Some(inches("0.30")));
    assert_eq!(value(&output.results, "13988"), Some(inches("1.01")));
    assert_eq!(output.stats.records_filtered, 2);
}

#[test]
fn test_trace_only_group_is_reported_as_zero() {
    let source = observation_source(&["14739,20150510,12,T,", "14739,20150510,13,,"]);
    let output = by_station().run(&source).unwrap();

    assert_eq!(value(&output.results, "14739"), Some(Inches::ZERO));
    assert_eq!(output.stats.groups, 1);
}

#[test]
fn test_unparseable_rows_are_skipped_and_counted() {
    let source = observation_source(&[
        "13904,20150515,10,0.50,",
        "bad,row",
        "13904,2015-05-15,10,0.50,",
        "13904,20150515,ten,0.50,",
        "13904,20150515,11,lots,",
        "13904,20150515,12,0.25,",
    ]);
    let output = by_station().run(&source).unwrap();

    assert_eq!(value(&output.results, "13904"), Some(inches("0.75")));
    assert_eq!(output.stats.parse_errors, 4);
    assert_eq!(output.stats.lines_read, 7);
}

#[test]
fn test_row_filters_run_before_parsing() {
    let source = observation_source(&["13904,20150515,10,0.50,", "99999,garbage", "bad"]);
    let output = by_station()
        .with_row_filter(StationInclude::new([Key::new("13904")]))
        .run(&source)
        .unwrap();

    // Rejected rows never reach the parser
    assert_eq!(output.stats.rows_filtered, 3);
    assert_eq!(output.stats.parse_errors, 0);
    assert_eq!(value(&output.results, "13904"), Some(inches("0.5")));
}

#[test]
fn test_fan_out_contributes_full_value_to_each_group() {
    let source = observation_source(&["11111,20150515,10,0.50,", "11111,20150515,11,0.25,"]);
    let output = Pipeline::new(RainfallObservation::parse_line)
        .with_row_filter(HeaderExclude::default())
        .group_by(|_: &RainfallObservation| vec![Key::new("SHERMAN"), Key::new("DALLAS")])
        .run(&source)
        .unwrap();

    assert_eq!(value(&output.results, "SHERMAN"), Some(inches("0.75")));
    assert_eq!(value(&output.results, "DALLAS"), Some(inches("0.75")));
    assert_eq!(output.stats.contributions, 4);
    assert_eq!(output.stats.records_matched(), 2);
}

#[test]
fn test_unmatched_records_are_counted() {
    let known = Key::new("13904");
    let output = Pipeline::new(RainfallObservation::parse_line)
        .with_row_filter(HeaderExclude::default())
        .group_by(|obs: &RainfallObservation| {
            if obs.station_key() == &known {
                vec![known.clone()]
            } else {
                Vec::new()
            }
        })
        .run(&observation_source(SAMPLE_ROWS))
        .unwrap();

    assert_eq!(output.results.len(), 1);
    assert_eq!(output.stats.unmatched_records, 4);
}

#[test]
fn test_default_grouping_matches_nothing() {
    let output = Pipeline::new(RainfallObservation::parse_line)
        .with_row_filter(HeaderExclude::default())
        .run(&observation_source(SAMPLE_ROWS))
        .unwrap();

    assert!(output.results.is_empty());
    assert_eq!(output.stats.unmatched_records, 8);
}

fn single_worker<'g>() -> Pipeline<'g, RainfallObservation> {
    by_station().with_options(PipelineOptions::default().with_workers(1))
}

#[test]
fn test_reversed_rows_give_identical_sums() {
    let rows = [
        "13904,20150515,10,0.1,",
        "13904,20150515,11,0.2,",
        "13904,20150515,12,0.3,",
    ];
    let mut reversed = rows;
    reversed.reverse();

    let forward = single_worker().run(&observation_source(&rows)).unwrap();
    let backward = single_worker().run(&observation_source(&reversed)).unwrap();

    assert_eq!(forward.results, backward.results);
    assert_eq!(value(&forward.results, "13904"), Some(inches("0.6")));
    assert_eq!(forward.results[&Key::new("13904")].to_f64(), 0.6);
}

/// Hundredths over three stations, 0.01 through 0.99
fn hundredths_rows() -> Vec<String> {
    (1..=99)
        .flat_map(|cents| {
            ["13904", "13958", "03927"]
                .into_iter()
                .map(move |station| format!("{},20150515,{},0.{:02},", station, 8 + cents % 16, cents))
        })
        .collect()
}

#[test]
fn test_result_is_independent_of_row_order_and_workers() {
    let mut rows = hundredths_rows();
    let forward = single_worker()
        .run(&observation_source(&rows.iter().map(String::as_str).collect::<Vec<_>>()))
        .unwrap();

    // 0.01 + 0.02 + ... + 0.99
    for station in ["13904", "13958", "03927"] {
        assert_eq!(value(&forward.results, station), Some(inches("49.50")));
    }

    let permutations: [fn(&mut Vec<String>); 3] = [
        |rows| rows.reverse(),
        |rows| rows.rotate_left(37),
        |rows| rows.sort_by(|a, b| b.rsplit(',').nth(1).cmp(&a.rsplit(',').nth(1))),
    ];

    for permute in permutations {
        permute(&mut rows);
        let permuted: Vec<&str> = rows.iter().map(String::as_str).collect();
        for workers in [1, 2, 8] {
            let output = by_station()
                .with_options(PipelineOptions::default().with_workers(workers))
                .run(&observation_source(&permuted))
                .unwrap();
            assert_eq!(output.results, forward.results);
            assert_eq!(output.stats.contributions, forward.stats.contributions);
        }
    }
}

#[test]
fn test_results_are_key_ordered() {
    let output = by_station().run(&observation_source(SAMPLE_ROWS)).unwrap();
    let keys: Vec<&str> = output.results.keys().map(Key::as_str).collect();
    assert_eq!(keys, vec!["03927", "13904", "13958", "13988"]);
}

#[test]
fn test_custom_reducer() {
    struct Wettest;

    impl Reducer<Inches> for Wettest {
        fn identity(&self) -> Inches {
            Inches::ZERO
        }

        fn combine(&self, accumulator: &mut Inches, value: Inches) {
            *accumulator = (*accumulator).max(value);
        }
    }

    let output = by_station()
        .reduce_with(Wettest)
        .run(&observation_source(SAMPLE_ROWS))
        .unwrap();
    assert_eq!(value(&output.results, "13904"), Some(inches("0.20")));
    assert_eq!(value(&output.results, "13958"), Some(inches("0.30")));
}

#[test]
fn test_empty_source() {
    let source = InMemorySource::new("empty", Vec::<String>::new());
    let output = by_station().run(&source).unwrap();

    assert!(output.results.is_empty());
    assert_eq!(output.stats.lines_read, 0);
    assert!(output.stats.throughput() >= 0.0);
}

#[test]
fn test_stream_failure_aborts_with_processing_error() {
    let result = by_station().run(&TruncatedSource);

    match result {
        Err(Error::Processing { source_name, .. }) => assert_eq!(source_name, "truncated.txt"),
        other => panic!("expected processing error, got {:?}", other.map(|o| o.results)),
    }
}

#[test]
fn test_unopenable_source_is_processing_error() {
    let result = by_station().run(&UnopenableSource);
    assert!(matches!(result, Err(Error::Processing { .. })));
}

#[test]
fn test_pipeline_is_reusable() {
    let pipeline = by_station();
    let first = pipeline.run(&observation_source(SAMPLE_ROWS)).unwrap();
    let second = pipeline.run(&observation_source(SAMPLE_ROWS)).unwrap();
    assert_eq!(first.results, second.results);
}

#[test]
fn test_filter_names_in_execution_order() {
    let pipeline = by_station()
        .with_row_filter(StationInclude::new([Key::new("13904")]))
        .with_record_filter(MonthWindowInclude::new("201505"))
        .with_record_filter(HourWindowExclude::new(0, 7));

    assert_eq!(
        pipeline.filter_names(),
        vec![
            "exclude header",
            "include known stations",
            "include target month",
            "exclude hour window"
        ]
    );
}

#[test]
fn test_effective_workers() {
    assert_eq!(PipelineOptions::default().with_workers(3).effective_workers(), 3);
    assert!(PipelineOptions::default().effective_workers() >= 1);
}
