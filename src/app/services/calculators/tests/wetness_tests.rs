//! Tests for the population-weighted wetness calculator

use super::*;
use crate::app::models::{Inches, Key};
use crate::app::services::aggregation::ResultMap;
use crate::app::services::calculators::wetness::weight_by_population;
use crate::app::services::calculators::{Calculator, CalculatorKind, WetnessCalculator};
use crate::app::services::reference_graph::tests::{FixtureSources, fixture_graph};

fn wetness(results: &ResultMap<f64>, area: &str) -> Option<f64> {
    results.get(&Key::new(area)).copied()
}

#[test]
fn test_wetness_values() {
    let graph = fixture_graph();
    let calculator = WetnessCalculator::new(settings(2));
    let calculation = calculator.calculate(&graph, &observations()).unwrap();

    assert_eq!(calculation.kind, CalculatorKind::Wetness);
    assert_eq!(calculation.results.len(), 4);

    // Daytime May readings only: 0.50 + 0.30 + 0.40 (Round Rock via fallback)
    let austin = wetness(&calculation.results, "AUSTIN-ROUNDROCK,TX").unwrap();
    assert_eq!(austin, 1.2 * 2_036_627.0);

    let dallas = wetness(&calculation.results, "DALLAS-FORTWORTH-ARLINGTON,TX").unwrap();
    assert_eq!(dallas, 0.25 * 7_117_270.0);

    let san_juan = wetness(&calculation.results, "SANJUAN-CAGUAS-GUAYNABO,PR").unwrap();
    assert_eq!(san_juan, 0.1 * 2_464_032.0);

    // A trace-only area still reports, at zero
    assert_eq!(wetness(&calculation.results, "KANSASCITY,MO-KS"), Some(0.0));
}

#[test]
fn test_wetness_stats() {
    let graph = fixture_graph();
    let calculation = WetnessCalculator::new(settings(1))
        .calculate(&graph, &observations())
        .unwrap();

    let stats = &calculation.stats;
    assert_eq!(stats.lines_read, 11);
    // Header, unknown station and the malformed row never reach the parser
    assert_eq!(stats.rows_filtered, 3);
    assert_eq!(stats.parse_errors, 0);
    // Overnight hour and April reading
    assert_eq!(stats.records_filtered, 2);
    assert_eq!(stats.contributions, 6);
    assert_eq!(stats.groups, 4);
}

#[test]
fn test_single_reading_example() {
    let graph = fixture_graph();
    let source = observations_from(&["13904,20150515,10,0.80,"]);
    let calculation = WetnessCalculator::new(settings(1))
        .calculate(&graph, &source)
        .unwrap();

    assert_eq!(calculation.results.len(), 1);
    assert_eq!(
        wetness(&calculation.results, "AUSTIN-ROUNDROCK,TX"),
        Some(0.8 * 2_036_627.0)
    );
}

#[test]
fn test_target_month_and_hour_window_follow_settings() {
    let graph = fixture_graph();
    let mut april = settings(1);
    april.target_month = "201504".to_string();
    april.excluded_hour_end = 11;

    let source = observations_from(&["13904,20150415,10,2.00,", "13904,20150415,12,0.50,"]);
    let calculation = WetnessCalculator::new(april)
        .calculate(&graph, &source)
        .unwrap();

    assert_eq!(
        wetness(&calculation.results, "AUSTIN-ROUNDROCK,TX"),
        Some(0.5 * 2_036_627.0)
    );
}

#[test]
fn test_shared_station_counts_in_every_area() {
    let sources = FixtureSources::with_rows(
        &[
            r#""Metropolitan statistical area",,,,"#,
            r#""Sherman-Denison, TX","110,595","120,877","10,282","9.3""#,
            r#""Dallas-Fort Worth-Arlington, TX","5,161,544","6,371,773","1,210,229","23.4""#,
        ],
        &[
            r#""43300",,,"Sherman-Denison, TX","Metropolitan Statistical Area",,,"Collin County","Texas""#,
            r#""19100",,,"Dallas-Fort Worth-Arlington, TX","Metropolitan Statistical Area",,,"Collin County","Texas""#,
        ],
        &["NA|11111|PLANO MUNI|TX|COLLIN|US|"],
        &[],
    );
    let (graph, _) = sources.load();
    let source = observations_from(&["11111,20150515,10,1.00,"]);

    let calculation = WetnessCalculator::new(settings(1))
        .calculate(&graph, &source)
        .unwrap();

    let sherman = graph.population(&Key::new("SHERMAN-DENISON,TX")).unwrap();
    assert_eq!(
        wetness(&calculation.results, "SHERMAN-DENISON,TX"),
        Some(sherman.current_population() as f64)
    );
    assert_eq!(
        wetness(&calculation.results, "DALLAS-FORTWORTH-ARLINGTON,TX"),
        Some(7_117_270.0)
    );
    assert_eq!(calculation.stats.contributions, 2);
}

#[test]
fn test_result_does_not_depend_on_row_order() {
    let graph = fixture_graph();
    let forward = WetnessCalculator::new(settings(1))
        .calculate(&graph, &observations())
        .unwrap();

    let mut reversed_rows: Vec<&str> = OBSERVATION_ROWS.to_vec();
    reversed_rows.reverse();

    for workers in [1, 2, 8] {
        let reversed = WetnessCalculator::new(settings(workers))
            .calculate(&graph, &observations_from(&reversed_rows))
            .unwrap();
        assert_eq!(reversed.results, forward.results);
    }
}

#[test]
fn test_wetness_is_exact_sum_times_population() {
    let graph = fixture_graph();
    let rows: Vec<String> = (1..=40)
        .map(|cents| format!("13904,20150515,{},0.{:02},", 8 + cents % 16, cents))
        .collect();
    let mut rows: Vec<&str> = rows.iter().map(String::as_str).collect();

    let forward = WetnessCalculator::new(settings(1))
        .calculate(&graph, &observations_from(&rows))
        .unwrap();

    // 0.01 + 0.02 + ... + 0.40
    assert_eq!(
        wetness(&forward.results, "AUSTIN-ROUNDROCK,TX"),
        Some(8.2 * 2_036_627.0)
    );

    rows.reverse();
    let reversed = WetnessCalculator::new(settings(8))
        .calculate(&graph, &observations_from(&rows))
        .unwrap();
    assert_eq!(reversed.results, forward.results);
}

#[test]
fn test_weight_by_population_drops_unknown_areas() {
    let graph = fixture_graph();
    let mut rainfall: ResultMap<Inches> = ResultMap::new();
    rainfall.insert(Key::new("AUSTIN-ROUNDROCK,TX"), Inches::from_ten_thousandths(20_000));
    rainfall.insert(Key::new("GHOST,ZZ"), Inches::from_ten_thousandths(50_000));

    let weighted = weight_by_population(&graph, rainfall);
    assert_eq!(weighted.len(), 1);
    assert_eq!(weighted[&Key::new("AUSTIN-ROUNDROCK,TX")], 2.0 * 2_036_627.0);
}

#[test]
fn test_labels_use_area_names() {
    let graph = fixture_graph();
    let calculator = WetnessCalculator::new(settings(1));

    assert_eq!(
        calculator.label(&graph, &Key::new("AUSTIN-ROUNDROCK,TX")),
        "Austin-Round Rock, TX"
    );
    assert_eq!(calculator.label(&graph, &Key::new("GHOST,ZZ")), "GHOST,ZZ");
    assert_eq!(
        calculator.report_headers(),
        ("MSA", "WetnessValue (Person-inches)")
    );
}

#[test]
fn test_rendered_report_lists_areas_in_key_order() {
    let graph = fixture_graph();
    let calculator = WetnessCalculator::new(settings(1));
    let calculation = calculator.calculate(&graph, &observations()).unwrap();

    let report = calculator.render(&graph, &calculation);
    let austin = report.find("Austin-Round Rock, TX").unwrap();
    let dallas = report.find("Dallas-Fort Worth-Arlington, TX").unwrap();
    let kansas_city = report.find("Kansas City, MO-KS").unwrap();
    assert!(austin < dallas && dallas < kansas_city);
    assert!(report.contains("1779317.50"));
}
