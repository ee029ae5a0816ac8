//! Inspect command implementation

use super::shared::{load_configuration, load_reference_graph, print_graph_summary, setup_logging};
use crate::app::models::{EntityRef, Key, Keyed};
use crate::app::services::reference_graph::ReferenceGraph;
use crate::cli::args::InspectArgs;
use crate::Result;
use colored::Colorize;

/// Run the inspect command
///
/// Without `--key` only the graph summary is printed.
pub fn run_inspect(args: InspectArgs) -> Result<()> {
    setup_logging(&args.common)?;

    let config = load_configuration(&args.common, |config| args.apply_to(config))?;
    let (graph, load_stats) = load_reference_graph(&config)?;
    print_graph_summary(&graph, &load_stats);

    if let Some(key) = &args.key {
        let found = graph.find(key);
        println!();
        if found.is_empty() {
            println!("{}", format!("No entity found for '{}'", key).yellow());
        }
        for entity in found {
            for line in describe_entity(&graph, entity) {
                println!("{}", line);
            }
            println!();
        }
    }

    Ok(())
}

/// Human-readable description of one entity and its links
pub fn describe_entity(graph: &ReferenceGraph, entity: EntityRef<'_>) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {}",
        entity.kind().bright_white().bold(),
        entity.key()
    )];

    match entity {
        EntityRef::Population(record) => {
            let area = record.area();
            lines.push(format!("  Name:        {}", area.name()));
            lines.push(format!("  Id:          {}", area.area_id()));
            lines.push(format!("  Type:        {}", area.area_type()));
            lines.push(format!(
                "  Population:  {} ({}) -> {} ({})",
                record.base_population(),
                record.base_year(),
                record.current_population(),
                record.current_year()
            ));
            lines.push(format!(
                "  Yearly rate: {:.4}%",
                record.average_yearly_change_rate() * 100.0
            ));
            lines.push(format!("  Counties:    {}", join_keys(area.counties())));
            lines.push(format!("  Stations:    {}", join_keys(area.weather_stations())));
        }
        EntityRef::County(county) => {
            lines.push(format!("  State:       {}", county.state().name()));
            lines.push(format!("  Areas:       {}", join_keys(county.areas())));
            lines.push(format!("  Stations:    {}", join_keys(county.weather_stations())));
        }
        EntityRef::Station(station) => {
            lines.push(format!("  Name:        {}", station.name()));
            lines.push(format!(
                "  County:      {}",
                station.county().map(|k| k.to_string()).unwrap_or_default()
            ));
            lines.push(format!(
                "  Located at:  {}",
                station.located_at().unwrap_or_default()
            ));
            let areas = graph.areas_for_station(station.key());
            lines.push(format!("  Areas:       {}", join_keys(areas)));
            if let Some(state) = graph.station_state(station.key()) {
                lines.push(format!("  State:       {}", state.name()));
            }
        }
        EntityRef::State(state) => {
            lines.push(format!("  Name:        {}", state.name()));
            let counties = graph
                .counties()
                .filter(|county| county.state() == state)
                .count();
            lines.push(format!("  Counties:    {}", counties));
        }
    }

    lines
}

fn join_keys<'a, I>(keys: I) -> String
where
    I: IntoIterator<Item = &'a Key>,
{
    let keys: Vec<&str> = keys.into_iter().map(|key| key.as_str()).collect();
    if keys.is_empty() {
        "-".to_string()
    } else {
        keys.join("; ")
    }
}
