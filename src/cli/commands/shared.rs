//! Shared components for CLI commands
//!
//! Logging setup, configuration layering and reference graph loading used by
//! every command.

use crate::app::services::record_source::FileLineSource;
use crate::app::services::reference_graph::{GraphLoadStats, GraphSources, ReferenceGraph};
use crate::cli::args::CommonArgs;
use crate::config::Config;
use crate::{Error, Result};
use colored::Colorize;
use tracing::{debug, info};

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence over the verbosity flags.
pub fn setup_logging(common: &CommonArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = common.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rainfall_stats={}", log_level)));

    let result = if common.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load the layered configuration: defaults, config file, then `overrides`
///
/// The result is validated before it is returned.
pub fn load_configuration<F>(common: &CommonArgs, overrides: F) -> Result<Config>
where
    F: FnOnce(&mut Config),
{
    let mut config = Config::load_layered(common.config_file.as_deref())?;
    overrides(&mut config);
    config.validate()?;

    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Open the four reference sources and build the graph
pub fn load_reference_graph(config: &Config) -> Result<(ReferenceGraph, GraphLoadStats)> {
    let paths = config.sources.reference_paths()?;

    let population = FileLineSource::new(paths.population)?;
    let county_links = FileLineSource::new(paths.county_links)?;
    let station_master = FileLineSource::new(paths.station_master)?;
    let station_activity = FileLineSource::new(paths.station_activity)?;

    let sources = GraphSources {
        population: &population,
        county_links: &county_links,
        station_master: &station_master,
        station_activity: &station_activity,
    };

    info!("Loading reference data");
    ReferenceGraph::load(sources, &config.graph_options())
}

/// Print the graph load summary
pub fn print_graph_summary(graph: &ReferenceGraph, stats: &GraphLoadStats) {
    println!();
    println!("{}", "Reference Data".bright_green().bold());
    println!("{}", "=".repeat(50));
    println!("Statistical areas:   {}", graph.area_count());
    println!("Counties:            {}", graph.county_count());
    println!(
        "Weather stations:    {} ({} linked to an area)",
        graph.station_count(),
        graph.linked_station_count()
    );
    println!();

    for stage in stats.stages() {
        let line = stage.summary();
        if stage.parse_errors > 0 || stage.rows_unmatched > 0 {
            println!("  {}", line.yellow());
        } else {
            println!("  {}", line);
        }
    }
    println!(
        "Loaded in {:.2}s",
        stats.total_duration.as_secs_f64()
    );
}
