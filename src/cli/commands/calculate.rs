//! Calculate command implementation
//!
//! Loads the reference graph once, then runs each selected calculator over
//! the observation file and prints or writes its report.

use super::shared::{load_configuration, load_reference_graph, print_graph_summary, setup_logging};
use crate::app::services::aggregation::PipelineStats;
use crate::app::services::calculators::{Calculator, CalculatorKind};
use crate::app::services::record_source::FileLineSource;
use crate::app::services::reference_graph::GraphLoadStats;
use crate::cli::args::CalculateArgs;
use crate::{Error, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

/// Outcome of one statistic
#[derive(Debug, Clone)]
pub struct StatisticOutcome {
    pub kind: CalculatorKind,
    pub stats: PipelineStats,
    /// Report file, when an output directory is configured
    pub report_path: Option<PathBuf>,
}

/// Outcome of a calculate run
#[derive(Debug, Clone, Default)]
pub struct CalculateSummary {
    pub load_stats: GraphLoadStats,
    pub statistics: Vec<StatisticOutcome>,
    pub total_duration: Duration,
}

/// Run the calculate command
pub fn run_calculate(args: CalculateArgs) -> Result<CalculateSummary> {
    let start = Instant::now();

    setup_logging(&args.common)?;
    args.validate()?;

    let config = load_configuration(&args.common, |config| args.apply_to(config))?;
    let observations = FileLineSource::new(config.sources.observations_path()?)?;

    let (graph, load_stats) = load_reference_graph(&config)?;
    if !args.common.quiet {
        print_graph_summary(&graph, &load_stats);
    }

    if let Some(dir) = &config.output.directory {
        fs::create_dir_all(dir).map_err(|e| {
            Error::io(format!("Failed to create output directory {}", dir.display()), e)
        })?;
    }

    let settings = config.calculator_settings();
    let mut statistics = Vec::new();

    for kind in args.statistic.kinds() {
        info!("Calculating {}", kind);
        let calculator = kind.build(&settings);
        let calculation = calculator.calculate(&graph, &observations)?;
        info!("{}: {}", kind, calculation.stats.summary());

        let report = calculator.render(&graph, &calculation);
        let report_path = match &config.output.directory {
            Some(dir) => Some(write_report(dir, kind, &report)?),
            None => {
                print!("{}", report);
                None
            }
        };

        statistics.push(StatisticOutcome {
            kind,
            stats: calculation.stats,
            report_path,
        });
    }

    let summary = CalculateSummary {
        load_stats,
        statistics,
        total_duration: start.elapsed(),
    };

    if !args.common.quiet {
        print_calculate_summary(&summary);
    }

    Ok(summary)
}

/// Write a report as `<dir>/<statistic>.txt`
pub fn write_report(dir: &Path, kind: CalculatorKind, report: &str) -> Result<PathBuf> {
    let path = dir.join(format!("{}.txt", kind.name()));
    fs::write(&path, report)
        .map_err(|e| Error::io(format!("Failed to write report {}", path.display()), e))?;
    info!("Wrote {} report to {}", kind, path.display());
    Ok(path)
}

fn print_calculate_summary(summary: &CalculateSummary) {
    println!();
    println!("{}", "Calculation Summary".bright_green().bold());
    println!("{}", "=".repeat(50));

    for outcome in &summary.statistics {
        let stats = &outcome.stats;
        println!("{}", outcome.kind.to_string().bright_white().bold());
        println!("  Lines read:        {}", stats.lines_read);
        println!("  Records matched:   {}", stats.records_matched());
        println!("  Unparseable rows:  {}", stats.parse_errors);
        println!("  Groups:            {}", stats.groups);
        println!(
            "  Throughput:        {:.0} lines/s over {:.2}s",
            stats.throughput(),
            stats.duration.as_secs_f64()
        );
        if let Some(path) = &outcome.report_path {
            println!("  Report:            {}", path.display().to_string().cyan());
        }
    }

    println!();
    println!(
        "Total time: {:.2}s",
        summary.total_duration.as_secs_f64()
    );
}
