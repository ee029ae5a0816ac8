//! Command-line argument definitions for the rainfall statistics tool
//!
//! Flags override the matching keys of the layered configuration; anything
//! left unset falls through to the config file and then the built-in defaults.

use crate::app::services::calculators::CalculatorKind;
use crate::config::Config;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the rainfall statistics tool
///
/// Joins hourly precipitation observations against census reference data and
/// reports population-weighted wetness per statistical area and total
/// rainfall per state.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rainfall-stats",
    version,
    about = "Population-weighted rainfall statistics from QCLCD hourly precipitation data",
    long_about = "Loads census population, county linkage and weather station lists into a linked \
                  reference graph, streams hourly precipitation observations through it in parallel, \
                  and reports wetness (rainfall x projected population) per metropolitan area and \
                  total rainfall per state."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Compute statistics and print or write their reports
    Calculate(CalculateArgs),
    /// Load the reference graph and describe it or one of its entities
    Inspect(InspectArgs),
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Calculate(_) => "calculate",
            Commands::Inspect(_) => "inspect",
        }
    }
}

/// Reference source locations
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SourceArgs {
    /// Census population by statistical area (CSV export)
    #[arg(long = "population", value_name = "PATH")]
    pub population: Option<PathBuf>,

    /// County to statistical area linkage (CSV export)
    #[arg(long = "county-links", value_name = "PATH")]
    pub county_links: Option<PathBuf>,

    /// WBAN station master list (pipe separated)
    #[arg(long = "station-master", value_name = "PATH")]
    pub station_master: Option<PathBuf>,

    /// Station activity list for the observation period (pipe separated)
    #[arg(long = "station-activity", value_name = "PATH")]
    pub station_activity: Option<PathBuf>,
}

impl SourceArgs {
    /// Overlay the given paths onto `config`
    pub fn apply_to(&self, config: &mut Config) {
        let sources = &mut config.sources;
        if let Some(path) = &self.population {
            sources.population = Some(path.clone());
        }
        if let Some(path) = &self.county_links {
            sources.county_links = Some(path.clone());
        }
        if let Some(path) = &self.station_master {
            sources.station_master = Some(path.clone());
        }
        if let Some(path) = &self.station_activity {
            sources.station_activity = Some(path.clone());
        }
    }
}

/// Flags shared by every command
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CommonArgs {
    /// Path to configuration file
    ///
    /// Defaults to `<config dir>/rainfall-stats/config.toml` when present.
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Enable verbose logging
    ///
    /// Use multiple times for increased verbosity (-v, -vv, -vvv).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress output and non-error logging
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable progress spinners while keeping normal logging
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

impl CommonArgs {
    /// Get the log level based on verbosity settings
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress spinners
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress
    }
}

/// Which statistics to compute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StatisticChoice {
    /// Population-weighted wetness per statistical area
    Wetness,
    /// Total rainfall per state
    RainfallByState,
    /// Every statistic
    #[default]
    All,
}

impl StatisticChoice {
    pub fn kinds(&self) -> Vec<CalculatorKind> {
        match self {
            StatisticChoice::Wetness => vec![CalculatorKind::Wetness],
            StatisticChoice::RainfallByState => vec![CalculatorKind::RainfallByState],
            StatisticChoice::All => CalculatorKind::ALL.to_vec(),
        }
    }
}

/// Arguments for the calculate command
#[derive(Debug, Clone, Parser)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Hourly precipitation observations (comma separated)
    #[arg(long = "observations", value_name = "PATH")]
    pub observations: Option<PathBuf>,

    /// Statistic to compute
    #[arg(
        short = 's',
        long = "statistic",
        value_enum,
        default_value_t = StatisticChoice::All
    )]
    pub statistic: StatisticChoice,

    /// Year-month the wetness statistic covers
    #[arg(short = 'm', long = "target-month", value_name = "YYYYMM")]
    pub target_month: Option<String>,

    /// Worker threads for the aggregation pass
    ///
    /// Zero means one per CPU core.
    #[arg(short = 'w', long = "workers", value_name = "COUNT")]
    pub workers: Option<usize>,

    /// Directory receiving one `<statistic>.txt` report per statistic
    ///
    /// Reports print to stdout when no directory is configured.
    #[arg(short = 'o', long = "output-dir", value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl CalculateArgs {
    /// Overlay command-line values onto `config`
    pub fn apply_to(&self, config: &mut Config) {
        self.sources.apply_to(config);

        if let Some(path) = &self.observations {
            config.sources.observations = Some(path.clone());
        }
        if let Some(month) = &self.target_month {
            config.calculation.target_month = month.clone();
        }
        if let Some(workers) = self.workers {
            config.performance.workers = workers;
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = Some(dir.clone());
        }
        if !self.common.show_progress() {
            config.performance.show_progress = false;
        }
    }

    /// Validate argument combinations clap cannot express
    pub fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.output_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(Error::configuration(format!(
                    "Output path is not a directory: {}",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}

/// Arguments for the inspect command
#[derive(Debug, Clone, Parser)]
pub struct InspectArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Entity key to describe (area name, `COUNTY,ST`, station id or state)
    #[arg(short = 'k', long = "key", value_name = "KEY")]
    pub key: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl InspectArgs {
    /// Overlay command-line values onto `config`
    pub fn apply_to(&self, config: &mut Config) {
        self.sources.apply_to(config);
        if !self.common.show_progress() {
            config.performance.show_progress = false;
        }
    }
}
