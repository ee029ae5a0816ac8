//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! command-line overrides. Every section has defaults, so a config file only
//! needs the keys it changes.

use crate::app::models::{AreaType, ProjectionYears};
use crate::app::services::aggregation::PipelineOptions;
use crate::app::services::calculators::CalculatorSettings;
use crate::app::services::reference_graph::GraphOptions;
use crate::constants::{
    ACCUMULATOR_SHARDS, APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_EXCLUDED_HOUR_END,
    DEFAULT_EXCLUDED_HOUR_START, DEFAULT_TARGET_MONTH,
};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Upper bound on worker threads
const MAX_WORKERS: usize = 256;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sources: SourcesConfig,
    pub calculation: CalculationConfig,
    pub performance: PerformanceConfig,
    pub output: OutputConfig,
}

/// Input file locations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Census population by statistical area (CSV export)
    pub population: Option<PathBuf>,

    /// County ↔ statistical area linkage (CSV export)
    pub county_links: Option<PathBuf>,

    /// WBAN station master list (pipe separated)
    pub station_master: Option<PathBuf>,

    /// Station activity list for the observation period (pipe separated)
    pub station_activity: Option<PathBuf>,

    /// Hourly precipitation observations (comma separated)
    pub observations: Option<PathBuf>,
}

/// Resolved paths of the four reference sources
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePaths {
    pub population: PathBuf,
    pub county_links: PathBuf,
    pub station_master: PathBuf,
    pub station_activity: PathBuf,
}

impl SourcesConfig {
    /// Paths of the four reference sources
    ///
    /// # Errors
    /// Returns `Error::Configuration` naming the first missing source.
    pub fn reference_paths(&self) -> Result<ReferencePaths> {
        Ok(ReferencePaths {
            population: required(&self.population, "population")?,
            county_links: required(&self.county_links, "county_links")?,
            station_master: required(&self.station_master, "station_master")?,
            station_activity: required(&self.station_activity, "station_activity")?,
        })
    }

    /// Path of the observation file
    pub fn observations_path(&self) -> Result<PathBuf> {
        required(&self.observations, "observations")
    }
}

fn required(path: &Option<PathBuf>, name: &str) -> Result<PathBuf> {
    path.clone().ok_or_else(|| {
        Error::configuration(format!(
            "No {} source configured (set sources.{} or pass --{})",
            name,
            name,
            name.replace('_', "-")
        ))
    })
}

/// Calculation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationConfig {
    /// Year-month (`YYYYMM`) the wetness statistic covers
    pub target_month: String,

    /// First hour of the excluded overnight window
    pub excluded_hour_start: u8,

    /// Last hour of the excluded overnight window
    pub excluded_hour_end: u8,

    /// Statistical area types loaded from the population source
    pub area_types: Vec<AreaType>,

    /// Population projection years
    pub projection_years: ProjectionYears,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            target_month: DEFAULT_TARGET_MONTH.to_string(),
            excluded_hour_start: DEFAULT_EXCLUDED_HOUR_START,
            excluded_hour_end: DEFAULT_EXCLUDED_HOUR_END,
            area_types: vec![AreaType::Metropolitan],
            projection_years: ProjectionYears::default(),
        }
    }
}

/// Parallelism and progress reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Worker threads for the aggregation pass (0 = CPU count)
    pub workers: usize,

    /// Show progress spinners
    pub show_progress: bool,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            show_progress: true,
        }
    }
}

/// Report output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives one report file per statistic
    pub directory: Option<PathBuf>,
}

impl Config {
    /// Default config file location, `<config_dir>/rainfall-stats/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    pub fn load_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read config file {}", path.display()), e))?;
        toml::from_str(&text).map_err(|e| Error::ConfigFile {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Defaults overlaid with a config file
    ///
    /// An explicit path must exist. Without one, the default location is
    /// used when present.
    pub fn load_layered(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!("Loading configuration from {}", path.display());
            return Self::load_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                debug!("Loading configuration from {}", path.display());
                Self::load_file(&path)
            }
            _ => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.performance.workers = workers;
        self
    }

    pub fn with_target_month(mut self, target_month: impl Into<String>) -> Self {
        self.calculation.target_month = target_month.into();
        self
    }

    pub fn with_output_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.output.directory = Some(directory.into());
        self
    }

    pub fn without_progress(mut self) -> Self {
        self.performance.show_progress = false;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        validate_target_month(&self.calculation.target_month)?;

        let calculation = &self.calculation;
        if calculation.excluded_hour_start > calculation.excluded_hour_end {
            return Err(Error::configuration(format!(
                "Excluded hour window is inverted: {}..={}",
                calculation.excluded_hour_start, calculation.excluded_hour_end
            )));
        }

        if calculation.excluded_hour_end > 23 {
            return Err(Error::configuration(format!(
                "Excluded hour window must end by 23, got {}",
                calculation.excluded_hour_end
            )));
        }

        if calculation.area_types.is_empty() {
            return Err(Error::configuration(
                "At least one statistical area type must be loaded",
            ));
        }

        let years = &calculation.projection_years;
        if years.previous_base_year >= years.base_year {
            return Err(Error::configuration(format!(
                "Previous census year {} must precede base year {}",
                years.previous_base_year, years.base_year
            )));
        }

        if self.performance.workers > MAX_WORKERS {
            return Err(Error::configuration(format!(
                "Number of workers cannot exceed {}",
                MAX_WORKERS
            )));
        }

        // Every command joins against the reference graph
        self.sources.reference_paths()?;

        Ok(())
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            workers: self.performance.workers,
            shards: ACCUMULATOR_SHARDS,
            show_progress: self.performance.show_progress,
        }
    }

    pub fn calculator_settings(&self) -> CalculatorSettings {
        CalculatorSettings {
            target_month: self.calculation.target_month.clone(),
            excluded_hour_start: self.calculation.excluded_hour_start,
            excluded_hour_end: self.calculation.excluded_hour_end,
            pipeline: self.pipeline_options(),
        }
    }

    pub fn graph_options(&self) -> GraphOptions {
        GraphOptions::default()
            .with_area_types(self.calculation.area_types.clone())
            .with_projection_years(self.calculation.projection_years)
            .with_progress(self.performance.show_progress)
    }
}

fn validate_target_month(target_month: &str) -> Result<()> {
    let invalid = || {
        Error::configuration(format!(
            "Target month must be YYYYMM, got '{}'",
            target_month
        ))
    };

    if target_month.len() != 6 || !target_month.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let year: i32 = target_month[0..4].parse().map_err(|_| invalid())?;
    let month: u32 = target_month[4..6].parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    Ok(())
}
