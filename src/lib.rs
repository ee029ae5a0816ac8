//! Rainfall Statistics Library
//!
//! A Rust library for computing population-weighted rainfall statistics from
//! NOAA QCLCD hourly precipitation data joined against US census reference data.
//!
//! This library provides tools for:
//! - Loading census population, county linkage and weather station lists into a
//!   linked reference graph (area ↔ county ↔ station, state derived transitively)
//! - Streaming observation rows through ordered filters into a concurrent,
//!   key-grouped aggregate
//! - Computing wetness by statistical area and rainfall by state
//! - Rendering results as fixed-width reports

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod aggregation;
        pub mod calculators;
        pub mod record_source;
        pub mod reference_graph;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Inches, Key, Keyed, RainfallObservation, UsState, WeatherStation};
pub use config::Config;

/// Result type alias for rainfall statistics operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for loading, joining and aggregating rainfall data
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Input source is missing, not a regular file, or unreadable
    #[error("Validation error for '{path}': {reason}")]
    Validation { path: String, reason: String },

    /// A single row could not be decoded into its typed record
    #[error("Parse error in '{source_name}': {reason} (row: {row})")]
    Parse {
        source_name: String,
        row: String,
        reason: String,
    },

    /// Unrecoverable failure while processing a source
    #[error("Error occurred while processing '{source_name}'")]
    Processing {
        source_name: String,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV decoding error
    #[error("CSV parsing error: {message}")]
    CsvParsing {
        message: String,
        #[source]
        source: csv::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Configuration file could not be decoded
    #[error("Configuration file error in '{path}'")]
    ConfigFile {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl Error {
    /// Create a validation error for an input source
    pub fn validation(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a row-level parse error
    pub fn parse(
        source_name: impl Into<String>,
        row: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            row: row.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a root cause as a processing failure of the named source
    pub fn processing(
        source_name: impl Into<String>,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Processing {
            source_name: source_name.into(),
            cause: cause.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Row-level errors are absorbed by loaders and the pipeline; everything
    /// else aborts the current operation.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Self::ConfigFile {
            path: "<inline>".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            message: "CSV parsing failed".to_string(),
            source: error,
        }
    }
}
