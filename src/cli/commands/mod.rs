//! Command implementations for the rainfall statistics CLI
//!
//! Each command lives in its own module; `shared` holds logging setup,
//! configuration layering and graph loading common to all of them.

pub mod calculate;
pub mod inspect;
pub mod shared;

pub use calculate::CalculateSummary;

use crate::Result;
use crate::cli::args::Commands;

/// Dispatch a parsed subcommand
pub fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Calculate(calculate_args) => {
            calculate::run_calculate(calculate_args)?;
            Ok(())
        }
        Commands::Inspect(inspect_args) => inspect::run_inspect(inspect_args),
    }
}
