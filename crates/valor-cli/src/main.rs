//! Valor CLI - Command-line interface for DCF equity valuation.
//!
//! # Usage
//!
//! ```bash
//! # Print an input template for 5 projection years
//! valor template --years 5 > entities.csv
//!
//! # Value every entity in a file
//! valor value --input entities.csv
//!
//! # Use a custom sensitivity grid and house defaults for missing fields
//! valor value --input entities.csv --config wide.toml --defaults defaults.json
//!
//! # Sensitivity grids only, as JSON
//! valor sensitivity --input entities.json --format json
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so table, JSON and CSV output stay clean
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "debug" } else { "warn" })
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let format = cli.format;
    let quiet = cli.quiet;

    // Execute command
    match cli.command {
        Commands::Value(args) => commands::value::execute(args, format, quiet)?,
        Commands::Sensitivity(args) => commands::sensitivity::execute(args, format, quiet)?,
        Commands::Template(args) => commands::template::execute(args, format)?,
    }

    Ok(())
}
