//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{SensitivityArgs, TemplateArgs, ValueArgs};

/// Valor - DCF equity valuation CLI
#[derive(Parser)]
#[command(name = "valor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log engine progress to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Value every entity in an input file
    Value(ValueArgs),

    /// Print only the EV sensitivity grid for every entity
    Sensitivity(SensitivityArgs),

    /// Print a CSV header with every required input column
    Template(TemplateArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["valor", "template", "--years", "3", "--format", "json", "-q"]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Template(ref a) if a.years == 3));
    }
}
