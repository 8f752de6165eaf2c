//! Template command implementation.
//!
//! Prints the input columns for a given projection length, ready to be
//! filled in as a CSV file.

use anyhow::Result;
use clap::Args;

use valor_input::template_header;

use super::validate_years;
use crate::cli::OutputFormat;
use crate::output::print_json;

/// Arguments for the template command.
#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// Number of projection years
    #[arg(short, long, default_value = "5")]
    pub years: usize,
}

/// Executes the template command.
pub fn execute(args: TemplateArgs, format: OutputFormat) -> Result<()> {
    let years = validate_years(args.years)?;
    let header = template_header(years);

    match format {
        OutputFormat::Json => print_json(&header)?,
        OutputFormat::Table | OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(&header)?;
            wtr.flush()?;
        }
    }
    Ok(())
}
