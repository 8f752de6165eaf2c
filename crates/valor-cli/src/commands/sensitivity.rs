//! Sensitivity command implementation.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use valor_engine::SensitivityGrid;

use super::{finish, InputArgs, Session};
use crate::cli::OutputFormat;
use crate::output::{
    format_money, format_rate, grid_points, print_error, print_grid, print_header, print_json,
    print_output,
};

/// Arguments for the sensitivity command.
#[derive(Args, Debug)]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Serialize)]
struct GridReport {
    company_name: String,
    grid: SensitivityGrid,
}

/// Executes the sensitivity command.
pub fn execute(args: SensitivityArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let session = Session::open(&args.input)?;
    let precision = session.engine.config().precision;
    let total = session.batch.len();

    let mut failed = 0;
    let mut reports = Vec::new();
    let mut points = Vec::new();

    for entity in session.entities() {
        let company = entity.record.company_name;
        let valuation = match entity.outcome {
            Ok((_, valuation)) => valuation,
            Err(failure) => {
                failed += 1;
                print_error(&failure.message(&company, precision.rate_dp));
                continue;
            }
        };
        let grid = session.engine.sensitivity(&valuation);

        match format {
            OutputFormat::Table => {
                print_header(&company);
                if !quiet {
                    println!(
                        "Base EV {} at WACC {} / TGR {}",
                        format_money(valuation.enterprise_value, precision.money_dp),
                        format_rate(valuation.wacc, precision.rate_dp),
                        format_rate(valuation.terminal_growth, precision.rate_dp)
                    );
                }
                print_grid(&grid, &precision);
            }
            OutputFormat::Csv => points.extend(grid_points(&company, &grid)),
            OutputFormat::Json => reports.push(GridReport {
                company_name: company,
                grid,
            }),
        }
    }

    match format {
        OutputFormat::Json => print_json(&reports)?,
        OutputFormat::Csv => print_output(&points, format)?,
        OutputFormat::Table => {}
    }

    finish(failed, total)
}
