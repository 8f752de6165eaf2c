//! Value command implementation.
//!
//! Values every entity in an input file: projections, DCF workings,
//! the equity bridge and, unless disabled, the EV sensitivity grid.

use anyhow::Result;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

use valor_config::PrecisionConfig;
use valor_core::ValuationInput;
use valor_engine::valuation::SummaryLine;
use valor_engine::{SensitivityGrid, Valuation};
use valor_input::FieldKey;

use super::{finish, Entity, EntityFailure, InputArgs, Session};
use crate::cli::OutputFormat;
use crate::output::{
    format_money, format_rate, print_error, print_grid, print_header, print_info, print_json,
    print_output, print_warning, KeyValue,
};

/// Arguments for the value command.
#[derive(Args, Debug)]
pub struct ValueArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Skip the sensitivity grid
    #[arg(long)]
    pub no_sensitivity: bool,
}

/// Projection inputs for one year.
#[derive(Debug, Clone, Serialize, Tabled)]
struct ProjectionRow {
    #[tabled(rename = "Year")]
    year: String,
    #[tabled(rename = "NOIAT")]
    noiat: String,
    #[tabled(rename = "Depreciation")]
    depreciation: String,
    #[tabled(rename = "CapEx")]
    capex: String,
    #[tabled(rename = "Inc. NWC")]
    incremental_nwc: String,
    #[tabled(rename = "FCFF")]
    fcf: String,
}

/// Discounting workings for one year.
#[derive(Debug, Clone, Serialize, Tabled)]
struct WorkingRow {
    #[tabled(rename = "Year")]
    year: String,
    #[tabled(rename = "FCFF")]
    fcf: String,
    #[tabled(rename = "Elapsed (yrs)")]
    elapsed: String,
    #[tabled(rename = "Discount Factor")]
    discount_factor: String,
    #[tabled(rename = "PV")]
    present_value: String,
}

/// One summary figure of one entity, for CSV output.
#[derive(Debug, Clone, Serialize, Tabled)]
struct SummaryRecord {
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// One entity in JSON output.
#[derive(Debug, Serialize)]
struct EntityReport {
    company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_name: Option<String>,
    status: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    filled: Vec<FieldKey>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    missing: Vec<FieldKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Vec<SummaryLine>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    valuation: Option<Valuation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sensitivity: Option<SensitivityGrid>,
}

/// Executes the value command.
pub fn execute(args: ValueArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let session = Session::open(&args.input)?;
    let precision = session.engine.config().precision;

    let mut reports = Vec::new();
    let mut summary_records = Vec::new();
    let mut failed = 0;
    let total = session.batch.len();

    for entity in session.entities() {
        let company = entity.record.company_name.clone();

        if format == OutputFormat::Table && !quiet {
            print_header(&format!("Processing: {company}"));
        }
        if !entity.filled.is_empty() && !quiet {
            print_warning(&format!(
                "{company}: filled from defaults: {}",
                join_fields(&entity.filled)
            ));
        }

        let Entity {
            record,
            filled,
            outcome,
        } = entity;

        match outcome {
            Ok((input, valuation)) => {
                let grid = (!args.no_sensitivity).then(|| session.engine.sensitivity(&valuation));
                let summary = session.engine.summary(&valuation);

                match format {
                    OutputFormat::Table => {
                        print_valuation(&input, &valuation, &summary, &precision, quiet)?;
                        if let Some(grid) = &grid {
                            print_header("EV Sensitivity (WACC across, TGR down)");
                            print_grid(grid, &precision);
                        }
                    }
                    OutputFormat::Csv => {
                        summary_records.extend(summary.iter().map(|line| SummaryRecord {
                            company: company.clone(),
                            metric: line.label.to_string(),
                            value: line.value.to_string(),
                        }));
                    }
                    OutputFormat::Json => {}
                }

                reports.push(EntityReport {
                    company_name: record.company_name,
                    client_name: record.client_name,
                    status: "valued",
                    filled,
                    missing: Vec::new(),
                    error: None,
                    summary: Some(summary),
                    valuation: Some(valuation),
                    sensitivity: grid,
                });
            }
            Err(failure) => {
                failed += 1;
                let message = failure.message(&company, precision.rate_dp);
                if format != OutputFormat::Json {
                    print_error(&message);
                }

                let missing = match &failure {
                    EntityFailure::Missing(fields) => fields.clone(),
                    EntityFailure::Valuation(_) => Vec::new(),
                };
                reports.push(EntityReport {
                    company_name: record.company_name,
                    client_name: record.client_name,
                    status: if missing.is_empty() { "failed" } else { "missing" },
                    filled,
                    missing,
                    error: Some(message),
                    summary: None,
                    valuation: None,
                    sensitivity: None,
                });
            }
        }
    }

    match format {
        OutputFormat::Json => print_json(&reports)?,
        OutputFormat::Csv => print_output(&summary_records, format)?,
        OutputFormat::Table => {
            if !quiet {
                print_info(&format!(
                    "Valued {} of {} entities from {}",
                    total - failed,
                    total,
                    session.source()
                ));
            }
        }
    }

    finish(failed, total)
}

fn print_valuation(
    input: &ValuationInput,
    valuation: &Valuation,
    summary: &[SummaryLine],
    precision: &PrecisionConfig,
    quiet: bool,
) -> Result<()> {
    let money = |v| format_money(v, precision.money_dp);
    let rate = |v: Decimal| format_rate(v, precision.rate_dp);

    if !quiet {
        print_header("Projections");
        let projections: Vec<ProjectionRow> = input
            .years
            .iter()
            .zip(valuation.free_cash_flows.iter())
            .enumerate()
            .map(|(i, (year, fcf))| ProjectionRow {
                year: format!("FY {}", i + 1),
                noiat: money(year.noiat),
                depreciation: money(year.depreciation),
                capex: money(year.capex),
                incremental_nwc: money(year.incremental_nwc),
                fcf: money(*fcf),
            })
            .collect();
        print_output(&projections, OutputFormat::Table)?;

        print_header("DCF Workings");
        let workings: Vec<WorkingRow> = valuation
            .rows
            .iter()
            .map(|row| {
                let row = row.rounded(precision);
                WorkingRow {
                    year: row.label.clone(),
                    fcf: money(row.fcf),
                    elapsed: row.elapsed.normalize().to_string(),
                    discount_factor: format!(
                        "{:.prec$}",
                        row.discount_factor,
                        prec = precision.factor_dp as usize
                    ),
                    present_value: money(row.present_value),
                }
            })
            .collect();
        print_output(&workings, OutputFormat::Table)?;

        print_header("Terminal Value");
        let terminal = vec![
            KeyValue::new("WACC", rate(valuation.wacc)),
            KeyValue::new("Terminal Growth", rate(valuation.terminal_growth)),
            KeyValue::new("Terminal FCFF", money(valuation.terminal_fcf)),
            KeyValue::new("Terminal Value", money(valuation.terminal_value)),
            KeyValue::new(
                "Discounted Over (yrs)",
                valuation.horizon.normalize().to_string(),
            ),
            KeyValue::new("PV of Terminal Value", money(valuation.pv_terminal)),
            KeyValue::new(
                "Terminal Share of EV",
                valuation
                    .terminal_share()
                    .map_or_else(|| "n/a".to_string(), rate),
            ),
        ];
        print_output(&terminal, OutputFormat::Table)?;
    }

    print_header("Valuation Summary");
    let lines: Vec<KeyValue> = summary
        .iter()
        .map(|line| KeyValue::new(line.label, money(line.value)))
        .collect();
    print_output(&lines, OutputFormat::Table)
}

fn join_fields(fields: &[FieldKey]) -> String {
    fields
        .iter()
        .map(FieldKey::column_name)
        .collect::<Vec<_>>()
        .join(", ")
}
