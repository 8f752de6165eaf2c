//! Output formatting utilities.

use colored::Colorize;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use valor_config::PrecisionConfig;
use valor_core::math::round_dp;
use valor_engine::SensitivityGrid;

use crate::cli::OutputFormat;

/// Formats and prints rows based on the specified format.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_table(data),
        OutputFormat::Json => print_json(data),
        OutputFormat::Csv => print_csv(data),
    }
}

/// Prints data as a formatted table.
fn print_table<T: Tabled>(data: &[T]) -> anyhow::Result<()> {
    if data.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let table = Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();

    println!("{}", table);
    Ok(())
}

/// Prints data as JSON.
pub fn print_json<T: Serialize + ?Sized>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints data as CSV.
fn print_csv<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for item in data {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Prints a sensitivity grid as a table: growth rates down, discount rates
/// across.
pub fn print_grid(grid: &SensitivityGrid, precision: &PrecisionConfig) {
    let mut builder = Builder::default();
    for record in grid_records(grid, precision) {
        builder.push_record(record);
    }
    let table = builder
        .build()
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();
    println!("{}", table);
}

/// One grid cell in long form, for CSV output.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct GridPoint {
    #[tabled(rename = "Company")]
    pub company: String,
    #[tabled(rename = "TGR")]
    pub growth_rate: String,
    #[tabled(rename = "WACC")]
    pub discount_rate: String,
    #[tabled(rename = "EV")]
    pub enterprise_value: String,
}

/// Flattens a grid into one point per cell, rows first.
pub fn grid_points(company: &str, grid: &SensitivityGrid) -> Vec<GridPoint> {
    grid.rows
        .iter()
        .flat_map(|row| {
            grid.discount_rates
                .iter()
                .zip(&row.cells)
                .map(move |(w, cell)| GridPoint {
                    company: company.to_string(),
                    growth_rate: row.growth_rate.normalize().to_string(),
                    discount_rate: w.normalize().to_string(),
                    enterprise_value: cell.to_string(),
                })
        })
        .collect()
}

/// Header row plus one row per growth rate.
fn grid_records(grid: &SensitivityGrid, precision: &PrecisionConfig) -> Vec<Vec<String>> {
    let mut header = vec!["TGR \\ WACC".to_string()];
    header.extend(
        grid.discount_rates
            .iter()
            .map(|w| format_rate(*w, precision.rate_dp)),
    );

    let mut records = vec![header];
    for row in &grid.rows {
        let mut record = vec![format_rate(row.growth_rate, precision.rate_dp)];
        record.extend(row.cells.iter().map(|cell| match cell.value() {
            Some(v) => format_money(v, precision.money_dp),
            None => cell.to_string(),
        }));
        records.push(record);
    }
    records
}

/// Formats an amount with thousands separators, e.g. `1,167.16`.
pub fn format_money(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven);
    let text = format!("{:.prec$}", rounded.abs(), prec = dp as usize);
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Formats a fractional rate as a percentage.
///
/// `rate_dp` counts places of the fraction, so the default of 4 renders
/// `0.12` as `12.00%`.
pub fn format_rate(value: Decimal, rate_dp: u32) -> String {
    let dp = rate_dp.saturating_sub(2);
    match value.checked_mul(Decimal::ONE_HUNDRED) {
        Some(percent) => format!("{:.prec$}%", round_dp(percent, dp), prec = dp as usize),
        None => value.to_string(),
    }
}

/// Prints an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Prints an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Metric")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}
