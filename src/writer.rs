// 💾 CSV Sink
// Serializes the generated rows as delimited text, one row per
// (period, state) pair, with a header derived from the scenario's
// model labels. Column order matches the reference dataset layout.

use crate::config::DatasetConfig;
use crate::generator::DatasetRow;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

// ============================================================================
// HEADER
// ============================================================================

/// Build the column header for a scenario. Model columns come from the
/// configured labels, so two scenarios with different model sets produce
/// different (but self-describing) files.
pub fn csv_header(config: &DatasetConfig) -> Vec<String> {
    let mut header = vec![
        "date".to_string(),
        "year".to_string(),
        "month".to_string(),
        // National metrics
        "national_ev_sales".to_string(),
        "national_ev_revenue_crores".to_string(),
        "national_ev_market_share_pct".to_string(),
    ];

    // Model-wise sales then revenue, in config order
    for model in &config.models {
        header.push(format!("{}_sales", model.slug()));
    }
    for model in &config.models {
        header.push(format!("{}_revenue_crores", model.slug()));
    }

    // State-level metrics
    header.push("state".to_string());
    header.push("state_ev_sales".to_string());
    header.push("state_ev_revenue_crores".to_string());
    header.push("charging_stations_added_state".to_string());
    header.push("cumulative_charging_stations_state".to_string());

    header
}

fn record_fields(row: &DatasetRow) -> Vec<String> {
    let mut fields = vec![
        row.period.date.format("%Y-%m-%d").to_string(),
        row.period.year.to_string(),
        row.period.month.to_string(),
        row.national.sales.to_string(),
        format!("{:.2}", row.national.revenue_crores),
        format!("{:.2}", row.national.market_share_pct),
    ];

    for units in &row.national.model_sales {
        fields.push(units.to_string());
    }
    for revenue in &row.national.model_revenue_crores {
        fields.push(format!("{:.2}", revenue));
    }

    fields.push(row.state.clone());
    fields.push(row.state_sales.to_string());
    fields.push(format!("{:.2}", row.state_revenue_crores));
    fields.push(row.stations_added.to_string());
    fields.push(row.stations_cumulative.to_string());

    fields
}

// ============================================================================
// WRITING
// ============================================================================

/// Write header + rows to any sink, in generation order
pub fn write_csv_to<W: Write>(writer: W, config: &DatasetConfig, rows: &[DatasetRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(csv_header(config))
        .context("Failed to write CSV header")?;

    for row in rows {
        wtr.write_record(record_fields(row))
            .context("Failed to write CSV row")?;
    }

    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Write the dataset to a file path
pub fn write_csv<P: AsRef<Path>>(path: P, config: &DatasetConfig, rows: &[DatasetRow]) -> Result<()> {
    let file = File::create(path.as_ref())
        .with_context(|| format!("Failed to create output file: {:?}", path.as_ref()))?;
    write_csv_to(file, config, rows)
}

// ============================================================================
// CONSOLE SUMMARY
// ============================================================================

/// Shape and first rows, printed after generation. Informational only,
/// not part of the data contract.
pub fn print_summary(config: &DatasetConfig, rows: &[DatasetRow]) {
    let columns = csv_header(config).len();

    println!("\n📊 Dataset summary");
    println!("Shape: ({}, {})", rows.len(), columns);

    for row in rows.iter().take(5) {
        println!(
            "  {}  {:<15} national={:<6} state={:<5} revenue={:.2}cr stations={}",
            row.period.date.format("%Y-%m-%d"),
            row.state,
            row.national.sales,
            row.state_sales,
            row.state_revenue_crores,
            row.stations_cumulative,
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
