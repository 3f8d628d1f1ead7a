//! The report pipeline: resolve input, validate the mapping, derive,
//! aggregate, write report files, and record history.

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{info, warn};

use crate::{
    aggregate::{self, AggregationResult, TimeMode},
    cli::ReportArgs,
    config::StorageConfig,
    data::format_number,
    derive, error::SalesError, history, mapping::ColumnMapping, report, table, uploads,
};

/// Resolves the report input: an explicit path, or a token from a prior
/// `upload` run. Neither one provided means no file at all.
fn resolve_input(args: &ReportArgs, config: &StorageConfig) -> Result<PathBuf, SalesError> {
    if let Some(input) = &args.input {
        return Ok(input.clone());
    }
    match &args.token {
        Some(token) => uploads::resolve(token, &config.upload_folder),
        None => Err(SalesError::NoFileProvided),
    }
}

pub fn execute(args: &ReportArgs, config: &StorageConfig, history_path: &Path) -> Result<()> {
    let input = resolve_input(args, config)?;
    let parsed = table::read_table(&input, args.delimiter)?;

    let mode = TimeMode::from_input(&args.time_mode);
    let mapping = ColumnMapping::from_selections(
        &args.product_col,
        &args.total_col,
        &args.quantity_col,
        &args.price_col,
        &args.date_col,
        &args.year_col,
        &args.month_col,
    );
    mapping.validate(&parsed.columns, mode)?;

    let (records, dropped) = derive::derive_records(&parsed, &mapping)?;
    if dropped > 0 {
        info!("Dropped {dropped} row(s) without a usable product or total");
    }
    let result = aggregate::summarize(&records, &parsed, mode, &mapping)?;

    config.ensure_directories()?;
    let written = report::write_reports(&parsed, &records, &result, &config.output_folder)?;

    // History is best-effort: a failed write must not fail the run.
    match history::record(history_path, &result, mode, &written.excel_name) {
        Ok(id) => info!("Recorded run {id} in history"),
        Err(err) => warn!("Skipping history entry: {err:#}"),
    }

    print_summary(&result, mode, &written);
    Ok(())
}

fn print_summary(result: &AggregationResult, mode: TimeMode, written: &report::WrittenReports) {
    println!("Time basis: {mode}");
    for (label, value) in result.labels.iter().zip(&result.values) {
        println!("{label:>10}  {}", format_number(*value));
    }
    println!();
    println!("Total revenue: {}", format_number(result.total_revenue));
    println!("Best product:  {}", result.best_product);
    println!("Spreadsheet:   {}", written.excel_name);
    println!("PDF summary:   {}", written.pdf_name);
}
