//! Report sinks: spreadsheet and PDF writers plus the output-folder
//! listing.
//!
//! Generated files carry a timestamped name and are also copied to
//! fixed-name latest pointers (`sales_report.xlsx`, `summary.pdf`) so a
//! stable path always serves the most recent run.

use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use itertools::Itertools;
use log::info;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use rust_xlsxwriter::Workbook;

use crate::{
    aggregate::AggregationResult,
    data::format_number,
    derive::SalesRecord,
    table::Table,
};

pub const LATEST_EXCEL_NAME: &str = "sales_report.xlsx";
pub const LATEST_PDF_NAME: &str = "summary.pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Excel,
    Pdf,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Excel => "Excel",
            ReportKind::Pdf => "PDF",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportFile {
    pub name: String,
    pub kind: ReportKind,
    pub size_kb: f64,
    pub updated_at: DateTime<Local>,
}

#[derive(Debug, Clone)]
pub struct WrittenReports {
    pub excel_name: String,
    pub pdf_name: String,
}

/// Header layout for the spreadsheet: source columns, with derived fields
/// replacing same-named source columns or appended at the end.
fn output_headers(table: &Table, has_quantity: bool) -> Vec<String> {
    let mut headers = table.columns.clone();
    for derived in ["total", "product"] {
        if !headers.iter().any(|h| h == derived) {
            headers.push(derived.to_string());
        }
    }
    if has_quantity && !headers.iter().any(|h| h == "quantity") {
        headers.push("quantity".to_string());
    }
    headers
}

fn write_excel(
    path: &Path,
    table: &Table,
    records: &[SalesRecord],
) -> Result<()> {
    let has_quantity = records.iter().any(|r| r.quantity.is_some());
    let headers = output_headers(table, has_quantity);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }
    for (row_offset, record) in records.iter().enumerate() {
        let row = row_offset as u32 + 1;
        for (col, header) in headers.iter().enumerate() {
            let col = col as u16;
            match header.as_str() {
                "total" => {
                    worksheet.write_number(row, col, record.total)?;
                }
                "product" => {
                    worksheet.write_string(row, col, &record.product)?;
                }
                "quantity" if has_quantity => {
                    if let Some(quantity) = record.quantity {
                        worksheet.write_number(row, col, quantity)?;
                    }
                }
                _ => {
                    let idx = table
                        .column_index(header)
                        .expect("header taken from table columns");
                    worksheet.write_string(row, col, table.cell(record.row, idx))?;
                }
            }
        }
    }
    workbook
        .save(path)
        .with_context(|| format!("Writing spreadsheet {path:?}"))?;
    Ok(())
}

/// Two-line summary document: total revenue and best product.
fn write_pdf(path: &Path, result: &AggregationResult) -> Result<()> {
    let (doc, page, layer) = PdfDocument::new("Sales Summary", Mm(210.0), Mm(297.0), "Summary");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .context("Loading builtin PDF font")?;
    let layer = doc.get_page(page).get_layer(layer);
    layer.use_text(
        format!("Total Revenue: {}", format_number(result.total_revenue)),
        12.0,
        Mm(20.0),
        Mm(270.0),
        &font,
    );
    layer.use_text(
        format!("Best Product: {}", result.best_product),
        12.0,
        Mm(20.0),
        Mm(260.0),
        &font,
    );
    let file = File::create(path).with_context(|| format!("Creating PDF {path:?}"))?;
    doc.save(&mut BufWriter::new(file))
        .with_context(|| format!("Writing PDF {path:?}"))?;
    Ok(())
}

/// Writes the timestamped spreadsheet and PDF into `output_folder` and
/// refreshes the latest pointers.
pub fn write_reports(
    table: &Table,
    records: &[SalesRecord],
    result: &AggregationResult,
    output_folder: &Path,
) -> Result<WrittenReports> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let excel_name = format!("sales_report_{timestamp}.xlsx");
    let pdf_name = format!("summary_{timestamp}.pdf");
    let excel_path = output_folder.join(&excel_name);
    let pdf_path = output_folder.join(&pdf_name);

    write_excel(&excel_path, table, records)?;
    write_pdf(&pdf_path, result)?;

    fs::copy(&excel_path, output_folder.join(LATEST_EXCEL_NAME))
        .context("Refreshing latest spreadsheet pointer")?;
    fs::copy(&pdf_path, output_folder.join(LATEST_PDF_NAME))
        .context("Refreshing latest PDF pointer")?;

    info!("Wrote {excel_name} and {pdf_name} to {:?}", output_folder);
    Ok(WrittenReports {
        excel_name,
        pdf_name,
    })
}

fn report_kind(path: &Path) -> Option<ReportKind> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") => Some(ReportKind::Excel),
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => Some(ReportKind::Pdf),
        _ => None,
    }
}

/// Lists report files in the output folder, newest first.
pub fn list_reports(output_folder: &Path) -> Result<Vec<ReportFile>> {
    let mut reports = Vec::new();
    let entries = fs::read_dir(output_folder)
        .with_context(|| format!("Reading output folder {output_folder:?}"))?;
    for entry in entries {
        let entry = entry?;
        let path: PathBuf = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(kind) = report_kind(&path) else {
            continue;
        };
        let metadata = entry.metadata()?;
        let updated_at: DateTime<Local> = metadata.modified()?.into();
        reports.push(ReportFile {
            name: entry.file_name().to_string_lossy().into_owned(),
            kind,
            size_kb: (metadata.len() as f64 / 1024.0 * 100.0).round() / 100.0,
            updated_at,
        });
    }
    Ok(reports
        .into_iter()
        .sorted_by(|a, b| b.updated_at.cmp(&a.updated_at))
        .collect())
}
