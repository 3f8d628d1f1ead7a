//! Schema probing: reads an uploaded table and suggests column roles.
//!
//! Role suggestions are exact lookups against a fixed priority list per
//! role. No fuzzy matching: the operator confirms or overrides every
//! suggestion before anything is aggregated.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{error::SalesResult, mapping::ColumnMapping, table};

const PRODUCT_CANDIDATES: &[&str] = &["product", "item", "product_name"];
const TOTAL_CANDIDATES: &[&str] = &["total", "amount", "revenue", "sales"];
const QUANTITY_CANDIDATES: &[&str] = &["quantity", "qty", "units"];
const PRICE_CANDIDATES: &[&str] = &["price", "unit_price", "rate"];
const DATE_CANDIDATES: &[&str] = &["date", "order_date", "invoice_date"];
const YEAR_CANDIDATES: &[&str] = &["year"];
const MONTH_CANDIDATES: &[&str] = &["month"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaProbe {
    /// Normalized header names in source order.
    pub columns: Vec<String>,
    pub suggestions: ColumnMapping,
}

impl SchemaProbe {
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating probe file {path:?}"))?;
        serde_json::to_writer_pretty(file, self).context("Writing probe JSON")
    }
}

pub fn guess_column(columns: &[String], preferred: &[&str]) -> Option<String> {
    preferred
        .iter()
        .find(|name| columns.iter().any(|c| c == *name))
        .map(|name| name.to_string())
}

pub fn suggest_mapping(columns: &[String]) -> ColumnMapping {
    ColumnMapping {
        product: guess_column(columns, PRODUCT_CANDIDATES),
        total: guess_column(columns, TOTAL_CANDIDATES),
        quantity: guess_column(columns, QUANTITY_CANDIDATES),
        price: guess_column(columns, PRICE_CANDIDATES),
        date: guess_column(columns, DATE_CANDIDATES),
        year: guess_column(columns, YEAR_CANDIDATES),
        month: guess_column(columns, MONTH_CANDIDATES),
    }
}

/// Reads the file once and produces its normalized columns plus suggested
/// role defaults for the mapping form.
pub fn probe(path: &Path, delimiter: Option<u8>) -> SalesResult<SchemaProbe> {
    let parsed = table::read_table(path, delimiter)?;
    Ok(SchemaProbe {
        suggestions: suggest_mapping(&parsed.columns),
        columns: parsed.columns,
    })
}
