//! Per-row derivation of `total`, `product`, and `quantity`.
//!
//! Derived fields live in [`SalesRecord`]s keyed back to the source row by
//! position; the source table is never mutated. Rows that cannot produce
//! both a product and a total are dropped and counted.

use log::debug;

use crate::{
    data::parse_number,
    error::{SalesError, SalesResult},
    mapping::ColumnMapping,
    table::Table,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    /// Position of the source row in the uploaded table.
    pub row: usize,
    pub product: String,
    pub total: f64,
    pub quantity: Option<f64>,
}

/// Derives one [`SalesRecord`] per usable row, returning the surviving
/// records and the number of rows dropped.
///
/// The total comes from the explicit total column when it is set and
/// present, otherwise from quantity × price with per-operand casts; either
/// operand failing to cast makes the row's total missing. The mapping is
/// expected to have passed validation, so at least one of those paths
/// exists.
pub fn derive_records(table: &Table, mapping: &ColumnMapping) -> SalesResult<(Vec<SalesRecord>, usize)> {
    let total_idx = mapping
        .total
        .as_deref()
        .and_then(|name| table.column_index(name));
    let pair_idx = match (mapping.quantity.as_deref(), mapping.price.as_deref()) {
        (Some(quantity), Some(price)) => table
            .column_index(quantity)
            .zip(table.column_index(price)),
        _ => None,
    };
    if total_idx.is_none() && pair_idx.is_none() {
        return Err(SalesError::MissingRevenueColumns);
    }

    let product_idx = mapping
        .product
        .as_deref()
        .and_then(|name| table.column_index(name))
        .ok_or(SalesError::MissingProductColumn)?;
    let quantity_idx = mapping
        .quantity
        .as_deref()
        .and_then(|name| table.column_index(name));

    let mut records = Vec::with_capacity(table.rows.len());
    let mut dropped = 0usize;
    for row in 0..table.rows.len() {
        let total = match total_idx {
            Some(idx) => parse_number(table.cell(row, idx)),
            None => {
                let (q_idx, p_idx) = pair_idx.expect("revenue columns checked above");
                match (
                    parse_number(table.cell(row, q_idx)),
                    parse_number(table.cell(row, p_idx)),
                ) {
                    (Some(quantity), Some(price)) => Some(quantity * price),
                    _ => None,
                }
            }
        };
        let product = table.cell(row, product_idx).trim();

        let (Some(total), false) = (total, product.is_empty()) else {
            dropped += 1;
            continue;
        };
        records.push(SalesRecord {
            row,
            product: product.to_string(),
            total,
            quantity: quantity_idx.and_then(|idx| parse_number(table.cell(row, idx))),
        });
    }

    if records.is_empty() {
        return Err(SalesError::NoValidRows);
    }
    if dropped > 0 {
        debug!("Dropped {dropped} row(s) without a product or total");
    }
    Ok((records, dropped))
}
