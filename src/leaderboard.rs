//! Best-seller selection across the derived records.

use std::collections::BTreeMap;

use crate::derive::SalesRecord;

/// Picks the best product: by summed quantity when any record carries one,
/// otherwise by summed total. Ties go to the lexicographically smallest
/// product name so repeated runs agree.
pub fn select_best_product(records: &[SalesRecord]) -> Option<String> {
    let by_quantity = records.iter().any(|r| r.quantity.is_some());

    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        let contribution = if by_quantity {
            record.quantity.unwrap_or(0.0)
        } else {
            record.total
        };
        *sums.entry(record.product.as_str()).or_insert(0.0) += contribution;
    }

    let mut best: Option<(&str, f64)> = None;
    for (&product, &sum) in &sums {
        // Strict comparison keeps the earliest (smallest) key on ties.
        match best {
            Some((_, best_sum)) if sum <= best_sum => {}
            _ => best = Some((product, sum)),
        }
    }
    best.map(|(product, _)| product.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(product: &str, total: f64, quantity: Option<f64>) -> SalesRecord {
        SalesRecord {
            row: 0,
            product: product.to_string(),
            total,
            quantity,
        }
    }

    #[test]
    fn selects_by_total_without_quantities() {
        let records = vec![
            record("A", 10.0, None),
            record("B", 5.0, None),
            record("A", 7.0, None),
        ];
        assert_eq!(select_best_product(&records).as_deref(), Some("A"));
    }

    #[test]
    fn quantity_signal_outranks_revenue() {
        // B moves fewer dollars but more units; quantity wins when present.
        let records = vec![
            record("A", 100.0, Some(1.0)),
            record("B", 10.0, Some(9.0)),
        ];
        assert_eq!(select_best_product(&records).as_deref(), Some("B"));
    }

    #[test]
    fn records_without_quantity_contribute_zero_units() {
        let records = vec![
            record("A", 1.0, Some(2.0)),
            record("B", 500.0, None),
        ];
        assert_eq!(select_best_product(&records).as_deref(), Some("A"));
    }

    #[test]
    fn ties_break_to_smallest_product_name() {
        let records = vec![record("zeta", 5.0, None), record("alpha", 5.0, None)];
        assert_eq!(select_best_product(&records).as_deref(), Some("alpha"));
    }

    #[test]
    fn empty_input_has_no_best_product() {
        assert_eq!(select_best_product(&[]), None);
    }
}
