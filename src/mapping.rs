//! Column role assignments and their validation.
//!
//! A [`ColumnMapping`] names which source columns play the `product`,
//! `total`, `quantity`, `price`, `date`, `year`, and `month` roles. Roles
//! are optional; a blank or whitespace-only selection is "unset", never a
//! literal blank-named column.

use serde::{Deserialize, Serialize};

use crate::{
    aggregate::TimeMode,
    error::{SalesError, SalesResult},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub product: Option<String>,
    pub total: Option<String>,
    pub quantity: Option<String>,
    pub price: Option<String>,
    pub date: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
}

/// Trims and lowercases a role selection, mapping blank input to "unset".
pub fn normalize_role(value: &str) -> Option<String> {
    let cleaned = value.trim().to_lowercase();
    if cleaned.is_empty() { None } else { Some(cleaned) }
}

impl ColumnMapping {
    pub fn from_selections(
        product: &str,
        total: &str,
        quantity: &str,
        price: &str,
        date: &str,
        year: &str,
        month: &str,
    ) -> Self {
        Self {
            product: normalize_role(product),
            total: normalize_role(total),
            quantity: normalize_role(quantity),
            price: normalize_role(price),
            date: normalize_role(date),
            year: normalize_role(year),
            month: normalize_role(month),
        }
    }

    /// True when the role is set and its column exists in `columns`.
    pub fn role_present(role: &Option<String>, columns: &[String]) -> bool {
        role.as_deref()
            .is_some_and(|name| columns.iter().any(|c| c == name))
    }

    /// Checks that the mapping can produce a product key, a revenue total,
    /// and a time basis for `mode`. Rules run in order; the first failure
    /// wins so the operator fixes one thing at a time.
    pub fn validate(&self, columns: &[String], mode: TimeMode) -> SalesResult<()> {
        if !Self::role_present(&self.product, columns) {
            return Err(SalesError::MissingProductColumn);
        }

        let total_ok = Self::role_present(&self.total, columns);
        let pair_ok = Self::role_present(&self.quantity, columns)
            && Self::role_present(&self.price, columns);
        if !total_ok && !pair_ok {
            return Err(SalesError::MissingRevenueColumns);
        }

        let time_ok = match mode {
            TimeMode::Date => Self::role_present(&self.date, columns),
            TimeMode::YearMonth => {
                Self::role_present(&self.year, columns) && Self::role_present(&self.month, columns)
            }
            TimeMode::Year => Self::role_present(&self.year, columns),
            TimeMode::Month => Self::role_present(&self.month, columns),
        };
        if !time_ok {
            return Err(SalesError::MissingTimeColumns(mode));
        }
        Ok(())
    }
}
