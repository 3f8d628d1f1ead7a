use thiserror::Error;

use crate::aggregate::TimeMode;

/// Recoverable failures surfaced to the operator.
///
/// Every variant maps to a message the CLI prints alongside the state the
/// user needs to correct and resubmit (columns, token, prior selections).
/// None of these abort the process.
#[derive(Debug, Error, PartialEq)]
pub enum SalesError {
    #[error("Unable to read CSV file: {0}")]
    UnreadableFile(String),
    #[error("Please provide an input file first")]
    NoFileProvided,
    #[error("Upload token '{0}' not found. Please upload the file again")]
    SessionExpired(String),
    #[error("Please select a valid product column")]
    MissingProductColumn,
    #[error("Select a total column, or both quantity and price columns")]
    MissingRevenueColumns,
    #[error("{}", .0.missing_columns_message())]
    MissingTimeColumns(TimeMode),
    #[error("No valid rows after applying the selected columns")]
    NoValidRows,
    #[error("No valid time values found for the selected columns")]
    NoTimeValuesFound,
    #[error("Unable to update storage paths: {0}")]
    StorageConfigError(String),
}

pub type SalesResult<T> = Result<T, SalesError>;
