//! Store errors.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response, body passed through as-is.
    #[error("store rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid row: {0}")]
    Row(#[from] RowError),
}

/// A wire row that can't become a domain value.
#[derive(Debug, Error, PartialEq)]
pub enum RowError {
    #[error("invalid amount in {field}: {value}")]
    InvalidAmount { field: &'static str, value: Decimal },

    #[error("invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("{0} missing from row")]
    Missing(&'static str),
}

