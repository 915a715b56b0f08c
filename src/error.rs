//! Error types for pricing, underwriting and reserve calculations
//!
//! Calculation errors are local to a single quote or reserve request. Table
//! loading errors are kept separate so a failed load never reaches the
//! calculation path.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the calculation core
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PricingError {
    /// Input outside product bounds (age, coverage, term, occupation class)
    #[error("validation failed: {0}")]
    Validation(String),

    /// A required table, rule or product entry is missing
    #[error("missing configuration: {0}")]
    ConfigurationAbsent(String),

    /// A table entry breaks an invariant (rate range, multiplier sign, load ceiling)
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Shorthand `Result` used by the calculation core
pub type Result<T, E = PricingError> = std::result::Result<T, E>;

/// Errors raised while reading table files from disk
#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Invalid(#[from] PricingError),
}

/// Return a validation error unless `$cond` holds
#[macro_export]
macro_rules! require {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::error::PricingError::Validation(format!($($msg)*)));
        }
    };
}
