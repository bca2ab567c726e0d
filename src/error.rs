//! Error types for mortality table construction and lookup

use thiserror::Error;

/// Result alias used throughout the crate
pub type MortalityResult<T> = Result<T, MortalityError>;

/// Errors raised while validating tables or building mortality rates
#[derive(Error, Debug)]
pub enum MortalityError {
    /// Age outside the supported domain
    #[error("age {age} is outside the supported range {min}..={max}")]
    OutOfRange { age: u8, min: u8, max: u8 },

    /// A raw table does not cover the required ages or years
    #[error("table '{table}' is incomplete: {reason}")]
    IncompleteTable { table: String, reason: String },

    /// Published lookup requested for a year with no published rates
    #[error("no published rates in '{table}' for {year}")]
    UnpublishedYear { table: String, year: u32 },

    /// Blend weights do not cover every category being blended
    #[error("no blend weight supplied for category '{category}'")]
    WeightMismatch { category: String },

    /// Requested calculation year outside the supported domain
    #[error("IRS mortality rates are not defined for {year}; calculation year must be between {min} and {max}")]
    YearOutOfRange { year: u32, min: u32, max: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed value in a data file
    #[error("parse error in '{source_name}': {message}")]
    Parse { source_name: String, message: String },
}

impl MortalityError {
    pub(crate) fn incomplete(table: impl Into<String>, reason: impl Into<String>) -> Self {
        MortalityError::IncompleteTable {
            table: table.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        MortalityError::Parse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}
