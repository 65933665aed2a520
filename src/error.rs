use reqwest::StatusCode;
use thiserror::Error;

use crate::rows::{RowField, RowId};

/// Application error types
#[derive(Debug, Error)]
pub enum EstimatorError {
    /// HTTP request error (connection refused, DNS, body read, ...)
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Upstream error ({status}): {body}")]
    UpstreamStatus { status: StatusCode, body: String },

    /// Response or catalog body was not the expected JSON shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local catalog file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Quantity or hours field holds something other than a positive integer
    #[error("Row {row}: invalid {field} '{value}' (expected a positive integer)")]
    InvalidNumber {
        row: RowId,
        field: RowField,
        value: String,
    },

    /// Row handle no longer refers to an attached row
    #[error("Row {0} not found")]
    UnknownRow(RowId),

    /// Selected value is not one of the row's current options
    #[error("Row {row}: '{value}' is not a valid {field} option")]
    UnknownOption {
        row: RowId,
        field: RowField,
        value: String,
    },

    /// A calculation is already pending
    #[error("Calculation already in progress")]
    SubmitInFlight,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EstimatorError {
    /// Short machine-readable name, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http(_) => "http_request_error",
            Self::UpstreamStatus { .. } => "upstream_error",
            Self::Json(_) => "json_error",
            Self::Io(_) => "io_error",
            Self::InvalidNumber { .. } => "invalid_number",
            Self::UnknownRow(_) => "unknown_row",
            Self::UnknownOption { .. } => "unknown_option",
            Self::SubmitInFlight => "submit_in_flight",
            Self::Config(_) => "config_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, EstimatorError>;
