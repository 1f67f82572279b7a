use thiserror::Error;

use crate::constants::{HTTP_STATUS_QUOTA_EXCEEDED, HTTP_STATUS_TOO_MANY_REQUESTS};

/// Errors that stop a run
#[derive(Error, Debug)]
pub enum SiftError {
    #[error("Missing API key: set the {0} environment variable")]
    MissingApiKey(String),

    #[error("Required field '{field}' missing in {file} at row {row}")]
    MissingField {
        field: String,
        file: String,
        row: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Channel lookup failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Response decode error: {0}")]
    Decode(String),
}

impl LookupError {
    /// Quota and rate-limit responses are worth waiting out.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LookupError::Http { status, .. }
                if *status == HTTP_STATUS_QUOTA_EXCEEDED || *status == HTTP_STATUS_TOO_MANY_REQUESTS
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            LookupError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("Language could not be determined")]
    Undetermined,
}
