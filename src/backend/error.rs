// src/backend/error.rs
use crate::models::common::RecordId;
use candid::CandidType;
use serde::Deserialize;
use thiserror::Error;

/// Message returned by every gateway call attempted without an authenticated connection.
pub const AUTHENTICATE_FIRST: &str = "Please authenticate first";

#[derive(CandidType, Deserialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum HealthError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("{}", AUTHENTICATE_FIRST)]
    NotAuthenticated,

    // Text reported by the remote service or the transport, kept verbatim.
    #[error("{0}")]
    RemoteError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl HealthError {
    /// True for errors raised before any state was touched or any call was made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            HealthError::InvalidInput(_) | HealthError::InvalidFileType(_)
        )
    }
}

impl From<candid::Error> for HealthError {
    fn from(e: candid::Error) -> Self {
        HealthError::SerializationError(format!("candid: {}", e))
    }
}

impl From<serde_json::Error> for HealthError {
    fn from(e: serde_json::Error) -> Self {
        HealthError::SerializationError(format!("json: {}", e))
    }
}

impl From<validator::ValidationErrors> for HealthError {
    fn from(e: validator::ValidationErrors) -> Self {
        HealthError::InvalidInput(e.to_string())
    }
}
