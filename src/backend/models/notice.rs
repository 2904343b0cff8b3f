// src/backend/models/notice.rs
use crate::error::HealthError;
use candid::CandidType;
use serde::{Deserialize, Serialize};

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
pub enum NoticeVariant {
    Default,
    Destructive,
}

/// Toast-style notification shown to the user after an action.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Notice {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Default,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Notice {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Destructive,
        }
    }
}

impl From<&HealthError> for Notice {
    fn from(err: &HealthError) -> Self {
        let title = match err {
            HealthError::InvalidInput(_) => "Missing required fields",
            HealthError::InvalidFileType(_) => "Invalid file type",
            HealthError::RecordNotFound(_) => "Record not found",
            HealthError::NotAuthenticated => "Not signed in",
            HealthError::RemoteError(_) => "Error",
            HealthError::StorageError(_) | HealthError::SerializationError(_) => "Storage error",
            HealthError::ConfigError(_) => "Configuration error",
        };
        let description = match err {
            HealthError::InvalidInput(msg)
            | HealthError::InvalidFileType(msg)
            | HealthError::RemoteError(msg) => msg.clone(),
            other => other.to_string(),
        };
        Notice::error(title, description)
    }
}

impl From<HealthError> for Notice {
    fn from(err: HealthError) -> Self {
        Notice::from(&err)
    }
}
