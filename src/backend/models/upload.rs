// src/backend/models/upload.rs
use candid::CandidType;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// MIME types accepted by the upload form.
pub const ALLOWED_MIME_TYPES: [&str; 2] = ["application/pdf", "application/json"];

fn validate_mime_type(mime_type: &str) -> Result<(), ValidationError> {
    if ALLOWED_MIME_TYPES.contains(&mime_type) {
        Ok(())
    } else {
        Err(ValidationError::new("mime_type"))
    }
}

/// A file picked in the upload form.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Validate)]
pub struct FileUpload {
    pub file_name: String,
    #[validate(custom(function = "validate_mime_type"))]
    pub mime_type: String,
    #[serde(with = "serde_bytes")]
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Upload form as submitted by the user. `file` is optional so a missing
/// selection can be reported instead of failing to deserialize.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, Default, Validate)]
pub struct UploadForm {
    pub file: Option<FileUpload>,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub category: String,
    #[validate(length(min = 1))]
    pub date: String,
    pub notes: String,
}
