// src/backend/services/upload_service.rs
// Upload form validation and record creation (local store or remote service).

use crate::{
    adapter::{Connection, RecordGateway},
    error::HealthError,
    models::{NewRecord, Record, RecordId, UploadForm},
    storage::RecordStore,
    utils::{crypto::payload_ref, time},
};
use chrono::NaiveDate;
use validator::Validate;

const BYTES_PER_MB: u128 = 1024 * 1024;

/// Size descriptor shown on record cards, one decimal in MiB, e.g. "2.4 MB".
/// Halves round up.
pub fn size_descriptor(size_bytes: u64) -> String {
    let tenths = (u128::from(size_bytes) * 10 + BYTES_PER_MB / 2) / BYTES_PER_MB;
    format!("{}.{} MB", tenths / 10, tenths % 10)
}

/// Validates the form and derives the record metadata. Nothing is stored.
///
/// # Errors
///
/// * `InvalidInput` when no file is selected, a required field is empty, or
///   the date is malformed or after `today`.
/// * `InvalidFileType` when the file is not PDF or JSON.
pub fn prepare_upload(form: &UploadForm, owner: &str, today: NaiveDate) -> Result<NewRecord, HealthError> {
    let file = form
        .file
        .as_ref()
        .ok_or_else(|| HealthError::InvalidInput("Please select a file to upload.".to_string()))?;
    file.validate()
        .map_err(|_| HealthError::InvalidFileType("Please select a PDF or JSON file.".to_string()))?;
    form.validate()
        .map_err(|_| HealthError::InvalidInput("Please fill in all required fields.".to_string()))?;

    let date = NaiveDate::parse_from_str(&form.date, "%Y-%m-%d").map_err(|_| {
        HealthError::InvalidInput(format!("Record date '{}' is not a YYYY-MM-DD date.", form.date))
    })?;
    if date > today {
        return Err(HealthError::InvalidInput(
            "Record date cannot be in the future.".to_string(),
        ));
    }

    Ok(NewRecord {
        owner: owner.to_string(),
        name: form.name.clone(),
        category: form.category.clone(),
        date: form.date.clone(),
        size: size_descriptor(file.size_bytes()),
        notes: form.notes.clone(),
        payload_ref: payload_ref(&file.bytes),
    })
}

fn today() -> NaiveDate {
    time::date_of(time::get_current_time_ns())
}

/// Validates and appends the record to the local store.
pub fn upload_local<M: ic_stable_structures::Memory>(
    store: &RecordStore<M>,
    form: &UploadForm,
    owner: &str,
) -> Result<Record, HealthError> {
    let new = prepare_upload(form, owner, today())?;
    store.add_record(new)
}

/// Validates and submits the record to the patient-records service.
pub async fn upload_remote<C: Connection>(
    gateway: &RecordGateway<'_, C>,
    form: &UploadForm,
) -> Result<RecordId, HealthError> {
    // The service records the caller as owner.
    let new = prepare_upload(form, "", today())?;
    gateway.add_record(&new, &time::now_rfc3339()).await
}
