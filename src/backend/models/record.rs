// src/backend/models/record.rs
use crate::models::common::{Category, PrincipalText, RecordId, SharingFlag};
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// Medical record metadata as held locally and shown to the user.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    pub owner: PrincipalText,
    pub name: String,
    #[serde(rename = "type")]
    pub category: String, // Stored verbatim, see Category::from_stored
    pub date: String,     // YYYY-MM-DD
    pub size: String,     // e.g. "2.4 MB"
    pub notes: String,
    pub payload_ref: String,
    pub shared_with_providers: bool,
    pub shared_with_researchers: bool,
    pub uploaded_at: String, // RFC 3339
}

impl Record {
    pub fn display_category(&self) -> Category {
        Category::from_stored(&self.category)
    }

    pub fn flag(&self, flag: SharingFlag) -> bool {
        match flag {
            SharingFlag::SharedWithProviders => self.shared_with_providers,
            SharingFlag::SharedWithResearchers => self.shared_with_researchers,
        }
    }

    pub fn set_flag(&mut self, flag: SharingFlag, value: bool) {
        match flag {
            SharingFlag::SharedWithProviders => self.shared_with_providers = value,
            SharingFlag::SharedWithResearchers => self.shared_with_researchers = value,
        }
    }

    /// Calendar date in the short form used on record cards, e.g. "Jan 1, 2024".
    /// Falls back to the raw string when it is not a valid date.
    pub fn formatted_date(&self) -> String {
        chrono::NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map(|d| d.format("%b %-d, %Y").to_string())
            .unwrap_or_else(|_| self.date.clone())
    }
}

/// Everything needed to create a record; id, flags and timestamp are assigned on insert.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct NewRecord {
    pub owner: PrincipalText,
    pub name: String,
    pub category: String,
    pub date: String,
    pub size: String,
    pub notes: String,
    pub payload_ref: String,
}

/// Record shape returned by the patient-records service.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct RemoteRecord {
    pub id: RecordId,
    pub owner: String,
    pub name: String,
    pub record_type: String,
    pub date: String,
    pub size: String,
    pub data: String,
    pub notes: String,
    pub uploaded_at: String,
}

impl From<RemoteRecord> for Record {
    fn from(remote: RemoteRecord) -> Self {
        Record {
            id: remote.id,
            owner: remote.owner,
            name: remote.name,
            category: remote.record_type,
            date: remote.date,
            size: remote.size,
            notes: remote.notes,
            payload_ref: remote.data,
            shared_with_providers: false,
            shared_with_researchers: false,
            uploaded_at: remote.uploaded_at,
        }
    }
}
