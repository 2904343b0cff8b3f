// src/backend/models/common.rs
use candid::CandidType;
use serde::{Deserialize, Serialize};

pub type RecordId = u64; // Crosses the service boundary as nat64
pub type PrincipalText = String; // Grantees and owners travel as principal text
pub type TimestampNs = u64; // Nanoseconds since epoch

/// Fixed set of record categories. The stored string on a record is kept
/// verbatim; this enum is only the display view of it.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy, Hash)]
pub enum Category {
    Prescription,
    LabReport,
    Imaging,
    Consultation,
    Vaccination,
    Other,
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
pub enum RecordIcon {
    Pill,
    TestTube,
    FileImage,
    Stethoscope,
    Syringe,
    FileText,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Prescription,
        Category::LabReport,
        Category::Imaging,
        Category::Consultation,
        Category::Vaccination,
        Category::Other,
    ];

    /// Parses a known stored value. Returns `None` for anything outside the set.
    pub fn parse(value: &str) -> Option<Category> {
        match value {
            "prescription" => Some(Category::Prescription),
            "lab-report" => Some(Category::LabReport),
            "imaging" => Some(Category::Imaging),
            "consultation" => Some(Category::Consultation),
            "vaccination" => Some(Category::Vaccination),
            "other" => Some(Category::Other),
            _ => None,
        }
    }

    /// Display view of a stored value; unrecognized values read as `Other`.
    pub fn from_stored(value: &str) -> Category {
        Category::parse(value).unwrap_or(Category::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Prescription => "prescription",
            Category::LabReport => "lab-report",
            Category::Imaging => "imaging",
            Category::Consultation => "consultation",
            Category::Vaccination => "vaccination",
            Category::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Prescription => "Prescription",
            Category::LabReport => "Lab Report",
            Category::Imaging => "Medical Imaging",
            Category::Consultation => "Consultation Notes",
            Category::Vaccination => "Vaccination Record",
            Category::Other => "Other",
        }
    }

    pub fn icon(&self) -> RecordIcon {
        match self {
            Category::Prescription => RecordIcon::Pill,
            Category::LabReport => RecordIcon::TestTube,
            Category::Imaging => RecordIcon::FileImage,
            Category::Consultation => RecordIcon::Stethoscope,
            Category::Vaccination => RecordIcon::Syringe,
            Category::Other => RecordIcon::FileText,
        }
    }
}

/// Who a record is being shared with.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy, Hash)]
pub enum Audience {
    Providers,
    Researchers,
}

impl Audience {
    pub fn flag(&self) -> SharingFlag {
        match self {
            Audience::Providers => SharingFlag::SharedWithProviders,
            Audience::Researchers => SharingFlag::SharedWithResearchers,
        }
    }
}

/// The two independent sharing flags carried by every record.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy, Hash)]
pub enum SharingFlag {
    SharedWithProviders,
    SharedWithResearchers,
}

impl SharingFlag {
    pub fn key(&self) -> &'static str {
        match self {
            SharingFlag::SharedWithProviders => "sharedWithProviders",
            SharingFlag::SharedWithResearchers => "sharedWithResearchers",
        }
    }
}
