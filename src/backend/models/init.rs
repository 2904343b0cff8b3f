// src/backend/models/init.rs
use candid::{CandidType, Principal};
use serde::Deserialize;

#[derive(CandidType, Deserialize, Debug, Clone)]
pub struct ClientInitArgs {
    pub patient_records_canister: Principal,
    pub access_control_canister: Principal,
    pub provider_grantee: Option<String>,
    pub researcher_grantee: Option<String>,
}
