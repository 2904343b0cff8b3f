// src/backend/config.rs
use crate::error::HealthError;
use crate::models::common::{Audience, PrincipalText};
use crate::models::init::ClientInitArgs;
use candid::{CandidType, Principal};
use serde::Deserialize;

// Grantee texts used for audience-wide sharing when none are configured
pub const DEFAULT_PROVIDER_GRANTEE: &str = "healthcare-provider-principal";
pub const DEFAULT_RESEARCHER_GRANTEE: &str = "medical-researcher-principal";

const PATIENT_RECORDS_ENV: &str = "PATIENT_RECORDS_CANISTER_ID";
const ACCESS_CONTROL_ENV: &str = "ACCESS_CONTROL_CANISTER_ID";
const PROVIDER_GRANTEE_ENV: &str = "HEALTHCHAIN_PROVIDER_GRANTEE";
const RESEARCHER_GRANTEE_ENV: &str = "HEALTHCHAIN_RESEARCHER_GRANTEE";

/// Addresses of the external services plus the grantee used for each audience.
#[derive(CandidType, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
    pub patient_records_canister: Principal,
    pub access_control_canister: Principal,
    pub provider_grantee: PrincipalText,
    pub researcher_grantee: PrincipalText,
}

impl GatewayConfig {
    pub fn new(patient_records_canister: Principal, access_control_canister: Principal) -> Self {
        GatewayConfig {
            patient_records_canister,
            access_control_canister,
            provider_grantee: DEFAULT_PROVIDER_GRANTEE.to_string(),
            researcher_grantee: DEFAULT_RESEARCHER_GRANTEE.to_string(),
        }
    }

    pub fn from_init_args(args: ClientInitArgs) -> Self {
        let mut config = GatewayConfig::new(args.patient_records_canister, args.access_control_canister);
        if let Some(grantee) = args.provider_grantee {
            config.provider_grantee = grantee;
        }
        if let Some(grantee) = args.researcher_grantee {
            config.researcher_grantee = grantee;
        }
        config
    }

    /// Reads the service ids (and optional grantees) from the process environment.
    pub fn from_env() -> Result<Self, HealthError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; both service ids are required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HealthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (records_id, access_id) = match (lookup(PATIENT_RECORDS_ENV), lookup(ACCESS_CONTROL_ENV)) {
            (Some(records), Some(access)) if !records.is_empty() && !access.is_empty() => (records, access),
            _ => {
                return Err(HealthError::ConfigError(format!(
                    "Canister IDs are missing: set {} and {}",
                    PATIENT_RECORDS_ENV, ACCESS_CONTROL_ENV
                )))
            }
        };

        Ok(Self::from_init_args(ClientInitArgs {
            patient_records_canister: parse_principal(PATIENT_RECORDS_ENV, &records_id)?,
            access_control_canister: parse_principal(ACCESS_CONTROL_ENV, &access_id)?,
            provider_grantee: lookup(PROVIDER_GRANTEE_ENV).filter(|g| !g.is_empty()),
            researcher_grantee: lookup(RESEARCHER_GRANTEE_ENV).filter(|g| !g.is_empty()),
        }))
    }

    pub fn grantee_for(&self, audience: Audience) -> &str {
        match audience {
            Audience::Providers => &self.provider_grantee,
            Audience::Researchers => &self.researcher_grantee,
        }
    }
}

fn parse_principal(key: &str, text: &str) -> Result<Principal, HealthError> {
    Principal::from_text(text.trim())
        .map_err(|e| HealthError::ConfigError(format!("{} is not a valid principal ({}): {}", key, text, e)))
}
