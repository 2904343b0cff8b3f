// src/backend/models/session_user.rs
use candid::CandidType;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// The signed-in user as persisted between sessions.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<String>,
}

impl SessionUser {
    /// User view of an identity-provider login: shortened principal as the name.
    pub fn from_principal(principal: &str) -> Self {
        let short: String = principal.chars().take(8).collect();
        SessionUser {
            username: format!("{}...", short),
            login_time: None,
            joined_at: None,
            principal: Some(principal.to_string()),
        }
    }
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct Credentials {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct SignupForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub confirm_password: String,
}
