// src/backend/services/sharing_service.rs
// Sharing toggles: pure flag flip, explicit confirmation, then apply locally or remotely.

use crate::{
    adapter::{Connection, RecordGateway},
    error::HealthError,
    models::{Audience, Record, RecordId},
    storage::RecordStore,
};

/// Reported when a toggle is confirmed after the client switched between
/// local and remote records.
pub const STALE_TOGGLE: &str =
    "Sharing mode changed since this change was requested. Please request it again.";

/// Outcome of flipping one audience flag, before anything is applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toggle {
    pub record_id: RecordId,
    pub audience: Audience,
    pub new_value: bool,
    /// Confirmation dialog title, e.g. "Revoke Provider Access".
    pub title: String,
    /// Confirmation dialog body.
    pub message: String,
}

impl Toggle {
    /// Flips `current` for `audience`. Pure: nothing is read or written.
    pub fn for_flag(record_id: RecordId, audience: Audience, current: bool) -> Self {
        let new_value = !current;
        let (title, message) = match (audience, new_value) {
            (Audience::Providers, true) => (
                "Grant Provider Access",
                "Are you sure you want to grant healthcare providers access to this record? \
                 They will be able to view and download the record.",
            ),
            (Audience::Providers, false) => (
                "Revoke Provider Access",
                "Are you sure you want to revoke healthcare provider access to this record? \
                 They will no longer be able to view or download it.",
            ),
            (Audience::Researchers, true) => (
                "Grant Researcher Access",
                "Are you sure you want to grant medical researchers access to this record? \
                 Your data will be anonymized and used for research purposes only.",
            ),
            (Audience::Researchers, false) => (
                "Revoke Researcher Access",
                "Are you sure you want to revoke medical researcher access to this record? \
                 Your anonymized data will no longer be available for research.",
            ),
        };
        Toggle {
            record_id,
            audience,
            new_value,
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    pub fn is_revoke(&self) -> bool {
        !self.new_value
    }

    /// Short confirmation shown once the change is applied.
    pub fn applied_message(&self) -> &'static str {
        match (self.audience, self.new_value) {
            (Audience::Providers, true) => "Provider access granted",
            (Audience::Providers, false) => "Provider access revoked",
            (Audience::Researchers, true) => "Researcher access granted",
            (Audience::Researchers, false) => "Researcher access revoked",
        }
    }
}

/// Flips the record's flag for `audience`.
pub fn toggle(record: &Record, audience: Audience) -> Toggle {
    Toggle::for_flag(record.id, audience, record.flag(audience.flag()))
}

/// Where a pending toggle was prepared and where it may be applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOrigin {
    LocalStore,
    AccessControl,
}

/// A toggle awaiting the user's confirmation. Dropping it applies nothing.
/// It can only be confirmed against the same side it was prepared on.
#[must_use = "a pending toggle does nothing until confirmed"]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingToggle {
    toggle: Toggle,
    origin: ToggleOrigin,
}

impl PendingToggle {
    pub fn new(toggle: Toggle, origin: ToggleOrigin) -> Self {
        PendingToggle { toggle, origin }
    }

    /// Looks the record up in the local store and prepares its toggle.
    pub fn for_local_record<M: ic_stable_structures::Memory>(
        store: &RecordStore<M>,
        record_id: RecordId,
        audience: Audience,
    ) -> Result<Self, HealthError> {
        let record = store
            .get_record(record_id)?
            .ok_or(HealthError::RecordNotFound(record_id))?;
        Ok(PendingToggle::new(toggle(&record, audience), ToggleOrigin::LocalStore))
    }

    /// Reads the current grant from the access-control service and prepares its toggle.
    pub async fn for_remote_record<C: Connection>(
        gateway: &RecordGateway<'_, C>,
        record_id: RecordId,
        audience: Audience,
    ) -> Result<Self, HealthError> {
        let grantee = gateway.config().grantee_for(audience);
        let current = gateway.has_access(record_id, grantee).await?;
        Ok(PendingToggle::new(
            Toggle::for_flag(record_id, audience, current),
            ToggleOrigin::AccessControl,
        ))
    }

    pub fn toggle(&self) -> &Toggle {
        &self.toggle
    }

    pub fn origin(&self) -> ToggleOrigin {
        self.origin
    }

    fn expect_origin(&self, origin: ToggleOrigin) -> Result<(), HealthError> {
        if self.origin == origin {
            Ok(())
        } else {
            Err(HealthError::InvalidInput(STALE_TOGGLE.to_string()))
        }
    }

    /// Applies the confirmed change to the local store.
    pub fn confirm_local<M: ic_stable_structures::Memory>(
        self,
        store: &RecordStore<M>,
    ) -> Result<Record, HealthError> {
        self.expect_origin(ToggleOrigin::LocalStore)?;
        let t = self.toggle;
        store.update_sharing_flag(t.record_id, t.audience.flag(), t.new_value)
    }

    /// Applies the confirmed change as a grant or revoke for the audience grantee.
    pub async fn confirm_remote<C: Connection>(
        self,
        gateway: &RecordGateway<'_, C>,
    ) -> Result<Toggle, HealthError> {
        self.expect_origin(ToggleOrigin::AccessControl)?;
        let t = self.toggle;
        let grantee = gateway.config().grantee_for(t.audience).to_string();
        if t.new_value {
            gateway.grant_access(t.record_id, &grantee).await?;
        } else {
            gateway.revoke_access(t.record_id, &grantee).await?;
        }
        Ok(t)
    }
}
