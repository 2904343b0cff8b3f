// src/backend/adapter/record_gateway.rs
use crate::adapter::connection::Connection;
use crate::config::GatewayConfig;
use crate::error::HealthError;
use crate::models::{Audience, NewRecord, PrincipalText, Record, RecordId, RemoteRecord};
use candid::Principal;
use futures::future::{join_all, try_join};

// Remote method names on the patient-records service
const ADD_RECORD: &str = "add_record";
const GET_MY_RECORDS: &str = "get_my_records";
const GET_RECORD_BY_ID: &str = "get_record_by_id";
// Remote method names on the access-control service
const GRANT_ACCESS: &str = "grant_access";
const REVOKE_ACCESS: &str = "revoke_access";
const HAS_ACCESS: &str = "has_access";
const GET_GRANTEES: &str = "get_grantees";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CallKind {
    Query,
    Update,
}

/// Current state of both audience grants for one record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SharingStatus {
    pub shared_with_providers: bool,
    pub shared_with_researchers: bool,
}

/// Thin adapter over the patient-records and access-control services.
///
/// Every operation needs an authenticated connection and fails with
/// [`HealthError::NotAuthenticated`] before any call when there is none.
/// Remote and transport failures come back as [`HealthError::RemoteError`]
/// carrying the remote text unchanged; nothing is retried.
pub struct RecordGateway<'a, C: Connection> {
    connection: Option<&'a C>,
    config: &'a GatewayConfig,
}

impl<'a, C: Connection> RecordGateway<'a, C> {
    pub fn new(connection: Option<&'a C>, config: &'a GatewayConfig) -> Self {
        RecordGateway { connection, config }
    }

    pub fn config(&self) -> &GatewayConfig {
        self.config
    }

    fn authenticated(&self) -> Result<&'a C, HealthError> {
        match self.connection {
            Some(conn) if conn.is_authenticated() => Ok(conn),
            _ => Err(HealthError::NotAuthenticated),
        }
    }

    async fn call(
        &self,
        kind: CallKind,
        canister: Principal,
        method: &str,
        args: Vec<u8>,
    ) -> Result<Vec<u8>, HealthError> {
        let conn = self.authenticated()?;
        let reply = match kind {
            CallKind::Query => conn.query(canister, method, args).await,
            CallKind::Update => conn.update(canister, method, args).await,
        };
        reply.map_err(|msg| {
            crate::log_error!("{} on {} failed: {}", method, canister, msg);
            HealthError::RemoteError(msg)
        })
    }

    /// Submits a new record; the service assigns and returns its id.
    /// The owner is whoever the connection authenticates as.
    pub async fn add_record(&self, record: &NewRecord, uploaded_at: &str) -> Result<RecordId, HealthError> {
        let args = candid::encode_args((
            record.name.as_str(),
            record.category.as_str(),
            record.date.as_str(),
            record.size.as_str(),
            record.payload_ref.as_str(),
            record.notes.as_str(),
            uploaded_at,
        ))?;
        let reply = self
            .call(CallKind::Update, self.config.patient_records_canister, ADD_RECORD, args)
            .await?;
        let id: RecordId = candid::decode_one(&reply)?;
        crate::log_info!("Remote record {} added", id);
        Ok(id)
    }

    /// All records owned by the caller's identity.
    pub async fn list_my_records(&self) -> Result<Vec<Record>, HealthError> {
        let args = candid::encode_args(())?;
        let reply = self
            .call(CallKind::Query, self.config.patient_records_canister, GET_MY_RECORDS, args)
            .await?;
        let records: Vec<RemoteRecord> = candid::decode_one(&reply)?;
        Ok(records.into_iter().map(Record::from).collect())
    }

    pub async fn get_record_by_id(&self, id: RecordId) -> Result<Record, HealthError> {
        let args = candid::encode_one(id)?;
        let reply = self
            .call(CallKind::Query, self.config.patient_records_canister, GET_RECORD_BY_ID, args)
            .await?;
        let record: Option<RemoteRecord> = candid::decode_one(&reply)?;
        record.map(Record::from).ok_or(HealthError::RecordNotFound(id))
    }

    pub async fn grant_access(&self, record_id: RecordId, grantee: &str) -> Result<(), HealthError> {
        self.change_access(GRANT_ACCESS, record_id, grantee).await
    }

    pub async fn revoke_access(&self, record_id: RecordId, grantee: &str) -> Result<(), HealthError> {
        self.change_access(REVOKE_ACCESS, record_id, grantee).await
    }

    async fn change_access(&self, method: &str, record_id: RecordId, grantee: &str) -> Result<(), HealthError> {
        let args = candid::encode_args((record_id, grantee))?;
        let reply = self
            .call(CallKind::Update, self.config.access_control_canister, method, args)
            .await?;
        candid::decode_args::<()>(&reply)?;
        crate::log_info!("{} record={} grantee={}", method, record_id, grantee);
        Ok(())
    }

    pub async fn has_access(&self, record_id: RecordId, principal: &str) -> Result<bool, HealthError> {
        let args = candid::encode_args((record_id, principal))?;
        let reply = self
            .call(CallKind::Query, self.config.access_control_canister, HAS_ACCESS, args)
            .await?;
        Ok(candid::decode_one(&reply)?)
    }

    pub async fn list_grantees(&self, record_id: RecordId) -> Result<Vec<PrincipalText>, HealthError> {
        let args = candid::encode_one(record_id)?;
        let reply = self
            .call(CallKind::Query, self.config.access_control_canister, GET_GRANTEES, args)
            .await?;
        Ok(candid::decode_one(&reply)?)
    }

    /// Whether each audience grantee currently has access to the record.
    pub async fn sharing_status(&self, record_id: RecordId) -> Result<SharingStatus, HealthError> {
        let (providers, researchers) = try_join(
            self.has_access(record_id, self.config.grantee_for(Audience::Providers)),
            self.has_access(record_id, self.config.grantee_for(Audience::Researchers)),
        )
        .await?;
        Ok(SharingStatus {
            shared_with_providers: providers,
            shared_with_researchers: researchers,
        })
    }

    /// Caller's records with both sharing flags filled in from the access-control service.
    /// A record whose grants cannot be read is listed as unshared.
    pub async fn list_my_records_with_sharing(&self) -> Result<Vec<Record>, HealthError> {
        let records = self.list_my_records().await?;
        let statuses = join_all(records.iter().map(|r| async move {
            self.sharing_status(r.id).await.unwrap_or_else(|e| {
                crate::log_error!("Sharing status for record {} unavailable: {}", r.id, e);
                SharingStatus::default()
            })
        }))
        .await;

        Ok(records
            .into_iter()
            .zip(statuses)
            .map(|(mut record, status)| {
                record.shared_with_providers = status.shared_with_providers;
                record.shared_with_researchers = status.shared_with_researchers;
                record
            })
            .collect())
    }
}
