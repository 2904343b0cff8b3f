// src/backend/api.rs
// User actions. Every failure comes back as a Notice; nothing here panics or retries.

use crate::{
    adapter::{Connection, RecordGateway},
    config::GatewayConfig,
    error::HealthError,
    models::{
        Audience, Credentials, Notice, PrincipalText, Record, RecordId, SessionUser, SignupForm,
        UploadForm,
    },
    services::{
        sharing_service::{PendingToggle, Toggle, ToggleOrigin, STALE_TOGGLE},
        upload_service,
    },
    session::Session,
    storage::{default_local_storage, Memory, RecordStore, SharedStorage},
};

/// Result of a successful action plus the notification to show for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completed<T> {
    pub value: T,
    pub notice: Notice,
}

impl<T> Completed<T> {
    fn new(value: T, notice: Notice) -> Self {
        Completed { value, notice }
    }
}

pub type ActionResult<T> = Result<T, Notice>;

/// Turns an error into the notice for a failed action. Validation errors keep
/// their own wording; everything else is prefixed with what was attempted.
fn failure(context: &str, err: HealthError) -> Notice {
    crate::log_error!("{}: {}", context, err);
    match err {
        HealthError::RemoteError(msg) => Notice::error("Error", format!("{}: {}", context, msg)),
        HealthError::StorageError(_) | HealthError::SerializationError(_) => {
            Notice::error("Error", format!("{}: {}", context, err))
        }
        other => Notice::from(other),
    }
}

fn login_failure(err: HealthError) -> Notice {
    match err {
        HealthError::InvalidInput(_) => Notice::error("Missing credentials", "Please fill in all fields."),
        other => failure("Login failed", other),
    }
}

/// Client core: session, local record store and remote gateway configuration.
///
/// With an authenticated connection attached to the session, records live in
/// the patient-records service and sharing goes through the access-control
/// service. Without one, the local store is used.
pub struct HealthChainClient<M: ic_stable_structures::Memory, C: Connection> {
    session: Session<M, C>,
    store: RecordStore<M>,
    config: GatewayConfig,
}

impl<C: Connection> HealthChainClient<Memory, C> {
    /// Client over the process-wide local storage.
    pub fn open_default(config: GatewayConfig) -> Self {
        Self::open(default_local_storage(), config)
    }
}

impl<M: ic_stable_structures::Memory, C: Connection> HealthChainClient<M, C> {
    pub fn open(storage: SharedStorage<M>, config: GatewayConfig) -> Self {
        HealthChainClient {
            session: Session::restore(storage.clone()),
            store: RecordStore::new(storage),
            config,
        }
    }

    pub fn session(&self) -> &Session<M, C> {
        &self.session
    }

    pub fn store(&self) -> &RecordStore<M> {
        &self.store
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn gateway(&self) -> RecordGateway<'_, C> {
        RecordGateway::new(self.session.connection(), &self.config)
    }

    /// True when an authenticated connection is attached.
    pub fn is_remote(&self) -> bool {
        self.session
            .connection()
            .is_some_and(|conn| conn.is_authenticated())
    }

    fn require_user(&self) -> Result<(), HealthError> {
        if self.session.is_logged_in() {
            Ok(())
        } else {
            Err(HealthError::NotAuthenticated)
        }
    }

    // --- Session ---

    pub fn login(&mut self, credentials: &Credentials) -> ActionResult<Completed<SessionUser>> {
        match self.session.login(credentials) {
            Ok(user) => Ok(Completed::new(
                user.clone(),
                Notice::info("Login successful!", "Welcome to HealthChain on Internet Computer."),
            )),
            Err(e) => Err(login_failure(e)),
        }
    }

    pub fn signup(&mut self, form: &SignupForm) -> ActionResult<Completed<SessionUser>> {
        match self.session.signup(form) {
            Ok(user) => Ok(Completed::new(
                user.clone(),
                Notice::info("Account created", format!("Welcome, {}.", user.username)),
            )),
            Err(HealthError::InvalidInput(msg)) if msg == "Passwords do not match" => {
                Err(Notice::error("Password mismatch", "Passwords do not match."))
            }
            Err(_) => Err(Notice::error("Missing information", "Please fill in all fields.")),
        }
    }

    /// Attaches the connection from an identity-provider login.
    pub fn connect(&mut self, connection: C) {
        self.session.connect(connection);
    }

    pub fn logout(&mut self) {
        self.session.logout();
    }

    // --- Records ---

    /// The caller's records, from the remote service when connected.
    pub async fn records(&self) -> ActionResult<Vec<Record>> {
        const CONTEXT: &str = "Failed to fetch records";
        self.require_user().map_err(|e| failure(CONTEXT, e))?;

        let result = if self.is_remote() {
            self.gateway().list_my_records_with_sharing().await
        } else {
            self.store.list_records()
        };
        result.map_err(|e| failure(CONTEXT, e))
    }

    pub async fn record(&self, id: RecordId) -> ActionResult<Record> {
        const CONTEXT: &str = "Failed to fetch record";
        self.require_user().map_err(|e| failure(CONTEXT, e))?;

        let result = if self.is_remote() {
            self.gateway().get_record_by_id(id).await
        } else {
            self.store
                .get_record(id)
                .and_then(|r| r.ok_or(HealthError::RecordNotFound(id)))
        };
        result.map_err(|e| failure(CONTEXT, e))
    }

    /// Validates and stores a new record; returns its id.
    pub async fn upload(&self, form: &UploadForm) -> ActionResult<Completed<RecordId>> {
        const CONTEXT: &str = "Upload failed";
        self.require_user().map_err(|e| failure(CONTEXT, e))?;

        let result = if self.is_remote() {
            upload_service::upload_remote(&self.gateway(), form).await
        } else {
            upload_service::upload_local(&self.store, form, &self.session.owner()).map(|r| r.id)
        };
        result
            .map(|id| {
                Completed::new(
                    id,
                    Notice::info(
                        "Record uploaded successfully!",
                        "Your medical record has been securely stored on the blockchain.",
                    ),
                )
            })
            .map_err(|e| failure(CONTEXT, e))
    }

    // --- Sharing ---

    /// Prepares a sharing toggle. The returned toggle's title and message are
    /// what the user must confirm before [`Self::confirm_toggle`] applies it.
    pub async fn request_toggle(&self, record_id: RecordId, audience: Audience) -> ActionResult<PendingToggle> {
        const CONTEXT: &str = "Failed to update access";
        self.require_user().map_err(|e| failure(CONTEXT, e))?;

        let result = if self.is_remote() {
            PendingToggle::for_remote_record(&self.gateway(), record_id, audience).await
        } else {
            PendingToggle::for_local_record(&self.store, record_id, audience)
        };
        result.map_err(|e| failure(CONTEXT, e))
    }

    /// Applies a toggle the user confirmed. A toggle prepared before the
    /// client switched between local and remote records is refused.
    pub async fn confirm_toggle(&self, pending: PendingToggle) -> ActionResult<Completed<Toggle>> {
        const CONTEXT: &str = "Failed to update access";
        self.require_user().map_err(|e| failure(CONTEXT, e))?;

        let current = if self.is_remote() {
            ToggleOrigin::AccessControl
        } else {
            ToggleOrigin::LocalStore
        };
        if pending.origin() != current {
            crate::log_error!("{}: toggle for record {} is stale", CONTEXT, pending.toggle().record_id);
            return Err(Notice::error("Access not updated", STALE_TOGGLE));
        }

        let result = match current {
            ToggleOrigin::AccessControl => pending.confirm_remote(&self.gateway()).await,
            ToggleOrigin::LocalStore => {
                let toggle = pending.toggle().clone();
                pending.confirm_local(&self.store).map(|_| toggle)
            }
        };
        result
            .map(|t| {
                let notice = Notice::info("Access updated", t.applied_message());
                Completed::new(t, notice)
            })
            .map_err(|e| failure(CONTEXT, e))
    }

    /// Shares a record with one specific principal.
    pub async fn share_with(&self, record_id: RecordId, grantee: &str) -> ActionResult<Completed<()>> {
        const CONTEXT: &str = "Failed to share record";
        if grantee.trim().is_empty() {
            return Err(failure(
                CONTEXT,
                HealthError::InvalidInput("Grantee principal is required.".to_string()),
            ));
        }
        self.gateway()
            .grant_access(record_id, grantee.trim())
            .await
            .map(|()| Completed::new((), Notice::info("Record shared", format!("Record shared with {}.", grantee.trim()))))
            .map_err(|e| failure(CONTEXT, e))
    }

    pub async fn grantees(&self, record_id: RecordId) -> ActionResult<Vec<PrincipalText>> {
        self.gateway()
            .list_grantees(record_id)
            .await
            .map_err(|e| failure("Failed to fetch grantees", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::testing::{test_config, FakeBackend};
    use crate::models::{FileUpload, NoticeVariant};
    use crate::storage::LocalStorage;
    use futures::executor::block_on;
    use ic_stable_structures::DefaultMemoryImpl;

    type TestClient = HealthChainClient<DefaultMemoryImpl, FakeBackend>;

    fn client() -> TestClient {
        TestClient::open(LocalStorage::shared(DefaultMemoryImpl::default()), test_config())
    }

    fn signed_in() -> TestClient {
        let mut c = client();
        c.login(&Credentials {
            username: "alice".to_string(),
            password: "pw".to_string(),
        })
        .unwrap();
        c
    }

    fn upload_form(name: &str) -> UploadForm {
        UploadForm {
            file: Some(FileUpload {
                file_name: "report.pdf".to_string(),
                mime_type: "application/pdf".to_string(),
                bytes: b"%PDF-1.7".to_vec(),
            }),
            name: name.to_string(),
            category: "lab-report".to_string(),
            date: "2024-01-01".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn actions_require_a_signed_in_user() {
        let c = client();
        let notice = block_on(c.records()).unwrap_err();
        assert_eq!(notice.variant, NoticeVariant::Destructive);
        assert_eq!(notice.description, "Please authenticate first");
    }

    #[test]
    fn local_upload_then_toggle_with_confirmation() {
        let c = signed_in();
        let done = block_on(c.upload(&upload_form("Blood Test"))).unwrap();
        assert_eq!(done.notice.title, "Record uploaded successfully!");

        let records = block_on(c.records()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].owner, "alice");

        let pending = block_on(c.request_toggle(done.value, Audience::Providers)).unwrap();
        assert_eq!(pending.toggle().title, "Grant Provider Access");
        let applied = block_on(c.confirm_toggle(pending)).unwrap();
        assert_eq!(applied.notice.description, "Provider access granted");

        let record = block_on(c.record(done.value)).unwrap();
        assert!(record.shared_with_providers);
        assert!(!record.shared_with_researchers);
    }

    #[test]
    fn validation_failure_is_reported_inline_and_stores_nothing() {
        let c = signed_in();
        let mut form = upload_form("Blood Test");
        form.file = None;

        let notice = block_on(c.upload(&form)).unwrap_err();
        assert_eq!(notice.description, "Please select a file to upload.");
        assert!(c.store().list_records().unwrap().is_empty());
    }

    #[test]
    fn unknown_local_record_is_a_notice_not_a_panic() {
        let c = signed_in();
        let notice = block_on(c.request_toggle(77, Audience::Researchers)).unwrap_err();
        assert_eq!(notice.title, "Record not found");
    }

    #[test]
    fn remote_mode_uses_the_services() {
        let config = test_config();
        let mut c = client();
        c.connect(FakeBackend::new(&config));
        assert!(c.is_remote());

        let id = block_on(c.upload(&upload_form("X-Ray"))).unwrap().value;
        let pending = block_on(c.request_toggle(id, Audience::Researchers)).unwrap();
        block_on(c.confirm_toggle(pending)).unwrap();

        let records = block_on(c.records()).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].shared_with_researchers);
        assert_eq!(block_on(c.grantees(id)).unwrap(), vec![config.researcher_grantee.clone()]);
        assert!(c.store().list_records().unwrap().is_empty());
    }

    #[test]
    fn rejected_grant_surfaces_backend_text_and_leaves_local_store_alone() {
        let config = test_config();
        let mut c = signed_in();
        block_on(c.upload(&upload_form("Blood Test"))).unwrap();
        let before = c.store().list_records().unwrap();

        let backend = FakeBackend::new(&config);
        backend.fail_method("grant_access", "IC0406: caller is not the record owner");
        c.connect(backend);

        let pending = block_on(c.request_toggle(1, Audience::Providers)).unwrap();
        let notice = block_on(c.confirm_toggle(pending)).unwrap_err();
        assert_eq!(
            notice.description,
            "Failed to update access: IC0406: caller is not the record owner"
        );
        assert_eq!(c.store().list_records().unwrap(), before);
    }

    #[test]
    fn sharing_with_a_principal_needs_a_connection() {
        let c = signed_in();
        let notice = block_on(c.share_with(1, "dr-who")).unwrap_err();
        assert_eq!(notice.description, "Please authenticate first");

        let blank = block_on(c.share_with(1, "  ")).unwrap_err();
        assert_eq!(blank.description, "Grantee principal is required.");
    }

    #[test]
    fn logout_clears_local_records() {
        let mut c = signed_in();
        block_on(c.upload(&upload_form("Blood Test"))).unwrap();
        c.logout();
        assert!(!c.session().is_logged_in());
        assert!(c.store().list_records().unwrap().is_empty());
    }

    #[test]
    fn signup_mismatch_has_its_own_notice() {
        let mut c = client();
        let notice = c
            .signup(&SignupForm {
                username: "bob".to_string(),
                password: "a".to_string(),
                confirm_password: "b".to_string(),
            })
            .unwrap_err();
        assert_eq!(notice.title, "Password mismatch");
    }

    #[test]
    fn toggle_requested_locally_is_refused_after_connecting() {
        let config = test_config();
        let mut c = signed_in();
        let id = block_on(c.upload(&upload_form("Blood Test"))).unwrap().value;
        let pending = block_on(c.request_toggle(id, Audience::Providers)).unwrap();

        c.connect(FakeBackend::new(&config));
        let notice = block_on(c.confirm_toggle(pending)).unwrap_err();
        assert_eq!(notice.description, STALE_TOGGLE);

        let record = c.store().get_record(id).unwrap().unwrap();
        assert!(!record.shared_with_providers);
        assert!(block_on(c.grantees(id)).unwrap().is_empty());
    }

    #[test]
    fn remote_record_is_fetched_by_id() {
        let config = test_config();
        let mut c = client();
        c.connect(FakeBackend::new(&config));

        let id = block_on(c.upload(&upload_form("MRI Scan"))).unwrap().value;
        let record = block_on(c.record(id)).unwrap();
        assert_eq!(record.name, "MRI Scan");
        assert_eq!(record.category, "lab-report");

        let missing = block_on(c.record(id + 100)).unwrap_err();
        assert_eq!(missing.title, "Record not found");
    }

    #[test]
    fn login_storage_failure_is_not_reported_as_missing_fields() {
        let notice = login_failure(HealthError::StorageError("stable memory full".to_string()));
        assert_eq!(notice.title, "Error");
        assert!(notice.description.starts_with("Login failed: "));

        let missing = login_failure(HealthError::InvalidInput("Invalid credentials".to_string()));
        assert_eq!(missing.title, "Missing credentials");
    }
}
