// src/backend/session.rs
use crate::adapter::Connection;
use crate::error::HealthError;
use crate::models::{Credentials, SessionUser, SignupForm};
use crate::storage::{SharedStorage, RECORDS_KEY, USER_KEY};
use crate::utils::time::now_rfc3339;
use validator::Validate;

/// Explicit session state: the signed-in user and, after an identity-provider
/// login, the authenticated connection used for remote calls.
///
/// Created at start with [`Session::restore`], updated by login/signup/connect,
/// torn down by [`Session::logout`].
pub struct Session<M: ic_stable_structures::Memory, C: Connection> {
    storage: SharedStorage<M>,
    user: Option<SessionUser>,
    connection: Option<C>,
}

impl<M: ic_stable_structures::Memory, C: Connection> Session<M, C> {
    /// Picks up a previously persisted user. Unreadable user data is dropped
    /// and the session starts signed out.
    pub fn restore(storage: SharedStorage<M>) -> Self {
        let loaded = storage.borrow().get_json::<SessionUser>(USER_KEY);
        let user = match loaded {
            Ok(user) => user,
            Err(e) => {
                crate::log_error!("Error parsing saved user: {}", e);
                storage.borrow_mut().remove_item(USER_KEY);
                None
            }
        };
        if let Some(user) = &user {
            crate::log_info!("Restored session for {}", user.username);
        }

        Session {
            storage,
            user,
            connection: None,
        }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn connection(&self) -> Option<&C> {
        self.connection.as_ref()
    }

    /// Owner text stamped on locally stored records: the principal when
    /// connected, otherwise the username.
    pub fn owner(&self) -> String {
        if let Some(conn) = &self.connection {
            return conn.principal().to_text();
        }
        self.user
            .as_ref()
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    /// Local username/password sign-in; any non-empty pair is accepted.
    pub fn login(&mut self, credentials: &Credentials) -> Result<&SessionUser, HealthError> {
        credentials
            .validate()
            .map_err(|_| HealthError::InvalidInput("Invalid credentials".to_string()))?;

        let user = SessionUser {
            username: credentials.username.clone(),
            login_time: Some(now_rfc3339()),
            joined_at: None,
            principal: None,
        };
        self.persist(user)
    }

    pub fn signup(&mut self, form: &SignupForm) -> Result<&SessionUser, HealthError> {
        if let Err(errors) = form.validate() {
            let fields = errors.field_errors();
            let message = if fields.contains_key("username") || fields.contains_key("password") {
                "Invalid user data"
            } else {
                "Passwords do not match"
            };
            return Err(HealthError::InvalidInput(message.to_string()));
        }

        let user = SessionUser {
            username: form.username.clone(),
            login_time: None,
            joined_at: Some(now_rfc3339()),
            principal: None,
        };
        self.persist(user)
    }

    fn persist(&mut self, user: SessionUser) -> Result<&SessionUser, HealthError> {
        self.storage.borrow_mut().set_json(USER_KEY, &user)?;
        crate::log_info!("Signed in as {}", user.username);
        Ok(&*self.user.insert(user))
    }

    /// Attaches the connection produced by an identity-provider login. Without
    /// a local user, the principal becomes the session user.
    pub fn connect(&mut self, connection: C) {
        let principal = connection.principal().to_text();
        if self.user.is_none() && connection.is_authenticated() {
            self.user = Some(SessionUser::from_principal(&principal));
        }
        crate::log_info!("Connected as {}", principal);
        self.connection = Some(connection);
    }

    pub fn disconnect(&mut self) -> Option<C> {
        self.connection.take()
    }

    /// Ends the session and clears everything it persisted.
    pub fn logout(&mut self) {
        self.user = None;
        self.connection = None;
        let mut storage = self.storage.borrow_mut();
        storage.remove_item(USER_KEY);
        storage.remove_item(RECORDS_KEY);
        crate::log_info!("Signed out");
    }
}
