//! Authentication state container.
//!
//! Single source of truth for who is logged in while the process runs.
//!
//! # Lifecycle
//!
//! ```text
//! Unknown --initialize()--> Validating --profile ok--> Authenticated
//!    |                          |                          |
//!    | no stored token          | profile failed           | logout() / 401
//!    v                          v                          v
//! Anonymous <-------------------+--------------------------+
//!    |
//!    +--login()/register()--> Authenticated
//! ```
//!
//! The in-memory session and the `token`/`user` store keys always change
//! together. `is_loading()` is true exactly while validating a restored
//! session and while a login or registration request is in flight.

mod error;

pub use error::AuthError;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::api::{AuthApi, AuthResponse, SessionEvent};
use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::models::{LoginRequest, RegisterRequest, User, UserUpdate, storage_keys};
use crate::storage::{KeyValueStore, StoreExt};

/// Phase of the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// Not yet initialized.
    Unknown,
    /// A restored token is being checked against the server.
    Validating,
    /// No session.
    Anonymous,
    /// Session confirmed by the server or created by login/register.
    Authenticated,
}

#[derive(Debug)]
struct AuthState {
    phase: AuthPhase,
    token: Option<SecretString>,
    user: Option<User>,
}

impl AuthState {
    const fn unknown() -> Self {
        Self {
            phase: AuthPhase::Unknown,
            token: None,
            user: None,
        }
    }

    fn clear(&mut self) {
        self.phase = AuthPhase::Anonymous;
        self.token = None;
        self.user = None;
    }
}

/// Keeps `in_flight` raised for the lifetime of a login/register call.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn start(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Authentication state container.
///
/// Construct once at the composition root and share via `Arc`.
pub struct AuthContainer {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn KeyValueStore>,
    state: RwLock<AuthState>,
    in_flight: AtomicUsize,
}

impl AuthContainer {
    /// Create a container in the `Unknown` phase.
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            api,
            store,
            state: RwLock::new(AuthState::unknown()),
            in_flight: AtomicUsize::new(0),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        self.read().phase
    }

    /// Snapshot of the current user.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    /// Current bearer token.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.read().token.clone()
    }

    /// Whether a confirmed session exists.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.phase() == AuthPhase::Authenticated
    }

    /// Whether the current user may use the admin dashboard.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        let state = self.read();
        state.phase == AuthPhase::Authenticated && state.user.as_ref().is_some_and(|u| u.is_admin)
    }

    /// Whether auth-dependent UI should wait.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase() == AuthPhase::Validating || self.in_flight.load(Ordering::SeqCst) > 0
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Restore the stored session and validate it with the server.
    ///
    /// A rejected or unreachable validation is not an error: the stored
    /// session is discarded and the container ends up `Anonymous`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the store cannot be read, written or
    /// cleared. A session that cannot be persisted is dropped from memory
    /// too, so the container never stays `Validating`.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<AuthPhase, AuthError> {
        let Some(raw_token) = self.store.get(storage_keys::TOKEN)? else {
            // A user record without a token is a leftover; drop it
            self.store.remove(storage_keys::USER)?;
            self.write().clear();
            debug!("No stored session");
            return Ok(AuthPhase::Anonymous);
        };

        let token = SecretString::from(raw_token);
        let cached_user = self
            .store
            .get_json::<User>(storage_keys::USER)
            .unwrap_or_else(|e| {
                warn!(error = %e, "Stored user is unreadable, relying on profile fetch");
                None
            });

        {
            let mut state = self.write();
            state.phase = AuthPhase::Validating;
            state.token = Some(token.clone());
            state.user = cached_user;
        }

        match self.api.fetch_profile(&token).await {
            Ok(user) => {
                if let Err(e) = self.store.set_json(storage_keys::USER, &user) {
                    warn!(error = %e, "Failed to persist restored user, signing out");
                    self.write().clear();
                    let _ = self
                        .store
                        .remove_all(&[storage_keys::TOKEN, storage_keys::USER]);
                    return Err(e.into());
                }
                set_sentry_user(&user.id, Some(user.email.as_str()));
                info!(user_id = %user.id, "Restored session");
                let mut state = self.write();
                state.phase = AuthPhase::Authenticated;
                state.user = Some(user);
                Ok(AuthPhase::Authenticated)
            }
            Err(e) => {
                warn!(error = %e, "Stored session rejected, signing out");
                self.write().clear();
                self.store
                    .remove_all(&[storage_keys::TOKEN, storage_keys::USER])?;
                Ok(AuthPhase::Anonymous)
            }
        }
    }

    /// Log in with email and password.
    ///
    /// Only presence is checked locally. Remote failures are returned as-is
    /// and leave the current state untouched.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if either field is empty,
    /// `AuthError::Api` if the server rejects the login, or
    /// `AuthError::Storage` if the session cannot be persisted.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: SecretString) -> Result<User, AuthError> {
        if email.trim().is_empty() || password.expose_secret().is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let request = LoginRequest {
            email: email.trim().to_string(),
            password,
        };

        let response = {
            let _loading = InFlight::start(&self.in_flight);
            self.api.login(&request).await?
        };

        let user = self.establish(response)?;
        add_breadcrumb("auth", "Logged in", Some(&[("user_id", user.id.as_str())]));
        Ok(user)
    }

    /// Register a new account and start its session.
    ///
    /// Password confirmation belongs to the caller.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` for an empty required field,
    /// `AuthError::Api` if the server rejects the registration, or
    /// `AuthError::Storage` if the session cannot be persisted.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AuthError> {
        let required = [
            ("firstName", request.first_name.as_str()),
            ("lastName", request.last_name.as_str()),
            ("email", request.email.as_str()),
            ("phone", request.phone.as_str()),
            ("password", request.password.expose_secret()),
        ];
        if let Some(&(field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(AuthError::MissingField(field));
        }

        let response = {
            let _loading = InFlight::start(&self.in_flight);
            self.api.register(&request).await?
        };

        let user = self.establish(response)?;
        add_breadcrumb("auth", "Registered", Some(&[("user_id", user.id.as_str())]));
        Ok(user)
    }

    /// End the session locally. The server is not contacted.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the store cannot be cleared; the
    /// in-memory session is cleared regardless.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.write().clear();
        clear_sentry_user();
        add_breadcrumb("auth", "Logged out", None);
        self.store
            .remove_all(&[storage_keys::TOKEN, storage_keys::USER])?;
        info!("Logged out");
        Ok(())
    }

    /// Shallow-merge `update` into the current user and persist the result.
    ///
    /// Returns `None` without touching the store when nobody is logged in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the merged user cannot be persisted;
    /// memory is left unchanged in that case.
    pub fn update_user(&self, update: UserUpdate) -> Result<Option<User>, AuthError> {
        let mut state = self.write();
        let Some(current) = state.user.as_ref() else {
            return Ok(None);
        };

        let mut merged = current.clone();
        merged.apply(update);
        self.store.set_json(storage_keys::USER, &merged)?;
        state.user = Some(merged.clone());
        Ok(Some(merged))
    }

    /// Drop the in-memory session after the API client reported a 401.
    ///
    /// The client has already removed the stored credentials.
    pub fn handle_session_expired(&self) {
        let mut state = self.write();
        if state.phase == AuthPhase::Anonymous {
            return;
        }
        state.clear();
        drop(state);
        clear_sentry_user();
        info!("Session expired, signed out");
    }

    /// Follow the API client's session events for the rest of the process.
    #[must_use]
    pub fn watch_session_events(
        self: Arc<Self>,
        mut events: broadcast::Receiver<SessionEvent>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(SessionEvent::Expired { redirect_to }) => {
                        debug!(%redirect_to, "Received session expiry");
                        self.handle_session_expired();
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Session events lagged");
                        self.handle_session_expired();
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Persist and adopt a fresh session.
    fn establish(&self, response: AuthResponse) -> Result<User, AuthError> {
        let AuthResponse { token, user } = response;

        if let Err(e) = self
            .store
            .set(storage_keys::TOKEN, &token)
            .and_then(|()| self.store.set_json(storage_keys::USER, &user))
        {
            // Never leave a token without its user in the store
            let _ = self
                .store
                .remove_all(&[storage_keys::TOKEN, storage_keys::USER]);
            return Err(e.into());
        }

        set_sentry_user(&user.id, Some(user.email.as_str()));
        info!(user_id = %user.id, "Session established");

        let mut state = self.write();
        state.phase = AuthPhase::Authenticated;
        state.token = Some(SecretString::from(token));
        state.user = Some(user.clone());
        Ok(user)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, AuthState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, AuthState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for AuthContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("AuthContainer")
            .field("phase", &state.phase)
            .field("user", &state.user.as_ref().map(|u| u.id.as_str()))
            .finish_non_exhaustive()
    }
}
