//! Session establishment: resume, validate, re-login, persist.
//!
//! The manager drives a small state machine over any [`PlatformClient`]:
//!
//! ```text
//! blob ──login──▶ SessionLoaded ──probe ok──▶ Validated(Session)
//!   │               │ LoginRequired              ▲
//!   │               ▼                            │
//!   │          SessionInvalid ──relogin ok──▶ Validated(Relogin)
//!   │               │ error
//!   ▼               ▼
//! NoSession ──▶ PasswordLogin ──ok──▶ Validated(Password)
//!                   │ error
//!                   ▼
//!                 Failed
//! ```
//!
//! Every `Validated` exit persists the settings once more. Persistence is
//! best-effort: failures are logged and the run continues.

use crate::config::Credentials;
use crate::error::{PipelineError, PipelineResult};
use crate::platform::{PlatformClient, PlatformError, SessionSettings, SessionStore};

/// How the session was ultimately validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMethod {
    /// The stored session passed the probe
    Session,
    /// The stored session was rejected and a password login replaced it
    Relogin,
    /// No usable stored session; fresh password login
    Password,
}

impl std::fmt::Display for LoginMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginMethod::Session => write!(f, "stored session"),
            LoginMethod::Relogin => write!(f, "re-login"),
            LoginMethod::Password => write!(f, "password login"),
        }
    }
}

#[derive(Debug)]
enum LoginState {
    NoSession,
    SessionLoaded,
    SessionInvalid,
    PasswordLogin,
    Validated(LoginMethod),
    Failed,
}

/// Owns the session blob and the account credentials.
pub struct SessionManager {
    store: SessionStore,
    credentials: Credentials,
}

impl SessionManager {
    pub fn new(store: SessionStore, credentials: Credentials) -> Self {
        Self { store, credentials }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Leave `client` holding a validated, authenticated session.
    pub async fn establish<C: PlatformClient + ?Sized>(
        &self,
        client: &mut C,
    ) -> PipelineResult<LoginMethod> {
        let mut state = self.resume(client).await;

        loop {
            tracing::debug!("Session state: {state:?}");
            state = match state {
                LoginState::NoSession => LoginState::PasswordLogin,

                LoginState::SessionLoaded => match client.timeline_feed().await {
                    Ok(()) => LoginState::Validated(LoginMethod::Session),
                    Err(PlatformError::LoginRequired) => {
                        tracing::info!("Stored session rejected, logging in again");
                        LoginState::SessionInvalid
                    }
                    Err(e) => {
                        tracing::warn!("Session probe failed: {e}");
                        LoginState::PasswordLogin
                    }
                },

                LoginState::SessionInvalid => match self.password_login(client).await {
                    Ok(()) => {
                        self.persist(client);
                        LoginState::Validated(LoginMethod::Relogin)
                    }
                    Err(e) => {
                        tracing::warn!("Re-login with stored device failed: {e}");
                        LoginState::PasswordLogin
                    }
                },

                LoginState::PasswordLogin => match self.password_login(client).await {
                    Ok(()) => {
                        self.persist(client);
                        LoginState::Validated(LoginMethod::Password)
                    }
                    Err(e) => {
                        tracing::error!("Password login failed: {e}");
                        LoginState::Failed
                    }
                },

                LoginState::Validated(method) => {
                    self.persist(client);
                    tracing::info!(
                        "Logged in as {} via {method}",
                        self.credentials.username
                    );
                    return Ok(method);
                }

                LoginState::Failed => return Err(PipelineError::Login),
            };
        }
    }

    /// Apply the stored blob, if any, and attempt a session login with it.
    async fn resume<C: PlatformClient + ?Sized>(&self, client: &mut C) -> LoginState {
        let settings = match self.store.load() {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                tracing::info!("No session file at {}", self.store.path().display());
                return LoginState::NoSession;
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable session file: {e}");
                return LoginState::NoSession;
            }
        };

        client.set_settings(settings);
        match client
            .login(&self.credentials.username, &self.credentials.password)
            .await
        {
            Ok(()) => LoginState::SessionLoaded,
            Err(e) => {
                tracing::warn!("Login with stored session failed: {e}");
                LoginState::PasswordLogin
            }
        }
    }

    /// Reset everything but the device identity, then log in with the password.
    async fn password_login<C: PlatformClient + ?Sized>(
        &self,
        client: &mut C,
    ) -> Result<(), PlatformError> {
        let ids = client.settings().uuids;
        client.set_settings(SessionSettings::fresh());
        client.set_device_ids(ids);
        client
            .login(&self.credentials.username, &self.credentials.password)
            .await
    }

    fn persist<C: PlatformClient + ?Sized>(&self, client: &C) {
        if let Err(e) = self.store.save(&client.settings()) {
            tracing::error!("Failed to persist session: {e}");
        }
    }
}
