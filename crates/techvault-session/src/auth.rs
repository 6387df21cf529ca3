//! Auth session store: login, two-factor, registration, logout.

use std::sync::{PoisonError, RwLock};

use serde::Deserialize;
use serde_json::json;
use techvault_client::{ApiClient, paths};
use techvault_core::error::{VaultError, VaultResult};
use techvault_core::http::{HttpRequest, Transport};
use techvault_core::models::session::{Session, SessionStatus, TokenPair};
use techvault_core::models::user::{Credentials, Registration, User};
use techvault_core::storage::{KeyValueStore, USER_KEY};
use tracing::{debug, info, warn};

use crate::config::{AuthConfig, ProfileRefetch};

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Session established.
    Authenticated(User),
    /// Credentials accepted but a one-time code is needed. No session
    /// exists yet; resubmit the credentials with
    /// [`Credentials::with_otp`].
    TwoFactorRequired,
}

/// Body returned by the login and registration endpoints.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default, alias = "access_token")]
    access: Option<String>,
    #[serde(default, alias = "refresh_token")]
    refresh: Option<String>,
    #[serde(default)]
    user: Option<User>,
    #[serde(default, alias = "requires2FA", alias = "two_factor_required")]
    requires_2fa: bool,
    #[serde(default)]
    detail: Option<String>,
}

impl AuthResponse {
    fn tokens(&self) -> Option<TokenPair> {
        Some(TokenPair {
            access: self.access.clone()?,
            refresh: self.refresh.clone()?,
        })
    }
}

/// Holds the authenticated user and drives the auth endpoints.
///
/// Tokens live in the client's [`KeyValueStore`]; this store keeps the
/// user record and publishes status changes through the client.
pub struct AuthStore<T: Transport, S: KeyValueStore> {
    client: ApiClient<T, S>,
    config: AuthConfig,
    user: RwLock<Option<User>>,
}

impl<T: Transport, S: KeyValueStore> AuthStore<T, S> {
    pub fn new(client: ApiClient<T, S>, config: AuthConfig) -> Self {
        Self {
            client,
            config,
            user: RwLock::new(None),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.status().is_authenticated()
    }

    /// The cached user, if a session is established.
    pub fn user(&self) -> Option<User> {
        if !self.is_authenticated() {
            return None;
        }
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The current session, read back from storage.
    pub fn session(&self) -> VaultResult<Option<Session>> {
        let (Some(access_token), Some(refresh_token), Some(user)) = (
            self.client.access_token()?,
            self.client.refresh_token()?,
            self.user(),
        ) else {
            return Ok(None);
        };
        Ok(Some(Session {
            access_token,
            refresh_token,
            user,
        }))
    }

    /// Log in with username and password, plus the one-time code on the
    /// second step of a two-factor login.
    pub async fn login(&self, credentials: &Credentials) -> VaultResult<LoginOutcome> {
        let body = serde_json::to_value(credentials).map_err(|e| VaultError::Decode(e.to_string()))?;
        let response: AuthResponse = self
            .client
            .send_public_json(HttpRequest::post(paths::LOGIN).with_body(body))
            .await
            .map_err(credential_error)?;

        if response.requires_2fa {
            if credentials.otp_code.is_some() {
                // The server asked again despite a code: treat as a bad code.
                return Err(VaultError::AuthenticationFailed {
                    reason: response
                        .detail
                        .unwrap_or_else(|| "invalid two-factor code".into()),
                });
            }
            info!(username = %credentials.username, "Two-factor code required");
            return Ok(LoginOutcome::TwoFactorRequired);
        }

        let tokens = response.tokens().ok_or_else(|| {
            VaultError::Decode("login response did not include a token pair".into())
        })?;
        let user = self.establish(&tokens, response.user).await?;
        Ok(LoginOutcome::Authenticated(user))
    }

    /// Create an account and log straight into it.
    pub async fn register(&self, registration: &Registration) -> VaultResult<User> {
        let body =
            serde_json::to_value(registration).map_err(|e| VaultError::Decode(e.to_string()))?;
        let response: AuthResponse = self
            .client
            .send_public_json(HttpRequest::post(paths::REGISTRATION).with_body(body))
            .await?;

        let Some(tokens) = response.tokens() else {
            return Err(VaultError::AuthenticationFailed {
                reason: response
                    .detail
                    .unwrap_or_else(|| "registration did not start a session".into()),
            });
        };
        self.establish(&tokens, response.user).await
    }

    /// End the session. The server call is best effort; local state is
    /// always cleared.
    pub async fn logout(&self) -> VaultResult<()> {
        if let Some(refresh) = self.client.refresh_token()? {
            let mut request = HttpRequest::post(paths::LOGOUT).with_body(json!({ "refresh": refresh }));
            request.bearer = self.client.access_token()?;
            if let Err(e) = self.client.execute_public(request).await {
                warn!(error = %e, "Server-side logout failed, clearing local session anyway");
            }
        }
        self.clear()?;
        info!("Logged out");
        Ok(())
    }

    /// Fetch the profile of the logged-in user and refresh the cache.
    pub async fn current_user(&self) -> VaultResult<User> {
        let user: User = self.client.get(paths::PROFILE).await?;
        self.remember(&user)?;
        Ok(user)
    }

    /// Resume a persisted session on start-up.
    ///
    /// Returns `Ok(None)` when there is no session to resume or the stored
    /// tokens were rejected. Transport errors propagate and leave the
    /// stored session in place.
    pub async fn restore(&self) -> VaultResult<Option<User>> {
        if self.client.access_token()?.is_none() && self.client.refresh_token()?.is_none() {
            debug!("No stored session to restore");
            return Ok(None);
        }

        match self.current_user().await {
            Ok(user) => {
                self.client.set_status(SessionStatus::Authenticated);
                info!(user = %user.username, "Restored session");
                Ok(Some(user))
            }
            Err(e) if e.is_auth() => {
                warn!(error = %e, "Stored session rejected");
                self.clear()?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn establish(&self, tokens: &TokenPair, returned: Option<User>) -> VaultResult<User> {
        self.client.store_tokens(tokens)?;

        let user = match (self.config.profile_refetch, returned) {
            (ProfileRefetch::WhenIncomplete, Some(user)) if user.is_complete() => user,
            _ => match self.client.get::<User>(paths::PROFILE).await {
                Ok(user) => user,
                Err(e) => {
                    warn!(error = %e, "Profile fetch failed, session not established");
                    self.clear()?;
                    return Err(e);
                }
            },
        };

        self.remember(&user)?;
        self.client.set_status(SessionStatus::Authenticated);
        info!(user = %user.username, "Session established");
        Ok(user)
    }

    fn remember(&self, user: &User) -> VaultResult<()> {
        let encoded = serde_json::to_string(user).map_err(|e| VaultError::Decode(e.to_string()))?;
        self.client.store().set(USER_KEY, &encoded)?;
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user.clone());
        Ok(())
    }

    fn clear(&self) -> VaultResult<()> {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.client.set_status(SessionStatus::Anonymous);
        self.client.clear_session()
    }
}

/// A 400 on the login form with no per-field messages is a credential
/// rejection, not a form problem.
fn credential_error(err: VaultError) -> VaultError {
    match err {
        VaultError::Validation { message, fields }
            if fields.keys().all(|k| k == "non_field_errors") =>
        {
            VaultError::AuthenticationFailed { reason: message }
        }
        other => other,
    }
}
