//! Authenticated API client with single-shot token refresh.
//!
//! Every request goes through [`ApiClient::execute`], which:
//! 1. attaches `Authorization: Bearer <access>` when an access token is stored;
//! 2. on a 401, refreshes the access token and replays the request, at most
//!    [`RefreshPolicy::max_retries`] times;
//! 3. when no refresh is possible, clears the stored session and publishes
//!    [`SessionStatus::Expired`] so the UI layer can send the user to login.
//!
//! Refreshes are not coordinated between concurrent requests. The refresh
//! endpoint is idempotent, so two requests racing on an expired token may
//! each refresh independently.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use techvault_core::error::{VaultError, VaultResult};
use techvault_core::http::{HttpRequest, HttpResponse, Transport};
use techvault_core::models::session::{SessionStatus, TokenPair};
use techvault_core::storage::{ACCESS_TOKEN_KEY, KeyValueStore, REFRESH_TOKEN_KEY};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::paths;
use crate::token;

/// How the client reacts to 401 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshPolicy {
    /// Refresh-and-replay attempts per logical request (default: 1).
    /// `0` disables refresh entirely.
    pub max_retries: u8,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self { max_retries: 1 }
    }
}

/// Response of `/api/token/refresh/`. The refresh token is only present
/// when the server rotates it.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(alias = "access_token")]
    access: String,
    #[serde(default, alias = "refresh_token")]
    refresh: Option<String>,
}

struct Inner<T, S> {
    transport: T,
    store: S,
    policy: RefreshPolicy,
    status: watch::Sender<SessionStatus>,
}

/// Shared handle to the API. Cloning is cheap; all clones share the
/// transport, the token store, and the session status channel.
pub struct ApiClient<T: Transport, S: KeyValueStore> {
    inner: Arc<Inner<T, S>>,
}

impl<T: Transport, S: KeyValueStore> Clone for ApiClient<T, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport, S: KeyValueStore> ApiClient<T, S> {
    pub fn new(transport: T, store: S, policy: RefreshPolicy) -> Self {
        let (status, _) = watch::channel(SessionStatus::Anonymous);
        Self {
            inner: Arc::new(Inner {
                transport,
                store,
                policy,
                status,
            }),
        }
    }

    pub fn store(&self) -> &S {
        &self.inner.store
    }

    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.inner.policy
    }

    // -----------------------------------------------------------------------
    // Session state
    // -----------------------------------------------------------------------

    pub fn status(&self) -> SessionStatus {
        *self.inner.status.borrow()
    }

    /// Watch session status transitions (login, logout, forced expiry).
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.inner.status.subscribe()
    }

    pub fn set_status(&self, status: SessionStatus) {
        let previous = self.inner.status.send_replace(status);
        if previous != status {
            debug!(?previous, ?status, "Session status changed");
        }
    }

    pub fn access_token(&self) -> VaultResult<Option<String>> {
        self.inner.store.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> VaultResult<Option<String>> {
        self.inner.store.get(REFRESH_TOKEN_KEY)
    }

    pub fn store_tokens(&self, tokens: &TokenPair) -> VaultResult<()> {
        self.inner.store.set(ACCESS_TOKEN_KEY, &tokens.access)?;
        self.inner.store.set(REFRESH_TOKEN_KEY, &tokens.refresh)
    }

    /// Remove the persisted session. Does not touch the status channel.
    pub fn clear_session(&self) -> VaultResult<()> {
        self.inner.store.clear_session()
    }

    // -----------------------------------------------------------------------
    // Request execution
    // -----------------------------------------------------------------------

    /// Send an authenticated request, refreshing the access token on 401.
    ///
    /// Returns the response only when its status is 2xx.
    pub async fn execute(&self, request: HttpRequest) -> VaultResult<HttpResponse> {
        let mut attempt: u8 = 0;
        loop {
            let mut outgoing = request.clone();
            outgoing.bearer = self.access_token()?;

            debug!(
                request_id = %request.request_id,
                method = %request.method,
                path = %request.path,
                attempt,
                authenticated = outgoing.bearer.is_some(),
                "Sending request"
            );

            let response = self.inner.transport.send(outgoing).await?;
            if response.is_success() {
                return Ok(response);
            }
            if response.status != 401 {
                return Err(response.into_error());
            }
            if attempt >= self.inner.policy.max_retries {
                if attempt > 0 {
                    warn!(
                        request_id = %request.request_id,
                        path = %request.path,
                        "Request rejected again after token refresh"
                    );
                }
                return Err(response.into_error());
            }

            attempt += 1;
            self.refresh_access_token(request.request_id).await?;
        }
    }

    /// Send a request without a bearer token and without the refresh
    /// policy. Used for the auth endpoints themselves.
    pub async fn execute_public(&self, request: HttpRequest) -> VaultResult<HttpResponse> {
        debug!(
            request_id = %request.request_id,
            method = %request.method,
            path = %request.path,
            "Sending public request"
        );
        let response = self.inner.transport.send(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(response.into_error())
        }
    }

    /// [`ApiClient::execute`] and decode the JSON body.
    pub async fn send_json<R: DeserializeOwned>(&self, request: HttpRequest) -> VaultResult<R> {
        let response = self.execute(request).await?;
        decode(&response)
    }

    /// [`ApiClient::execute_public`] and decode the JSON body.
    pub async fn send_public_json<R: DeserializeOwned>(
        &self,
        request: HttpRequest,
    ) -> VaultResult<R> {
        let response = self.execute_public(request).await?;
        decode(&response)
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> VaultResult<R> {
        self.send_json(HttpRequest::get(path)).await
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> VaultResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = HttpRequest::post(path).with_body(to_body(body)?);
        self.send_json(request).await
    }

    pub async fn patch<B, R>(&self, path: &str, body: &B) -> VaultResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = HttpRequest::patch(path).with_body(to_body(body)?);
        self.send_json(request).await
    }

    pub async fn delete(&self, path: &str) -> VaultResult<()> {
        self.execute(HttpRequest::delete(path)).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Refresh
    // -----------------------------------------------------------------------

    async fn refresh_access_token(&self, request_id: Uuid) -> VaultResult<()> {
        let Some(refresh) = self.refresh_token()? else {
            self.expire_session(request_id, "no refresh token stored");
            return Err(VaultError::SessionExpired);
        };

        info!(
            request_id = %request_id,
            token = %token::fingerprint(&refresh),
            "Access token rejected, refreshing"
        );

        let request = HttpRequest::post(paths::TOKEN_REFRESH).with_body(json!({ "refresh": refresh }));
        let outcome = match self.inner.transport.send(request).await {
            Ok(response) if response.is_success() => decode::<RefreshResponse>(&response),
            Ok(response) => Err(response.into_error()),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(tokens) => {
                self.inner.store.set(ACCESS_TOKEN_KEY, &tokens.access)?;
                if let Some(rotated) = &tokens.refresh {
                    self.inner.store.set(REFRESH_TOKEN_KEY, rotated)?;
                }
                debug!(
                    request_id = %request_id,
                    token = %token::fingerprint(&tokens.access),
                    rotated = tokens.refresh.is_some(),
                    "Access token refreshed"
                );
                Ok(())
            }
            Err(e) => {
                self.expire_session(request_id, &e.to_string());
                Err(VaultError::SessionExpired)
            }
        }
    }

    fn expire_session(&self, request_id: Uuid, reason: &str) {
        warn!(request_id = %request_id, reason, "Session expired, clearing stored tokens");
        if let Err(e) = self.inner.store.clear_session() {
            warn!(error = %e, "Failed to clear stored session");
        }
        self.set_status(SessionStatus::Expired);
    }
}

fn decode<R: DeserializeOwned>(response: &HttpResponse) -> VaultResult<R> {
    let value = response.json_body()?;
    serde_json::from_value(value).map_err(|e| VaultError::Decode(e.to_string()))
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> VaultResult<serde_json::Value> {
    serde_json::to_value(body).map_err(|e| VaultError::Decode(e.to_string()))
}
