//! Auth provider client.
//!
//! Wraps the backend's auth endpoints: password sign-in, sign-up with
//! profile-provisioning metadata, sign-out, a one-shot session check, and
//! a change-event subscription. The provider owns identities and
//! credential verification; this client never stores passwords.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, broadcast};
use url::Url;

use marquee_core::{CategoryId, Email, IdentityId, Role};

use super::{AuthError, StoreError};
use crate::models::Identity;

/// Minimum password length, enforced by every provider implementation.
pub(crate) const MIN_PASSWORD_LENGTH: usize = 8;

/// Capacity of the auth change-event channel.
pub(crate) const AUTH_EVENT_CAPACITY: usize = 16;

/// Profile-provisioning metadata attached to sign-up.
///
/// The backend applies this when it creates the profile and role rows as
/// a side effect of account creation.
#[derive(Debug, Clone, Serialize)]
pub struct SignUpMetadata {
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

/// An auth state change: the new session, or `None` on sign-out.
#[derive(Debug, Clone)]
pub struct AuthChange {
    pub session: Option<Identity>,
}

/// Authentication operations delegated to the external provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Sign in with email and password.
    ///
    /// On success the session change is observed asynchronously via
    /// [`AuthProvider::subscribe`]; this call's return value carries only
    /// the failure, never the new session state.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for a wrong password or
    /// unknown account.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), AuthError>;

    /// Create an account, attaching profile-provisioning metadata.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AccountExists`] for a duplicate email and
    /// [`AuthError::WeakPassword`] for a rejected password.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignUpMetadata,
    ) -> Result<(), AuthError>;

    /// Sign out. The snapshot moves via the subscription, not this call.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// One-shot check of the current session.
    async fn get_session(&self) -> Result<Option<Identity>, AuthError>;

    /// Subscribe to auth state changes.
    ///
    /// Contract: consumers must not call back into the provider
    /// synchronously from within a change notification; the provider's
    /// internal auth lock is held while events are delivered.
    fn subscribe(&self) -> broadcast::Receiver<AuthChange>;
}

// =============================================================================
// REST implementation
// =============================================================================

/// The provider-held session: bearer token plus the resolved identity.
struct AuthSession {
    access_token: SecretString,
    identity: Identity,
}

struct RestAuthInner {
    client: reqwest::Client,
    base: Url,
    api_key: String,
    session: Mutex<Option<AuthSession>>,
    events: broadcast::Sender<AuthChange>,
}

/// Client for the backend's auth endpoints.
#[derive(Clone)]
pub struct RestAuthClient {
    inner: Arc<RestAuthInner>,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: IdentityId,
    email: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    #[serde(alias = "error_description", alias = "msg")]
    message: Option<String>,
}

impl RestAuthClient {
    /// Create a new auth client against the backend base URL.
    #[must_use]
    pub fn new(base: &Url, api_key: &SecretString) -> Self {
        let (events, _) = broadcast::channel(AUTH_EVENT_CAPACITY);
        Self {
            inner: Arc::new(RestAuthInner {
                client: reqwest::Client::new(),
                base: base.clone(),
                api_key: api_key.expose_secret().to_owned(),
                session: Mutex::new(None),
                events,
            }),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}auth/v1/{path}", self.inner.base)
    }

    async fn install_session(&self, token: TokenResponse) -> Result<(), AuthError> {
        let identity = Identity {
            id: token.user.id,
            email: Email::parse(&token.user.email)?,
        };

        *self.inner.session.lock().await = Some(AuthSession {
            access_token: SecretString::from(token.access_token),
            identity: identity.clone(),
        });

        // Nobody listening yet is fine; the session manager subscribes at
        // construction and a dropped manager must not make sign-in fail.
        let _ = self.inner.events.send(AuthChange {
            session: Some(identity),
        });

        Ok(())
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<AuthErrorBody>().await {
            Ok(body) => body.message.unwrap_or_else(|| status.to_string()),
            Err(_) => status.to_string(),
        }
    }
}

#[async_trait]
impl AuthProvider for RestAuthClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let email = Email::parse(email)?;

        let response = self
            .inner
            .client
            .post(self.endpoint("token?grant_type=password"))
            .header("apikey", &self.inner.api_key)
            .json(&serde_json::json!({
                "email": email.as_str(),
                "password": password,
            }))
            .send()
            .await
            .map_err(StoreError::from)?;

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST
            || status == reqwest::StatusCode::UNAUTHORIZED
        {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            let message = Self::error_message(response).await;
            return Err(AuthError::Provider(StoreError::Rejected {
                status: status.as_u16(),
                message,
            }));
        }

        let token: TokenResponse = response.json().await.map_err(StoreError::from)?;
        self.install_session(token).await
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignUpMetadata,
    ) -> Result<(), AuthError> {
        let email = Email::parse(email)?;

        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let response = self
            .inner
            .client
            .post(self.endpoint("signup"))
            .header("apikey", &self.inner.api_key)
            .json(&serde_json::json!({
                "email": email.as_str(),
                "password": password,
                "data": metadata,
            }))
            .send()
            .await
            .map_err(StoreError::from)?;

        let status = response.status();
        if status == reqwest::StatusCode::CONFLICT
            || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        {
            return Err(AuthError::AccountExists);
        }
        if !status.is_success() {
            let message = Self::error_message(response).await;
            if status == reqwest::StatusCode::BAD_REQUEST
                && message.to_lowercase().contains("password")
            {
                return Err(AuthError::WeakPassword(message));
            }
            return Err(AuthError::Provider(StoreError::Rejected {
                status: status.as_u16(),
                message,
            }));
        }

        // The provider issues a session for the fresh account; the change
        // event drives resolution exactly as a sign-in would.
        let token: TokenResponse = response.json().await.map_err(StoreError::from)?;
        self.install_session(token).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let taken = self.inner.session.lock().await.take();

        let _ = self.inner.events.send(AuthChange { session: None });

        // Revoke the token best-effort; the local session is already gone
        // and the snapshot has moved, so a revocation failure only warns.
        if let Some(session) = taken {
            let result = self
                .inner
                .client
                .post(self.endpoint("logout"))
                .header("apikey", &self.inner.api_key)
                .bearer_auth(session.access_token.expose_secret())
                .send()
                .await;
            if let Err(error) = result {
                tracing::warn!(%error, "token revocation failed during sign-out");
            }
        }

        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Identity>, AuthError> {
        Ok(self
            .inner
            .session
            .lock()
            .await
            .as_ref()
            .map(|s| s.identity.clone()))
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.inner.events.subscribe()
    }
}
