// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication service.
//!
//! Wraps the account backend and owns the process-wide auth-state signal.
//! Callers never write session state directly: every sign-in, sign-up,
//! sign-out and profile change publishes the new current user on the
//! channel returned by [`AuthService::on_auth_state_changed`].

use crate::error::AppError;
use crate::models::User;
use crate::services::identity_toolkit::{AccountUpdate, IdentityToolkitClient, SignInResponse};
use crate::services::memory_auth::MemoryAuth;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

/// Refresh the ID token when it expires within this window.
const TOKEN_REFRESH_MARGIN_MINUTES: i64 = 5;

/// Lifetime assumed when the backend omits or garbles `expiresIn`.
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Tokens for the signed-in account.
#[derive(Debug, Clone)]
struct Credentials {
    id_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl Credentials {
    fn new(id_token: String, refresh_token: String, expires_in: &str) -> Self {
        let lifetime = expires_in
            .trim()
            .parse::<i64>()
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
        Self {
            id_token,
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(lifetime),
        }
    }

    fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - now < Duration::minutes(TOKEN_REFRESH_MARGIN_MINUTES)
    }
}

impl From<SignInResponse> for Credentials {
    fn from(resp: SignInResponse) -> Self {
        Credentials::new(resp.id_token, resp.refresh_token, &resp.expires_in)
    }
}

#[derive(Clone)]
enum AuthBackend {
    Firebase(IdentityToolkitClient),
    Memory(MemoryAuth),
}

/// Authentication service handle. Cloning shares the same session.
#[derive(Clone)]
pub struct AuthService {
    backend: AuthBackend,
    state: Arc<watch::Sender<Option<User>>>,
    credentials: Arc<Mutex<Option<Credentials>>>,
}

impl AuthService {
    /// Service backed by Firebase Authentication.
    pub fn firebase(api_key: String) -> Self {
        Self::with_backend(AuthBackend::Firebase(IdentityToolkitClient::new(api_key)))
    }

    /// Service backed by an in-process account table.
    pub fn in_memory() -> Self {
        Self::with_backend(AuthBackend::Memory(MemoryAuth::new()))
    }

    fn with_backend(backend: AuthBackend) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            backend,
            state: Arc::new(state),
            credentials: Arc::new(Mutex::new(None)),
        }
    }

    /// The in-memory account table, when that backend is active.
    pub fn memory(&self) -> Option<&MemoryAuth> {
        match &self.backend {
            AuthBackend::Memory(mem) => Some(mem),
            AuthBackend::Firebase(_) => None,
        }
    }

    /// Receiver that sees the current user now and after every change.
    pub fn on_auth_state_changed(&self) -> watch::Receiver<Option<User>> {
        self.state.subscribe()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().clone()
    }

    fn publish(&self, user: Option<User>) {
        self.state.send_replace(user);
    }

    fn require_user(&self) -> Result<User, AppError> {
        self.current_user().ok_or(AppError::Unauthorized)
    }

    // ─── Session ─────────────────────────────────────────────────

    /// Create an account; the new account becomes the current user.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = match &self.backend {
            AuthBackend::Firebase(client) => {
                let resp = client.sign_up(email.trim(), password).await?;
                self.finish_firebase_sign_in(client, resp).await?
            }
            AuthBackend::Memory(mem) => mem.sign_up(email, password)?,
        };

        tracing::info!(uid = %user.uid, "Account created");
        self.publish(Some(user.clone()));
        Ok(user)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = match &self.backend {
            AuthBackend::Firebase(client) => {
                let resp = client.sign_in_with_password(email.trim(), password).await?;
                self.finish_firebase_sign_in(client, resp).await?
            }
            AuthBackend::Memory(mem) => mem.sign_in(email, password)?,
        };

        tracing::info!(uid = %user.uid, "Signed in");
        self.publish(Some(user.clone()));
        Ok(user)
    }

    async fn finish_firebase_sign_in(
        &self,
        client: &IdentityToolkitClient,
        resp: SignInResponse,
    ) -> Result<User, AppError> {
        let fallback = User {
            email: resp.email.clone(),
            ..User::new(resp.local_id.clone(), "")
        };
        let credentials = Credentials::from(resp);

        let user = match client.lookup(&credentials.id_token).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Account lookup after sign-in failed");
                fallback
            }
        };

        *self.credentials.lock().await = Some(credentials);
        Ok(user)
    }

    pub async fn sign_out(&self) {
        *self.credentials.lock().await = None;
        if let Some(user) = self.current_user() {
            tracing::info!(uid = %user.uid, "Signed out");
        }
        self.publish(None);
    }

    /// Ask the backend to email a reset link to `email`.
    pub async fn send_password_reset(&self, email: &str) -> Result<(), AppError> {
        match &self.backend {
            AuthBackend::Firebase(client) => client.send_password_reset(email.trim()).await?,
            AuthBackend::Memory(mem) => mem.send_password_reset(email)?,
        }
        tracing::info!("Password reset email requested");
        Ok(())
    }

    // ─── Profile ─────────────────────────────────────────────────

    /// Set or clear the display name. An empty name clears it.
    pub async fn update_display_name(&self, name: &str) -> Result<User, AppError> {
        let current = self.require_user()?;
        let name = Some(name.trim()).filter(|n| !n.is_empty());

        let user = match &self.backend {
            AuthBackend::Firebase(client) => {
                let token = self.fresh_id_token().await?;
                let changes = AccountUpdate {
                    display_name: Some(name.unwrap_or_default().to_string()),
                    ..Default::default()
                };
                client.update(&token, &changes).await?;
                User {
                    display_name: name.map(str::to_string),
                    ..current
                }
            }
            AuthBackend::Memory(mem) => {
                mem.update_display_name(current.email.as_deref().unwrap_or_default(), name)?
            }
        };

        self.publish(Some(user.clone()));
        Ok(user)
    }

    /// Change the account email after confirming `current_password`.
    pub async fn update_email(
        &self,
        current_password: &str,
        new_email: &str,
    ) -> Result<User, AppError> {
        let current = self.require_user()?;
        let email = current.email.clone().unwrap_or_default();
        let new_email = new_email.trim();

        let user = match &self.backend {
            AuthBackend::Firebase(client) => {
                let token = self.reauthenticate(client, &email, current_password).await?;
                let changes = AccountUpdate {
                    email: Some(new_email.to_string()),
                    ..Default::default()
                };
                let resp = client.update(&token, &changes).await?;
                self.store_updated_tokens(resp.id_token, resp.refresh_token, resp.expires_in)
                    .await;
                User {
                    email: Some(new_email.to_string()),
                    ..current
                }
            }
            AuthBackend::Memory(mem) => {
                mem.sign_in(&email, current_password)?;
                mem.update_email(&email, new_email)?
            }
        };

        tracing::info!(uid = %user.uid, "Email updated");
        self.publish(Some(user.clone()));
        Ok(user)
    }

    /// Change the password after confirming `current_password`.
    pub async fn update_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let current = self.require_user()?;
        let email = current.email.clone().unwrap_or_default();

        match &self.backend {
            AuthBackend::Firebase(client) => {
                let token = self.reauthenticate(client, &email, current_password).await?;
                let changes = AccountUpdate {
                    password: Some(new_password.to_string()),
                    ..Default::default()
                };
                let resp = client.update(&token, &changes).await?;
                self.store_updated_tokens(resp.id_token, resp.refresh_token, resp.expires_in)
                    .await;
            }
            AuthBackend::Memory(mem) => {
                mem.sign_in(&email, current_password)?;
                mem.update_password(&email, new_password)?;
            }
        }

        tracing::info!(uid = %current.uid, "Password updated");
        Ok(())
    }

    async fn reauthenticate(
        &self,
        client: &IdentityToolkitClient,
        email: &str,
        password: &str,
    ) -> Result<String, AppError> {
        let resp = client.sign_in_with_password(email, password).await?;
        let credentials = Credentials::from(resp);
        let token = credentials.id_token.clone();
        *self.credentials.lock().await = Some(credentials);
        Ok(token)
    }

    async fn store_updated_tokens(
        &self,
        id_token: Option<String>,
        refresh_token: Option<String>,
        expires_in: Option<String>,
    ) {
        if let (Some(id_token), Some(refresh_token)) = (id_token, refresh_token) {
            let expires_in = expires_in.unwrap_or_default();
            *self.credentials.lock().await =
                Some(Credentials::new(id_token, refresh_token, &expires_in));
        }
    }

    // ─── Tokens ──────────────────────────────────────────────────

    /// Current ID token, refreshed first when close to expiry.
    pub async fn fresh_id_token(&self) -> Result<String, AppError> {
        let AuthBackend::Firebase(client) = &self.backend else {
            let user = self.require_user()?;
            return Ok(format!("offline-{}", user.uid));
        };

        let mut guard = self.credentials.lock().await;
        let credentials = guard.as_mut().ok_or(AppError::Unauthorized)?;

        if credentials.needs_refresh(Utc::now()) {
            tracing::debug!("Refreshing ID token");
            let resp = client.refresh(&credentials.refresh_token).await?;
            *credentials = Credentials::new(resp.id_token, resp.refresh_token, &resp.expires_in);
        }

        Ok(credentials.id_token.clone())
    }
}
