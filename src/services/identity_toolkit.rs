// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase Authentication REST client (Identity Toolkit v1).
//!
//! Handles:
//! - Account creation and email/password sign-in
//! - Password-reset emails
//! - Profile, email and password updates
//! - ID token refresh through the secure-token endpoint

use crate::error::AppError;
use crate::models::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const IDENTITY_TOOLKIT_HOST: &str = "https://identitytoolkit.googleapis.com";
const SECURE_TOKEN_HOST: &str = "https://securetoken.googleapis.com";

/// Identity Toolkit API client.
#[derive(Clone)]
pub struct IdentityToolkitClient {
    http: reqwest::Client,
    accounts_url: String,
    token_url: String,
    api_key: String,
}

impl IdentityToolkitClient {
    /// Create a client for the project identified by `api_key`.
    ///
    /// For local development with the auth emulator, set FIREBASE_AUTH_EMULATOR_HOST.
    pub fn new(api_key: String) -> Self {
        match std::env::var("FIREBASE_AUTH_EMULATOR_HOST") {
            Ok(host) => {
                tracing::info!(host = %host, "Using Firebase Auth emulator");
                let base = format!("http://{}", host.trim_end_matches('/'));
                Self::with_hosts(api_key, &format!("{base}/identitytoolkit.googleapis.com"), &format!("{base}/securetoken.googleapis.com"))
            }
            Err(_) => Self::with_hosts(api_key, IDENTITY_TOOLKIT_HOST, SECURE_TOKEN_HOST),
        }
    }

    fn with_hosts(api_key: String, identity_host: &str, token_host: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            accounts_url: format!("{}/v1/accounts", identity_host),
            token_url: format!("{}/v1/token", token_host),
            api_key,
        }
    }

    /// Create an email/password account. The new account is signed in.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignInResponse, AppError> {
        self.post(
            "signUp",
            &PasswordRequest {
                email,
                password,
                return_secure_token: true,
            },
        )
        .await
    }

    /// Sign in with email and password.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInResponse, AppError> {
        self.post(
            "signInWithPassword",
            &PasswordRequest {
                email,
                password,
                return_secure_token: true,
            },
        )
        .await
    }

    /// Ask the backend to email a password-reset link.
    pub async fn send_password_reset(&self, email: &str) -> Result<(), AppError> {
        let _: serde_json::Value = self
            .post(
                "sendOobCode",
                &serde_json::json!({ "requestType": "PASSWORD_RESET", "email": email }),
            )
            .await?;
        Ok(())
    }

    /// Fetch the account behind an ID token.
    pub async fn lookup(&self, id_token: &str) -> Result<User, AppError> {
        let response: LookupResponse = self
            .post("lookup", &serde_json::json!({ "idToken": id_token }))
            .await?;

        response
            .users
            .into_iter()
            .next()
            .map(AccountInfo::into_user)
            .ok_or_else(|| AppError::Auth("USER_NOT_FOUND".to_string()))
    }

    /// Apply profile changes. Email and password changes return fresh tokens.
    pub async fn update(
        &self,
        id_token: &str,
        changes: &AccountUpdate,
    ) -> Result<UpdateResponse, AppError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct UpdateRequest<'a> {
            id_token: &'a str,
            #[serde(flatten)]
            changes: &'a AccountUpdate,
            return_secure_token: bool,
        }

        self.post(
            "update",
            &UpdateRequest {
                id_token,
                changes,
                return_secure_token: true,
            },
        )
        .await
    }

    /// Exchange a refresh token for a new ID token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Token refresh request failed: {}", e)))?;

        check_response_json(response).await
    }

    async fn post<B: Serialize + ?Sized, T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let url = format!("{}:{}", self.accounts_url, method);
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        check_response_json(response).await
    }
}

/// Parse a success body, or turn the backend's error body into its message.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| format!("HTTP {}: {}", status, body));
        tracing::debug!(status = %status, message = %message, "Identity Toolkit request failed");
        return Err(AppError::Auth(message));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Auth(format!("JSON parse error: {}", e)))
}

/// Extract `error.message` from an Identity Toolkit error body.
fn error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error.message)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

/// Response to sign-up and sign-in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub id_token: String,
    pub refresh_token: String,
    /// Token lifetime in seconds, as a decimal string
    pub expires_in: String,
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Fields that may be changed through `accounts:update`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<String>,
}

/// Secure-token endpoint response (snake_case on the wire).
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: String,
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<AccountInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountInfo {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    photo_url: Option<String>,
    /// Milliseconds since the epoch, as a decimal string
    created_at: Option<String>,
    last_login_at: Option<String>,
}

impl AccountInfo {
    fn into_user(self) -> User {
        User {
            uid: self.local_id,
            email: self.email,
            display_name: self.display_name,
            photo_url: self.photo_url,
            created_at: self.created_at.as_deref().and_then(parse_millis),
            last_sign_in_at: self.last_login_at.as_deref().and_then(parse_millis),
        }
    }
}

fn parse_millis(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}
