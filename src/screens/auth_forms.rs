// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in, sign-up and password-reset forms.
//!
//! Forms are checked locally first; anything the backend rejects comes back
//! with the backend's own message. On success the caller is told where to
//! navigate. Session state is left to the session listener.

use crate::error::AppError;
use crate::navigation::Route;
use crate::services::AuthService;
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

pub const PASSWORD_RESET_SENT: &str = "Password reset email sent! Check your inbox.";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInForm {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpForm {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long."))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PasswordResetForm {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
}

/// First validation message, as a flat string.
pub(crate) fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid input".to_string())
}

fn check(form: &impl Validate) -> Result<(), AppError> {
    form.validate()
        .map_err(|e| AppError::BadRequest(first_message(&e)))
}

impl SignInForm {
    pub async fn submit(&self, auth: &AuthService) -> Result<Route, AppError> {
        check(self)?;
        auth.sign_in(self.email.trim(), &self.password).await?;
        Ok(Route::Notes)
    }
}

impl SignUpForm {
    pub async fn submit(&self, auth: &AuthService) -> Result<Route, AppError> {
        check(self)?;
        auth.sign_up(self.email.trim(), &self.password).await?;
        Ok(Route::Notes)
    }
}

impl PasswordResetForm {
    /// Request the reset email and return the confirmation to show.
    pub async fn submit(&self, auth: &AuthService) -> Result<&'static str, AppError> {
        check(self)?;
        auth.send_password_reset(self.email.trim()).await?;
        Ok(PASSWORD_RESET_SENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up(email: &str, password: &str) -> SignUpForm {
        SignUpForm {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_navigates_to_notes() {
        let auth = AuthService::in_memory();
        let route = sign_up("ada@example.com", "hunter22")
            .submit(&auth)
            .await
            .unwrap();
        assert_eq!(route, Route::Notes);
        assert!(auth.current_user().is_some());
    }

    #[tokio::test]
    async fn test_local_checks_run_before_backend() {
        let auth = AuthService::in_memory();

        let err = sign_up("not-an-email", "hunter22").submit(&auth).await.unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid email address");

        let err = sign_up("ada@example.com", "abc").submit(&auth).await.unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters long.");
    }

    #[tokio::test]
    async fn test_backend_message_is_shown_verbatim() {
        let auth = AuthService::in_memory();
        let form = SignInForm {
            email: "ada@example.com".to_string(),
            password: "hunter22".to_string(),
        };
        let err = form.submit(&auth).await.unwrap_err();
        assert_eq!(err.to_string(), "INVALID_LOGIN_CREDENTIALS");
    }

    #[tokio::test]
    async fn test_password_reset_message() {
        let auth = AuthService::in_memory();
        sign_up("ada@example.com", "hunter22").submit(&auth).await.unwrap();

        let form = PasswordResetForm {
            email: "ada@example.com".to_string(),
        };
        assert_eq!(form.submit(&auth).await.unwrap(), PASSWORD_RESET_SENT);
    }
}
