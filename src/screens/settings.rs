//! Account settings form.

use crate::error::AppError;
use crate::services::AuthService;
use serde::Deserialize;

pub const PROFILE_UPDATED: &str = "Profile updated successfully!";
pub const PASSWORDS_DO_NOT_MATCH: &str = "New passwords do not match";
pub const CURRENT_PASSWORD_REQUIRED: &str = "Enter your current password to change your email or password";

/// Submitted settings form. Empty fields leave the account unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ProfileUpdate {
    /// Apply the changes in order: display name, email, password.
    ///
    /// The form is checked as a whole first, so a mismatched confirmation or
    /// a missing current password changes nothing.
    pub async fn apply(&self, auth: &AuthService) -> Result<&'static str, AppError> {
        let current = auth.current_user().ok_or(AppError::Unauthorized)?;

        let new_email = filled(&self.email).filter(|e| Some(*e) != current.email.as_deref());
        let wants_password = !self.new_password.is_empty();

        if wants_password && self.new_password != self.confirm_password {
            return Err(AppError::BadRequest(PASSWORDS_DO_NOT_MATCH.to_string()));
        }
        if (new_email.is_some() || wants_password) && self.current_password.is_empty() {
            return Err(AppError::BadRequest(CURRENT_PASSWORD_REQUIRED.to_string()));
        }

        if let Some(name) = self.display_name.as_deref() {
            if name.trim() != current.display_name.as_deref().unwrap_or("") {
                auth.update_display_name(name).await?;
            }
        }
        if let Some(email) = new_email {
            auth.update_email(&self.current_password, email).await?;
        }
        if wants_password {
            auth.update_password(&self.current_password, &self.new_password)
                .await?;
        }

        Ok(PROFILE_UPDATED)
    }
}
