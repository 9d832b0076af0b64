//! In-process account table used in offline mode and tests.
//!
//! Failures use the same message codes Identity Toolkit returns, so callers
//! see identical strings whichever backend is active.

use crate::db::new_document_id;
use crate::error::AppError;
use crate::models::User;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

pub const EMAIL_EXISTS: &str = "EMAIL_EXISTS";
pub const EMAIL_NOT_FOUND: &str = "EMAIL_NOT_FOUND";
pub const INVALID_EMAIL: &str = "INVALID_EMAIL";
pub const INVALID_LOGIN_CREDENTIALS: &str = "INVALID_LOGIN_CREDENTIALS";
pub const MISSING_PASSWORD: &str = "MISSING_PASSWORD";
pub const WEAK_PASSWORD: &str = "WEAK_PASSWORD : Password should be at least 6 characters";

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
struct Account {
    password: String,
    user: User,
}

/// Accounts keyed by lower-cased email.
#[derive(Clone, Default)]
pub struct MemoryAuth {
    accounts: Arc<DashMap<String, Account>>,
    password_resets: Arc<DashMap<String, u32>>,
}

fn key(email: &str) -> String {
    email.trim().to_lowercase()
}

fn check_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AppError::Auth(INVALID_EMAIL.to_string())),
    }
}

fn check_new_password(password: &str) -> Result<(), AppError> {
    if password.is_empty() {
        return Err(AppError::Auth(MISSING_PASSWORD.to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Auth(WEAK_PASSWORD.to_string()));
    }
    Ok(())
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_up(&self, email: &str, password: &str) -> Result<User, AppError> {
        check_email(email)?;
        check_new_password(password)?;

        let uid = new_document_id()?;
        let now = Utc::now();
        let mut user = User::new(uid, email.trim());
        user.created_at = Some(now);
        user.last_sign_in_at = Some(now);

        match self.accounts.entry(key(email)) {
            Entry::Occupied(_) => Err(AppError::Auth(EMAIL_EXISTS.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(Account {
                    password: password.to_string(),
                    user: user.clone(),
                });
                Ok(user)
            }
        }
    }

    pub fn sign_in(&self, email: &str, password: &str) -> Result<User, AppError> {
        check_email(email)?;
        if password.is_empty() {
            return Err(AppError::Auth(MISSING_PASSWORD.to_string()));
        }

        let mut account = self
            .accounts
            .get_mut(&key(email))
            .filter(|a| a.password == password)
            .ok_or_else(|| AppError::Auth(INVALID_LOGIN_CREDENTIALS.to_string()))?;
        account.user.last_sign_in_at = Some(Utc::now());
        Ok(account.user.clone())
    }

    pub fn send_password_reset(&self, email: &str) -> Result<(), AppError> {
        check_email(email)?;
        if !self.accounts.contains_key(&key(email)) {
            return Err(AppError::Auth(EMAIL_NOT_FOUND.to_string()));
        }
        *self.password_resets.entry(key(email)).or_insert(0) += 1;
        Ok(())
    }

    /// Number of reset emails "sent" to `email`.
    pub fn password_resets_sent(&self, email: &str) -> u32 {
        self.password_resets.get(&key(email)).map_or(0, |n| *n)
    }

    pub fn update_display_name(&self, email: &str, name: Option<&str>) -> Result<User, AppError> {
        let mut account = self
            .accounts
            .get_mut(&key(email))
            .ok_or_else(|| AppError::Auth(EMAIL_NOT_FOUND.to_string()))?;
        account.user.display_name = name.map(str::to_string);
        Ok(account.user.clone())
    }

    pub fn update_email(&self, email: &str, new_email: &str) -> Result<User, AppError> {
        check_email(new_email)?;
        if key(email) != key(new_email) && self.accounts.contains_key(&key(new_email)) {
            return Err(AppError::Auth(EMAIL_EXISTS.to_string()));
        }

        let (_, mut account) = self
            .accounts
            .remove(&key(email))
            .ok_or_else(|| AppError::Auth(EMAIL_NOT_FOUND.to_string()))?;
        account.user.email = Some(new_email.trim().to_string());
        let user = account.user.clone();
        self.accounts.insert(key(new_email), account);
        Ok(user)
    }

    pub fn update_password(&self, email: &str, new_password: &str) -> Result<(), AppError> {
        check_new_password(new_password)?;
        let mut account = self
            .accounts
            .get_mut(&key(email))
            .ok_or_else(|| AppError::Auth(EMAIL_NOT_FOUND.to_string()))?;
        account.password = new_password.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_message(err: AppError) -> String {
        match err {
            AppError::Auth(msg) => msg,
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[test]
    fn test_sign_up_then_sign_in() {
        let auth = MemoryAuth::new();
        let created = auth.sign_up("Ada@Example.com", "hunter22").unwrap();
        let signed_in = auth.sign_in("ada@example.com", "hunter22").unwrap();
        assert_eq!(created.uid, signed_in.uid);
        assert_eq!(created.uid.len(), 20);
    }

    #[test]
    fn test_duplicate_and_weak_sign_up() {
        let auth = MemoryAuth::new();
        auth.sign_up("ada@example.com", "hunter22").unwrap();

        let dup = auth.sign_up("ada@example.com", "another1").unwrap_err();
        assert_eq!(auth_message(dup), EMAIL_EXISTS);

        let weak = auth.sign_up("bob@example.com", "abc").unwrap_err();
        assert_eq!(auth_message(weak), WEAK_PASSWORD);
    }

    #[test]
    fn test_wrong_password_and_unknown_email_look_alike() {
        let auth = MemoryAuth::new();
        auth.sign_up("ada@example.com", "hunter22").unwrap();

        let wrong = auth.sign_in("ada@example.com", "nope").unwrap_err();
        let unknown = auth.sign_in("zed@example.com", "hunter22").unwrap_err();
        assert_eq!(auth_message(wrong), INVALID_LOGIN_CREDENTIALS);
        assert_eq!(auth_message(unknown), INVALID_LOGIN_CREDENTIALS);
    }

    #[test]
    fn test_password_reset_requires_account() {
        let auth = MemoryAuth::new();
        auth.sign_up("ada@example.com", "hunter22").unwrap();

        auth.send_password_reset("ada@example.com").unwrap();
        assert_eq!(auth.password_resets_sent("ada@example.com"), 1);

        let err = auth.send_password_reset("zed@example.com").unwrap_err();
        assert_eq!(auth_message(err), EMAIL_NOT_FOUND);
    }

    #[test]
    fn test_update_email_rekeys_account() {
        let auth = MemoryAuth::new();
        auth.sign_up("ada@example.com", "hunter22").unwrap();

        let user = auth.update_email("ada@example.com", "ada@new.example.com").unwrap();
        assert_eq!(user.email.as_deref(), Some("ada@new.example.com"));
        assert!(auth.sign_in("ada@example.com", "hunter22").is_err());
        assert!(auth.sign_in("ada@new.example.com", "hunter22").is_ok());
    }
}
