// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session context and the listener that keeps it current.
//!
//! The session context is the only place route gating reads the signed-in
//! user from. It is written by a single listener task registered at startup
//! that mirrors the auth service's state signal.

use crate::models::User;
use crate::services::AuthService;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Shared view of the signed-in user.
#[derive(Clone)]
pub struct SessionContext {
    user: Arc<watch::Sender<Option<User>>>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        let (user, _) = watch::channel(None);
        Self {
            user: Arc::new(user),
        }
    }

    pub fn user(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    pub fn uid(&self) -> Option<String> {
        self.user.borrow().as_ref().map(|u| u.uid.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.borrow().is_some()
    }

    pub fn set(&self, user: Option<User>) {
        self.user.send_replace(user);
    }

    pub fn clear(&self) {
        self.set(None);
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.user.subscribe()
    }

    /// Wait until `predicate` holds for the session user.
    ///
    /// Returns false when `timeout` elapses first.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&Option<User>) -> bool,
        timeout: Duration,
    ) -> bool {
        let mut rx = self.user.subscribe();
        let ok = matches!(
            tokio::time::timeout(timeout, rx.wait_for(predicate)).await,
            Ok(Ok(_))
        );
        ok
    }
}

/// Mirror `auth`'s state signal into `session` until the signal closes.
///
/// A closed channel is logged and leaves the session signed out.
pub fn spawn_session_listener(auth: &AuthService, session: SessionContext) -> JoinHandle<()> {
    let mut changes = auth.on_auth_state_changed();

    tokio::spawn(async move {
        session.set(changes.borrow_and_update().clone());

        loop {
            if let Err(e) = changes.changed().await {
                tracing::error!(error = %e, "Auth state channel closed");
                session.clear();
                break;
            }

            let user = changes.borrow_and_update().clone();
            match &user {
                Some(u) => tracing::debug!(uid = %u.uid, "Session user changed"),
                None => tracing::debug!("Session cleared"),
            }
            session.set(user);
        }
    })
}
