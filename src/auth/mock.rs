// SPDX-License-Identifier: MPL-2.0
//! In-memory authentication backend for tests, demos and the CLI.

use super::api::{AuthApi, Credentials, TokenPair};
use super::error::AuthError;
use crate::domain::session::{Role, SessionData};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
struct Account {
    password: String,
    profile: SessionData,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<String, Account>,
    /// access token -> email
    access: HashMap<String, String>,
    /// refresh token -> email
    refresh: HashMap<String, String>,
    issued: u64,
}

impl State {
    fn mint(&mut self, prefix: &str, email: &str) -> String {
        self.issued += 1;
        format!("{prefix}-{}-{email}", self.issued)
    }
}

/// Backend that keeps accounts and issued tokens in memory.
#[derive(Debug, Default)]
pub struct MockAuthApi {
    state: Mutex<State>,
    refresh_calls: AtomicUsize,
    sign_out_calls: AtomicUsize,
}

impl MockAuthApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account. The profile email is the login.
    #[must_use]
    pub fn with_user(self, password: impl Into<String>, profile: SessionData) -> Self {
        {
            let mut state = self.lock();
            state.accounts.insert(
                profile.email.clone(),
                Account {
                    password: password.into(),
                    profile,
                },
            );
        }
        self
    }

    /// Demo backend: the admin from [`SessionData::demo`] (password `admin123`),
    /// a patient and a specialist (password `password123`).
    #[must_use]
    pub fn demo() -> Self {
        Self::new()
            .with_user("admin123", SessionData::demo())
            .with_user(
                "password123",
                SessionData {
                    id: "2".to_string(),
                    username: "maria_lopez".to_string(),
                    email: "paciente@ejemplo.com".to_string(),
                    role: Some(Role::Patient),
                    avatar: None,
                },
            )
            .with_user(
                "password123",
                SessionData {
                    id: "3".to_string(),
                    username: "dr_garcia".to_string(),
                    email: "especialista@ejemplo.com".to_string(),
                    role: Some(Role::Specialist),
                    avatar: None,
                },
            )
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Invalidates every access token issued so far.
    pub fn revoke_access_tokens(&self) {
        self.lock().access.clear();
    }

    #[must_use]
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn sign_in(&self, credentials: &Credentials) -> Result<TokenPair, AuthError> {
        let mut state = self.lock();
        let valid = state
            .accounts
            .get(&credentials.email)
            .is_some_and(|account| account.password == credentials.password);
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }
        let token = state.mint("access", &credentials.email);
        let refresh = state.mint("refresh", &credentials.email);
        state.access.insert(token.clone(), credentials.email.clone());
        state.refresh.insert(refresh.clone(), credentials.email.clone());
        Ok(TokenPair {
            token,
            refresh_token: Some(refresh),
        })
    }

    async fn get_session(&self, token: &str) -> Result<SessionData, AuthError> {
        let state = self.lock();
        state
            .access
            .get(token)
            .and_then(|email| state.accounts.get(email))
            .map(|account| account.profile.clone())
            .ok_or(AuthError::Unauthorized)
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        self.refresh_calls.fetch_add(1, Ordering::Relaxed);
        let mut state = self.lock();
        let email = state
            .refresh
            .get(refresh_token)
            .cloned()
            .ok_or(AuthError::Unauthorized)?;
        let token = state.mint("access", &email);
        state.access.insert(token.clone(), email);
        Ok(TokenPair {
            token,
            refresh_token: None,
        })
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        self.sign_out_calls.fetch_add(1, Ordering::Relaxed);
        let mut state = self.lock();
        let email = state.access.remove(token).ok_or(AuthError::Unauthorized)?;
        state.refresh.retain(|_, owner| *owner != email);
        Ok(())
    }
}
