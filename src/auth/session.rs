// SPDX-License-Identifier: MPL-2.0
//! Session provider.
//!
//! `SessionManager` owns the tokens issued by the backend and publishes the
//! current [`Session`] on a `watch` channel. Guards subscribe to that channel
//! and wait for it to leave `Loading` before deciding.

use super::api::{AuthApi, Credentials};
use super::error::AuthError;
use super::tokens::{TokenPolicy, TokenState};
use crate::config::Config;
use crate::domain::session::{Session, SessionData};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

pub struct SessionManager {
    api: Arc<dyn AuthApi>,
    policy: TokenPolicy,
    header_name: String,
    token_type: String,
    tokens: Mutex<Option<TokenState>>,
    state: watch::Sender<Session>,
}

impl SessionManager {
    /// Creates a manager with no signed-in user.
    pub fn new(api: Arc<dyn AuthApi>, policy: TokenPolicy) -> Self {
        let (state, _) = watch::channel(Session::unauthenticated());
        Self {
            api,
            policy,
            header_name: crate::config::DEFAULT_TOKEN_HEADER.to_string(),
            token_type: crate::config::DEFAULT_TOKEN_TYPE.to_string(),
            tokens: Mutex::new(None),
            state,
        }
    }

    pub fn from_config(api: Arc<dyn AuthApi>, config: &Config) -> Self {
        let mut manager = Self::new(api, TokenPolicy::from_config(&config.auth));
        manager.header_name.clone_from(&config.auth.token.header_name);
        manager.token_type.clone_from(&config.auth.token.token_type);
        manager
    }

    #[must_use]
    pub fn policy(&self) -> &TokenPolicy {
        &self.policy
    }

    /// Receiver for session changes, starting at the current value.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.tokens
            .lock()
            .await
            .as_ref()
            .map(|t| t.access_token().to_string())
    }

    /// Header to attach to authenticated API calls, e.g.
    /// `("Authorization", "Bearer <token>")`.
    pub async fn authorization_header(&self) -> Option<(String, String)> {
        let token = self.access_token().await?;
        let value = if self.token_type.is_empty() {
            token
        } else {
            format!("{} {}", self.token_type, token)
        };
        Some((self.header_name.clone(), value))
    }

    /// Signs in and loads the profile.
    ///
    /// The session is `Loading` while the requests are in flight. On failure it
    /// ends `Unauthenticated` and the error is returned for the caller to show.
    /// If the returned future is dropped before completing, the previous
    /// session is published again.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<SessionData, AuthError> {
        let mut tokens = self.tokens.lock().await;
        let pending = PendingSignIn::start(&self.state);

        let result = async {
            let pair = self.api.sign_in(credentials).await?;
            let state = TokenState::issue(pair, &self.policy, Utc::now());
            let data = self.api.get_session(state.access_token()).await?;
            Ok::<_, AuthError>((state, data))
        }
        .await;
        pending.finish();

        match result {
            Ok((state, data)) => {
                *tokens = Some(state);
                tracing::info!(user = %data.username, role = ?data.role, "signed in");
                self.state.send_replace(Session::authenticated(data.clone()));
                Ok(data)
            }
            Err(err) => {
                *tokens = None;
                tracing::warn!(%err, "sign-in failed");
                self.state.send_replace(Session::unauthenticated());
                Err(err)
            }
        }
    }

    /// Signs out locally. The backend call is best effort.
    pub async fn sign_out(&self) {
        let previous = self.tokens.lock().await.take();
        if let Some(tokens) = previous {
            if let Err(err) = self.api.sign_out(tokens.access_token()).await {
                tracing::debug!(%err, "backend sign-out failed, session cleared locally");
            }
        }
        self.state.send_replace(Session::unauthenticated());
    }

    /// Revalidates the session now.
    pub async fn refresh(&self) -> Result<SessionData, AuthError> {
        self.refresh_at(Utc::now()).await
    }

    /// Revalidates the session as of `now`.
    ///
    /// With a usable refresh token the access token is renewed first. An
    /// expired refresh token, or an expired access token with nothing to renew
    /// it, ends the session with [`AuthError::SessionExpired`]. Backend
    /// rejections end the session too; transport failures leave it as is.
    pub async fn refresh_at(&self, now: DateTime<Utc>) -> Result<SessionData, AuthError> {
        let mut guard = self.tokens.lock().await;
        let Some(tokens) = guard.as_mut() else {
            return Err(AuthError::Unauthorized);
        };

        let result = self.renew(tokens, now).await;
        match result {
            Ok(data) => {
                self.state.send_replace(Session::authenticated(data.clone()));
                Ok(data)
            }
            Err(err) if err.ends_session() => {
                *guard = None;
                tracing::info!(%err, "session ended");
                self.state.send_replace(Session::unauthenticated());
                Err(err)
            }
            Err(err) => {
                tracing::warn!(%err, "session refresh failed");
                Err(err)
            }
        }
    }

    async fn renew(&self, tokens: &mut TokenState, now: DateTime<Utc>) -> Result<SessionData, AuthError> {
        let can_refresh = self.policy.refresh_enabled && tokens.refresh_token().is_some();
        if !can_refresh {
            if tokens.access_expired(now) {
                return Err(AuthError::SessionExpired);
            }
            return self.api.get_session(tokens.access_token()).await;
        }

        if tokens.refresh_expired(now) {
            return Err(AuthError::SessionExpired);
        }
        let refresh = tokens.refresh_token().unwrap_or_default().to_string();
        let pair = self.api.refresh_token(&refresh).await?;
        tokens.apply_refresh(pair, &self.policy, now);
        tracing::debug!(expires_at = %tokens.access_expires_at(), "access token renewed");
        self.api.get_session(tokens.access_token()).await
    }

    /// Called when the application window regains focus.
    ///
    /// Refreshes the session when enabled and signed in; otherwise returns
    /// `Ok(None)` without contacting the backend.
    pub async fn on_window_focus(&self) -> Result<Option<SessionData>, AuthError> {
        if !self.policy.refresh_on_window_focus || self.tokens.lock().await.is_none() {
            return Ok(None);
        }
        self.refresh().await.map(Some)
    }
}

/// Publishes `Loading` for the duration of a sign-in and puts the previous
/// session back if the sign-in is abandoned.
struct PendingSignIn<'a> {
    state: &'a watch::Sender<Session>,
    previous: Option<Session>,
}

impl<'a> PendingSignIn<'a> {
    fn start(state: &'a watch::Sender<Session>) -> Self {
        let previous = state.send_replace(Session::loading());
        Self {
            state,
            previous: Some(previous),
        }
    }

    /// The caller publishes the outcome itself.
    fn finish(mut self) {
        self.previous = None;
    }
}

impl Drop for PendingSignIn<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            tracing::debug!(status = %previous.status(), "sign-in abandoned, restoring session");
            self.state.send_replace(previous);
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("policy", &self.policy)
            .field("session", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}
