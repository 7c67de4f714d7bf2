// SPDX-License-Identifier: MPL-2.0
//! Token lifetimes and bookkeeping.

use super::api::TokenPair;
use crate::config::AuthConfig;
use crate::domain::newtypes::TokenMaxAge;
use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Lifetimes and refresh behavior for issued tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPolicy {
    pub access_max_age: Duration,
    pub refresh_max_age: Duration,
    pub refresh_enabled: bool,
    /// Keep the current refresh token when a refresh only returns an access token.
    pub refresh_only_token: bool,
    pub refresh_on_window_focus: bool,
}

impl TokenPolicy {
    #[must_use]
    pub fn from_config(auth: &AuthConfig) -> Self {
        Self {
            access_max_age: seconds(auth.token.max_age_secs),
            refresh_max_age: seconds(auth.refresh.max_age_secs),
            refresh_enabled: auth.refresh.enabled,
            refresh_only_token: auth.refresh.refresh_only_token,
            refresh_on_window_focus: auth.refresh.refresh_on_window_focus,
        }
    }
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self::from_config(&AuthConfig::default())
    }
}

fn seconds(secs: u64) -> Duration {
    let age = TokenMaxAge::from_secs(secs);
    i64::try_from(age.as_secs())
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}

/// `now + age`, saturating at the latest representable instant.
fn expiry(now: DateTime<Utc>, age: Duration) -> DateTime<Utc> {
    now.checked_add_signed(age).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Tokens held by the session provider, with their expiry instants.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenState {
    access: String,
    access_expires_at: DateTime<Utc>,
    refresh: Option<String>,
    refresh_expires_at: Option<DateTime<Utc>>,
}

impl TokenState {
    /// Records tokens returned by sign-in at `now`.
    #[must_use]
    pub fn issue(pair: TokenPair, policy: &TokenPolicy, now: DateTime<Utc>) -> Self {
        let refresh = pair.refresh_token.filter(|_| policy.refresh_enabled);
        let refresh_expires_at = refresh.as_ref().map(|_| expiry(now, policy.refresh_max_age));
        Self {
            access: pair.token,
            access_expires_at: expiry(now, policy.access_max_age),
            refresh,
            refresh_expires_at,
        }
    }

    /// Applies a refresh response received at `now`.
    ///
    /// A new refresh token replaces the old one (and restarts its lifetime)
    /// unless the policy keeps refresh tokens across refreshes.
    pub fn apply_refresh(&mut self, pair: TokenPair, policy: &TokenPolicy, now: DateTime<Utc>) {
        self.access = pair.token;
        self.access_expires_at = expiry(now, policy.access_max_age);
        if let Some(refresh) = pair.refresh_token {
            if !policy.refresh_only_token {
                self.refresh = Some(refresh);
                self.refresh_expires_at = Some(expiry(now, policy.refresh_max_age));
            }
        }
    }

    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh.as_deref()
    }

    #[must_use]
    pub fn access_expires_at(&self) -> DateTime<Utc> {
        self.access_expires_at
    }

    #[must_use]
    pub fn access_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.access_expires_at
    }

    /// True when there is no usable refresh token at `now`.
    #[must_use]
    pub fn refresh_expired(&self, now: DateTime<Utc>) -> bool {
        self.refresh_expires_at.is_none_or(|at| now >= at)
    }
}

impl fmt::Debug for TokenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenState")
            .field("access_expires_at", &self.access_expires_at)
            .field("refresh_expires_at", &self.refresh_expires_at)
            .finish_non_exhaustive()
    }
}
