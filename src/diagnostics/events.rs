// SPDX-License-Identifier: MPL-2.0
//! Access events recorded by navigation guards.

use crate::domain::session::Role;
use chrono::{DateTime, Utc};

/// Why a navigation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessEventKind {
    /// No signed-in user; sent to the sign-in view.
    Unauthenticated,
    /// Signed-in user whose role is not allowed on the view.
    Forbidden,
}

/// A refused navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessEvent {
    pub kind: AccessEventKind,
    /// Role of the session at evaluation time.
    pub role: Option<Role>,
    /// View the user tried to enter.
    pub attempted_path: String,
    /// View the user was sent to instead.
    pub redirected_to: String,
    pub at: DateTime<Utc>,
}

impl AccessEvent {
    #[must_use]
    pub fn new(
        kind: AccessEventKind,
        role: Option<Role>,
        attempted_path: impl Into<String>,
        redirected_to: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            role,
            attempted_path: attempted_path.into(),
            redirected_to: redirected_to.into(),
            at: Utc::now(),
        }
    }
}
