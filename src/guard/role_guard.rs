// SPDX-License-Identifier: MPL-2.0
//! The role guard.

use super::decision::{Decision, Denial};
use crate::config::{Config, NavigationConfig, DEFAULT_SIGN_IN_PATH};
use crate::diagnostics::{AccessEvent, AccessEventKind, DiagnosticsHandle};
use crate::domain::access::{AllowedRoles, RouteAccessTable};
use crate::domain::session::{Role, Session};
use tokio::sync::watch;

/// Where a guard reads the allowed roles from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleSource {
    /// Per-view rules; unlisted views are unrestricted.
    PerRoute(RouteAccessTable),
    /// The same set for every view, fixed when the guard is built.
    Fixed(AllowedRoles),
}

/// What the guard does with a session that is not authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthenticatedPolicy {
    /// Redirect to the sign-in view.
    RedirectToSignIn,
    /// Let the navigation through; the session provider handles sign-in.
    Delegate,
}

/// Navigation gate based on session status and role membership.
#[derive(Debug, Clone)]
pub struct RoleGuard {
    roles: RoleSource,
    unauthenticated: UnauthenticatedPolicy,
    sign_in_path: String,
    fallback_path: String,
    diagnostics: Option<DiagnosticsHandle>,
}

impl RoleGuard {
    /// Guard driven by per-view rules.
    #[must_use]
    pub fn per_route(table: RouteAccessTable, navigation: &NavigationConfig) -> Self {
        Self {
            roles: RoleSource::PerRoute(table),
            unauthenticated: UnauthenticatedPolicy::RedirectToSignIn,
            sign_in_path: navigation.sign_in_path.clone(),
            fallback_path: navigation.home_path.clone(),
            diagnostics: None,
        }
    }

    /// Per-route guard built from the `[navigation]` and `[[routes]]` config.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::per_route(config.route_table(), &config.navigation)
    }

    /// Guard admitting a fixed set of roles on every view it is attached to.
    #[must_use]
    pub fn fixed(
        roles: AllowedRoles,
        unauthenticated: UnauthenticatedPolicy,
        sign_in_path: impl Into<String>,
        fallback_path: impl Into<String>,
    ) -> Self {
        Self {
            roles: RoleSource::Fixed(roles),
            unauthenticated,
            sign_in_path: sign_in_path.into(),
            fallback_path: fallback_path.into(),
            diagnostics: None,
        }
    }

    /// Specialist-only guard: others go to `/`, anonymous users are delegated.
    #[must_use]
    pub fn specialist_only() -> Self {
        Self::fixed(
            AllowedRoles::only(Role::Specialist),
            UnauthenticatedPolicy::Delegate,
            DEFAULT_SIGN_IN_PATH,
            "/",
        )
    }

    /// Attaches a diagnostics buffer that records every refusal.
    #[must_use]
    pub fn with_diagnostics(mut self, handle: DiagnosticsHandle) -> Self {
        self.diagnostics = Some(handle);
        self
    }

    #[must_use]
    pub fn role_source(&self) -> &RoleSource {
        &self.roles
    }

    #[must_use]
    pub fn sign_in_path(&self) -> &str {
        &self.sign_in_path
    }

    #[must_use]
    pub fn fallback_path(&self) -> &str {
        &self.fallback_path
    }

    /// Roles allowed on `path`.
    #[must_use]
    pub fn allowed_roles(&self, path: &str) -> AllowedRoles {
        match &self.roles {
            RoleSource::PerRoute(table) => table.allowed_roles(path),
            RoleSource::Fixed(roles) => roles.clone(),
        }
    }

    /// Decides whether `session` may enter `target`.
    pub fn authorize(&self, target: &str, session: &Session) -> Decision {
        if session.is_loading() {
            tracing::trace!(path = target, "session loading, deferring navigation");
            return Decision::Defer;
        }

        let signed_in = session.is_authenticated() && session.data().is_some();
        if !signed_in {
            match self.unauthenticated {
                UnauthenticatedPolicy::Delegate => return Decision::Allow,
                UnauthenticatedPolicy::RedirectToSignIn if session.is_authenticated() => {
                    // Authenticated without a profile falls through to the role
                    // check with no role.
                }
                UnauthenticatedPolicy::RedirectToSignIn => {
                    tracing::debug!(path = target, status = %session.status(), "not signed in, redirecting to sign-in");
                    self.record(AccessEventKind::Unauthenticated, None, target, &self.sign_in_path);
                    return Decision::Redirect {
                        to: self.sign_in_path.clone(),
                        reason: Denial::Unauthenticated,
                    };
                }
            }
        }

        let allowed = self.allowed_roles(target);
        let role = session.role();
        if allowed.permits(role) {
            return Decision::Allow;
        }

        tracing::warn!(
            role = role.map_or("none", Role::as_str),
            path = target,
            "access denied for role"
        );
        self.record(AccessEventKind::Forbidden, role, target, &self.fallback_path);
        Decision::Redirect {
            to: self.fallback_path.clone(),
            reason: Denial::Forbidden { role },
        }
    }

    /// Waits until the session is no longer loading, then decides.
    ///
    /// If the session provider goes away while loading, the session is treated
    /// as unauthenticated.
    pub async fn authorize_when_ready(
        &self,
        target: &str,
        sessions: &mut watch::Receiver<Session>,
    ) -> Decision {
        let session = match sessions.wait_for(|s| !s.is_loading()).await {
            Ok(session) => session.clone(),
            Err(_) => Session::unauthenticated(),
        };
        self.authorize(target, &session)
    }

    fn record(&self, kind: AccessEventKind, role: Option<Role>, attempted: &str, redirected: &str) {
        if let Some(handle) = &self.diagnostics {
            handle.record(AccessEvent::new(kind, role, attempted, redirected));
        }
    }
}
