// SPDX-License-Identifier: MPL-2.0
//! Authentication session as seen by navigation guards.
//!
//! A [`Session`] is produced by the session provider and handed to guards by
//! value. Guards never mutate it.

use std::fmt;
use std::str::FromStr;

/// Lifecycle status of the authentication session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum SessionStatus {
    /// The provider is still resolving the session.
    Loading,
    /// A user is signed in.
    Authenticated,
    /// No user is signed in.
    #[default]
    Unauthenticated,
}

impl SessionStatus {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Loading => "loading",
            SessionStatus::Authenticated => "authenticated",
            SessionStatus::Unauthenticated => "unauthenticated",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "loading" => Ok(SessionStatus::Loading),
            "authenticated" => Ok(SessionStatus::Authenticated),
            "unauthenticated" => Ok(SessionStatus::Unauthenticated),
            _ => Err(ParseNameError::new("session status", s)),
        }
    }
}

/// Role of a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Patient,
    Specialist,
    Admin,
}

impl Role {
    /// All roles, in display order.
    pub const ALL: [Role; 3] = [Role::Patient, Role::Specialist, Role::Admin];

    /// Returns the canonical (English) name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Specialist => "specialist",
            Role::Admin => "admin",
        }
    }

    /// Returns the name used by the backend profile endpoint.
    #[must_use]
    pub fn backend_name(self) -> &'static str {
        match self {
            Role::Patient => "paciente",
            Role::Specialist => "especialista",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseNameError;

    /// Accepts both the canonical and the backend spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "patient" | "paciente" => Ok(Role::Patient),
            "specialist" | "especialista" => Ok(Role::Specialist),
            "admin" => Ok(Role::Admin),
            _ => Err(ParseNameError::new("role", s)),
        }
    }
}

/// Error returned when a role or status name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNameError {
    what: &'static str,
    value: String,
}

impl ParseNameError {
    fn new(what: &'static str, value: &str) -> Self {
        Self {
            what,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ParseNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {:?}", self.what, self.value)
    }
}

impl std::error::Error for ParseNameError {}

/// Profile of the signed-in user, as returned by the session endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Option<Role>,
    pub avatar: Option<String>,
}

impl SessionData {
    /// Development user used before the real sign-in flow existed.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            id: "123e4567-e89b-12d3-a456-426614174000".to_string(),
            username: "juan_perez".to_string(),
            email: "juan@example.com".to_string(),
            role: Some(Role::Admin),
            avatar: None,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    #[must_use]
    pub fn is_patient(&self) -> bool {
        self.role == Some(Role::Patient)
    }

    #[must_use]
    pub fn is_specialist(&self) -> bool {
        self.role == Some(Role::Specialist)
    }
}

/// Session snapshot handed to guards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    status: SessionStatus,
    data: Option<SessionData>,
}

impl Session {
    /// A session that is still being resolved.
    #[must_use]
    pub fn loading() -> Self {
        Self {
            status: SessionStatus::Loading,
            data: None,
        }
    }

    /// No signed-in user.
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    /// A signed-in user with the given profile.
    #[must_use]
    pub fn authenticated(data: SessionData) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            data: Some(data),
        }
    }

    /// Builds a session fixture from a status and an optional role.
    ///
    /// Only authenticated sessions carry a profile; the role is dropped for
    /// the other statuses.
    #[must_use]
    pub fn with_role(status: SessionStatus, role: Option<Role>) -> Self {
        match status {
            SessionStatus::Authenticated => Self::authenticated(SessionData {
                role,
                ..SessionData::demo()
            }),
            SessionStatus::Loading => Self::loading(),
            SessionStatus::Unauthenticated => Self::unauthenticated(),
        }
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn data(&self) -> Option<&SessionData> {
        self.data.as_ref()
    }

    /// Role of the signed-in user, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.data.as_ref().and_then(|d| d.role)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Loading
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    #[must_use]
    pub fn is_patient(&self) -> bool {
        self.role() == Some(Role::Patient)
    }

    #[must_use]
    pub fn is_specialist(&self) -> bool {
        self.role() == Some(Role::Specialist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_backend_and_canonical_names() {
        assert_eq!("paciente".parse::<Role>(), Ok(Role::Patient));
        assert_eq!("Patient".parse::<Role>(), Ok(Role::Patient));
        assert_eq!("especialista".parse::<Role>(), Ok(Role::Specialist));
        assert_eq!(" admin ".parse::<Role>(), Ok(Role::Admin));
        assert!("doctor".parse::<Role>().is_err());
    }

    #[test]
    fn role_names_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
            assert_eq!(role.backend_name().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn status_parses_names() {
        assert_eq!("loading".parse::<SessionStatus>(), Ok(SessionStatus::Loading));
        assert_eq!("AUTHENTICATED".parse::<SessionStatus>(), Ok(SessionStatus::Authenticated));
        assert!("signed-in".parse::<SessionStatus>().is_err());
    }

    #[test]
    fn default_session_is_unauthenticated() {
        let session = Session::default();
        assert_eq!(session.status(), SessionStatus::Unauthenticated);
        assert!(session.role().is_none());
    }

    #[test]
    fn with_role_drops_role_unless_authenticated() {
        let loading = Session::with_role(SessionStatus::Loading, Some(Role::Admin));
        assert!(loading.is_loading());
        assert!(loading.role().is_none());

        let signed_in = Session::with_role(SessionStatus::Authenticated, Some(Role::Patient));
        assert!(signed_in.is_authenticated());
        assert!(signed_in.is_patient());
    }

    #[test]
    fn demo_user_is_admin() {
        let demo = SessionData::demo();
        assert!(demo.is_admin());
        assert!(!demo.is_patient());
        assert!(!demo.is_specialist());
        assert_eq!(demo.username, "juan_perez");
    }

    #[test]
    fn parse_error_names_the_value() {
        let err = "nurse".parse::<Role>().unwrap_err();
        assert_eq!(err.to_string(), "unknown role: \"nurse\"");
    }
}
