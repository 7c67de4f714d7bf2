// SPDX-License-Identifier: MPL-2.0
//! Contract of the authentication backend.

use super::error::AuthError;
use crate::domain::session::{Role, SessionData};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Email/password pair submitted by the sign-in form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Tokens returned by sign-in and refresh.
///
/// `refresh_token` is absent when refresh is disabled, or when a refresh
/// response only carries a new access token.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: Option<String>,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("token", &"***")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Authentication backend.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchanges credentials for tokens.
    async fn sign_in(&self, credentials: &Credentials) -> Result<TokenPair, AuthError>;

    /// Reads the profile of the user owning `token`.
    async fn get_session(&self, token: &str) -> Result<SessionData, AuthError>;

    /// Exchanges a refresh token for a new access token.
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;

    /// Invalidates `token` on the backend.
    async fn sign_out(&self, token: &str) -> Result<(), AuthError>;
}

/// Profile body returned by the session endpoint.
///
/// The backend uses Spanish field names; the English spellings are accepted
/// as well.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ProfilePayload {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(alias = "usuario")]
    username: String,
    #[serde(alias = "correo")]
    email: String,
    #[serde(default, alias = "rol")]
    role: Option<String>,
    #[serde(default, alias = "imagen")]
    avatar: Option<String>,
}

impl From<ProfilePayload> for SessionData {
    fn from(payload: ProfilePayload) -> Self {
        let role = payload.role.as_deref().and_then(|name| match name.parse::<Role>() {
            Ok(role) => Some(role),
            Err(err) => {
                tracing::warn!(%err, "profile carries an unknown role, treating it as none");
                None
            }
        });
        SessionData {
            id: payload.id,
            username: payload.username,
            email: payload.email,
            role,
            avatar: payload.avatar,
        }
    }
}

/// Decodes a profile JSON body.
pub(crate) fn decode_profile(body: serde_json::Value) -> Result<SessionData, AuthError> {
    let payload: ProfilePayload = serde_json::from_value(body)?;
    Ok(payload.into())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("invalid id: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_backend_profile() {
        let body = json!({
            "id": "123e4567-e89b-12d3-a456-426614174000",
            "usuario": "ana_medina",
            "correo": "ana@ejemplo.com",
            "rol": "especialista",
            "imagen": null
        });
        let data = decode_profile(body).expect("valid profile");
        assert_eq!(data.username, "ana_medina");
        assert_eq!(data.email, "ana@ejemplo.com");
        assert_eq!(data.role, Some(Role::Specialist));
        assert!(data.avatar.is_none());
    }

    #[test]
    fn decodes_english_profile_with_numeric_id() {
        let body = json!({
            "id": 42,
            "username": "maria",
            "email": "maria@ejemplo.com",
            "role": "patient",
            "avatar": "https://cdn.ejemplo.com/maria.png"
        });
        let data = decode_profile(body).expect("valid profile");
        assert_eq!(data.id, "42");
        assert!(data.is_patient());
        assert_eq!(data.avatar.as_deref(), Some("https://cdn.ejemplo.com/maria.png"));
    }

    #[test]
    fn unknown_role_becomes_none() {
        let body = json!({
            "id": "1",
            "usuario": "x",
            "correo": "x@ejemplo.com",
            "rol": "recepcionista"
        });
        let data = decode_profile(body).expect("valid profile");
        assert!(data.role.is_none());
    }

    #[test]
    fn missing_username_is_a_decode_error() {
        let body = json!({ "id": "1", "correo": "x@ejemplo.com" });
        assert!(matches!(decode_profile(body), Err(AuthError::Decode(_))));
    }

    #[test]
    fn debug_redacts_secrets() {
        let creds = Credentials::new("paciente@ejemplo.com", "password123");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("paciente@ejemplo.com"));
        assert!(!rendered.contains("password123"));

        let pair = TokenPair {
            token: "abc.def".into(),
            refresh_token: Some("refresh-secret".into()),
        };
        let rendered = format!("{pair:?}");
        assert!(!rendered.contains("abc.def"));
        assert!(!rendered.contains("refresh-secret"));
    }
}
