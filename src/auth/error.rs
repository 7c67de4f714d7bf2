// SPDX-License-Identifier: MPL-2.0
use thiserror::Error;

/// Failures reported by the authentication backend or the session provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The backend rejected the email/password pair.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The backend rejected the access or refresh token.
    #[error("token rejected by the backend")]
    Unauthorized,

    /// The refresh token has expired; the user must sign in again.
    #[error("session expired")]
    SessionExpired,

    /// The request could not be completed (network, unexpected status).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("could not decode response: {0}")]
    Decode(String),

    /// The response lacks a value at the configured JSON pointer.
    #[error("response has no value at {0}")]
    MissingField(String),
}

impl AuthError {
    /// Message suitable for an error toast.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "Error: credenciales inválidas",
            AuthError::Unauthorized | AuthError::SessionExpired => {
                "Error: la sesión ha expirado, vuelve a iniciar sesión"
            }
            AuthError::Transport(_) => "Error: no se pudo conectar con el servidor",
            AuthError::Decode(_) | AuthError::MissingField(_) => {
                "Error: respuesta inesperada del servidor"
            }
        }
    }

    /// Whether the session can no longer be used.
    #[must_use]
    pub fn ends_session(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials | AuthError::Unauthorized | AuthError::SessionExpired
        )
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AuthError::Decode(err.to_string())
        } else {
            AuthError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::Decode(err.to_string())
    }
}
