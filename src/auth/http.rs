// SPDX-License-Identifier: MPL-2.0
//! HTTP client for the authentication routes.
//!
//! Tokens are located in response bodies with JSON pointers (RFC 6901) taken
//! from the `[auth]` configuration, so the client adapts to the backend's
//! body layout without code changes.

use super::api::{decode_profile, AuthApi, Credentials, TokenPair};
use super::error::AuthError;
use crate::config::{AuthConfig, Config};
use crate::domain::session::SessionData;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Map, Value};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct HttpAuthClient {
    client: Client,
    base_url: String,
    auth: AuthConfig,
}

impl HttpAuthClient {
    /// Creates a client for the routes under `base_url`.
    pub fn new(base_url: impl Into<String>, auth: &AuthConfig) -> Result<Self, AuthError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth: auth.clone(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AuthError> {
        Self::new(config.auth_base_url(), &config.auth)
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    fn bearer(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        let value = if self.auth.token.token_type.is_empty() {
            token.to_string()
        } else {
            format!("{} {}", self.auth.token.token_type, token)
        };
        request.header(self.auth.token.header_name.as_str(), value)
    }

    async fn json_body(response: Response, on_rejected: AuthError) -> Result<Value, AuthError> {
        let response = check_status(response, on_rejected)?;
        Ok(response.json::<Value>().await?)
    }
}

fn check_status(response: Response, on_rejected: AuthError) -> Result<Response, AuthError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(on_rejected),
        status => Err(AuthError::Transport(format!("HTTP status: {status}"))),
    }
}

/// Reads the string at `pointer` in `body`.
pub(crate) fn extract_pointer(body: &Value, pointer: &str) -> Result<String, AuthError> {
    match body.pointer(pointer) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(AuthError::MissingField(pointer.to_string())),
    }
}

/// Builds a JSON object holding `value` at `pointer`.
///
/// `"/refreshToken"` yields `{"refreshToken": value}`; nested pointers build
/// nested objects. The empty pointer yields `value` itself.
pub(crate) fn body_at_pointer(pointer: &str, value: &str) -> Value {
    let segments: Vec<String> = pointer
        .split('/')
        .skip(1)
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect();

    segments
        .iter()
        .rev()
        .fold(Value::String(value.to_string()), |inner, key| {
            let mut map = Map::new();
            map.insert(key.clone(), inner);
            Value::Object(map)
        })
}

#[async_trait]
impl AuthApi for HttpAuthClient {
    async fn sign_in(&self, credentials: &Credentials) -> Result<TokenPair, AuthError> {
        let response = self
            .client
            .post(self.url(&self.auth.endpoints.sign_in))
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password,
            }))
            .send()
            .await?;
        let body = Self::json_body(response, AuthError::InvalidCredentials).await?;

        let token = extract_pointer(&body, &self.auth.token.sign_in_response_pointer)?;
        let refresh_token = if self.auth.refresh.enabled {
            extract_pointer(&body, &self.auth.refresh.sign_in_response_pointer).ok()
        } else {
            None
        };
        Ok(TokenPair {
            token,
            refresh_token,
        })
    }

    async fn get_session(&self, token: &str) -> Result<SessionData, AuthError> {
        let request = self.client.get(self.url(&self.auth.endpoints.get_session));
        let response = self.bearer(request, token).send().await?;
        let body = Self::json_body(response, AuthError::Unauthorized).await?;
        decode_profile(body)
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let response = self
            .client
            .post(self.url(&self.auth.endpoints.refresh))
            .json(&body_at_pointer(&self.auth.refresh.request_pointer, refresh_token))
            .send()
            .await?;
        let body = Self::json_body(response, AuthError::Unauthorized).await?;

        let token = extract_pointer(&body, &self.auth.refresh.response_pointer)?;
        let refresh_token = if self.auth.refresh.refresh_only_token {
            None
        } else {
            extract_pointer(&body, &self.auth.refresh.sign_in_response_pointer).ok()
        };
        Ok(TokenPair {
            token,
            refresh_token,
        })
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let request = self.client.post(self.url(&self.auth.endpoints.sign_out));
        let response = self.bearer(request, token).send().await?;
        check_status(response, AuthError::Unauthorized)?;
        Ok(())
    }
}
