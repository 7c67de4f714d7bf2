// SPDX-License-Identifier: MPL-2.0
//! Authentication: backend contract, token bookkeeping and the session
//! provider that guards read from.

pub mod api;
pub mod error;
pub mod http;
pub mod mock;
pub mod session;
pub mod tokens;

pub use api::{AuthApi, Credentials, TokenPair};
pub use error::AuthError;
pub use http::HttpAuthClient;
pub use mock::MockAuthApi;
pub use session::SessionManager;
pub use tokens::{TokenPolicy, TokenState};
