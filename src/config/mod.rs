// SPDX-License-Identifier: MPL-2.0
//! This module handles the portal configuration, loaded from a
//! `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Backend base URL
//! - `[notifications]` - Toast lifetime
//! - `[navigation]` - Sign-in and fallback views
//! - `[auth]` - Authentication endpoints, token header and lifetimes
//! - `[logging]` - `tracing` filter
//! - `[[routes]]` - Roles allowed on each view
//!
//! # Path Resolution
//!
//! See [`paths`]. The backend base URL can additionally be overridden with the
//! `CLINIC_PORTAL_API_BASE` environment variable.
//!
//! # Examples
//!
//! ```no_run
//! use clinic_portal::config;
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (config, warning) = config::load();
//! if let Some(warning) = warning {
//!     eprintln!("{warning}");
//! }
//! let table = config.route_table();
//! println!("{} protected views", table.len());
//! ```

pub mod defaults;
pub mod paths;

pub use defaults::*;

use crate::domain::access::{AllowedRoles, RouteAccessTable};
use crate::domain::newtypes::{BufferCapacity, ToastLifetime};
use crate::domain::session::Role;
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

/// Environment variable overriding [`GeneralConfig::api_base`].
pub const ENV_API_BASE: &str = "CLINIC_PORTAL_API_BASE";

// =============================================================================
// Section Structs
// =============================================================================

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// Backend base URL (scheme, host and port).
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
        }
    }
}

/// Toast notification settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationsConfig {
    /// Lifetime of a toast before automatic removal (milliseconds).
    #[serde(
        default = "default_toast_lifetime_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub lifetime_ms: Option<u64>,
}

impl NotificationsConfig {
    /// Returns the clamped toast lifetime.
    #[must_use]
    pub fn lifetime(&self) -> ToastLifetime {
        self.lifetime_ms
            .map(ToastLifetime::from_millis)
            .unwrap_or_default()
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            lifetime_ms: default_toast_lifetime_ms(),
        }
    }
}

/// Navigation targets used by guards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NavigationConfig {
    /// View holding the sign-in form.
    #[serde(default = "default_sign_in_path")]
    pub sign_in_path: String,

    /// Safe view for refused authenticated users.
    #[serde(default = "default_home_path")]
    pub home_path: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            sign_in_path: default_sign_in_path(),
            home_path: default_home_path(),
        }
    }
}

/// Backend endpoint paths, relative to [`AuthConfig::base_path`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointsConfig {
    #[serde(default = "default_sign_in_endpoint")]
    pub sign_in: String,
    #[serde(default = "default_sign_out_endpoint")]
    pub sign_out: String,
    #[serde(default = "default_session_endpoint")]
    pub get_session: String,
    #[serde(default = "default_refresh_endpoint")]
    pub refresh: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            sign_in: default_sign_in_endpoint(),
            sign_out: default_sign_out_endpoint(),
            get_session: default_session_endpoint(),
            refresh: default_refresh_endpoint(),
        }
    }
}

/// Access token settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenConfig {
    /// Header carrying the access token.
    #[serde(default = "default_token_header")]
    pub header_name: String,

    /// Scheme prefixed to the token value.
    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Access token lifetime in seconds.
    #[serde(default = "default_access_max_age")]
    pub max_age_secs: u64,

    /// JSON pointer to the access token in the sign-in response.
    #[serde(default = "default_token_pointer")]
    pub sign_in_response_pointer: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            header_name: default_token_header(),
            token_type: default_token_type(),
            max_age_secs: default_access_max_age(),
            sign_in_response_pointer: default_token_pointer(),
        }
    }
}

/// Refresh token settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Keep the current refresh token when the backend only returns a new
    /// access token.
    #[serde(default = "default_true")]
    pub refresh_only_token: bool,

    /// Refresh the session whenever the window regains focus.
    #[serde(default = "default_true")]
    pub refresh_on_window_focus: bool,

    /// Refresh token lifetime in seconds.
    #[serde(default = "default_refresh_max_age")]
    pub max_age_secs: u64,

    /// JSON pointer to the refresh token in the sign-in response.
    #[serde(default = "default_refresh_token_pointer")]
    pub sign_in_response_pointer: String,

    /// JSON pointer to the new access token in the refresh response.
    #[serde(default = "default_token_pointer")]
    pub response_pointer: String,

    /// JSON pointer at which the refresh token is placed in the request body.
    #[serde(default = "default_refresh_token_pointer")]
    pub request_pointer: String,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            refresh_only_token: true,
            refresh_on_window_focus: true,
            max_age_secs: default_refresh_max_age(),
            sign_in_response_pointer: default_refresh_token_pointer(),
            response_pointer: default_token_pointer(),
            request_pointer: default_refresh_token_pointer(),
        }
    }
}

/// Authentication backend settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthConfig {
    /// Path prefix of the authentication routes.
    #[serde(default = "default_auth_base_path")]
    pub base_path: String,

    #[serde(default)]
    pub endpoints: EndpointsConfig,

    #[serde(default)]
    pub token: TokenConfig,

    #[serde(default)]
    pub refresh: RefreshConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_path: default_auth_base_path(),
            endpoints: EndpointsConfig::default(),
            token: TokenConfig::default(),
            refresh: RefreshConfig::default(),
        }
    }
}

/// Logging and diagnostics settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Number of access events kept for inspection.
    #[serde(
        default = "default_diagnostics_capacity",
        skip_serializing_if = "Option::is_none"
    )]
    pub diagnostics_capacity: Option<usize>,
}

impl LoggingConfig {
    #[must_use]
    pub fn buffer_capacity(&self) -> BufferCapacity {
        self.diagnostics_capacity
            .map(BufferCapacity::new)
            .unwrap_or_default()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            diagnostics_capacity: default_diagnostics_capacity(),
        }
    }
}

/// Roles allowed on one view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteRule {
    pub path: String,

    /// Empty means unrestricted.
    #[serde(
        default,
        serialize_with = "serialize_roles",
        deserialize_with = "deserialize_roles"
    )]
    pub roles: Vec<Role>,
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Portal configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub notifications: NotificationsConfig,

    #[serde(default)]
    pub navigation: NavigationConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<RouteRule>,
}

impl Config {
    /// Builds the route access table from the `[[routes]]` entries.
    ///
    /// Later entries for the same path replace earlier ones.
    #[must_use]
    pub fn route_table(&self) -> RouteAccessTable {
        let mut table = RouteAccessTable::new();
        for rule in &self.routes {
            table.insert(&rule.path, rule.roles.iter().copied().collect::<AllowedRoles>());
        }
        table
    }

    /// Full URL of the authentication routes (`api_base` + `auth.base_path`).
    #[must_use]
    pub fn auth_base_url(&self) -> String {
        format!(
            "{}{}",
            self.general.api_base.trim_end_matches('/'),
            self.auth.base_path
        )
    }

    /// Applies environment overrides on top of the file values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(api_base) = std::env::var(ENV_API_BASE) {
            if !api_base.is_empty() {
                self.general.api_base = api_base;
            }
        }
    }
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_toast_lifetime_ms() -> Option<u64> {
    Some(DEFAULT_TOAST_LIFETIME_MS)
}

fn default_sign_in_path() -> String {
    DEFAULT_SIGN_IN_PATH.to_string()
}

fn default_home_path() -> String {
    DEFAULT_HOME_PATH.to_string()
}

fn default_auth_base_path() -> String {
    DEFAULT_AUTH_BASE_PATH.to_string()
}

fn default_sign_in_endpoint() -> String {
    DEFAULT_SIGN_IN_ENDPOINT.to_string()
}

fn default_sign_out_endpoint() -> String {
    DEFAULT_SIGN_OUT_ENDPOINT.to_string()
}

fn default_session_endpoint() -> String {
    DEFAULT_SESSION_ENDPOINT.to_string()
}

fn default_refresh_endpoint() -> String {
    DEFAULT_REFRESH_ENDPOINT.to_string()
}

fn default_token_header() -> String {
    DEFAULT_TOKEN_HEADER.to_string()
}

fn default_token_type() -> String {
    DEFAULT_TOKEN_TYPE.to_string()
}

fn default_access_max_age() -> u64 {
    DEFAULT_ACCESS_TOKEN_MAX_AGE_SECS
}

fn default_refresh_max_age() -> u64 {
    DEFAULT_REFRESH_TOKEN_MAX_AGE_SECS
}

fn default_token_pointer() -> String {
    DEFAULT_TOKEN_POINTER.to_string()
}

fn default_refresh_token_pointer() -> String {
    DEFAULT_REFRESH_TOKEN_POINTER.to_string()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

fn default_diagnostics_capacity() -> Option<usize> {
    Some(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY)
}

fn deserialize_roles<'de, D>(deserializer: D) -> std::result::Result<Vec<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw = Vec::<String>::deserialize(deserializer)?;
    raw.iter()
        .map(|name| name.parse::<Role>().map_err(D::Error::custom))
        .collect()
}

fn serialize_roles<S>(roles: &[Role], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(roles.iter().map(|role| role.as_str()))
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

/// Returns the resolved config file path, if one can be determined.
pub fn config_path() -> Option<PathBuf> {
    get_config_path_with_override(None)
}

// =============================================================================
// Load Functions
// =============================================================================

/// A config file that exists but could not be used; defaults were loaded instead.
#[derive(Debug, Clone, thiserror::Error)]
#[error("could not load {}: {cause}", path.display())]
pub struct LoadWarning {
    pub path: PathBuf,
    pub cause: Error,
}

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a [`LoadWarning`] explaining what went wrong.
pub fn load() -> (Config, Option<LoadWarning>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<LoadWarning>) {
    let (mut config, warning) = match get_config_path_with_override(base_dir) {
        Some(path) if path.exists() => match load_from_path(&path) {
            Ok(config) => (config, None),
            Err(cause) => (Config::default(), Some(LoadWarning { path, cause })),
        },
        _ => (Config::default(), None),
    };
    config.apply_env_overrides();
    (config, warning)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.notifications.lifetime().as_millis(), 3_000);
        assert_eq!(config.navigation.sign_in_path, "/");
        assert_eq!(config.navigation.home_path, "/home");
        assert_eq!(config.auth.token.max_age_secs, 3_600);
        assert_eq!(config.auth.refresh.max_age_secs, 604_800);
        assert!(config.auth.refresh.refresh_on_window_focus);
        assert!(config.routes.is_empty());
    }

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let mut config = Config::default();
        config.general.api_base = "https://api.clinica.test".to_string();
        config.notifications.lifetime_ms = Some(4_000);
        config.navigation.home_path = "/inicio".to_string();
        config.routes = vec![
            RouteRule {
                path: "/admin".to_string(),
                roles: vec![Role::Admin],
            },
            RouteRule {
                path: "/agenda".to_string(),
                roles: vec![Role::Specialist, Role::Admin],
            },
        ];

        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let result = load_from_path(&config_path);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn load_with_override_from_empty_directory_returns_default() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert!(warning.is_none());
        assert_eq!(config.navigation, NavigationConfig::default());
    }

    #[test]
    fn load_with_override_from_corrupted_file_returns_default_with_warning() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "[routes\nbroken")
            .expect("failed to write corrupted config");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        let warning = warning.expect("corrupt file is reported");
        assert_eq!(warning.path, temp_dir.path().join(CONFIG_FILE));
        assert!(matches!(warning.cause, Error::Config(_)));
        assert!(warning.to_string().starts_with("could not load "));
        assert!(config.routes.is_empty());
    }

    #[test]
    fn partial_sections_fall_back_to_defaults() {
        let content = r#"
[navigation]
home_path = "/panel"

[auth.token]
max_age_secs = 900
"#;
        let config: Config = toml::from_str(content).expect("valid toml");
        assert_eq!(config.navigation.home_path, "/panel");
        assert_eq!(config.navigation.sign_in_path, "/");
        assert_eq!(config.auth.token.max_age_secs, 900);
        assert_eq!(config.auth.token.header_name, "Authorization");
        assert_eq!(config.auth.endpoints.get_session, "/user/profile");
    }

    #[test]
    fn routes_accept_backend_role_names() {
        let content = r#"
[[routes]]
path = "/especialista/agenda"
roles = ["especialista"]

[[routes]]
path = "/citas"
roles = ["paciente", "admin"]

[[routes]]
path = "/home"
"#;
        let config: Config = toml::from_str(content).expect("valid toml");
        let table = config.route_table();
        assert_eq!(table.len(), 3);
        assert!(table
            .allowed_roles("/especialista/agenda")
            .permits(Some(Role::Specialist)));
        assert!(!table.allowed_roles("/citas").permits(Some(Role::Specialist)));
        assert!(table.allowed_roles("/home").is_unrestricted());
    }

    #[test]
    fn unknown_role_is_rejected() {
        let content = r#"
[[routes]]
path = "/admin"
roles = ["superuser"]
"#;
        let result = toml::from_str::<Config>(content);
        assert!(result.is_err());
    }

    #[test]
    fn auth_base_url_joins_without_double_slash() {
        let mut config = Config::default();
        config.general.api_base = "https://api.clinica.test/".to_string();
        assert_eq!(
            config.auth_base_url(),
            "https://api.clinica.test/autenticacionRoutes"
        );
    }

    #[test]
    fn notification_lifetime_is_clamped() {
        let config = NotificationsConfig {
            lifetime_ms: Some(10),
        };
        assert_eq!(config.lifetime().as_millis(), MIN_TOAST_LIFETIME_MS);
    }

    #[test]
    fn save_with_override_and_load_with_override_round_trip() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let base = temp_dir.path().join("portal");
        let mut config = Config::default();
        config.logging.filter = "clinic_portal=debug".to_string();

        save_with_override(&config, Some(base.clone())).expect("save should succeed");
        let (loaded, warning) = load_with_override(Some(base));
        assert!(warning.is_none());
        assert_eq!(loaded.logging.filter, "clinic_portal=debug");
    }
}
