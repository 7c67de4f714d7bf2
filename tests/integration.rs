// SPDX-License-Identifier: MPL-2.0
use clinic_portal::config::{self, Config};
use clinic_portal::diagnostics::{AccessEventKind, DiagnosticsHandle};
use clinic_portal::domain::newtypes::BufferCapacity;
use clinic_portal::domain::session::{Role, Session, SessionStatus};
use clinic_portal::guard::{Decision, Denial, RoleGuard};
use std::fs;
use tempfile::tempdir;

const CLINIC_SETTINGS: &str = r#"
[navigation]
sign_in_path = "/"
home_path = "/home"

[[routes]]
path = "/admin"
roles = ["admin"]

[[routes]]
path = "/agenda"
roles = ["especialista", "admin"]

[[routes]]
path = "/citas"
roles = ["paciente"]
"#;

fn clinic_config() -> Config {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");
    fs::write(&path, CLINIC_SETTINGS).expect("Failed to write config file");
    config::load_from_path(&path).expect("Failed to load config")
}

#[test]
fn test_config_routes_drive_the_guard() {
    let config = clinic_config();
    let guard = RoleGuard::from_config(&config);

    let patient = Session::with_role(SessionStatus::Authenticated, Some(Role::Patient));
    let specialist = Session::with_role(SessionStatus::Authenticated, Some(Role::Specialist));
    let admin = Session::with_role(SessionStatus::Authenticated, Some(Role::Admin));

    assert_eq!(guard.authorize("/citas", &patient), Decision::Allow);
    assert_eq!(guard.authorize("/agenda", &specialist), Decision::Allow);
    assert_eq!(guard.authorize("/admin", &admin), Decision::Allow);
    assert_eq!(guard.authorize("/home", &patient), Decision::Allow);

    assert_eq!(
        guard.authorize("/admin", &patient),
        Decision::Redirect {
            to: "/home".to_string(),
            reason: Denial::Forbidden {
                role: Some(Role::Patient)
            },
        }
    );
    assert_eq!(
        guard.authorize("/agenda/", &patient).redirect_target(),
        Some("/home")
    );
}

#[test]
fn test_anonymous_visitor_is_sent_to_sign_in() {
    let config = clinic_config();
    let guard = RoleGuard::from_config(&config);

    let decision = guard.authorize("/citas", &Session::unauthenticated());
    assert_eq!(
        decision,
        Decision::Redirect {
            to: "/".to_string(),
            reason: Denial::Unauthenticated,
        }
    );
    assert_eq!(guard.authorize("/citas", &Session::loading()), Decision::Defer);
}

#[test]
fn test_refusals_are_kept_in_diagnostics() {
    let config = clinic_config();
    let diagnostics = DiagnosticsHandle::new(BufferCapacity::new(16));
    let guard = RoleGuard::from_config(&config).with_diagnostics(diagnostics.clone());

    let patient = Session::with_role(SessionStatus::Authenticated, Some(Role::Patient));
    guard.authorize("/admin", &patient);
    guard.authorize("/citas", &Session::unauthenticated());
    guard.authorize("/citas", &patient);

    let events = diagnostics.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, AccessEventKind::Forbidden);
    assert_eq!(events[0].attempted_path, "/admin");
    assert_eq!(events[1].kind, AccessEventKind::Unauthenticated);
    assert_eq!(events[1].redirected_to, "/");
}

#[test]
fn test_saved_routes_survive_reload() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");

    let original = clinic_config();
    config::save_to_path(&original, &path).expect("Failed to save config");
    let reloaded = config::load_from_path(&path).expect("Failed to reload config");

    assert_eq!(reloaded.routes, original.routes);
    assert_eq!(
        reloaded.route_table().allowed_roles("/agenda"),
        original.route_table().allowed_roles("/agenda")
    );
}

#[test]
fn test_missing_config_falls_back_to_defaults() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let (config, warning) = config::load_with_override(Some(dir.path().to_path_buf()));
    assert!(warning.is_none());
    assert_eq!(config.navigation, Config::default().navigation);
    assert!(config.routes.is_empty());
}

#[test]
fn test_corrupt_config_yields_warning() {
    let dir = tempdir().expect("Failed to create temporary directory");
    fs::write(dir.path().join("settings.toml"), "[[routes]\npath =").expect("write");

    let (config, warning) = config::load_with_override(Some(dir.path().to_path_buf()));
    let warning = warning.expect("corrupt file is reported");
    assert_eq!(warning.path, dir.path().join("settings.toml"));
    assert!(warning.to_string().contains("settings.toml"));
    assert!(config.routes.is_empty());
}
