// SPDX-License-Identifier: MPL-2.0
use clinic_portal::auth::{AuthApi, Credentials, HttpAuthClient, MockAuthApi, SessionManager};
use clinic_portal::config::{self, paths, Config};
use clinic_portal::diagnostics::DiagnosticsHandle;
use clinic_portal::domain::session::{Role, Session, SessionStatus};
use clinic_portal::guard::{Decision, RoleGuard};
use clinic_portal::notifications::ToastService;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
clinic-portal

USAGE:
  clinic-portal [--config-dir DIR] <COMMAND>

COMMANDS:
  authorize --path PATH [--status STATUS] [--role ROLE] [--specialist-only]
      Evaluate a navigation. STATUS is loading, authenticated or
      unauthenticated (default: authenticated when --role is given).
  sign-in --email EMAIL --password PASSWORD [--path PATH] [--remote]
      Sign in against the demo backend (or the configured backend with
      --remote) and optionally evaluate PATH for the resulting session.
  routes        List the configured route restrictions
  config-path   Print the resolved config file path
  init-config [--force]
      Write a settings.toml with default values (--force overwrites an
      existing file).

OPTIONS:
  --config-dir DIR  Read settings.toml from DIR
  -h, --help        Print this help
";

struct AuthorizeArgs {
    path: String,
    status: Option<SessionStatus>,
    role: Option<Role>,
    specialist_only: bool,
}

struct SignInArgs {
    email: String,
    password: String,
    path: Option<String>,
    remote: bool,
}

enum Command {
    Authorize(AuthorizeArgs),
    SignIn(SignInArgs),
    Routes,
    ConfigPath,
    InitConfig { force: bool },
    Help,
}

fn parse_args() -> Result<Command, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        return Ok(Command::Help);
    }

    paths::init_cli_override(args.opt_value_from_str("--config-dir")?);

    let command = match args.subcommand()?.as_deref() {
        Some("authorize") => Command::Authorize(AuthorizeArgs {
            path: args.value_from_str("--path")?,
            status: args.opt_value_from_str("--status")?,
            role: args.opt_value_from_str("--role")?,
            specialist_only: args.contains("--specialist-only"),
        }),
        Some("sign-in") => Command::SignIn(SignInArgs {
            email: args.value_from_str("--email")?,
            password: args.value_from_str("--password")?,
            path: args.opt_value_from_str("--path")?,
            remote: args.contains("--remote"),
        }),
        Some("routes") => Command::Routes,
        Some("config-path") => Command::ConfigPath,
        Some("init-config") => Command::InitConfig {
            force: args.contains("--force"),
        },
        _ => Command::Help,
    };

    let rest = args.finish();
    if !rest.is_empty() {
        eprintln!("Warning: unused arguments left: {rest:?}");
    }
    Ok(command)
}

fn init_config(force: bool) -> ExitCode {
    let Some(path) = config::config_path() else {
        eprintln!("config directory could not be determined");
        return ExitCode::FAILURE;
    };
    if path.exists() && !force {
        eprintln!("{} already exists (use --force to overwrite)", path.display());
        return ExitCode::FAILURE;
    }
    match config::save(&Config::default()) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "default configuration written");
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.filter.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn authorize(config: &Config, args: AuthorizeArgs) -> ExitCode {
    let diagnostics = DiagnosticsHandle::new(config.logging.buffer_capacity());
    let guard = if args.specialist_only {
        RoleGuard::specialist_only()
    } else {
        RoleGuard::from_config(config)
    }
    .with_diagnostics(diagnostics.clone());

    let status = args.status.unwrap_or(if args.role.is_some() {
        SessionStatus::Authenticated
    } else {
        SessionStatus::Unauthenticated
    });
    let session = Session::with_role(status, args.role);

    let decision = guard.authorize(&args.path, &session);
    println!("{decision}");
    for event in diagnostics.events() {
        tracing::debug!(?event, "recorded access event");
    }

    exit_code(&decision)
}

fn exit_code(decision: &Decision) -> ExitCode {
    match decision {
        Decision::Allow => ExitCode::SUCCESS,
        Decision::Defer => ExitCode::from(3),
        Decision::Redirect { .. } => ExitCode::from(2),
    }
}

async fn sign_in(config: &Config, args: SignInArgs) -> ExitCode {
    let api: Arc<dyn AuthApi> = if args.remote {
        match HttpAuthClient::from_config(config) {
            Ok(client) => Arc::new(client),
            Err(err) => {
                eprintln!("Error: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        Arc::new(MockAuthApi::demo())
    };
    let manager = SessionManager::from_config(api, config);
    let toasts = ToastService::new(config.notifications.lifetime());

    match manager.sign_in(&Credentials::new(args.email, args.password)).await {
        Ok(data) => toasts.success(format!("Bienvenido, {}", data.username)),
        Err(err) => toasts.error(err.user_message()),
    };
    for toast in toasts.active() {
        println!("[{}] {}", toast.kind(), toast.message());
    }

    let Some(path) = args.path else {
        return if manager.current().is_authenticated() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    };
    let guard = RoleGuard::from_config(config);
    let mut sessions = manager.subscribe();
    let decision = guard.authorize_when_ready(&path, &mut sessions).await;
    println!("{decision}");
    exit_code(&decision)
}

fn list_routes(config: &Config) {
    let table = config.route_table();
    if table.is_empty() {
        println!("no restricted routes");
        return;
    }
    for (path, roles) in table.iter() {
        let names: Vec<&str> = roles.iter().map(Role::as_str).collect();
        if names.is_empty() {
            println!("{path}\tany");
        } else {
            println!("{path}\t{}", names.join(","));
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let command = match parse_args() {
        Ok(command) => command,
        Err(err) => {
            eprintln!("Error: {err}");
            eprintln!("{HELP}");
            return ExitCode::FAILURE;
        }
    };

    let (config, warning) = config::load();
    init_logging(&config);
    if let Some(warning) = warning {
        tracing::warn!(path = %warning.path.display(), cause = %warning.cause, "configuration could not be read, defaults in use");
    }

    match command {
        Command::Authorize(args) => authorize(&config, args),
        Command::SignIn(args) => sign_in(&config, args).await,
        Command::Routes => {
            list_routes(&config);
            ExitCode::SUCCESS
        }
        Command::ConfigPath => {
            match config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("config directory could not be determined"),
            }
            ExitCode::SUCCESS
        }
        Command::InitConfig { force } => init_config(force),
        Command::Help => {
            print!("{HELP}");
            ExitCode::SUCCESS
        }
    }
}
