//! fleetctl — command-line client for the fleet management API.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use fleetctl::config;
use fleetctl::constants;
use fleetctl::env;

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::args::{ApiArgs, Cli, Command, ConfigAction, LoginArgs, MeArgs};
use config::Config;
use env::Env;
use fleetctl::{HttpDispatcher, UserProfileRequester};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        if let Some(hint) = cli::hint_for(&err) {
            eprintln!("{hint}");
        }
        process::exit(1);
    }
}

/// Log to stderr so stdout stays clean for `--format json`.
///
/// `-v` flags win over `FLEETCTL_LOG`; without either only warnings show.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(constants::ENV_LOG).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("fleetctl=debug,warn"),
        _ => EnvFilter::new("trace"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Me(args) => run_me(args).await,
        Command::Login(args) => run_login(args),
        Command::Logout => run_logout(),
        Command::Config { action } => run_config(action),
        Command::Version => run_version(),
    }
}

/// Load layered config for the current directory.
fn load_config() -> Result<Config> {
    let work_dir = std::env::current_dir().ok();
    Config::load(work_dir.as_deref(), &Env::real()).context("failed to load configuration")
}

/// Fetch and print the signed-in user's profile.
async fn run_me(args: MeArgs) -> Result<()> {
    let mut config = load_config()?;
    args.apply(&mut config);
    debug!(?config, "resolved configuration");

    let dispatcher = HttpDispatcher::new(&config.api).context("failed to set up the API client")?;
    let requester = UserProfileRequester::new(dispatcher);
    let profile = requester
        .get_myself()
        .await
        .context("failed to fetch the current user")?;

    println!("{}", config.output.format.render(&profile));
    Ok(())
}

fn global_config_path() -> Result<std::path::PathBuf> {
    Config::global_config_path().context("could not determine the global config directory")
}

/// Store a token in the global config.
fn run_login(args: LoginArgs) -> Result<()> {
    use colored::Colorize;

    let token = args.token.trim();
    if token.is_empty() {
        anyhow::bail!("the token must not be empty");
    }
    let path = global_config_path()?;
    Config::save_token(&path, token).context("failed to store the token")?;

    println!(
        "  {} Token saved to {}",
        "✔".green().bold(),
        path.display()
    );
    Ok(())
}

/// Remove the stored token from the global config.
fn run_logout() -> Result<()> {
    use colored::Colorize;

    let path = global_config_path()?;
    let removed = Config::clear_token(&path).context("failed to remove the token")?;
    if removed {
        println!("  {} Token removed.", "✔".green().bold());
    } else {
        println!("  No token stored in {}.", path.display());
    }
    Ok(())
}

fn run_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show(api) => show_config(&api),
        ConfigAction::Path => {
            println!("{}", global_config_path()?.display());
            Ok(())
        }
    }
}

/// Print the resolved configuration as TOML, token redacted.
fn show_config(api: &ApiArgs) -> Result<()> {
    let mut config = load_config()?;
    api.apply(&mut config);
    let rendered =
        toml::to_string_pretty(&config.redacted()).context("failed to render configuration")?;
    print!("{rendered}");
    Ok(())
}

/// Print detailed version and build information.
fn run_version() -> Result<()> {
    use colored::Colorize;

    println!(
        "{} {}",
        constants::APP_NAME.bold(),
        constants::VERSION.green().bold()
    );
    println!("{}     {}", "target:".dimmed(), constants::TARGET);
    Ok(())
}
