//! Clap argument types and how they override loaded config.

use clap::Parser;

use fleetctl::config::Config;
use fleetctl::constants::ENV_TOKEN;
use fleetctl::output::OutputFormat;

/// Command-line client for the fleet management API.
#[derive(Parser, Debug)]
#[command(name = "fleetctl", version = fleetctl::constants::VERSION)]
pub struct Cli {
    /// Increase log verbosity on stderr (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Show the profile of the signed-in user.
    Me(MeArgs),

    /// Store an API token in the global config.
    Login(LoginArgs),

    /// Remove the stored API token from the global config.
    Logout,

    /// Inspect the resolved configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print version and build information.
    Version,
}

/// Connection overrides shared by commands that talk to the API.
#[derive(clap::Args, Debug, Default)]
pub struct ApiArgs {
    /// API root, e.g. https://fleet.example.com/api/
    #[arg(long)]
    pub base_url: Option<String>,

    /// API token (overrides the stored one).
    #[arg(long)]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

impl ApiArgs {
    /// Apply CLI flags on top of the loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref base_url) = self.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(ref token) = self.token {
            config.api.token = Some(token.clone());
        }
        if let Some(timeout) = self.timeout {
            config.api.timeout_secs = timeout;
        }
    }
}

/// Arguments for the `me` subcommand.
#[derive(Parser, Debug)]
pub struct MeArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Output format (default from config, else terminal).
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl MeArgs {
    /// Apply CLI flags on top of the loaded config.
    pub fn apply(&self, config: &mut Config) {
        self.api.apply(config);
        if let Some(format) = self.format {
            config.output.format = format;
        }
    }
}

/// Arguments for the `login` subcommand.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// The API token issued by the fleet management backend.
    #[arg(long, env = ENV_TOKEN, hide_env_values = true)]
    pub token: String,
}

/// Config inspection subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the resolved configuration (token redacted).
    Show(ApiArgs),
    /// Print the global config file path.
    Path,
}
