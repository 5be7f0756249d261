//! Sponsors CLI
//!
//! Queries the sponsors API and exercises the session cache from the command line.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sponsors_client::SponsorsApiClient;
use sponsors_core::constants::{ENV_API_TIMEOUT, ENV_API_URL};
use sponsors_core::types::{SponsorInfo, UserId};
use sponsors_manager::{SponsorsConfig, SponsorsManager};

/// Sponsors - per-session sponsor metadata
#[derive(Parser)]
#[command(name = "sponsors")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one user's sponsor record straight from the API
    Fetch {
        /// User id (UUID)
        user_id: UserId,
        /// Print the record as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        api: ApiArgs,
    },

    /// Run a connect, lookup, disconnect cycle through the session cache
    Session {
        /// User id (UUID)
        user_id: UserId,
        #[command(flatten)]
        api: ApiArgs,
    },
}

/// Sponsors API settings; unset flags fall back to the environment and `.env`.
#[derive(Args)]
struct ApiArgs {
    /// Sponsors API base URL
    #[arg(long, env = ENV_API_URL)]
    api_url: Option<String>,
    /// Request timeout in seconds
    #[arg(long, env = ENV_API_TIMEOUT)]
    timeout: Option<u64>,
}

impl ApiArgs {
    fn into_config(self) -> Result<SponsorsConfig> {
        let mut config = SponsorsConfig::from_env().context("Invalid sponsors configuration")?;
        if let Some(url) = self.api_url {
            config.api_url = url;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_seconds = timeout;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "sponsors=debug,info"
    } else {
        "sponsors=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Fetch { user_id, json, api } => cmd_fetch(user_id, json, api.into_config()?).await,
        Commands::Session { user_id, api } => cmd_session(user_id, api.into_config()?).await,
    }
}

/// Fetch a record from the API
async fn cmd_fetch(user_id: UserId, json: bool, config: SponsorsConfig) -> Result<()> {
    if !config.is_enabled() {
        anyhow::bail!("No sponsors API URL configured (set SPONSORS_API_URL or pass --api-url)");
    }

    println!("{} {}", "🔍 Fetching sponsor record for:".cyan().bold(), user_id);
    debug!(api_url = %config.api_url, timeout = config.timeout_seconds, "Using sponsors API");

    let client = SponsorsApiClient::with_config(config.client_config())?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    spinner.set_message(SponsorsApiClient::sponsor_url(&config.api_url, user_id));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = client.get_sponsor(&config.api_url, user_id).await;
    spinner.finish_and_clear();

    match result.context("Failed to fetch sponsor record")? {
        Some(info) if json => println!("{}", serde_json::to_string_pretty(&info)?),
        Some(info) => print_record(&info),
        None => println!("\n{}", "➖ No sponsor record (404)".yellow()),
    }

    Ok(())
}

/// Simulate one session through the manager
async fn cmd_session(user_id: UserId, config: SponsorsConfig) -> Result<()> {
    println!("{} {}", "🔌 Simulating session for:".cyan().bold(), user_id);
    if !config.is_enabled() {
        println!("   {}", "Sponsors API URL not set, fetching disabled".dimmed());
    }

    let (manager, _api_url) = SponsorsManager::from_config(&config)?;

    manager.on_connecting(user_id).await;
    println!("\n{}", "After connect:".yellow().bold());
    match manager.lookup(user_id) {
        Some(info) => print_record(&info),
        None => println!("   {}", "no cached sponsor info".dimmed()),
    }

    let stats = manager.stats();
    println!(
        "   {} {} session(s), {} sponsor(s)",
        "Cache:".dimmed(),
        stats.open_sessions,
        stats.cached_sponsors
    );

    manager.on_disconnect(user_id);
    println!("\n{}", "After disconnect:".yellow().bold());
    match manager.lookup(user_id) {
        Some(_) => println!("   {}", "❌ record still cached".red()),
        None => println!("   {}", "✅ cache entry removed".green()),
    }

    Ok(())
}

fn print_record(info: &SponsorInfo) {
    let title = if info.is_sponsor() {
        "✅ Sponsor record:".green().bold()
    } else {
        "➖ Record without tier (not a sponsor):".yellow().bold()
    };
    println!("\n{}", title);
    println!("   {} {}", "Tier:".dimmed(), display_opt(info.tier));
    println!("   {} {}", "OOC color:".dimmed(), display_opt(info.ooc_color.as_deref()));
    println!("   {} {}", "Priority join:".dimmed(), info.have_priority_join);
    println!("   {} {}", "Neko name:".dimmed(), display_opt(info.neko_char_name.as_deref()));
}

fn display_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_api_args_read_environment() {
        let cli = Cli::command();
        for sub in ["fetch", "session"] {
            let sub = cli.find_subcommand(sub).unwrap();
            let env_of = |id: &str| {
                sub.get_arguments()
                    .find(|a| a.get_id() == id)
                    .and_then(|a| a.get_env())
                    .map(|e| e.to_string_lossy().into_owned())
            };
            assert_eq!(env_of("api_url").as_deref(), Some(ENV_API_URL));
            assert_eq!(env_of("timeout").as_deref(), Some(ENV_API_TIMEOUT));
        }
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "sponsors",
            "fetch",
            "8b1a9953-c461-4d8c-a4f6-2a6f4e5e4b17",
            "--api-url",
            "http://sponsors.test",
            "--timeout",
            "7",
        ])
        .unwrap();

        let Commands::Fetch { user_id, api, .. } = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(user_id.to_string(), "8b1a9953-c461-4d8c-a4f6-2a6f4e5e4b17");

        let config = api.into_config().unwrap();
        assert_eq!(config.api_url, "http://sponsors.test");
        assert_eq!(config.timeout_seconds, 7);
    }
}
