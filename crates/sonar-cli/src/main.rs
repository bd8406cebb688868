//! Sonar address bar
//!
//! Terminal front end for the Sonar omnibox: an interactive address bar with
//! live suggestions, plus headless `suggest`, `resolve` and `verify-sites`
//! commands.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{info, warn};

use sonar_cli::app::App;
use sonar_cli::verify_cmd::VerifyArgs;
use sonar_cli::{headless, tui, verify_cmd};
use sonar_core::config::{Config, load_config};
use sonar_core::suggest::{ReferenceData, SuggestionAggregator};
use sonar_core::{CoordinatorTimings, InputCoordinator, Resolver};

#[derive(Debug, Parser)]
#[command(name = "sonar")]
#[command(version, about = "Sonar address bar", long_about = None)]
struct Cli {
    /// Popular-sites list (JSON array of {domain, title}).
    #[arg(long, global = true, env = "SONAR_SITES_PATH")]
    sites: Option<PathBuf>,

    /// Search-phrase list (JSON array of strings).
    #[arg(long, global = true, env = "SONAR_PHRASES_PATH")]
    phrases: Option<PathBuf>,

    /// Only consult the local lists.
    #[arg(long, global = true)]
    offline: bool,

    /// Remote completion endpoint.
    #[arg(long, global = true)]
    suggest_url: Option<String>,

    /// Emit JSON log lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// OTLP collector for spans and metrics (e.g. http://localhost:4317).
    #[cfg(feature = "metrics")]
    #[arg(long, global = true)]
    metrics_endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Open the interactive address bar (default)
    Tui,
    /// Print the suggestions for a query
    Suggest {
        /// Text typed into the address bar.
        query: String,
    },
    /// Print the URL that committed text navigates to
    Resolve {
        /// Text committed from the address bar.
        input: String,
    },
    /// Check the popular-sites list for dead entries
    VerifySites(VerifyArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = apply_cli_overrides(load_config()?, &cli);

    // Logs go to a file in TUI mode so they never draw over the frame.
    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    let filter = sonar_core::tracing_init::default_filter(&config.log_level);
    #[cfg(feature = "metrics")]
    let _metrics_guard = init_logging(&cli, &filter, interactive);
    #[cfg(not(feature = "metrics"))]
    init_logging(&cli, &filter, interactive);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting sonar");

    match cli.command {
        None | Some(Commands::Tui) => run_tui(&config).await?,
        Some(Commands::Suggest { query }) => {
            let aggregator = build_aggregator(&config)?;
            headless::suggest(&aggregator, &query, &mut io::stdout()).await?;
        }
        Some(Commands::Resolve { input }) => {
            let resolver = Resolver::new(&config.navigation)?;
            headless::resolve(&resolver, &input, &mut io::stdout())?;
        }
        Some(Commands::VerifySites(args)) => {
            let removed = verify_cmd::run(&args, config.data.sites_path.as_deref()).await?;
            io::stdout().flush()?;
            return Ok(ExitCode::from(verify_cmd::exit_status(removed)));
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(feature = "metrics")]
fn init_logging(
    cli: &Cli,
    filter: &str,
    interactive: bool,
) -> Option<sonar_core::metrics::MetricsGuard> {
    use sonar_core::tracing_init::init_tracing_with_metrics;
    let endpoint = cli.metrics_endpoint.as_deref();
    if interactive {
        init_tracing_with_metrics(filter, cli.log_json, log_file(), endpoint)
    } else {
        init_tracing_with_metrics(filter, cli.log_json, io::stderr, endpoint)
    }
}

#[cfg(not(feature = "metrics"))]
fn init_logging(cli: &Cli, filter: &str, interactive: bool) {
    use sonar_core::tracing_init::init_tracing;
    if interactive {
        init_tracing(filter, cli.log_json, log_file());
    } else {
        init_tracing(filter, cli.log_json, io::stderr);
    }
}

fn apply_cli_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(path) = &cli.sites {
        config.data.sites_path = Some(path.clone());
    }
    if let Some(path) = &cli.phrases {
        config.data.phrases_path = Some(path.clone());
    }
    if let Some(url) = &cli.suggest_url {
        config.suggestions.endpoint.clone_from(url);
    }
    if cli.offline {
        config.suggestions.remote_enabled = false;
    }
    config
}

fn build_aggregator(config: &Config) -> anyhow::Result<SuggestionAggregator> {
    let data = ReferenceData::load(
        config.data.phrases_path.as_deref(),
        config.data.sites_path.as_deref(),
    );
    Ok(SuggestionAggregator::from_config(&config.suggestions, data)?)
}

/// Log sink for the interactive UI: `<cache dir>/sonar/sonar.log`, or
/// nowhere when that cannot be opened.
fn log_file() -> Mutex<Box<dyn Write + Send>> {
    let file = dirs::cache_dir()
        .map(|dir| dir.join("sonar"))
        .and_then(|dir| {
            fs::create_dir_all(&dir).ok()?;
            File::options()
                .create(true)
                .append(true)
                .open(dir.join("sonar.log"))
                .ok()
        });
    match file {
        Some(file) => Mutex::new(Box::new(file)),
        None => Mutex::new(Box::new(io::sink())),
    }
}

async fn run_tui(config: &Config) -> anyhow::Result<()> {
    let aggregator = Arc::new(build_aggregator(config)?);
    let resolver = Resolver::new(&config.navigation).context("invalid navigation settings")?;
    if !config.suggestions.remote_enabled {
        warn!("Remote suggestions disabled, using local lists only");
    }

    let (nav_tx, nav_rx) = mpsc::unbounded_channel();
    let (coordinator, events) = InputCoordinator::new(
        aggregator,
        Box::new(nav_tx),
        CoordinatorTimings::from_config(&config.suggestions),
    );
    let app = App::new(coordinator, resolver);
    tui::run(app, events, nav_rx).await
}
