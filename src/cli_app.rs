//! Top-level CLI definition and dispatch.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use spm_monitor::core::config::Config;
use spm_monitor::core::errors::SpmError;
use spm_monitor::dashboard::dialogs::NoopDialogSink;
use spm_monitor::dashboard::session::DashboardSession;
use spm_monitor::dashboard::stats::MockStatsSource;
use spm_monitor::dashboard::ticker::Ticker;
use spm_monitor::dashboard::view::{ALL_VIEWS, View};

/// SPM Status Monitor: headless driver for the dashboard core.
#[derive(Debug, Parser)]
#[command(
    name = "spm",
    author,
    version,
    about = "SPM Status Monitor - headless dashboard driver",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Debug-level diagnostics on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub const fn verbose(&self) -> bool {
        self.verbose
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// List dashboard views, hotkeys and tabs.
    Views,
    /// Print the effective configuration.
    Config(ConfigArgs),
    /// Run a headless session and stream the activity log.
    Watch(WatchArgs),
}

#[derive(Debug, Clone, Args, Default)]
struct ConfigArgs {
    /// Emit JSON instead of TOML.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Args)]
struct WatchArgs {
    /// Stop after this many refresh passes.
    #[arg(long, default_value_t = 3, value_name = "N")]
    refreshes: u64,
    /// Override the refresh interval.
    #[arg(long, value_name = "MS")]
    refresh_ms: Option<u64>,
    /// Seed the mock stats generator for reproducible output.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
}

/// CLI failure classes mapped onto process exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Json(_) => 3,
        }
    }
}

impl From<SpmError> for CliError {
    fn from(value: SpmError) -> Self {
        match value {
            SpmError::InvalidConfig { .. }
            | SpmError::MissingConfig { .. }
            | SpmError::ConfigParse { .. }
            | SpmError::InvalidView { .. }
            | SpmError::InvalidTab { .. } => Self::User(value.to_string()),
            other => Self::Runtime(other.to_string()),
        }
    }
}

/// Dispatch a parsed command line.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Views => run_views(),
        Command::Config(args) => run_config(cli, args),
        Command::Watch(args) => run_watch(cli, args),
    }
}

fn run_views() -> Result<(), CliError> {
    let mut out = io::stdout().lock();
    for view in ALL_VIEWS {
        let tabs = if view.tabs().is_empty() {
            "-".to_string()
        } else {
            view.tabs().join(", ")
        };
        writeln!(out, "{}  {:<11} {}", view.number(), view.id(), tabs)?;
    }
    Ok(())
}

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    let config = Config::load(cli.config.as_deref())?;
    let rendered = if args.json {
        serde_json::to_string_pretty(&config)?
    } else {
        config.to_toml_string()?
    };
    let mut out = io::stdout().lock();
    writeln!(out, "{}", rendered.trim_end())?;
    Ok(())
}

fn run_watch(cli: &Cli, args: &WatchArgs) -> Result<(), CliError> {
    if args.refreshes == 0 {
        return Err(CliError::User("--refreshes must be at least 1".to_string()));
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(ms) = args.refresh_ms {
        config.refresh.interval_ms = ms;
        config.refresh.tick_ms = config.refresh.tick_ms.min(ms);
    }
    config.refresh.auto_start = true;
    config.validate()?;

    let source = args
        .seed
        .map_or_else(MockStatsSource::default, MockStatsSource::seeded);
    let mut session = DashboardSession::new(
        &config,
        |view: View, tab: Option<&str>| tracing::debug!(%view, ?tab, "render"),
        NoopDialogSink,
        source,
        Instant::now(),
    );
    let mut ticker = Ticker::spawn(config.refresh.tick())?;

    let mut out = io::stdout().lock();
    for line in session.log_lines().iter().rev() {
        writeln!(out, "{line}")?;
    }

    let mut passes = 0;
    while passes < args.refreshes {
        let now = ticker.recv()?;
        if session.on_tick(now) {
            passes += 1;
            if let Some(line) = session.log_lines().first() {
                writeln!(out, "{line}")?;
            }
        }
    }

    ticker.stop();
    session.teardown();
    let counters = session.counters();
    writeln!(
        out,
        "done: {} refreshes, {} failures, {} missed ticks",
        counters.refreshes, counters.refresh_failures, counters.missed_ticks
    )?;
    Ok(())
}
