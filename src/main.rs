#![forbid(unsafe_code)]

//! spm: SPM Status Monitor CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli_app;

fn main() {
    let args = cli_app::Cli::parse();
    init_tracing(args.verbose());
    if let Err(e) = cli_app::run(&args) {
        eprintln!("spm: {e}");
        std::process::exit(e.exit_code());
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
