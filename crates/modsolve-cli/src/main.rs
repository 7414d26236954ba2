mod check_id;
mod config;
mod resolve;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "modsolve")]
#[command(about = "Discover mods and resolve a consistent set of versions")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Discover mods and print the resolved set in load order
    Resolve(resolve::ResolveArgs),

    /// Check mod ids against the naming rules
    #[command(name = "check-id")]
    CheckId(check_id::CheckIdArgs),

    /// Show the effective configuration and where each value comes from
    Config(config::ConfigArgs),
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run() -> Result<i32> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    match args.command {
        Commands::Resolve(resolve_args) => {
            let rt = tokio::runtime::Runtime::new()
                .map_err(|e| anyhow::anyhow!("Failed to create async runtime: {}", e))?;
            rt.block_on(resolve::execute(resolve_args))
        }
        Commands::CheckId(check_args) => check_id::execute(check_args),
        Commands::Config(config_args) => config::execute(config_args),
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("Error: {}", e);
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {}", cause);
            }
            ExitCode::FAILURE
        }
    }
}
