//! config command - print the layered resolver configuration.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::path::PathBuf;

use modsolve::config::ConfigSource;
use modsolve::ResolverConfig;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Instance directory holding modsolve.json
    #[arg(short = 'd', long, default_value = ".")]
    pub working_dir: PathBuf,

    /// Print the configuration as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ConfigArgs) -> Result<i32> {
    let working_dir = args
        .working_dir
        .canonicalize()
        .context("Failed to resolve working directory")?;

    let config = ResolverConfig::build(Some(&working_dir), true)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(0);
    }

    let workers = match config.workers {
        Some(n) if n > 0 => n.to_string(),
        _ => format!("{} (automatic)", config.worker_count()),
    };
    let rows = [
        ("discovery-timeout", format!("{}s", config.discovery_timeout)),
        ("workers", workers),
        ("environment", config.environment.to_string()),
        ("metadata-file", config.metadata_file.clone()),
    ];

    for (key, value) in rows {
        let source = config.get_source(key).unwrap_or(&ConfigSource::Default);
        println!(
            "{} = {} {}",
            style(key).cyan(),
            value,
            style(format!("({})", source.as_str())).dim()
        );
    }

    Ok(0)
}
