//! Resolve command - discover mods and print the chosen set.

use anyhow::{bail, Context, Result};
use clap::Args;
use console::style;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

use modsolve::{
    BuiltinPackage, CandidateFinder, DirectoryCandidateFinder, Environment, ModResolver,
    PackageMetadata, PathCandidateFinder, ResolutionResult, ResolverConfig, ResolverError,
};

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Extra mod archives or exploded mod directories to load
    pub paths: Vec<PathBuf>,

    /// Mods directory to scan (defaults to <working-dir>/mods when no paths are given)
    #[arg(short = 'm', long)]
    pub mods_dir: Option<PathBuf>,

    /// Mod supplied by the runtime itself, e.g. minecraft@1.20.1
    #[arg(short = 'b', long = "builtin", value_name = "ID@VERSION")]
    pub builtins: Vec<String>,

    /// Only load mods for this side (client, server or *)
    #[arg(short = 'e', long)]
    pub environment: Option<String>,

    /// Discovery timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Number of concurrent scan workers
    #[arg(long)]
    pub workers: Option<usize>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Instance directory holding modsolve.json
    #[arg(short = 'd', long, default_value = ".")]
    pub working_dir: PathBuf,
}

fn parse_builtin(value: &str) -> Result<BuiltinPackage> {
    let Some((id, version)) = value.split_once('@') else {
        bail!("Invalid builtin \"{}\", expected ID@VERSION", value);
    };
    if version.trim().is_empty() {
        bail!("Invalid builtin \"{}\": the version is empty", value);
    }
    Ok(BuiltinPackage::new(PackageMetadata::new(id.trim(), version)))
}

pub async fn execute(args: ResolveArgs) -> Result<i32> {
    let working_dir = args
        .working_dir
        .canonicalize()
        .context("Failed to resolve working directory")?;

    let mut config = ResolverConfig::build(Some(&working_dir), true)?;
    if let Some(timeout) = args.timeout {
        config.set_discovery_timeout(timeout);
    }
    if let Some(workers) = args.workers {
        config.set_workers(workers);
    }
    if let Some(environment) = &args.environment {
        let environment = Environment::parse(environment)
            .with_context(|| format!("Unknown environment \"{}\"", environment))?;
        config.set_environment(environment);
    }

    let builtins = args
        .builtins
        .iter()
        .map(String::as_str)
        .map(parse_builtin)
        .collect::<Result<Vec<_>>>()?;

    let mut finders: Vec<Arc<dyn CandidateFinder>> = Vec::new();
    let mods_dir = match &args.mods_dir {
        Some(dir) => Some(dir.clone()),
        None if args.paths.is_empty() => Some(working_dir.join("mods")),
        None => None,
    };
    if let Some(dir) = mods_dir {
        finders.push(Arc::new(DirectoryCandidateFinder::new(dir)));
    }
    if !args.paths.is_empty() {
        finders.push(Arc::new(PathCandidateFinder::new(args.paths.clone())));
    }

    log::debug!("Resolving with {} finder(s) in {}", finders.len(), working_dir.display());

    let resolver = ModResolver::builder().with_config(config).build()?;
    let mut context = resolver.new_context();

    let result = match resolver.resolve(&mut context, &finders, builtins).await {
        Ok(result) => result,
        Err(ResolverError::Resolution(failure)) => {
            if args.json {
                let problems: Vec<String> =
                    failure.problems().problems().iter().map(|p| p.to_string()).collect();
                let warnings: Vec<String> = failure.warnings().iter().map(|w| w.to_string()).collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "success": false,
                        "problems": problems,
                        "warnings": warnings,
                    }))?
                );
            } else {
                eprintln!("{} {}", style("Error:").red().bold(), failure);
            }
            return Ok(1);
        }
        Err(e) => return Err(e.into()),
    };

    if args.json {
        print_json(&result)?;
    } else {
        print_text(&result);
    }

    Ok(0)
}

fn print_text(result: &ResolutionResult) {
    println!(
        "{} {} mod(s) in load order:",
        style("Resolved").green().bold(),
        result.len()
    );
    for candidate in result.load_order() {
        println!(
            "  - {} {} {}",
            style(candidate.id()).cyan(),
            candidate.version(),
            style(format!("({})", candidate.origin())).dim()
        );
    }

    if !result.warnings().is_empty() {
        println!();
        for warning in result.warnings() {
            println!("{} {}", style("Warning:").yellow().bold(), warning);
        }
    }
}

fn print_json(result: &ResolutionResult) -> Result<()> {
    let mods: Vec<_> = result
        .load_order()
        .iter()
        .map(|candidate| {
            json!({
                "id": candidate.id(),
                "version": candidate.version().as_str(),
                "origin": candidate.origin().as_str(),
                "depth": candidate.depth(),
            })
        })
        .collect();
    let warnings: Vec<String> = result.warnings().iter().map(|w| w.to_string()).collect();

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "success": true,
            "mods": mods,
            "warnings": warnings,
        }))?
    );
    Ok(())
}
