//! check-id command - validate mod ids without scanning anything.

use anyhow::Result;
use clap::Args;
use console::style;

use modsolve::validate_id;

#[derive(Args, Debug)]
pub struct CheckIdArgs {
    /// Mod ids to check
    #[arg(required = true)]
    pub ids: Vec<String>,
}

pub fn execute(args: CheckIdArgs) -> Result<i32> {
    let mut invalid = 0;

    for id in &args.ids {
        match validate_id(id) {
            Ok(()) => println!("{} {}", style("ok").green().bold(), id),
            Err(e) => {
                invalid += 1;
                println!("{} {}", style("invalid").red().bold(), e);
            }
        }
    }

    Ok(if invalid == 0 { 0 } else { 1 })
}
