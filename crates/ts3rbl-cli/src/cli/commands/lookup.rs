//! `ts3rbl lookup` - check one address without connecting to the server.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use ts3rbl::checker::evaluate;
use ts3rbl::{BlacklistResult, RblListing, SEARCH_HOST};

use super::Context;
use crate::cli::args::LookupArgs;
use crate::logging;
use crate::output::OutputFormat;

#[derive(Serialize)]
struct Report<'a> {
    result: &'a BlacklistResult,
    zones: &'a RblListing,
}

pub async fn execute(ctx: Context, args: LookupArgs) -> Result<()> {
    logging::init_console(ctx.verbose)?;

    let search = ts3rbl::blacklist_search(&ctx.config)?;
    let mut listing = search.search(&args.address).await?;
    let result = evaluate(&args.address, &listing, ctx.config.actions.rbl_listed_number);
    listing.remove(SEARCH_HOST);

    match ctx.output_format {
        OutputFormat::Yaml => {
            let report = Report {
                result: &result,
                zones: &listing,
            };
            print!("{}", serde_yaml::to_string(&report)?);
        }
        OutputFormat::Pretty => {
            println!("{} {}", "Address:".bold(), result.address.cyan());
            println!();
            for (zone, entry) in &listing {
                let status = if entry.listed {
                    "LISTED".red().bold().to_string()
                } else if entry.error.is_some() {
                    "error".yellow().to_string()
                } else {
                    "clean".green().to_string()
                };
                let detail = if let Some(error) = &entry.error {
                    error.dimmed().to_string()
                } else {
                    entry
                        .responses
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                println!("  {zone:<28} {status:<8} {detail}");
            }
            println!();

            let summary = format!("{} of {} blacklists", result.hits, result.listed.len());
            if result.should_moderate {
                println!(
                    "{} {} (threshold {}), would {}",
                    "Listed:".red().bold(),
                    summary,
                    result.threshold,
                    ctx.config.actions.on_match
                );
            } else {
                println!(
                    "{} {} (threshold {}), no action",
                    "Below threshold:".green().bold(),
                    summary,
                    result.threshold
                );
            }
        }
    }

    Ok(())
}
