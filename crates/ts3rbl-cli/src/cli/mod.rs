//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::{Context as _, Result};
use args::{Cli, Commands};
use clap::Parser;
use ts3rbl::BotConfig;

use crate::output::OutputFormat;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = BotConfig::load(&cli.config)
        .with_context(|| format!("cannot load configuration from {}", cli.config.display()))?;

    let ctx = commands::Context {
        config,
        config_path: cli.config,
        output_format: cli.output.unwrap_or(OutputFormat::Pretty),
        verbose: cli.verbose,
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::run::execute(ctx).await,
        Commands::CheckConfig => commands::check_config::execute(&ctx),
        Commands::Lookup(args) => commands::lookup::execute(ctx, args).await,
    }
}
