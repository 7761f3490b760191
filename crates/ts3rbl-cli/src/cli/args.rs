//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// TeamSpeak 3 moderation bot for blacklisted addresses
///
/// Watches new members joining the server and kicks or bans those whose
/// address is listed on enough DNS blacklists.
#[derive(Parser, Debug)]
#[command(name = "ts3rbl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "TS3RBL_CONFIG", default_value = "config.yml", global = true)]
    pub config: PathBuf,

    /// Output format for auxiliary commands
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity of auxiliary commands
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Connect to the server and moderate until interrupted (default)
    Run,

    /// Load and validate the configuration, then print a summary
    CheckConfig,

    /// Check one address against the configured blacklists
    Lookup(LookupArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct LookupArgs {
    /// IPv4 or IPv6 address to check
    pub address: String,
}
