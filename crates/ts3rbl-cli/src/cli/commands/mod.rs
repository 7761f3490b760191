//! Command implementations.

pub mod check_config;
pub mod lookup;
pub mod run;

use std::path::PathBuf;
use ts3rbl::BotConfig;

use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded and validated configuration
    pub config: BotConfig,

    /// Where the configuration was read from
    pub config_path: PathBuf,

    /// Output format
    pub output_format: OutputFormat,

    /// Verbose output
    pub verbose: bool,
}
