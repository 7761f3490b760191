//! Output formatting for the auxiliary commands.

use clap::ValueEnum;

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human readable text with colors
    #[default]
    Pretty,
    /// YAML output
    Yaml,
}
