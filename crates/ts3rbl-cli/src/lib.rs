//! # ts3rbl-cli
//!
//! Command-line runner for the ts3rbl moderation bot.
//!
//! ## Commands
//!
//! - **run** (default): connect and moderate until Ctrl-C
//! - **check-config**: validate the configuration file and print a summary
//! - **lookup**: check one address against the configured blacklists

pub mod cli;
pub mod logging;
pub mod output;

pub use cli::run;
