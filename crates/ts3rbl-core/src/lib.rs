//! Core types and traits for the ts3rbl moderation bot.
//!
//! This crate provides the foundational pieces shared by the other crates:
//!
//! - **Types**: decoded ServerQuery rows, events, client info, blacklist results
//! - **Traits**: [`QuerySession`] and [`BlacklistLookup`], the seams the bot
//!   talks to its collaborators through
//! - **Errors**: the [`BotError`] taxonomy and [`ConfigError`]

mod error;
mod traits;
pub mod types;

pub use error::{BotError, ConfigError, Result};
pub use traits::{BlacklistLookup, QuerySession};
pub use types::*;
