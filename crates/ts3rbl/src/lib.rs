//! TeamSpeak 3 moderation bot that removes clients listed on DNS blacklists.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ts3rbl::BotConfig;
//!
//! #[tokio::main]
//! async fn main() -> ts3rbl::Result<()> {
//!     let config = BotConfig::load("config.yml")?;
//!
//!     // Runs until Ctrl-C, then leaves the server
//!     ts3rbl::run(&config, async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await
//! }
//! ```
//!
//! The bot connects over ServerQuery, logs in, and watches for clients
//! entering the server in the new-member group. Each of them is looked up on
//! the configured blacklists and kicked or banned once the number of listings
//! reaches `rblListedNumber`.

pub mod actuator;
pub mod checker;
pub mod config;
pub mod driver;
pub mod handler;
pub mod resolver;

#[cfg(test)]
mod testing;

use std::future::Future;
use tracing::{info, Instrument};

// Re-export core types
pub use ts3rbl_core::*;

pub use actuator::Moderator;
pub use checker::BlacklistChecker;
pub use config::{ActionParams, BotConfig, LogLevel, LogParams, RblParams, ServerParams};
pub use driver::{Driver, SessionState, EVENT_WAIT};
pub use handler::{JoinHandler, JoinOutcome, NEW_MEMBER_GROUP};

// Re-export collaborators
pub use ts3rbl_query::{QueryClient, QueryClientBuilder};
pub use ts3rbl_rbl::RblSearch;

/// Build the blacklist search described by the `RBL` section
pub fn blacklist_search(config: &BotConfig) -> Result<RblSearch> {
    Ok(RblSearch::new()?
        .lists(&config.rbl.lists)
        .query_timeout(config.rbl.query_timeout()))
}

/// Connect to the configured server and run the bot until `shutdown`
/// resolves or the session fails.
pub async fn run<F>(config: &BotConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let server = &config.server;
    let span = tracing::info_span!("bot", nick = %server.bot_nick);

    async {
        let lookup = blacklist_search(config)?;
        info!(
            server = %server.server_ip,
            port = server.server_port,
            zones = lookup.zones().len(),
            "connecting"
        );
        let session = QueryClient::connect(server.server_ip.as_str(), server.server_port).await?;

        Driver::new(config, session, lookup).run(shutdown).await
    }
    .instrument(span)
    .await
}
