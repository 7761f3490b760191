//! Kick or ban action against a listed client.

use tracing::{error, info};
use ts3rbl_core::{OnMatch, QuerySession, Result, REASON_KICK_SERVER};

use crate::config::ActionParams;

/// Applies the configured `onMatch` action
#[derive(Debug, Clone)]
pub struct Moderator {
    on_match: OnMatch,
    ban_time: u64,
    reason: String,
}

impl Moderator {
    /// Build from the `Actions` section
    #[must_use]
    pub fn new(actions: &ActionParams) -> Self {
        Self {
            on_match: actions.on_match,
            ban_time: actions.ban_time,
            reason: actions.reason.clone(),
        }
    }

    /// Action this moderator takes
    #[must_use]
    pub const fn action(&self) -> OnMatch {
        self.on_match
    }

    /// Kick or ban `clid`. Exactly one command is sent.
    pub async fn moderate<S>(&self, session: &mut S, clid: u32) -> Result<()>
    where
        S: QuerySession + ?Sized,
    {
        let outcome = match self.on_match {
            OnMatch::Ban => session
                .ban_client(clid, self.ban_time, &self.reason)
                .await
                .map(|bans| {
                    let ban_ids: Vec<&str> = bans
                        .iter()
                        .filter_map(|row| row.get("banid").map(String::as_str))
                        .collect();
                    info!(clid, seconds = self.ban_time, ?ban_ids, reason = %self.reason, "client banned");
                }),
            OnMatch::Kick => session
                .client_kick(clid, REASON_KICK_SERVER, &self.reason)
                .await
                .map(|()| info!(clid, reason = %self.reason, "client kicked")),
        };

        if let Err(e) = &outcome {
            error!(clid, action = %self.on_match, error = %e, "moderation failed");
        }
        outcome
    }
}
