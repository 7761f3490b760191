//! Handling of client-enter notifications.

use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use ts3rbl_core::{BlacklistLookup, Event, OnMatch, QuerySession, Result};

use crate::actuator::Moderator;
use crate::checker::BlacklistChecker;
use crate::resolver::resolve;

/// Server group assigned to clients that have not been verified yet
pub const NEW_MEMBER_GROUP: &str = "8";

/// What happened to one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Not a new member joining
    Ignored,
    /// Client was moderated inside the repeat window
    Suppressed {
        /// Client id
        clid: u32,
    },
    /// Blacklist lookup failed, client skipped for this event
    LookupFailed {
        /// Client id
        clid: u32,
    },
    /// Below the threshold
    Clean {
        /// Client id
        clid: u32,
        /// Blacklists listing the address
        hits: usize,
    },
    /// Kicked or banned
    Moderated {
        /// Client id
        clid: u32,
        /// Blacklists listing the address
        hits: usize,
        /// Action taken
        action: OnMatch,
    },
    /// Over the threshold but the server refused the action
    ModerationFailed {
        /// Client id
        clid: u32,
        /// Blacklists listing the address
        hits: usize,
    },
}

/// Runs resolve, check and act for new members
pub struct JoinHandler<L> {
    checker: BlacklistChecker<L>,
    moderator: Moderator,
    repeat_window: Duration,
    recent: HashMap<u32, Instant>,
}

impl<L: BlacklistLookup> JoinHandler<L> {
    /// Create a handler; a zero `repeat_window` disables duplicate suppression
    pub fn new(checker: BlacklistChecker<L>, moderator: Moderator, repeat_window: Duration) -> Self {
        Self {
            checker,
            moderator,
            repeat_window,
            recent: HashMap::new(),
        }
    }

    /// Handle one notification.
    ///
    /// Only transport failures and query failures while resolving the client
    /// are returned as errors; everything else is folded into the outcome.
    pub async fn handle<S>(&mut self, session: &mut S, event: &Event) -> Result<JoinOutcome>
    where
        S: QuerySession + ?Sized,
    {
        if !event.is_client_enter() || event.get("client_servergroups") != Some(NEW_MEMBER_GROUP) {
            return Ok(JoinOutcome::Ignored);
        }
        let Some(clid) = event.get("clid").and_then(|clid| clid.parse::<u32>().ok()) else {
            warn!(kind = %event.kind, "new member event without a usable clid");
            return Ok(JoinOutcome::Ignored);
        };

        self.prune();
        if self.recent.contains_key(&clid) {
            info!(clid, "client was moderated recently, ignoring repeated join");
            return Ok(JoinOutcome::Suppressed { clid });
        }

        let client = resolve(session, clid).await?;
        info!(
            clid,
            nickname = %client.nickname,
            address = %client.address,
            groups = ?client.server_groups,
            "new member joined"
        );

        let result = match self.checker.check(&client.address).await {
            Ok(result) => result,
            Err(e) => {
                warn!(clid, address = %client.address, error = %e, "blacklist lookup failed, skipping client");
                return Ok(JoinOutcome::LookupFailed { clid });
            }
        };
        let hits = result.hits;

        if !result.should_moderate {
            debug!(clid, hits, threshold = result.threshold, "client below threshold");
            return Ok(JoinOutcome::Clean { clid, hits });
        }

        let listed_on: Vec<&str> = result.listed_on().collect();
        info!(clid, hits, ?listed_on, "client is blacklisted");

        match self.moderator.moderate(session, clid).await {
            Ok(()) => {
                if !self.repeat_window.is_zero() {
                    self.recent.insert(clid, Instant::now());
                }
                Ok(JoinOutcome::Moderated {
                    clid,
                    hits,
                    action: self.moderator.action(),
                })
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(_) => Ok(JoinOutcome::ModerationFailed { clid, hits }),
        }
    }

    fn prune(&mut self) {
        let window = self.repeat_window;
        self.recent.retain(|_, at| at.elapsed() < window);
    }
}
