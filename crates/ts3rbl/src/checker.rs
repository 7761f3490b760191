//! Blacklist decision for one address.

use tracing::debug;
use ts3rbl_core::{BlacklistLookup, BlacklistResult, Result, RblListing, SEARCH_HOST};

use crate::config::ActionParams;

/// Asks the lookup collaborator and turns its listing into a decision
pub struct BlacklistChecker<L> {
    lookup: L,
    threshold: usize,
}

impl<L: BlacklistLookup> BlacklistChecker<L> {
    /// Create a checker using the `rblListedNumber` threshold
    pub const fn new(lookup: L, actions: &ActionParams) -> Self {
        Self {
            lookup,
            threshold: actions.rbl_listed_number,
        }
    }

    /// Look `address` up and count the blacklists that list it
    pub async fn check(&self, address: &str) -> Result<BlacklistResult> {
        let listing = self.lookup.lookup(address).await?;
        let result = evaluate(address, &listing, self.threshold);
        debug!(
            address,
            hits = result.hits,
            threshold = result.threshold,
            "blacklist check finished"
        );
        Ok(result)
    }
}

/// Count listed entries, ignoring the search host bookkeeping entry
#[must_use]
pub fn evaluate(address: &str, listing: &RblListing, threshold: usize) -> BlacklistResult {
    let listed: std::collections::BTreeMap<String, bool> = listing
        .iter()
        .filter(|(name, _)| name.as_str() != SEARCH_HOST)
        .map(|(name, entry)| (name.clone(), entry.listed))
        .collect();
    let hits = listed.values().filter(|listed| **listed).count();

    BlacklistResult {
        address: address.to_string(),
        listed,
        hits,
        threshold,
        should_moderate: hits >= threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{actions, listing, StaticLookup};
    use ts3rbl_core::{BotError, OnMatch, RblEntry};

    #[test]
    fn search_host_is_never_counted() {
        let mut raw = listing(0, 3);
        raw.insert(
            SEARCH_HOST.to_string(),
            RblEntry {
                listed: true,
                host: Some("198.51.100.7".into()),
                ..RblEntry::default()
            },
        );

        let result = evaluate("198.51.100.7", &raw, 1);
        assert_eq!(result.hits, 0);
        assert!(!result.listed.contains_key(SEARCH_HOST));
        assert!(!result.should_moderate);
    }

    #[test]
    fn hits_count_listed_flags() {
        let result = evaluate("198.51.100.7", &listing(3, 5), 2);
        assert_eq!(result.hits, 3);
        assert_eq!(result.listed.len(), 5);
        assert_eq!(result.listed_on().count(), 3);
    }

    #[test]
    fn threshold_boundary() {
        assert!(evaluate("a", &listing(2, 5), 2).should_moderate);
        assert!(!evaluate("a", &listing(1, 5), 2).should_moderate);
        assert!(evaluate("a", &listing(5, 5), 5).should_moderate);
    }

    #[tokio::test]
    async fn check_uses_configured_threshold() {
        let lookup = StaticLookup::new().with("198.51.100.7", listing(3, 5));
        let checker = BlacklistChecker::new(lookup, &actions(OnMatch::Ban, 3));

        let result = checker.check("198.51.100.7").await.unwrap();
        assert_eq!(result.hits, 3);
        assert_eq!(result.threshold, 3);
        assert!(result.should_moderate);
    }

    #[tokio::test]
    async fn lookup_failure_propagates() {
        let checker = BlacklistChecker::new(StaticLookup::failing(), &actions(OnMatch::Ban, 2));
        assert!(matches!(
            checker.check("198.51.100.7").await,
            Err(BotError::Lookup(_))
        ));
    }
}
