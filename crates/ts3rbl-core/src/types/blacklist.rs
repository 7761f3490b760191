use serde::Serialize;
use std::collections::BTreeMap;
use std::net::Ipv4Addr;

/// Reserved listing key holding the searched address rather than a blacklist
pub const SEARCH_HOST: &str = "SEARCH_HOST";

/// Answer from a single blacklist zone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RblEntry {
    /// Whether the zone lists the address
    pub listed: bool,

    /// Name that was queried (or, for [`SEARCH_HOST`], the searched address)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// `127.0.0.x` return codes when listed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub responses: Vec<Ipv4Addr>,

    /// Resolver failure for this zone, if it could not be asked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RblEntry {
    /// Entry for a zone that listed the address
    #[must_use]
    pub fn listed(host: impl Into<String>, responses: Vec<Ipv4Addr>) -> Self {
        Self {
            listed: true,
            host: Some(host.into()),
            responses,
            error: None,
        }
    }

    /// Entry for a zone that does not list the address
    #[must_use]
    pub fn clean(host: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            ..Self::default()
        }
    }

    /// Entry for a zone that could not be queried
    #[must_use]
    pub fn failed(host: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Raw lookup output: zone name -> entry, plus the [`SEARCH_HOST`] entry
pub type RblListing = BTreeMap<String, RblEntry>;

/// Outcome of checking one address against every configured blacklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlacklistResult {
    /// Address that was checked
    pub address: String,

    /// Per-blacklist listed flags, search host excluded
    pub listed: BTreeMap<String, bool>,

    /// Number of blacklists reporting the address
    pub hits: usize,

    /// Hits required before acting
    pub threshold: usize,

    /// `hits >= threshold`
    pub should_moderate: bool,
}

impl BlacklistResult {
    /// Names of the blacklists that reported the address
    pub fn listed_on(&self) -> impl Iterator<Item = &str> {
        self.listed
            .iter()
            .filter(|(_, listed)| **listed)
            .map(|(name, _)| name.as_str())
    }
}
