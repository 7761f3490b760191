//! Concurrent search of one address across many blacklists.

use async_trait::async_trait;
use futures_util::future::join_all;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tracing::{debug, warn};
use ts3rbl_core::{BlacklistLookup, RblEntry, RblListing, SEARCH_HOST};

use crate::error::{RblError, RblResult};
use crate::lists::default_lists;
use crate::query_name::{build_query_name, normalize_zone};
use crate::resolver::{Answer, HickoryResolver, ZoneResolver};

/// Default time allowed for a single zone to answer
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Returns true for a `127.0.0.0/8` answer that reports a listing.
///
/// `127.255.255.0/24` is the error range (Spamhaus answers `127.255.255.254`
/// to queries sent through public resolvers) and anything outside
/// `127.0.0.0/8` is not a DNSBL answer at all.
#[must_use]
pub const fn is_listing_code(code: Ipv4Addr) -> bool {
    let [a, b, c, _] = code.octets();
    a == 127 && !(b == 255 && c == 255)
}

/// Searches an address across a set of DNSBL zones
pub struct RblSearch<R = HickoryResolver> {
    resolver: R,
    lists: Vec<String>,
    query_timeout: Duration,
}

impl RblSearch<HickoryResolver> {
    /// Search the default zones with the system resolver
    pub fn new() -> RblResult<Self> {
        Ok(Self::with_resolver(HickoryResolver::system()?))
    }
}

impl<R: ZoneResolver> RblSearch<R> {
    /// Search the default zones with a custom resolver
    #[must_use]
    pub fn with_resolver(resolver: R) -> Self {
        Self {
            resolver,
            lists: default_lists(),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Replace the zones to ask
    #[must_use]
    pub fn lists<I, S>(mut self, lists: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lists = lists
            .into_iter()
            .map(|zone| normalize_zone(zone.as_ref()).to_string())
            .filter(|zone| !zone.is_empty())
            .collect();
        self
    }

    /// Set the per-zone timeout
    #[must_use]
    pub const fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Zones that will be asked
    #[must_use]
    pub fn zones(&self) -> &[String] {
        &self.lists
    }

    /// Ask every zone about `address`.
    ///
    /// Zones that fail to answer are recorded as not listed with their error;
    /// the search only fails when no zone could be asked at all.
    pub async fn search(&self, address: &str) -> RblResult<RblListing> {
        let ip: IpAddr = address
            .trim()
            .parse()
            .map_err(|_| RblError::InvalidIp(address.to_string()))?;

        let queries = self.lists.iter().map(|zone| self.ask(ip, zone));
        let answers = join_all(queries).await;

        let failed = answers.iter().filter(|(_, entry)| entry.error.is_some()).count();
        if !answers.is_empty() && failed == answers.len() {
            let last = answers
                .last()
                .and_then(|(_, entry)| entry.error.clone())
                .unwrap_or_default();
            return Err(RblError::AllFailed {
                zones: answers.len(),
                last,
            });
        }

        let mut listing: RblListing = answers.into_iter().collect();
        listing.insert(
            SEARCH_HOST.to_string(),
            RblEntry {
                host: Some(address.to_string()),
                ..RblEntry::default()
            },
        );
        Ok(listing)
    }

    async fn ask(&self, ip: IpAddr, zone: &str) -> (String, RblEntry) {
        let name = build_query_name(&ip, zone);
        let entry = match tokio::time::timeout(self.query_timeout, self.resolver.resolve_a(&name)).await {
            Ok(Ok(Answer::Records(codes))) => {
                let (listings, refused): (Vec<Ipv4Addr>, Vec<Ipv4Addr>) =
                    codes.into_iter().partition(|code| is_listing_code(*code));
                if listings.is_empty() {
                    warn!(zone, codes = ?refused, "blacklist refused query");
                    let codes: Vec<String> = refused.iter().map(ToString::to_string).collect();
                    RblEntry::failed(name, format!("blacklist refused query ({})", codes.join(", ")))
                } else {
                    debug!(zone, codes = ?listings, "listed");
                    RblEntry::listed(name, listings)
                }
            }
            Ok(Ok(Answer::NotFound)) => RblEntry::clean(name),
            Ok(Err(e)) => {
                warn!(zone, error = %e, "blacklist query failed");
                RblEntry::failed(name, e)
            }
            Err(_) => {
                warn!(zone, timeout = ?self.query_timeout, "blacklist query timed out");
                RblEntry::failed(name, format!("timed out after {:?}", self.query_timeout))
            }
        };
        (zone.to_string(), entry)
    }
}

#[async_trait]
impl<R: ZoneResolver> BlacklistLookup for RblSearch<R> {
    async fn lookup(&self, address: &str) -> ts3rbl_core::Result<RblListing> {
        Ok(self.search(address).await?)
    }
}
