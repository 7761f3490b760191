//! Default blacklist zones.

/// Zones asked when the config does not name its own
pub const DEFAULT_LISTS: &[&str] = &[
    "zen.spamhaus.org",
    "bl.spamcop.net",
    "dnsbl.sorbs.net",
    "b.barracudacentral.org",
    "cbl.abuseat.org",
    "dnsbl-1.uceprotect.net",
    "dnsbl.dronebl.org",
    "bl.mailspike.net",
    "psbl.surriel.com",
    "all.s5h.net",
];

/// Owned copy of [`DEFAULT_LISTS`]
#[must_use]
pub fn default_lists() -> Vec<String> {
    DEFAULT_LISTS.iter().map(|zone| (*zone).to_string()).collect()
}
