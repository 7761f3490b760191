//! DNSBL query names.
//!
//! Standard DNSBL pattern: reverse the address and query it under the zone.
//! IPv4 reverses octets (`1.2.3.4` under `zen.spamhaus.org` is
//! `4.3.2.1.zen.spamhaus.org.`), IPv6 reverses all 32 nibbles.

use std::fmt::Write;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Reverse an IPv4 address for DNSBL lookup.
///
/// Converts `1.2.3.4` into `4.3.2.1` (without zone suffix).
#[must_use]
pub fn reverse_ipv4(ip: &Ipv4Addr) -> String {
    let octets = ip.octets();
    format!("{}.{}.{}.{}", octets[3], octets[2], octets[1], octets[0])
}

/// Reverse an IPv6 address into dot separated nibbles, least significant first
#[must_use]
pub fn reverse_ipv6(ip: &Ipv6Addr) -> String {
    let mut out = String::with_capacity(63);
    for byte in ip.octets().iter().rev() {
        if !out.is_empty() {
            out.push('.');
        }
        let _ = write!(out, "{:x}.{:x}", byte & 0x0f, byte >> 4);
    }
    out
}

/// Normalize a zone as written in config: no leading or trailing dots
#[must_use]
pub fn normalize_zone(zone: &str) -> &str {
    zone.trim().trim_matches('.')
}

/// Build the fully qualified DNSBL query name for an address under a zone
#[must_use]
pub fn build_query_name(ip: &IpAddr, zone: &str) -> String {
    let reversed = match ip {
        IpAddr::V4(v4) => reverse_ipv4(v4),
        IpAddr::V6(v6) => reverse_ipv6(v6),
    };
    format!("{reversed}.{}.", normalize_zone(zone))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_ipv4() {
        let ip = Ipv4Addr::new(1, 2, 3, 4);
        assert_eq!(reverse_ipv4(&ip), "4.3.2.1");

        let ip = Ipv4Addr::new(192, 168, 1, 100);
        assert_eq!(reverse_ipv4(&ip), "100.1.168.192");
    }

    #[test]
    fn test_reverse_ipv6() {
        let ip: Ipv6Addr = "2001:db8::567:89ab".parse().unwrap();
        assert_eq!(
            reverse_ipv6(&ip),
            "b.a.9.8.7.6.5.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.8.b.d.0.1.0.0.2"
        );
    }

    #[test]
    fn test_build_query_name() {
        let ip: IpAddr = "127.0.0.2".parse().unwrap();
        assert_eq!(build_query_name(&ip, "zen.spamhaus.org"), "2.0.0.127.zen.spamhaus.org.");
        assert_eq!(build_query_name(&ip, ".bl.spamcop.net."), "2.0.0.127.bl.spamcop.net.");
    }
}
