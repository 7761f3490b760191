//! A-record resolution behind a small seam so searches can be tested offline.

use async_trait::async_trait;
use hickory_resolver::TokioResolver;
use std::net::Ipv4Addr;
use tracing::debug;

use crate::error::{RblError, RblResult};

/// Outcome of resolving one DNSBL query name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// The name exists: the address is listed with these return codes
    Records(Vec<Ipv4Addr>),
    /// NXDOMAIN or no A records: not listed
    NotFound,
}

/// Resolves DNSBL query names to A records
#[async_trait]
pub trait ZoneResolver: Send + Sync {
    /// Resolve `name`; `Err` carries a resolver failure (SERVFAIL, timeout, ...)
    async fn resolve_a(&self, name: &str) -> Result<Answer, String>;
}

/// [`ZoneResolver`] backed by hickory and the system resolver configuration
pub struct HickoryResolver {
    inner: TokioResolver,
}

impl HickoryResolver {
    /// Create a resolver from `/etc/resolv.conf` (or the platform equivalent)
    pub fn system() -> RblResult<Self> {
        let inner = TokioResolver::builder_tokio()
            .map_err(|e| RblError::Resolver(format!("failed to create resolver: {e}")))?
            .build();
        Ok(Self { inner })
    }
}

#[async_trait]
impl ZoneResolver for HickoryResolver {
    async fn resolve_a(&self, name: &str) -> Result<Answer, String> {
        match self.inner.ipv4_lookup(name).await {
            Ok(lookup) => {
                let records: Vec<Ipv4Addr> = lookup.iter().map(|a| a.0).collect();
                if records.is_empty() {
                    Ok(Answer::NotFound)
                } else {
                    Ok(Answer::Records(records))
                }
            }
            Err(e) if e.is_nx_domain() || e.is_no_records_found() => {
                debug!(name, "not listed");
                Ok(Answer::NotFound)
            }
            Err(e) => Err(e.to_string()),
        }
    }
}
