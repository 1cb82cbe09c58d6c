/*!
DNS utilities for siterisk.

Resolves the first IPv4 address of a domain through trust-dns-resolver,
bounded by the configured DNS timeout. The resolver is built once per
scan from the system configuration, falling back to the library defaults
when the system configuration cannot be read.
*/

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{ResolverConfig, ResolverOpts},
};

use crate::config::NetworkConfig;
use crate::errors::{LookupError, LookupResult};

/// A-record lookup.
#[async_trait]
pub trait DnsLookup: Send + Sync {
    /// First IPv4 address of `domain`.
    async fn resolve_ipv4(&self, domain: &str) -> LookupResult<Ipv4Addr>;
}

/// trust-dns backed resolver.
pub struct SystemResolver {
    resolver: TokioAsyncResolver,
    timeout: Duration,
}

impl SystemResolver {
    pub fn new(config: &NetworkConfig) -> Self {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
            tracing::debug!("system resolver config unavailable ({e}), using defaults");
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });
        Self {
            resolver,
            timeout: config.dns_timeout,
        }
    }
}

#[async_trait]
impl DnsLookup for SystemResolver {
    async fn resolve_ipv4(&self, domain: &str) -> LookupResult<Ipv4Addr> {
        tracing::debug!("A lookup for {domain}");

        let fut = self.resolver.lookup_ip(domain);
        let response = match timeout(self.timeout, fut).await {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => return Err(LookupError::dns_resolution(domain, "A", e.to_string())),
            Err(_) => return Err(LookupError::dns_timeout(domain, self.timeout.as_secs())),
        };

        first_ipv4(response.iter())
            .ok_or_else(|| LookupError::dns_resolution(domain, "A", "no IPv4 address in answer"))
    }
}

/// First IPv4 address among resolved addresses.
pub fn first_ipv4(addrs: impl IntoIterator<Item = IpAddr>) -> Option<Ipv4Addr> {
    addrs.into_iter().find_map(|ip| match ip {
        IpAddr::V4(v4) => Some(v4),
        IpAddr::V6(_) => None,
    })
}
