//! Registration and network metadata for a scanned domain.
//!
//! WHOIS (registrar, country) and DNS (first IPv4) run one after the other
//! and independently: an error in one only turns that field into its
//! sentinel. A missing WHOIS country falls back to the TLD table in `rules`.

use crate::domain_utils::DomainInfo;
use crate::errors::{LookupError, LookupResult};
use crate::netutil::DnsLookup;
use crate::rules::country_for_tld;
use crate::whois::{WhoisLookup, WhoisRecord};

/// Sentinel for registrar / country that could not be determined.
pub const UNKNOWN: &str = "Unknown";

/// Sentinel for an IP that could not be resolved.
pub const UNRESOLVED: &str = "Unresolved";

/// Best-effort metadata; every field is either a real value or a sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteMetadata {
    pub registrar: String,
    pub country: String,
    pub ip: String,
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            registrar: UNKNOWN.to_string(),
            country: UNKNOWN.to_string(),
            ip: UNRESOLVED.to_string(),
        }
    }
}

/// Country for a domain whose WHOIS gave none, keyed on the full public
/// suffix (`example.com.vn` looks up `com.vn`).
pub fn fallback_country(domain: &str) -> &'static str {
    DomainInfo::parse(domain)
        .ok()
        .and_then(|info| info.suffix)
        .and_then(|suffix| country_for_tld(&suffix))
        .unwrap_or(UNKNOWN)
}

/// Collect registrar, country and IPv4 for `domain`. Never fails.
pub async fn collect_metadata(
    domain: &str,
    whois: Option<&dyn WhoisLookup>,
    dns: Option<&dyn DnsLookup>,
) -> SiteMetadata {
    let whois_result = match whois {
        Some(client) => client.lookup(domain).await,
        None => Err(LookupError::disabled("whois")),
    };
    let (registrar, country) = registrar_and_country(domain, whois_result);

    let ip = match dns {
        Some(resolver) => resolver.resolve_ipv4(domain).await.map(|ip| ip.to_string()),
        None => Err(LookupError::disabled("dns")),
    };
    let ip = ip.unwrap_or_else(|e| {
        log_lookup_failure(domain, &e);
        UNRESOLVED.to_string()
    });

    SiteMetadata {
        registrar,
        country,
        ip,
    }
}

fn registrar_and_country(domain: &str, result: LookupResult<WhoisRecord>) -> (String, String) {
    let record = result.unwrap_or_else(|e| {
        log_lookup_failure(domain, &e);
        WhoisRecord::default()
    });

    let registrar = record.registrar.unwrap_or_else(|| UNKNOWN.to_string());
    let country = record
        .country
        .unwrap_or_else(|| fallback_country(domain).to_string());
    (registrar, country)
}

fn log_lookup_failure(domain: &str, e: &LookupError) {
    match e {
        LookupError::Disabled { .. } => tracing::debug!("{domain}: {e}"),
        _ => tracing::warn!("{domain}: {e} ({})", e.category()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::net::Ipv4Addr;

    struct FixedWhois(WhoisRecord);

    #[async_trait]
    impl WhoisLookup for FixedWhois {
        async fn lookup(&self, _domain: &str) -> LookupResult<WhoisRecord> {
            Ok(self.0.clone())
        }
    }

    struct FailingWhois;

    #[async_trait]
    impl WhoisLookup for FailingWhois {
        async fn lookup(&self, domain: &str) -> LookupResult<WhoisRecord> {
            Err(LookupError::whois_query("whois.test", domain, "connect timeout"))
        }
    }

    struct FixedDns(Ipv4Addr);

    #[async_trait]
    impl DnsLookup for FixedDns {
        async fn resolve_ipv4(&self, _domain: &str) -> LookupResult<Ipv4Addr> {
            Ok(self.0)
        }
    }

    struct FailingDns;

    #[async_trait]
    impl DnsLookup for FailingDns {
        async fn resolve_ipv4(&self, domain: &str) -> LookupResult<Ipv4Addr> {
            Err(LookupError::dns_resolution(domain, "A", "NXDOMAIN"))
        }
    }

    #[test]
    fn fallback_table() {
        assert_eq!(fallback_country("example.vn"), "Vietnam");
        assert_eq!(fallback_country("www.example.vn"), "Vietnam");
        assert_eq!(fallback_country("example.com.vn"), UNKNOWN);
        assert_eq!(fallback_country("shop.example.com.kh"), UNKNOWN);
        assert_eq!(fallback_country("example.com"), "Global");
        assert_eq!(fallback_country("example.org"), "Global");
        assert_eq!(fallback_country("example.tv"), UNKNOWN);
        assert_eq!(fallback_country("127.0.0.1"), UNKNOWN);
    }

    #[tokio::test]
    async fn whois_values_are_used() {
        let whois = FixedWhois(WhoisRecord {
            registrar: Some("PA Vietnam".into()),
            country: Some("VN".into()),
            server: None,
        });
        let dns = FixedDns(Ipv4Addr::new(203, 0, 113, 9));
        let meta = collect_metadata("example.com", Some(&whois), Some(&dns)).await;
        assert_eq!(meta.registrar, "PA Vietnam");
        assert_eq!(meta.country, "VN");
        assert_eq!(meta.ip, "203.0.113.9");
    }

    #[tokio::test]
    async fn missing_country_uses_tld_fallback() {
        let whois = FixedWhois(WhoisRecord {
            registrar: Some("Registrar".into()),
            country: None,
            server: None,
        });
        let meta = collect_metadata("example.vn", Some(&whois), None).await;
        assert_eq!(meta.registrar, "Registrar");
        assert_eq!(meta.country, "Vietnam");
        assert_eq!(meta.ip, UNRESOLVED);
    }

    #[tokio::test]
    async fn whois_failure_does_not_block_dns() {
        let dns = FixedDns(Ipv4Addr::new(198, 51, 100, 4));
        let meta = collect_metadata("example.com", Some(&FailingWhois), Some(&dns)).await;
        assert_eq!(meta.registrar, UNKNOWN);
        assert_eq!(meta.country, "Global");
        assert_eq!(meta.ip, "198.51.100.4");
    }

    #[tokio::test]
    async fn dns_failure_does_not_block_whois() {
        let whois = FixedWhois(WhoisRecord {
            registrar: Some("Registrar".into()),
            country: Some("KH".into()),
            server: None,
        });
        let meta = collect_metadata("example.kh", Some(&whois), Some(&FailingDns)).await;
        assert_eq!(meta.registrar, "Registrar");
        assert_eq!(meta.country, "KH");
        assert_eq!(meta.ip, UNRESOLVED);
    }

    #[tokio::test]
    async fn everything_disabled_yields_sentinels() {
        let meta = collect_metadata("example.tv", None, None).await;
        assert_eq!(meta, SiteMetadata::default());
    }
}
