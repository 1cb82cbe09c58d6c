//! Domain utilities with Public Suffix List integration.
//!
//! Resolves the registrable domain of a scanned URL so WHOIS is asked about
//! what can actually be registered:
//! - https://www.example.co.uk/page -> example.co.uk
//! - https://sub.example.com -> example.com
//! - https://subdomain.github.io -> subdomain.github.io (github.io is a public suffix)

use std::net::IpAddr;

use psl::{domain_str, suffix_str};
use url::Url;

use crate::errors::{LookupError, LookupResult};

/// Domain information extracted using PSL or fallback parsing
#[derive(Debug, Clone, PartialEq)]
pub struct DomainInfo {
    /// The host as provided, lower-cased and without trailing dot
    pub full_domain: String,
    /// The registrable domain (what you can actually register)
    pub registrable_domain: Option<String>,
    /// The public suffix (TLD or effective TLD), e.g. `com.vn`
    pub suffix: Option<String>,
}

impl DomainInfo {
    /// Parse a host name into structured domain information
    pub fn parse(domain: &str) -> LookupResult<Self> {
        let clean_domain = clean_domain_input(domain)?;
        Ok(Self::parse_with_psl(&clean_domain))
    }

    fn parse_with_psl(domain: &str) -> Self {
        if domain.parse::<IpAddr>().is_ok() {
            return DomainInfo {
                full_domain: domain.to_string(),
                registrable_domain: Some(domain.to_string()),
                suffix: None,
            };
        }

        let registrable_domain = domain_str(domain)
            .map(|s| s.to_string())
            .or_else(|| fallback_registrable_domain(domain));

        let mut suffix = suffix_str(domain).map(|s| s.to_string());
        if suffix.is_none() {
            suffix = domain.rsplit('.').next().map(|s| s.to_string());
        }
        if suffix.as_ref().map(|s| s.is_empty()).unwrap_or(false) {
            suffix = None;
        }

        DomainInfo {
            full_domain: domain.to_string(),
            registrable_domain,
            suffix,
        }
    }

    /// Registrable domain, or the full host when PSL gives none.
    pub fn whois_domain(&self) -> &str {
        self.registrable_domain
            .as_deref()
            .unwrap_or(&self.full_domain)
    }
}

/// Host part of a URL. Inputs without a scheme are read as `http://`.
pub fn host_from_url(input: &str) -> LookupResult<String> {
    let trimmed = input.trim();
    let parsed = match Url::parse(trimmed) {
        Ok(u) if u.host_str().is_some() => u,
        _ => Url::parse(&format!("http://{trimmed}"))
            .map_err(|e| LookupError::domain(input, e.to_string()))?,
    };

    let host = parsed
        .host_str()
        .ok_or_else(|| LookupError::domain(input, "URL has no host"))?;
    Ok(host.trim_start_matches('[').trim_end_matches(']').to_string())
}

/// Registrable domain of a URL, ignoring subdomains.
pub fn registrable_domain_of_url(url: &str) -> LookupResult<String> {
    let host = host_from_url(url)?;
    let info = DomainInfo::parse(&host)?;
    Ok(info.whois_domain().to_string())
}

/// Last label of a domain (`example.com.vn` -> `vn`).
pub fn top_level_label(domain: &str) -> Option<&str> {
    let label = domain.trim_end_matches('.').rsplit('.').next()?;
    if label.is_empty() || label.parse::<u8>().is_ok() {
        None
    } else {
        Some(label)
    }
}

/// Clean domain input by removing common artifacts
fn clean_domain_input(domain: &str) -> LookupResult<String> {
    let clean = domain.trim().trim_end_matches('.').to_lowercase();

    if clean.is_empty() {
        return Err(LookupError::domain(domain, "empty domain"));
    }

    // Single labels are allowed for internal hosts
    if !clean.contains('.') && clean.len() < 2 {
        return Err(LookupError::domain(domain, "invalid domain format"));
    }

    Ok(clean)
}

/// Last two labels when the PSL has no answer.
fn fallback_registrable_domain(domain: &str) -> Option<String> {
    let parts: Vec<&str> = domain.split('.').collect();
    if parts.len() < 2 {
        return Some(domain.to_string());
    }
    Some(format!("{}.{}", parts[parts.len() - 2], parts[parts.len() - 1]))
}
