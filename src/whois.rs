use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::NetworkConfig;
use crate::domain_utils::top_level_label;
use crate::errors::{LookupError, LookupResult};

/// WHOIS TCP port.
const WHOIS_PORT: u16 = 43;

static RE_REFER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*(?:refer|whois):\s*([A-Z0-9._\-]+)\s*$").unwrap());
static RE_REGISTRAR_SERVER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\s*Registrar WHOIS Server:\s*(?:whois://)?([A-Z0-9._\-]+)\s*$").unwrap()
});
static RE_REGISTRAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\s*(?:registrar|sponsoring registrar|registrar name)\s*:[ \t]*(\S.*?)\s*$")
        .unwrap()
});
static RE_COUNTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\s*(?:registrant country|country)\s*:[ \t]*(\S.*?)\s*$").unwrap()
});

/// Fields pulled out of WHOIS responses for one domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhoisRecord {
    pub registrar: Option<String>,
    pub country: Option<String>,
    /// Last server that answered
    pub server: Option<String>,
}

impl WhoisRecord {
    /// Parse one raw response.
    pub fn parse(response: &str) -> Self {
        WhoisRecord {
            registrar: first_capture(&RE_REGISTRAR, response),
            country: first_capture(&RE_COUNTRY, response),
            server: None,
        }
    }

    /// Keep our values, fill gaps from `other`.
    fn merge(self, other: WhoisRecord) -> Self {
        WhoisRecord {
            registrar: self.registrar.or(other.registrar),
            country: self.country.or(other.country),
            server: self.server.or(other.server),
        }
    }
}

/// Registrar / country lookup for a registrable domain.
#[async_trait]
pub trait WhoisLookup: Send + Sync {
    async fn lookup(&self, domain: &str) -> LookupResult<WhoisRecord>;
}

/// Plain TCP/43 client: IANA bootstrap → TLD registry → registrar referral.
pub struct TcpWhois {
    bootstrap_server: String,
    timeout: Duration,
}

impl TcpWhois {
    pub fn new(config: &NetworkConfig) -> Self {
        Self {
            bootstrap_server: config.whois_server.clone(),
            timeout: config.whois_timeout,
        }
    }

    /// Ask the bootstrap server which registry serves `tld`.
    async fn registry_for(&self, tld: &str) -> LookupResult<String> {
        let resp = simple_whois(&self.bootstrap_server, tld, self.timeout).await?;
        first_capture(&RE_REFER, &resp)
            .map(|s| s.to_ascii_lowercase())
            .ok_or_else(|| LookupError::WhoisUnavailable {
                query: tld.to_string(),
            })
    }
}

#[async_trait]
impl WhoisLookup for TcpWhois {
    async fn lookup(&self, domain: &str) -> LookupResult<WhoisRecord> {
        let tld = top_level_label(domain).ok_or_else(|| LookupError::WhoisUnavailable {
            query: domain.to_string(),
        })?;

        let registry = self.registry_for(tld).await?;
        tracing::debug!("WHOIS {domain} via {registry}");

        let resp = simple_whois(&registry, domain, self.timeout).await?;
        let mut record = WhoisRecord::parse(&resp);
        record.server = Some(registry.clone());

        // Thin registries (.com/.net) only point at the registrar's server.
        if let Some(next) = first_capture(&RE_REGISTRAR_SERVER, &resp)
            .map(|s| s.to_ascii_lowercase())
            && next != registry
        {
            tracing::debug!("WHOIS referral {registry} -> {next}");
            match simple_whois(&next, domain, self.timeout).await {
                Ok(detail) => {
                    let mut detailed = WhoisRecord::parse(&detail);
                    detailed.server = Some(next);
                    record = detailed.merge(record);
                }
                Err(e) => tracing::warn!("WHOIS referral failed: {e}"),
            }
        }

        Ok(record)
    }
}

/// Perform a basic WHOIS query (over TCP 43) with a timeout.
///
/// Returns the raw textual response.
pub async fn simple_whois(server: &str, query: &str, to: Duration) -> LookupResult<String> {
    let mut stream = match timeout(to, TcpStream::connect((server, WHOIS_PORT))).await {
        Ok(Ok(s)) => s,
        Ok(Err(e)) => {
            return Err(LookupError::whois_query(
                server,
                query,
                format!("connect error: {e}"),
            ));
        }
        Err(_) => return Err(LookupError::whois_query(server, query, "connect timeout")),
    };

    // Canonical WHOIS: "<query>\r\n"
    let line = format!("{query}\r\n");
    match timeout(to, stream.write_all(line.as_bytes())).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(LookupError::whois_query(server, query, e.to_string())),
        Err(_) => return Err(LookupError::whois_query(server, query, "write timeout")),
    }

    let mut buf = Vec::new();
    match timeout(to, stream.read_to_end(&mut buf)).await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => return Err(LookupError::whois_query(server, query, e.to_string())),
        Err(_) => return Err(LookupError::whois_query(server, query, "read timeout")),
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str().trim().to_string()))
        .find(|s| !s.is_empty())
}
