//! Unified error handling.
//!
//! Two `thiserror` enums live here:
//!   * `LookupError` – failures of the external collaborators (page fetch,
//!     WHOIS, DNS, domain parsing). The scanner never propagates these; it
//!     maps each one to a sentinel field value or to an unreachable record.
//!   * `SiteRiskError` – failures of the outer shell (reading the URL list,
//!     writing the report, invalid configuration).
//!
//! Both expose a coarse `ErrorCategory` so log lines and structured output
//! classify failures the same way:
//!   - Input: user / data validation issues
//!   - Network: transient or remote-service problems
//!   - Parse: syntax / data-format decoding issues
//!   - Internal: logic bugs or unexpected states

use std::io;

use thiserror::Error;

/// High-level classification for logging / structured reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Parse,
    Internal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCategory::Input => "input",
            ErrorCategory::Network => "network",
            ErrorCategory::Parse => "parse",
            ErrorCategory::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Failure of a single best-effort collaborator call.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("HTTP request to {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    #[error("HTTP request to {url} timed out after {seconds}s")]
    FetchTimeout { url: String, seconds: u64 },

    #[error("{url} returned non-HTML content ({content_type})")]
    NotHtml { url: String, content_type: String },

    #[error("{url} returned no readable text")]
    EmptyPage { url: String },

    #[error("WHOIS query '{query}' to server '{server}' failed: {reason}")]
    WhoisQuery {
        server: String,
        query: String,
        reason: String,
    },

    #[error("No WHOIS server known for '{query}'")]
    WhoisUnavailable { query: String },

    #[error("DNS query timed out after {seconds}s: {query}")]
    DnsTimeout { query: String, seconds: u64 },

    #[error("DNS {record_type} lookup failed for {domain}: {reason}")]
    DnsResolution {
        domain: String,
        record_type: String,
        reason: String,
    },

    #[error("Could not derive a domain from '{input}': {reason}")]
    Domain { input: String, reason: String },

    #[error("Lookup disabled: {what}")]
    Disabled { what: String },
}

impl LookupError {
    pub fn category(&self) -> ErrorCategory {
        use LookupError::*;
        match self {
            Fetch { .. }
            | FetchTimeout { .. }
            | WhoisQuery { .. }
            | WhoisUnavailable { .. }
            | DnsTimeout { .. }
            | DnsResolution { .. } => ErrorCategory::Network,
            NotHtml { .. } | EmptyPage { .. } => ErrorCategory::Parse,
            Domain { .. } => ErrorCategory::Input,
            Disabled { .. } => ErrorCategory::Internal,
        }
    }

    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn fetch_timeout(url: impl Into<String>, seconds: u64) -> Self {
        Self::FetchTimeout {
            url: url.into(),
            seconds,
        }
    }

    pub fn not_html(url: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::NotHtml {
            url: url.into(),
            content_type: content_type.into(),
        }
    }

    pub fn whois_query(
        server: impl Into<String>,
        query: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::WhoisQuery {
            server: server.into(),
            query: query.into(),
            reason: reason.into(),
        }
    }

    pub fn dns_timeout(query: impl Into<String>, seconds: u64) -> Self {
        Self::DnsTimeout {
            query: query.into(),
            seconds,
        }
    }

    pub fn dns_resolution(
        domain: impl Into<String>,
        record_type: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::DnsResolution {
            domain: domain.into(),
            record_type: record_type.into(),
            reason: reason.into(),
        }
    }

    pub fn domain(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Domain {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn disabled(what: impl Into<String>) -> Self {
        Self::Disabled { what: what.into() }
    }
}

/// Result alias for collaborator calls.
pub type LookupResult<T> = std::result::Result<T, LookupError>;

/// Error of the command-line shell around the scanner.
#[derive(Error, Debug)]
pub enum SiteRiskError {
    #[error("No URLs to scan")]
    NoUrls,

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("I/O error during {operation} on {path}: {source}")]
    Io {
        path: String,
        operation: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize report as {format}: {reason}")]
    Serialization { format: String, reason: String },
}

impl SiteRiskError {
    pub fn category(&self) -> ErrorCategory {
        use SiteRiskError::*;
        match self {
            NoUrls | Configuration { .. } => ErrorCategory::Input,
            Serialization { .. } => ErrorCategory::Parse,
            Io { .. } => ErrorCategory::Internal,
        }
    }

    pub fn io(path: impl Into<String>, operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    pub fn serialization(format: impl Into<String>, reason: impl ToString) -> Self {
        Self::Serialization {
            format: format.into(),
            reason: reason.to_string(),
        }
    }
}

/// Public result alias.
pub type Result<T> = std::result::Result<T, SiteRiskError>;

impl From<io::Error> for SiteRiskError {
    fn from(e: io::Error) -> Self {
        SiteRiskError::Io {
            path: "<unknown>".into(),
            operation: "unspecified".into(),
            source: e,
        }
    }
}

/// Extension trait for enriching IO results with path + operation context.
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<String>, operation: impl Into<String>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::result::Result<T, io::Error> {
    fn with_path(self, path: impl Into<String>, operation: impl Into<String>) -> Result<T> {
        self.map_err(|e| SiteRiskError::io(path.into(), operation.into(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_mapping() {
        assert_eq!(
            LookupError::fetch("http://x", "refused").category(),
            ErrorCategory::Network
        );
        assert_eq!(
            LookupError::not_html("http://x", "image/png").category(),
            ErrorCategory::Parse
        );
        assert_eq!(
            LookupError::domain("???", "no host").category(),
            ErrorCategory::Input
        );
        assert_eq!(SiteRiskError::NoUrls.category(), ErrorCategory::Input);
    }

    #[test]
    fn display_snippets() {
        let e = LookupError::dns_resolution("example.com", "A", "NXDOMAIN");
        let s = e.to_string();
        assert!(s.contains("example.com"));
        assert!(s.contains("NXDOMAIN"));
        let t = LookupError::fetch_timeout("https://slow.example", 6);
        assert!(t.to_string().contains("6s"));
    }

    #[test]
    fn io_context() {
        let res: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let mapped = res.with_path("/tmp/urls.txt", "read");
        match mapped.err().unwrap() {
            SiteRiskError::Io {
                path, operation, ..
            } => {
                assert_eq!(path, "/tmp/urls.txt");
                assert_eq!(operation, "read");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
