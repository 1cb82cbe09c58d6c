//! Per-URL scan record shared by the scanner and every formatter.

use crate::classify::{Category, CategoryScores, Classification, Verdict};
use crate::metadata::{SiteMetadata, UNKNOWN, UNRESOLVED};

/// Outcome of scanning one URL. Built once by the scanner, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRecord {
    /// Input URL, unmodified
    pub url: String,
    /// Registrable domain; `None` when the page could not be fetched
    pub domain: Option<String>,
    pub registrar: String,
    pub country: String,
    pub ip: String,
    pub scores: CategoryScores,
    pub verdict: Verdict,
    pub fetch_failed: bool,
    /// Why the fetch failed, for diagnostics
    pub error: Option<String>,
}

impl ScanRecord {
    /// Record for a page that could not be retrieved.
    pub fn unreachable(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            domain: None,
            registrar: UNKNOWN.to_string(),
            country: UNKNOWN.to_string(),
            ip: UNRESOLVED.to_string(),
            scores: CategoryScores::default(),
            verdict: Verdict::Unreachable,
            fetch_failed: true,
            error: Some(reason.into()),
        }
    }

    /// Record for a fetched and classified page.
    pub fn analyzed(
        url: impl Into<String>,
        domain: Option<String>,
        metadata: SiteMetadata,
        classification: Classification,
    ) -> Self {
        Self {
            url: url.into(),
            domain,
            registrar: metadata.registrar,
            country: metadata.country,
            ip: metadata.ip,
            scores: classification.scores,
            verdict: classification.verdict,
            fetch_failed: false,
            error: None,
        }
    }

    /// Category column value: the flagged category, `Safe`, or nothing for
    /// unreachable pages.
    pub fn category(&self) -> Option<Category> {
        self.verdict.category()
    }

    pub fn is_suspicious(&self) -> bool {
        matches!(self.verdict, Verdict::Suspicious(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;

    #[test]
    fn unreachable_has_only_url() {
        let r = ScanRecord::unreachable("http://down.example", "connection refused");
        assert!(r.fetch_failed);
        assert_eq!(r.domain, None);
        assert_eq!(r.registrar, UNKNOWN);
        assert_eq!(r.country, UNKNOWN);
        assert_eq!(r.ip, UNRESOLVED);
        assert_eq!(r.scores.total(), 0);
        assert_eq!(r.verdict, Verdict::Unreachable);
        assert_ne!(r.verdict, Verdict::Safe);
        assert!(!r.is_suspicious());
    }

    #[test]
    fn analyzed_carries_classification() {
        let c = classify("casino casino");
        let r = ScanRecord::analyzed(
            "https://x.example.com",
            Some("example.com".into()),
            SiteMetadata::default(),
            c,
        );
        assert!(!r.fetch_failed);
        assert_eq!(r.category(), Some(Category::Gambling));
        assert!(r.is_suspicious());
        assert_eq!(r.scores.get(Category::Gambling), 2);
    }
}
