//! Scan orchestration.
//!
//! Each URL goes through a two-state pipeline:
//!
//! ```text
//! Fetching ──ok, text non-empty──▶ Analyzed   (domain → WHOIS/DNS → classify)
//!     └─────error or empty text──▶ Failed     (unreachable record)
//! ```
//!
//! URLs are processed strictly one after another in input order; each is
//! visited exactly once and nothing is retried. No collaborator error ever
//! leaves `scan_url`: failures become sentinel fields or an unreachable
//! record. The accumulated results and progress live in a `ScanSession`
//! that is returned to the caller.

use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::classify::{Category, classify, matched_keywords};
use crate::config::NetworkConfig;
use crate::domain_utils::registrable_domain_of_url;
use crate::errors::{LookupError, LookupResult};
use crate::extract::extract_page_text;
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::metadata::{SiteMetadata, collect_metadata};
use crate::netutil::{DnsLookup, SystemResolver};
use crate::record::ScanRecord;
use crate::whois::{TcpWhois, WhoisLookup};

/// Terminal state of one URL's pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Failed,
    Analyzed,
}

/// Progress after a URL completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanProgress {
    pub completed: usize,
    pub total: usize,
}

impl ScanProgress {
    /// Fraction complete in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Receives a notification after every URL.
pub trait ProgressReporter {
    fn report(&mut self, progress: ScanProgress, record: &ScanRecord);
}

impl<F> ProgressReporter for F
where
    F: FnMut(ScanProgress, &ScanRecord),
{
    fn report(&mut self, progress: ScanProgress, record: &ScanRecord) {
        self(progress, record)
    }
}

/// Reporter that ignores progress.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&mut self, _progress: ScanProgress, _record: &ScanRecord) {}
}

/// Counts by verdict kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub total: usize,
    pub safe: usize,
    pub suspicious: usize,
    pub unreachable: usize,
}

/// Results and progress of one scan invocation.
#[derive(Debug, Clone)]
pub struct ScanSession {
    records: Vec<ScanRecord>,
    total: usize,
    started_at: DateTime<Utc>,
    duration_ms: u64,
}

impl ScanSession {
    pub fn new(total: usize) -> Self {
        Self {
            records: Vec::with_capacity(total),
            total,
            started_at: Utc::now(),
            duration_ms: 0,
        }
    }

    /// Completed session from records produced elsewhere.
    pub fn from_records(records: Vec<ScanRecord>) -> Self {
        Self {
            total: records.len(),
            records,
            started_at: Utc::now(),
            duration_ms: 0,
        }
    }

    fn push(&mut self, record: ScanRecord) -> ScanProgress {
        self.records.push(record);
        self.progress()
    }

    pub fn progress(&self) -> ScanProgress {
        ScanProgress {
            completed: self.records.len(),
            total: self.total,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.records.len() == self.total
    }

    /// Records in input order.
    pub fn records(&self) -> &[ScanRecord] {
        &self.records
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn summary(&self) -> ScanSummary {
        let mut summary = ScanSummary {
            total: self.records.len(),
            ..Default::default()
        };
        for r in &self.records {
            if r.fetch_failed {
                summary.unreachable += 1;
            } else if r.is_suspicious() {
                summary.suspicious += 1;
            } else {
                summary.safe += 1;
            }
        }
        summary
    }
}

/// Split newline-separated input into URLs: lines trimmed, blanks dropped.
pub fn parse_url_list(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Runs the per-URL pipeline over a list of URLs.
pub struct Scanner {
    fetcher: Box<dyn PageFetcher>,
    whois: Option<Box<dyn WhoisLookup>>,
    dns: Option<Box<dyn DnsLookup>>,
}

impl Scanner {
    /// Scanner with only a fetcher; WHOIS and DNS fields stay at sentinels.
    pub fn new(fetcher: Box<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            whois: None,
            dns: None,
        }
    }

    pub fn with_whois(mut self, whois: Box<dyn WhoisLookup>) -> Self {
        self.whois = Some(whois);
        self
    }

    pub fn with_dns(mut self, dns: Box<dyn DnsLookup>) -> Self {
        self.dns = Some(dns);
        self
    }

    /// Production collaborators, honouring the enable flags.
    pub fn from_config(config: &NetworkConfig) -> LookupResult<Self> {
        let mut scanner = Self::new(Box::new(HttpFetcher::new(config)?));
        if config.enable_whois {
            scanner = scanner.with_whois(Box::new(TcpWhois::new(config)));
        }
        if config.enable_dns {
            scanner = scanner.with_dns(Box::new(SystemResolver::new(config)));
        }
        Ok(scanner)
    }

    /// Scan every URL in order, reporting after each one.
    pub async fn scan(
        &self,
        urls: &[String],
        reporter: &mut dyn ProgressReporter,
    ) -> ScanSession {
        let start = Instant::now();
        let mut session = ScanSession::new(urls.len());

        for url in urls {
            let record = self.scan_url(url).await;
            let progress = session.push(record);
            if let Some(last) = session.records().last() {
                reporter.report(progress, last);
            }
        }

        session.duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Scanned {} URLs in {}ms",
            session.records().len(),
            session.duration_ms
        );
        session
    }

    /// Run the pipeline for one URL. Never fails.
    pub async fn scan_url(&self, url: &str) -> ScanRecord {
        let (state, record) = match self.fetch_text(url).await {
            Err(e) => {
                tracing::warn!("{url}: {e}");
                (ScanState::Failed, ScanRecord::unreachable(url, e.to_string()))
            }
            Ok(text) => (ScanState::Analyzed, self.analyze(url, &text).await),
        };

        tracing::info!("{url}: {:?} -> {}", state, record.verdict);
        record
    }

    async fn fetch_text(&self, url: &str) -> LookupResult<String> {
        let html = self.fetcher.fetch(url).await?;
        let page = extract_page_text(&html);
        if page.is_empty() {
            return Err(LookupError::EmptyPage {
                url: url.to_string(),
            });
        }
        Ok(page.combined())
    }

    async fn analyze(&self, url: &str, text: &str) -> ScanRecord {
        let domain = match registrable_domain_of_url(url) {
            Ok(d) => Some(d),
            Err(e) => {
                tracing::warn!("{e}");
                None
            }
        };

        let metadata = match domain.as_deref() {
            Some(d) => collect_metadata(d, self.whois.as_deref(), self.dns.as_deref()).await,
            None => SiteMetadata::default(),
        };

        let classification = classify(text);
        if tracing::enabled!(tracing::Level::DEBUG) {
            for category in Category::ALL {
                let hits = matched_keywords(text, category);
                if !hits.is_empty() {
                    tracing::debug!("{url}: {category}: {hits:?}");
                }
            }
        }

        ScanRecord::analyzed(url, domain, metadata, classification)
    }
}
