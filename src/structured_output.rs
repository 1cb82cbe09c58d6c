//! Structured output for JSON and YAML serialization.
//!
//! The report is a flat, machine-readable view of a scan session: tool
//! metadata, one entry per URL in input order, and the verdict counts.
//! Labels are always English here; `--lang` only affects human formats.

use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::classify::{Category, Verdict};
use crate::record::ScanRecord;
use crate::scanner::ScanSession;

/// Root structure for structured siterisk output
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct ScanReport {
    /// Tool version and metadata
    pub metadata: ReportMetadata,

    /// One entry per scanned URL, in input order
    pub results: Vec<SiteResult>,

    /// Counts by verdict kind
    pub summary: ReportSummary,
}

/// Tool metadata and versioning information
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct ReportMetadata {
    pub tool_name: String,
    pub version: String,

    /// When the scan started
    pub generated_at: chrono::DateTime<chrono::Utc>,

    /// Wall-clock time for the whole scan
    pub duration_ms: u64,

    pub schema_version: String,
}

/// Verdict kind without the category payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    Safe,
    Suspicious,
    Unreachable,
}

impl From<&Verdict> for VerdictKind {
    fn from(v: &Verdict) -> Self {
        match v {
            Verdict::Safe => VerdictKind::Safe,
            Verdict::Suspicious(_) => VerdictKind::Suspicious,
            Verdict::Unreachable => VerdictKind::Unreachable,
        }
    }
}

/// Keyword counts per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct ScoreBreakdown {
    pub gambling: u32,
    pub sports_betting: u32,
    pub prohibited: u32,
}

/// Result for a single URL
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct SiteResult {
    pub url: String,

    /// Registrable domain; absent when the page could not be fetched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Registrar name or "Unknown"
    pub registrar: String,

    /// Country from WHOIS, TLD fallback, or "Unknown"
    pub country: String,

    /// First IPv4 address or "Unresolved"
    pub ip: String,

    pub scores: ScoreBreakdown,

    pub verdict: VerdictKind,

    /// Flagged category for suspicious sites
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    /// Human-readable verdict, e.g. "Suspicious: Gambling"
    pub verdict_label: String,

    pub fetch_failed: bool,

    /// Why the fetch failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&ScanRecord> for SiteResult {
    fn from(r: &ScanRecord) -> Self {
        Self {
            url: r.url.clone(),
            domain: r.domain.clone(),
            registrar: r.registrar.clone(),
            country: r.country.clone(),
            ip: r.ip.clone(),
            scores: ScoreBreakdown {
                gambling: r.scores.get(Category::Gambling),
                sports_betting: r.scores.get(Category::SportsBetting),
                prohibited: r.scores.get(Category::Prohibited),
            },
            verdict: VerdictKind::from(&r.verdict),
            category: r.category(),
            verdict_label: r.verdict.to_string(),
            fetch_failed: r.fetch_failed,
            error: r.error.clone(),
        }
    }
}

/// Counts by verdict kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct ReportSummary {
    pub total: usize,
    pub safe: usize,
    pub suspicious: usize,
    pub unreachable: usize,
}

impl ScanReport {
    /// Build the report for a finished session
    pub fn from_session(session: &ScanSession) -> Self {
        let s = session.summary();
        Self {
            metadata: ReportMetadata {
                tool_name: crate::NAME.to_string(),
                version: crate::VERSION.to_string(),
                generated_at: session.started_at(),
                duration_ms: session.duration_ms(),
                schema_version: "1.0.0".to_string(),
            },
            results: session.records().iter().map(SiteResult::from).collect(),
            summary: ReportSummary {
                total: s.total,
                safe: s.safe,
                suspicious: s.suspicious,
                unreachable: s.unreachable,
            },
        }
    }

    /// Generate JSON schema for this output format
    pub fn generate_json_schema() -> Result<String> {
        let schema = schemars::schema_for!(ScanReport);
        Ok(serde_json::to_string_pretty(&schema)?)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
