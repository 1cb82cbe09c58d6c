//! Siterisk Library
//!
//! Heuristic website risk classification. For each URL the scanner fetches
//! the page, extracts its visible text, counts keyword hits for gambling,
//! sports-betting and prohibited content, looks up registrar / country via
//! WHOIS and the first IPv4 address via DNS, and renders a verdict:
//!
//! - `Safe` when no keyword matched
//! - `Suspicious(category)` for the highest-scoring category
//! - `Unreachable` when the page could not be retrieved
//!
//! # Example
//!
//! ```rust,no_run
//! use siterisk::classify::{classify, Verdict};
//! use siterisk::extract::extract_text;
//!
//! let text = extract_text("<html><body>Live casino and baccarat</body></html>");
//! let result = classify(&text);
//! assert!(matches!(result.verdict, Verdict::Suspicious(_)));
//! ```

pub mod classify;
pub mod cli;
pub mod config;
pub mod domain_utils;
pub mod errors;
pub mod extract;
pub mod fetch;
pub mod metadata;
pub mod netutil;
pub mod output;
pub mod record;
pub mod rules;
pub mod scanner;
pub mod structured_output;
pub mod styled_output;
pub mod whois;

// Re-export commonly used types and functions for convenience
pub use classify::{Category, CategoryScores, Classification, Verdict, classify};
pub use errors::{LookupError, Result, SiteRiskError};
pub use extract::extract_text;
pub use record::ScanRecord;
pub use scanner::{ScanSession, Scanner, parse_url_list};
pub use styled_output::StyledFormatter;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
