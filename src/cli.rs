use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Report format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Styled terminal table followed by one card per URL
    #[default]
    Table,
    /// Standalone HTML page (table + coloured cards)
    Html,
    Json,
    Yaml,
    Csv,
}

/// Language of verdict and sentinel labels.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Vi,
}

/// Command-line interface definition.
///
/// Verbosity levels:
/// 0 - silent (only the report)
/// 1 - errors (default)
/// 2 - warnings + errors
/// 3 - info (one line per URL)
/// 5 - trace/debug
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Flag websites that look like gambling, betting or prohibited-content sites"
)]
pub struct Cli {
    /// URLs to scan. When empty, the list is read from --file or stdin.
    pub urls: Vec<String>,

    /// File with one URL per line ("-" for stdin)
    #[arg(long, short = 'f', value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Write the report to FILE instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Label language
    #[arg(long, value_enum, default_value_t = Language::En)]
    pub lang: Language,

    /// Page fetch timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Skip WHOIS lookups (registrar / country fall back to defaults)
    #[arg(long = "no-whois", default_value_t = false)]
    pub no_whois: bool,

    /// Skip DNS lookups (IP stays unresolved)
    #[arg(long = "no-dns", default_value_t = false)]
    pub no_dns: bool,

    /// Disable colored output
    #[arg(long = "no-color", default_value_t = false)]
    pub no_color: bool,

    /// Verbosity level (0,1,2,3,5)
    #[arg(long, default_value_t = 1)]
    pub verbose: u8,

    /// Print the JSON schema of the structured report and exit
    #[arg(long = "generate-schema", default_value_t = false)]
    pub generate_schema: bool,
}

impl Cli {
    /// Parse CLI arguments from process args.
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Default `tracing` directive for the chosen verbosity.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "off",
            1 => "error",
            2 => "warn",
            3 | 4 => "info",
            _ => "debug",
        }
    }

    /// Are per-URL progress lines wanted?
    pub fn show_progress(&self) -> bool {
        self.verbose >= 1
    }
}
