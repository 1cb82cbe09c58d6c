//! Configuration management for siterisk.
//!
//! Defaults, then `SITERISK_*` environment variables, then command-line
//! flags (highest precedence). Keyword tables are not part of the
//! configuration; they live in `rules`.

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::{Cli, Language, OutputFormat};

/// Default page fetch timeout.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(6);

/// Browser-like user agent sent with every page request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Main configuration structure for siterisk.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Network operation settings
    pub network: NetworkConfig,

    /// Report preferences
    pub output: OutputConfig,
}

/// Network-related configuration options
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Timeout for the page GET
    pub fetch_timeout: Duration,

    /// `User-Agent` header for the page GET
    pub user_agent: String,

    /// Timeout for each WHOIS connection / read
    pub whois_timeout: Duration,

    /// Timeout for the A-record lookup
    pub dns_timeout: Duration,

    /// Bootstrap WHOIS server used to find a TLD's registry
    pub whois_server: String,

    /// Whether WHOIS lookups run at all
    pub enable_whois: bool,

    /// Whether DNS lookups run at all
    pub enable_dns: bool,
}

/// Report configuration
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub language: Language,
    /// `None` means auto-detect from the terminal
    pub use_colors: Option<bool>,
    /// Report destination; stdout when `None`
    pub path: Option<PathBuf>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            whois_timeout: Duration::from_secs(10),
            dns_timeout: Duration::from_secs(5),
            whois_server: "whois.iana.org".to_string(),
            enable_whois: true,
            enable_dns: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            language: Language::En,
            use_colors: None,
            path: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(d) = env_secs("SITERISK_FETCH_TIMEOUT_SECS") {
            config.network.fetch_timeout = d;
        }
        if let Some(d) = env_secs("SITERISK_WHOIS_TIMEOUT_SECS") {
            config.network.whois_timeout = d;
        }
        if let Some(d) = env_secs("SITERISK_DNS_TIMEOUT_SECS") {
            config.network.dns_timeout = d;
        }
        if let Ok(ua) = std::env::var("SITERISK_USER_AGENT") {
            config.network.user_agent = ua;
        }
        if let Ok(server) = std::env::var("SITERISK_WHOIS_SERVER") {
            config.network.whois_server = server;
        }

        config
    }

    /// Merge with CLI arguments, giving CLI precedence
    pub fn merge_with_cli(&mut self, cli: &Cli) {
        if let Some(secs) = cli.timeout {
            self.network.fetch_timeout = Duration::from_secs(secs);
        }
        if cli.no_whois {
            self.network.enable_whois = false;
        }
        if cli.no_dns {
            self.network.enable_dns = false;
        }

        self.output.format = cli.format;
        self.output.language = cli.lang;
        self.output.path = cli.output.clone();
        if cli.no_color {
            self.output.use_colors = Some(false);
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timeouts = [
            ("network.fetch_timeout", self.network.fetch_timeout),
            ("network.whois_timeout", self.network.whois_timeout),
            ("network.dns_timeout", self.network.dns_timeout),
        ];
        for (field, value) in timeouts {
            if value.is_zero() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: "0".to_string(),
                    reason: "Timeout must be greater than 0".to_string(),
                });
            }
        }

        if self.network.user_agent.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "network.user_agent".to_string(),
                value: String::new(),
                reason: "User agent must not be empty".to_string(),
            });
        }

        if self.network.enable_whois && self.network.whois_server.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "network.whois_server".to_string(),
                value: String::new(),
                reason: "A bootstrap WHOIS server is required when WHOIS is enabled".to_string(),
            });
        }

        Ok(())
    }
}

fn env_secs(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
    /// Invalid configuration value
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue {
                field,
                value,
                reason,
            } => {
                write!(f, "Invalid value '{}' for '{}': {}", value, field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.network.fetch_timeout, Duration::from_secs(6));
        assert_eq!(config.network.user_agent, "Mozilla/5.0");
        assert!(config.network.enable_whois);
        assert!(config.network.enable_dns);
        assert_eq!(config.output.format, OutputFormat::Table);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.network.fetch_timeout = Duration::from_secs(0);
        assert!(config.validate().is_err());

        config.network.fetch_timeout = DEFAULT_FETCH_TIMEOUT;
        config.network.user_agent = "  ".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("network.user_agent"));
    }

    #[test]
    fn test_env_loading() {
        unsafe {
            env::set_var("SITERISK_WHOIS_TIMEOUT_SECS", "15");
            env::set_var("SITERISK_USER_AGENT", "siterisk-test");
        }

        let config = Config::from_env();
        assert_eq!(config.network.whois_timeout, Duration::from_secs(15));
        assert_eq!(config.network.user_agent, "siterisk-test");

        unsafe {
            env::remove_var("SITERISK_WHOIS_TIMEOUT_SECS");
            env::remove_var("SITERISK_USER_AGENT");
        }
    }

    #[test]
    fn test_cli_takes_precedence() {
        let cli = Cli::parse_from([
            "siterisk",
            "--timeout",
            "2",
            "--no-dns",
            "--no-color",
            "--format",
            "csv",
        ]);
        let mut config = Config::default();
        config.merge_with_cli(&cli);
        assert_eq!(config.network.fetch_timeout, Duration::from_secs(2));
        assert!(!config.network.enable_dns);
        assert!(config.network.enable_whois);
        assert_eq!(config.output.use_colors, Some(false));
        assert_eq!(config.output.format, OutputFormat::Csv);
    }
}
