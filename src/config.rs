//! Library configuration.
//!
//! Configuration is built once by the host (directly or from environment
//! variables) and validated before the resolver starts.
//!
//! ## Environment Variables
//!
//! - `LINKLAB_API_BASE_URL` - LinkLab API base (default: `https://linklab.cc/api`)
//! - `LINKLAB_CUSTOM_DOMAINS` - Comma-separated custom link domains
//! - `LINKLAB_DEBUG` - Verbose library logging: `true`/`1` (default: off)
//! - `LINKLAB_TIMEOUT_SECS` - HTTP timeout in seconds (default: 10)
//! - `LINKLAB_RETRY_COUNT` - Accepted but unused; lookups run once (default: 3)
//! - `LINKLAB_SETTINGS_PATH` - JSON file for persisted flags (default: in-memory)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use regex::Regex;
use std::env;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

/// DNS-style host name: dot-separated labels of letters, digits and hyphens.
static DOMAIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$")
        .unwrap()
});

pub const DEFAULT_API_BASE_URL: &str = "https://linklab.cc/api";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    /// Extra domains, besides `linklab.cc`, whose links this app owns.
    pub custom_domains: Vec<String>,
    pub debug_logging: bool,
    /// Timeout applied by the HTTP transport to each lookup.
    pub timeout_secs: u64,
    /// Accepted and validated, but never drives retries: each resolution
    /// request issues exactly one lookup.
    pub retry_count: u32,
    pub log_format: String,
    /// Where the install-referrer flag is persisted. `None` keeps it in memory.
    pub settings_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            custom_domains: Vec::new(),
            debug_logging: false,
            timeout_secs: 10,
            retry_count: 3,
            log_format: "text".to_string(),
            settings_path: None,
        }
    }
}

impl Config {
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_custom_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_domains = domains.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_retry_count(mut self, count: u32) -> Self {
        self.retry_count = count;
        self
    }

    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but not a number.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let api_base_url =
            env::var("LINKLAB_API_BASE_URL").unwrap_or(defaults.api_base_url);

        let custom_domains = env::var("LINKLAB_CUSTOM_DOMAINS")
            .map(|v| parse_domain_list(&v))
            .unwrap_or_default();

        let debug_logging = env::var("LINKLAB_DEBUG")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        let timeout_secs = match env::var("LINKLAB_TIMEOUT_SECS") {
            Ok(v) => v
                .parse()
                .with_context(|| format!("LINKLAB_TIMEOUT_SECS must be a number, got '{v}'"))?,
            Err(_) => defaults.timeout_secs,
        };

        let retry_count = match env::var("LINKLAB_RETRY_COUNT") {
            Ok(v) => v
                .parse()
                .with_context(|| format!("LINKLAB_RETRY_COUNT must be a number, got '{v}'"))?,
            Err(_) => defaults.retry_count,
        };

        let log_format = env::var("LOG_FORMAT").unwrap_or(defaults.log_format);
        let settings_path = env::var_os("LINKLAB_SETTINGS_PATH").map(PathBuf::from);

        Ok(Self {
            api_base_url,
            custom_domains,
            debug_logging,
            timeout_secs,
            retry_count,
            log_format,
            settings_path,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `api_base_url` is not an `http(s)://` URL
    /// - `timeout_secs` is outside `1..=300`
    /// - `retry_count` is greater than 10
    /// - `log_format` is not `text` or `json`
    /// - a custom domain is not a valid host name
    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.api_base_url)
            .with_context(|| format!("LINKLAB_API_BASE_URL is not a URL: '{}'", self.api_base_url))?;
        if base.scheme() != "http" && base.scheme() != "https" {
            anyhow::bail!(
                "LINKLAB_API_BASE_URL must start with 'http://' or 'https://', got '{}'",
                self.api_base_url
            );
        }

        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            anyhow::bail!(
                "LINKLAB_TIMEOUT_SECS must be between 1 and 300, got {}",
                self.timeout_secs
            );
        }

        if self.retry_count > 10 {
            anyhow::bail!(
                "LINKLAB_RETRY_COUNT must be at most 10, got {}",
                self.retry_count
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if let Some(bad) = self
            .custom_domains
            .iter()
            .find(|d| d.len() > 253 || !DOMAIN_REGEX.is_match(d))
        {
            anyhow::bail!("Invalid custom domain '{}'", bad);
        }

        Ok(())
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("LinkLab configuration:");
        tracing::info!("  API base: {}", self.api_base_url);
        tracing::info!("  Custom domains: {:?}", self.custom_domains);
        tracing::info!("  Timeout: {}s", self.timeout_secs);
        tracing::info!("  Debug logging: {}", self.debug_logging);
        match &self.settings_path {
            Some(path) => tracing::info!("  Settings: {}", path.display()),
            None => tracing::info!("  Settings: in-memory"),
        }
    }
}

fn parse_domain_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if parsing or validation fails.
///
/// # Note
///
/// Expects a `.env` file, if any, to be loaded already (e.g. via
/// `dotenvy::dotenv()` in the binary).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
