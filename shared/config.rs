use std::env;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default Discord REST API root (v10)
pub const DEFAULT_DISCORD_API_BASE: &str = "https://discord.com/api/v10";

/// Default bound on each outbound Discord request
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 5;

/// Configuration problems detected while loading `UserinfoConfig`
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("REQUIRED_GUILD_ID environment variable is missing or empty")]
    MissingGuildId,
    #[error("DISCORD_API_BASE_URL is not a valid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("DISCORD_TIMEOUT_SECS must be a positive integer, got {0:?}")]
    InvalidTimeout(String),
}

/// Userinfo function configuration
#[derive(Debug, Clone)]
pub struct UserinfoConfig {
    /// Guild whose member roles are reported back to the caller
    pub required_guild_id: String,
    /// Discord API root, e.g. `https://discord.com/api/v10`
    pub discord_api_base: Url,
    /// Timeout applied to each upstream request
    pub upstream_timeout: Duration,
}

impl UserinfoConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required_guild_id = lookup("REQUIRED_GUILD_ID")
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(ConfigError::MissingGuildId)?;

        let base = lookup("DISCORD_API_BASE_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_DISCORD_API_BASE.to_string());
        let discord_api_base = parse_base_url(&base)?;

        let upstream_timeout = match lookup("DISCORD_TIMEOUT_SECS") {
            Some(raw) if !raw.trim().is_empty() => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            _ => Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        };

        Ok(Self {
            required_guild_id,
            discord_api_base,
            upstream_timeout,
        })
    }

    /// Build a config for a fixed guild against the public Discord API
    pub fn for_guild(required_guild_id: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            required_guild_id: required_guild_id.into(),
            discord_api_base: parse_base_url(DEFAULT_DISCORD_API_BASE)?,
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        })
    }

    pub fn with_api_base(mut self, base: &str) -> Result<Self, ConfigError> {
        self.discord_api_base = parse_base_url(base)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }
}

/// Parse a base URL, normalising it to end with `/` so relative joins append
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };

    let url = Url::parse(&normalized).map_err(|_| ConfigError::InvalidBaseUrl(raw.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(url)
}
