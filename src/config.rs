//! Configuration Module
//!
//! Loads server configuration from environment variables.

use std::env;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};

use crate::cache::DEFAULT_QUOTA_BYTES;
use crate::id::IdPolicy;
use crate::store::{DEFAULT_MEMCACHED_ADDR, DEFAULT_TTL_SECONDS};

// == Environment ==
/// Runtime mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Environment::Development => "vaporbin=debug,tower_http=debug",
            Environment::Production => "vaporbin=info,tower_http=info",
        }
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unknown environment {other:?}, expected development or production"
            )),
        }
    }
}

/// Server configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Development or production
    pub environment: Environment,
    /// memcached address; `None` selects the in-memory store
    pub memcache_server: Option<String>,
    /// Interface to listen on
    pub server_host: String,
    /// HTTP server port
    pub server_port: u16,
    /// Public base URL, overriding the one derived from each request
    pub base_url: Option<String>,
    /// Paste lifetime in seconds
    pub paste_ttl: u64,
    /// Byte quota of the in-memory store
    pub cache_quota: usize,
    /// Seconds between expiry sweeps of the in-memory store
    pub cleanup_interval: u64,
    /// Largest accepted paste in bytes
    pub max_paste_size: usize,
    /// Largest accepted request body in bytes
    pub max_body_size: usize,
    /// Identifier length range and retry budget
    pub id_policy: IdPolicy,
}

impl Config {
    /// Creates a Config from environment variables.
    ///
    /// # Environment Variables
    /// - `VAPORBIN_ENV` - `development` or `production` (default: development)
    /// - `MEMCACHE_SERVERS` - memcached address list, first entry used
    ///   (default: in-memory store in development, `127.0.0.1:11211` in production)
    /// - `SERVER_HOST` - listen interface (default: 0.0.0.0)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `BASE_URL` - public base URL (default: derived from the request)
    /// - `PASTE_TTL` - paste lifetime in seconds (default: 86400)
    /// - `CACHE_QUOTA` - in-memory store quota in bytes (default: 25 MB)
    /// - `CLEANUP_INTERVAL` - in-memory sweep frequency in seconds (default: 60)
    /// - `MAX_PASTE_SIZE` - paste size cap in bytes (default: 102400)
    /// - `MAX_BODY_SIZE` - request body cap in bytes (default: 1048576)
    /// - `ID_MIN_LENGTH`, `ID_MAX_LENGTH`, `ID_ATTEMPTS_PER_LENGTH` - id policy
    ///   (default: 3, 20, 10)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let environment = match non_empty_var("VAPORBIN_ENV") {
            Some(value) => value
                .parse::<Environment>()
                .context("VAPORBIN_ENV is invalid")?,
            None => defaults.environment,
        };

        let memcache_server = non_empty_var("MEMCACHE_SERVERS")
            .and_then(|list| {
                list.split(',')
                    .map(str::trim)
                    .find(|addr| !addr.is_empty())
                    .map(str::to_string)
            })
            .or_else(|| {
                (environment == Environment::Production).then(|| DEFAULT_MEMCACHED_ADDR.to_string())
            });

        let id_policy = IdPolicy {
            min_length: parse_var("ID_MIN_LENGTH", defaults.id_policy.min_length)?,
            max_length: parse_var("ID_MAX_LENGTH", defaults.id_policy.max_length)?,
            attempts_per_length: parse_var(
                "ID_ATTEMPTS_PER_LENGTH",
                defaults.id_policy.attempts_per_length,
            )?,
        };
        if let Err(reason) = id_policy.validate() {
            bail!("invalid identifier policy: {reason}");
        }

        let config = Self {
            environment,
            memcache_server,
            server_host: non_empty_var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var("SERVER_PORT", defaults.server_port)?,
            base_url: non_empty_var("BASE_URL").map(|url| url.trim_end_matches('/').to_string()),
            paste_ttl: parse_var("PASTE_TTL", defaults.paste_ttl)?,
            cache_quota: parse_var("CACHE_QUOTA", defaults.cache_quota)?,
            cleanup_interval: parse_var("CLEANUP_INTERVAL", defaults.cleanup_interval)?,
            max_paste_size: parse_var("MAX_PASTE_SIZE", defaults.max_paste_size)?,
            max_body_size: parse_var("MAX_BODY_SIZE", defaults.max_body_size)?,
            id_policy,
        };

        if config.cleanup_interval == 0 {
            bail!("CLEANUP_INTERVAL must be at least 1 second");
        }

        Ok(config)
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Environment: {:?}", self.environment);
        tracing::info!(
            "  Paste store: {}",
            self.memcache_server
                .as_deref()
                .map(|addr| format!("memcached at {addr}"))
                .unwrap_or_else(|| format!("in-memory, {} byte quota", self.cache_quota))
        );
        tracing::info!(
            "  Base URL: {}",
            self.base_url.as_deref().unwrap_or("derived from requests")
        );
        tracing::info!("  Paste TTL: {}s", self.paste_ttl);
        tracing::info!(
            "  Max paste size: {} bytes (body limit {})",
            self.max_paste_size,
            self.max_body_size
        );
        tracing::info!("  Id policy: {:?}", self.id_policy);
        tracing::info!("  Listening on: {}:{}", self.server_host, self.server_port);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            memcache_server: None,
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            base_url: None,
            paste_ttl: DEFAULT_TTL_SECONDS,
            cache_quota: DEFAULT_QUOTA_BYTES,
            cleanup_interval: 60,
            max_paste_size: 100 * 1024,
            max_body_size: 1024 * 1024,
            id_policy: IdPolicy::default(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty_var(name) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a valid number, got {value:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment variables are process-wide
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "VAPORBIN_ENV",
        "MEMCACHE_SERVERS",
        "SERVER_HOST",
        "SERVER_PORT",
        "BASE_URL",
        "PASTE_TTL",
        "CACHE_QUOTA",
        "CLEANUP_INTERVAL",
        "MAX_PASTE_SIZE",
        "MAX_BODY_SIZE",
        "ID_MIN_LENGTH",
        "ID_MAX_LENGTH",
        "ID_ATTEMPTS_PER_LENGTH",
    ];

    fn clear_env_vars() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.memcache_server, None);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.paste_ttl, 86_400);
        assert_eq!(config.cache_quota, 25 * 1024 * 1024);
        assert_eq!(config.max_paste_size, 102_400);
        assert_eq!(config.id_policy, IdPolicy::default());
    }

    #[test]
    fn test_config_from_env_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env_vars();

        let config = Config::from_env().unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.memcache_server, None);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.base_url, None);
        assert_eq!(config.cleanup_interval, 60);
    }

    #[test]
    fn test_production_defaults_to_local_memcached() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env_vars();
        env::set_var("VAPORBIN_ENV", "production");

        let config = Config::from_env().unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.memcache_server.as_deref(), Some("127.0.0.1:11211"));

        clear_env_vars();
    }

    #[test]
    fn test_memcache_servers_first_entry() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env_vars();
        env::set_var("MEMCACHE_SERVERS", " cache-a:11211 , cache-b:11211");

        let config = Config::from_env().unwrap();
        assert_eq!(config.memcache_server.as_deref(), Some("cache-a:11211"));

        clear_env_vars();
    }

    #[test]
    fn test_overrides() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env_vars();
        env::set_var("SERVER_PORT", "8080");
        env::set_var("BASE_URL", "https://paste.example.org/");
        env::set_var("MAX_PASTE_SIZE", "2048");
        env::set_var("ID_MIN_LENGTH", "4");
        env::set_var("ID_MAX_LENGTH", "8");
        env::set_var("ID_ATTEMPTS_PER_LENGTH", "3");

        let config = Config::from_env().unwrap();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.base_url.as_deref(), Some("https://paste.example.org"));
        assert_eq!(config.max_paste_size, 2048);
        assert_eq!(
            config.id_policy,
            IdPolicy {
                min_length: 4,
                max_length: 8,
                attempts_per_length: 3
            }
        );

        clear_env_vars();
    }

    #[test]
    fn test_invalid_values() {
        let _guard = ENV_LOCK.lock().unwrap();

        clear_env_vars();
        env::set_var("SERVER_PORT", "not-a-number");
        let error = Config::from_env().unwrap_err();
        assert!(error.to_string().contains("SERVER_PORT"));

        clear_env_vars();
        env::set_var("VAPORBIN_ENV", "staging");
        let error = Config::from_env().unwrap_err();
        assert!(error.to_string().contains("VAPORBIN_ENV"));

        clear_env_vars();
        env::set_var("ID_MAX_LENGTH", "60");
        assert!(Config::from_env().is_err());

        clear_env_vars();
        env::set_var("CLEANUP_INTERVAL", "0");
        assert!(Config::from_env().is_err());

        clear_env_vars();
    }

    #[test]
    fn test_environment_log_filters() {
        assert!(Environment::Development
            .default_log_filter()
            .contains("debug"));
        assert!(Environment::Production.default_log_filter().contains("info"));
    }
}
