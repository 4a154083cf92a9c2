//! Settings read from the environment once at startup.
//!
//! Every value except the signing key has a default. Bad values are logged
//! and replaced by the default. The signing key falls back to
//! [`DEVELOPMENT_SECRET`] only in debug builds; a release build refuses to
//! start without `SECRET_KEY` or `/run/secrets/SECRET_KEY`.

use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

/// Signing key used by debug builds when no secret is configured.
pub const DEVELOPMENT_SECRET: &str = "development-secret";

/// bcrypt work factor for password hashes.
pub const DEFAULT_HASH_COST: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SECRET_KEY is not set and /run/secrets/SECRET_KEY is missing")]
    MissingSecret,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub secret_key: String,
    /// Lifetime of issued tokens in milliseconds.
    pub token_ttl_ms: i64,
    pub hash_cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            secret_key: DEVELOPMENT_SECRET.to_string(),
            token_ttl_ms: 24 * 60 * 60 * 1000,
            hash_cost: DEFAULT_HASH_COST,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            port: try_load("PORT", defaults.port),
            secret_key: secret_or_fallback(load_secret("SECRET_KEY"), cfg!(debug_assertions))?,
            token_ttl_ms: try_load("TOKEN_TTL_MS", defaults.token_ttl_ms),
            hash_cost: try_load("HASH_COST", defaults.hash_cost),
        })
    }
}

fn secret_or_fallback(
    secret: Option<String>,
    allow_development: bool,
) -> Result<String, ConfigError> {
    match secret {
        Some(secret) => Ok(secret),
        None if allow_development => {
            warn!("SECRET_KEY not set, signing tokens with the development key");
            Ok(DEVELOPMENT_SECRET.to_string())
        }
        None => Err(ConfigError::MissingSecret),
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(e) => {
                warn!("Invalid {key} value: {e}, using default: {default}");
                default
            }
        },
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

fn secret_path(name: &str) -> String {
    format!("/run/secrets/{name}")
}

/// The environment variable wins over a secret mounted at `/run/secrets`.
fn load_secret(name: &str) -> Option<String> {
    if let Ok(value) = env::var(name) {
        return Some(value);
    }
    read_to_string(secret_path(name))
        .map(|s| s.trim().to_string())
        .ok()
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = Config::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.secret_key, DEVELOPMENT_SECRET);
        assert_eq!(config.token_ttl_ms, 86_400_000);
        assert_eq!(config.hash_cost, DEFAULT_HASH_COST);
    }

    #[test]
    fn configured_secret_is_used_as_is() {
        let secret = secret_or_fallback(Some("s3cret".into()), false).unwrap();
        assert_eq!(secret, "s3cret");
    }

    #[test]
    fn mounted_secret_path_uses_variable_name() {
        assert_eq!(secret_path("SECRET_KEY"), "/run/secrets/SECRET_KEY");
    }

    #[test]
    fn development_secret_only_when_allowed() {
        assert_eq!(
            secret_or_fallback(None, true).unwrap(),
            DEVELOPMENT_SECRET
        );
        assert_eq!(
            secret_or_fallback(None, false).unwrap_err(),
            ConfigError::MissingSecret
        );
    }

    #[test]
    fn unset_key_falls_back_to_default() {
        let port: u16 = try_load("LISTS_SERVER_TEST_UNSET_PORT", 1234);
        assert_eq!(port, 1234);
    }
}
