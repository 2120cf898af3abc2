use dotenv::dotenv;
use dotenv::from_path;
use std::env;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_DATABASE_PATH: &str = "storefront.db";
const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_JWT_TTL_HOURS: u64 = 24;
const DEFAULT_BCRYPT_COST: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("failed to load env file {path}: {reason}")]
    EnvFile { path: String, reason: String },
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub database_pool_size: u32,
    pub api_host: String,
    pub api_port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_hours: u64,
    pub bcrypt_cost: u32,
}

impl Config {
    /// Load configuration from a specified `.env` file path or default to the root `.env` file.
    /// Variables already present in the process environment take precedence.
    pub fn from_env(env_path: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(path) = env_path {
            from_path(path).map_err(|e| ConfigError::EnvFile {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        } else {
            // A missing `.env` is fine; everything has a default except the secret
            dotenv().ok();
        }

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let config = Self {
            database_path: lookup("DATABASE_PATH")
                .filter(|path| !path.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
            database_pool_size: parse_or(&lookup, "DATABASE_POOL_SIZE", DEFAULT_POOL_SIZE)?,
            api_host: lookup("API_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            api_port: parse_or(&lookup, "API_PORT", DEFAULT_PORT)?,
            jwt_secret,
            jwt_ttl_hours: parse_or(&lookup, "JWT_TTL_HOURS", DEFAULT_JWT_TTL_HOURS)?,
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", DEFAULT_BCRYPT_COST)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database_pool_size == 0 {
            return Err(invalid("DATABASE_POOL_SIZE", "0", "must be at least 1"));
        }
        if self.jwt_ttl_hours == 0 {
            return Err(invalid("JWT_TTL_HOURS", "0", "must be at least 1"));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(invalid(
                "BCRYPT_COST",
                &self.bcrypt_cost.to_string(),
                "must be between 4 and 31",
            ));
        }
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(name, &raw, &e.to_string())),
    }
}

fn invalid(name: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_the_secret_is_set() {
        let config = config_from(&[("JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.database_path, "storefront.db");
        assert_eq!(config.database_pool_size, 8);
        assert_eq!(config.api_address(), "0.0.0.0:8080");
        assert_eq!(config.jwt_ttl_hours, 24);
        assert_eq!(config.bcrypt_cost, 10);
    }

    #[test]
    fn secret_is_required() {
        assert_eq!(config_from(&[]).unwrap_err(), ConfigError::Missing("JWT_SECRET"));
        assert_eq!(
            config_from(&[("JWT_SECRET", "  ")]).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config_from(&[
            ("JWT_SECRET", "s3cret"),
            ("DATABASE_PATH", ":memory:"),
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "3000"),
            ("BCRYPT_COST", "4"),
        ])
        .unwrap();
        assert_eq!(config.database_path, ":memory:");
        assert_eq!(config.api_address(), "127.0.0.1:3000");
        assert_eq!(config.bcrypt_cost, 4);
    }

    #[test]
    fn malformed_values_are_reported_by_name() {
        let port = config_from(&[("JWT_SECRET", "s"), ("API_PORT", "eighty")]).unwrap_err();
        assert!(matches!(port, ConfigError::Invalid { name: "API_PORT", .. }));

        let cost = config_from(&[("JWT_SECRET", "s"), ("BCRYPT_COST", "3")]).unwrap_err();
        assert!(matches!(cost, ConfigError::Invalid { name: "BCRYPT_COST", .. }));

        let pool = config_from(&[("JWT_SECRET", "s"), ("DATABASE_POOL_SIZE", "0")]).unwrap_err();
        assert!(matches!(pool, ConfigError::Invalid { name: "DATABASE_POOL_SIZE", .. }));
    }
}
