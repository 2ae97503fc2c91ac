use std::env;
use std::str::FromStr;

use dotenvy::dotenv;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP bind host (e.g., 0.0.0.0)
    pub app_host: String,
    /// HTTP bind port (e.g., 5000)
    pub app_port: u16,

    /// Secret echoed back by Meta during the subscription handshake
    pub verify_token: String,

    pub database: DatabaseConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub name: String,
    pub user: String,
    pub password: String,
    pub port: u16,
    /// Sent as the `pool_mode` server option (the Supabase pooler wants "transaction")
    pub pool_mode: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid number for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env if present
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_host = or_default(&lookup, "APP_HOST", "0.0.0.0");
        let app_port = parse_or_default::<u16, _>(&lookup, "APP_PORT", 5000)?;

        let verify_token = required(&lookup, "VERIFY_TOKEN")?;

        // Missing database settings never block startup; a wrong value only surfaces
        // when an insert runs, so the handshake keeps working.
        let database = DatabaseConfig {
            host: or_default(&lookup, "DB_HOST", "localhost"),
            name: or_default(&lookup, "DB_NAME", "postgres"),
            user: or_default(&lookup, "DB_USER", "postgres"),
            // Empty is valid for trust-auth databases.
            password: or_default(&lookup, "DB_PASSWORD", ""),
            port: parse_or_default::<u16, _>(&lookup, "DB_PORT", 5432)?,
            pool_mode: or_default(&lookup, "DB_POOL_MODE", "transaction"),
        };

        Ok(Self {
            app_host,
            app_port,
            verify_token,
            database,
        })
    }
}

/* --------------------------- helpers --------------------------- */

fn or_default<F>(lookup: &F, key: &'static str, default: &'static str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVar(key))
}

fn parse_or_default<T: FromStr, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) => v.trim().parse::<T>().map_err(|_| ConfigError::InvalidNumber {
            name: key,
            value: v,
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const FULL_ENV: &[(&str, &str)] = &[
        ("VERIFY_TOKEN", "s3cret"),
        ("DB_HOST", "db.local"),
        ("DB_NAME", "inbox"),
        ("DB_USER", "inbox"),
        ("DB_PASSWORD", "pw"),
    ];

    #[test]
    fn database_settings_are_optional_at_startup() {
        let cfg = Config::from_lookup(lookup_from(&[("VERIFY_TOKEN", "s3cret")])).unwrap();

        assert_eq!(cfg.database.host, "localhost");
        assert_eq!(cfg.database.name, "postgres");
        assert_eq!(cfg.database.user, "postgres");
        assert_eq!(cfg.database.password, "");
    }

    #[test]
    fn empty_password_is_accepted() {
        let mut pairs = FULL_ENV.to_vec();
        pairs.retain(|(k, _)| *k != "DB_PASSWORD");
        pairs.push(("DB_PASSWORD", ""));

        let cfg = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(cfg.database.password, "");
        assert_eq!(cfg.database.user, "inbox");
    }

    #[test]
    fn defaults_apply_when_optional_vars_are_unset() {
        let cfg = Config::from_lookup(lookup_from(FULL_ENV)).unwrap();

        assert_eq!(cfg.app_host, "0.0.0.0");
        assert_eq!(cfg.app_port, 5000);
        assert_eq!(cfg.verify_token, "s3cret");
        assert_eq!(cfg.database.host, "db.local");
        assert_eq!(cfg.database.port, 5432);
        assert_eq!(cfg.database.pool_mode, "transaction");
    }

    #[test]
    fn explicit_ports_override_defaults() {
        let mut pairs = FULL_ENV.to_vec();
        pairs.push(("APP_PORT", "8080"));
        pairs.push(("DB_PORT", "6543"));

        let cfg = Config::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(cfg.app_port, 8080);
        assert_eq!(cfg.database.port, 6543);
    }

    #[test]
    fn missing_verify_token_is_reported() {
        let pairs: Vec<_> = FULL_ENV
            .iter()
            .copied()
            .filter(|(k, _)| *k != "VERIFY_TOKEN")
            .collect();

        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("VERIFY_TOKEN")));
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let mut pairs = FULL_ENV.to_vec();
        pairs.push(("DB_PORT", "postgres"));

        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        match err {
            ConfigError::InvalidNumber { name, value } => {
                assert_eq!(name, "DB_PORT");
                assert_eq!(value, "postgres");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
