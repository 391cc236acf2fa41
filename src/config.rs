//! Service configuration.
//!
//! Everything comes from environment variables, optionally seeded from a
//! `.env` file by the binaries. Parsing goes through a lookup function so it
//! can be exercised without touching the process environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use tracing::warn;

use crate::error::Error;

/// Key accepted when `API_KEYS` is not set.
pub const LEGACY_API_KEY: &str = "12345";

/// HTTP-side configuration shared by every service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// How long in-flight requests get after a shutdown signal.
    pub grace_period: Duration,
    /// Default tracing filter; `RUST_LOG` takes precedence.
    pub log_level: String,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        Ok(Self {
            host: lookup("HTTP_HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: parse_or(&lookup, "HTTP_PORT", 8080)?,
            grace_period: Duration::from_secs(parse_or(&lookup, "SHUTDOWN_GRACE_SECS", 5)?),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_owned()),
        })
    }

    /// Accepted `X-API-KEY` values, from the comma-separated `API_KEYS`.
    ///
    /// Only services that check keys call this, after tracing is installed:
    /// falling back to [`LEGACY_API_KEY`] logs a warning.
    pub fn api_keys() -> Result<Vec<String>, Error> {
        Self::api_keys_from_lookup(|key| env::var(key).ok())
    }

    pub fn api_keys_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Vec<String>, Error> {
        let Some(raw) = lookup("API_KEYS") else {
            warn!("API_KEYS not set, falling back to the legacy shared key");
            return Ok(vec![LEGACY_API_KEY.to_owned()]);
        };

        let keys: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_owned)
            .collect();
        if keys.is_empty() {
            return Err(Error::Config("API_KEYS is set but contains no keys".into()));
        }
        Ok(keys)
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// PostgreSQL connection settings and the startup retry budget.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub connect_attempts: u32,
    pub connect_delay: Duration,
    /// Upper bound on a single connection attempt.
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let connect_attempts = parse_or(&lookup, "DB_CONNECT_ATTEMPTS", 10)?;
        if connect_attempts == 0 {
            return Err(Error::Config("DB_CONNECT_ATTEMPTS must be at least 1".into()));
        }

        Ok(Self {
            host: lookup("DB_HOST").unwrap_or_else(|| "localhost".to_owned()),
            port: parse_or(&lookup, "DB_PORT", 5432)?,
            user: lookup("POSTGRES_USER").unwrap_or_else(|| "postgres".to_owned()),
            password: lookup("POSTGRES_PASSWORD").unwrap_or_default(),
            database: lookup("POSTGRES_DB").unwrap_or_else(|| "postgres".to_owned()),
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            connect_attempts,
            connect_delay: Duration::from_secs(parse_or(&lookup, "DB_CONNECT_DELAY_SECS", 2)?),
            connect_timeout: Duration::from_secs(parse_or(&lookup, "DB_CONNECT_TIMEOUT_SECS", 5)?),
        })
    }

    /// Connection options; TLS is disabled as the database sits on a private network.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .ssl_mode(PgSslMode::Disable)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("{key}={raw:?}: {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn service_defaults() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.grace_period, Duration::from_secs(5));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn missing_api_keys_fall_back_to_legacy_key() {
        let keys = ServiceConfig::api_keys_from_lookup(lookup(&[])).unwrap();
        assert_eq!(keys, vec![LEGACY_API_KEY.to_owned()]);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    #[test]
    fn legacy_fallback_is_logged() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            ServiceConfig::api_keys_from_lookup(lookup(&[])).unwrap();
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"));
        assert!(output.contains("legacy shared key"));
    }

    #[test]
    fn api_keys_are_split_and_trimmed() {
        let keys = ServiceConfig::api_keys_from_lookup(lookup(&[("API_KEYS", " a , b,,c ")])).unwrap();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn blank_api_keys_are_rejected() {
        let err = ServiceConfig::api_keys_from_lookup(lookup(&[("API_KEYS", " , ")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn service_config_ignores_api_keys() {
        let env = lookup(&[("API_KEYS", " "), ("DB_HOST", "db")]);
        assert!(ServiceConfig::from_lookup(&env).is_ok());
        assert!(DatabaseConfig::from_lookup(&env).is_ok());
    }

    #[test]
    fn bad_port_is_a_config_error() {
        let err = ServiceConfig::from_lookup(lookup(&[("HTTP_PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("HTTP_PORT"));
    }

    #[test]
    fn database_reads_postgres_variables() {
        let config = DatabaseConfig::from_lookup(lookup(&[
            ("DB_HOST", "db"),
            ("DB_PORT", "6543"),
            ("POSTGRES_USER", "app"),
            ("POSTGRES_PASSWORD", "pw"),
            ("POSTGRES_DB", "appdb"),
        ]))
        .unwrap();
        assert_eq!(config.host, "db");
        assert_eq!(config.port, 6543);
        assert_eq!(config.user, "app");
        assert_eq!(config.password, "pw");
        assert_eq!(config.database, "appdb");
        assert_eq!(config.connect_attempts, 10);
        assert_eq!(config.connect_delay, Duration::from_secs(2));
    }

    #[test]
    fn zero_connect_attempts_rejected() {
        let err = DatabaseConfig::from_lookup(lookup(&[("DB_CONNECT_ATTEMPTS", "0")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
