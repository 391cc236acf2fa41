//! Connecting to PostgreSQL at startup.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::error::Error;

/// Opens a pool, retrying while the database is not yet accepting
/// connections.
///
/// Makes at most `connect_attempts` attempts, each bounded by
/// `connect_timeout`, with `connect_delay` between them. Every failure is
/// logged; once the budget is spent the last error is returned.
pub async fn connect_with_retry(config: &DatabaseConfig) -> Result<PgPool, Error> {
    let options = config.connect_options();
    let mut attempt = 1;

    loop {
        let result = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(options.clone())
            .await;

        match result {
            Ok(pool) => {
                info!(
                    host = %config.host,
                    port = config.port,
                    database = %config.database,
                    attempt,
                    "connected to database"
                );
                return Ok(pool);
            }
            Err(source) if attempt >= config.connect_attempts => {
                return Err(Error::DatabaseUnreachable { attempts: attempt, source });
            }
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts = config.connect_attempts,
                    retry_in_secs = config.connect_delay.as_secs_f64(),
                    "waiting for database: {e}"
                );
                tokio::time::sleep(config.connect_delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn gives_up_after_budget() {
        // Port 1 on loopback refuses connections immediately.
        let config = DatabaseConfig {
            host: "127.0.0.1".into(),
            port: 1,
            user: "postgres".into(),
            password: String::new(),
            database: "postgres".into(),
            max_connections: 1,
            connect_attempts: 2,
            connect_delay: Duration::from_millis(10),
            connect_timeout: Duration::from_millis(200),
        };

        match connect_with_retry(&config).await {
            Err(Error::DatabaseUnreachable { attempts, .. }) => assert_eq!(attempts, 2),
            other => panic!("expected DatabaseUnreachable, got {other:?}"),
        }
    }
}
