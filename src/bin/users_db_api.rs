//! User service backed by PostgreSQL.
//!
//! Reads `DB_HOST`, `DB_PORT`, `POSTGRES_USER`, `POSTGRES_PASSWORD` and
//! `POSTGRES_DB`. Exits with status 1 if the database stays unreachable for
//! the whole retry budget.
//!
//! Try:
//!   curl -d '{"name":"alice"}' http://localhost:8080/users
//!   curl http://localhost:8080/users
//!   curl -X DELETE http://localhost:8080/users/1

use std::sync::Arc;

use crudsvc::config::{DatabaseConfig, ServiceConfig};
use crudsvc::users::{self, PgUserRepository};
use crudsvc::{Server, telemetry};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServiceConfig::from_env()?;
    telemetry::init_tracing(&config.log_level);
    let db_config = DatabaseConfig::from_env()?;

    let pool = match users::connect_with_retry(&db_config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    let repo = PgUserRepository::new(pool.clone());
    repo.ensure_schema().await?;

    let app = users::router(Arc::new(repo));

    let served = Server::bind(&config.server_addr())?
        .grace_period(config.grace_period)
        .serve(app)
        .await;

    pool.close().await;
    info!("database pool closed");
    Ok(served?)
}
