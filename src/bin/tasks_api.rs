//! In-memory task list service.
//!
//! Run with:
//!   API_KEYS=12345 cargo run --bin tasks-api
//!
//! Try:
//!   curl -H 'X-API-KEY: 12345' -d '{"title":"buy milk"}' http://localhost:8080/tasks
//!   curl -H 'X-API-KEY: 12345' 'http://localhost:8080/tasks?id=1'
//!   curl -H 'X-API-KEY: 12345' -X PATCH -d '{"done":true}' 'http://localhost:8080/tasks?id=1'

use std::sync::Arc;

use crudsvc::config::ServiceConfig;
use crudsvc::middleware::StaticKeys;
use crudsvc::tasks::{self, MemoryTaskStore};
use crudsvc::{Server, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServiceConfig::from_env()?;
    telemetry::init_tracing(&config.log_level);
    let keys = StaticKeys::new(ServiceConfig::api_keys()?);

    let store = Arc::new(MemoryTaskStore::new());
    let app = tasks::router(store, keys);

    Server::bind(&config.server_addr())?
        .grace_period(config.grace_period)
        .serve(app)
        .await?;

    Ok(())
}
