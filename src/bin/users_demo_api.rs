//! Demo user API: fixed payloads behind logging and API-key auth.
//!
//! Run with:
//!   cargo run --bin users-demo-api
//!
//! Try:
//!   curl -H 'X-API-KEY: 12345' http://localhost:8080/health
//!   curl -H 'X-API-KEY: 12345' http://localhost:8080/users/7

use crudsvc::config::ServiceConfig;
use crudsvc::middleware::StaticKeys;
use crudsvc::users::demo;
use crudsvc::{Server, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServiceConfig::from_env()?;
    telemetry::init_tracing(&config.log_level);
    let keys = StaticKeys::new(ServiceConfig::api_keys()?);

    let app = demo::router(keys);

    Server::bind(&config.server_addr())?
        .grace_period(config.grace_period)
        .serve(app)
        .await?;

    Ok(())
}
