//! Payroll service entry-point: loads settings, prepares the database and
//! serves the record API.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use payroll_backend::domain::RecordService;
use payroll_backend::inbound::http::health::HealthState;
use payroll_backend::inbound::http::state::HttpState;
use payroll_backend::outbound::persistence::{
    DbPool, DieselLeaveStatsQuery, DieselRecordStore, run_pending_migrations,
};
use server::{ServerConfig, ServiceSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load().wrap_err("failed to load service settings")?;
    let pool_config = settings
        .pool_config()
        .ok_or_else(|| eyre!("PAYROLL_DATABASE_URL must be set"))?;

    if settings.run_migrations() {
        run_pending_migrations(pool_config.database_url().to_owned())
            .await
            .wrap_err("failed to apply database migrations")?;
    } else {
        info!("skipping database migrations");
    }

    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("failed to build database pool")?;
    let records = RecordService::new(
        Arc::new(DieselRecordStore::new(pool.clone())),
        Arc::new(DefaultClock),
    );
    let http_state = HttpState::new(
        Arc::new(records),
        Arc::new(DieselLeaveStatsQuery::new(pool)),
    );

    let health_state = web::Data::new(HealthState::new());
    let config =
        ServerConfig::new(settings.bind_addr()).with_cors_origins(settings.cors_origins());
    let server = create_server(health_state, http_state, config)?;
    server.await?;
    Ok(())
}
