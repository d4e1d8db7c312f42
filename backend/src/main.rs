//! Backend entry-point: loads settings, migrates the database and serves the
//! REST API.

mod server;

use std::sync::Arc;

use actix_web::cookie::SameSite;
use actix_web::web;
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use mess_backend::inbound::http::health::HealthState;
use mess_backend::outbound::identity::HttpIdentityProvider;
use mess_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};

use server::{ServerConfig, ServerSettings, create_server};

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

    let settings = ServerSettings::load().wrap_err("loading settings")?;
    let database_url = settings.database_url()?;

    run_migrations(database_url)
        .await
        .wrap_err("applying migrations")?;
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await
        .wrap_err("connecting to the database")?;

    let identity = HttpIdentityProvider::new(
        settings.identity_url()?,
        settings.identity_keys()?,
        settings.identity_timeout(),
    )
    .wrap_err("building identity client")?;

    let bind_addr = settings.bind_addr()?;
    let config = ServerConfig::new(
        settings.session_key()?,
        settings.cookie_secure(),
        SameSite::Lax,
        bind_addr,
    )
    .with_expiring_window(settings.expiring_window_days()?)
    .with_calendar(settings.calendar()?);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config, pool, Arc::new(identity))?;
    info!(%bind_addr, "listening");
    server.await?;
    Ok(())
}
