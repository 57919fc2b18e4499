// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::conditions_service::ConditionsService;
use crate::application::refresh_cache::RefreshCache;
use crate::domain::topology::SiteTopology;
use crate::infrastructure::config::load_service_config;
use crate::infrastructure::water_services_client::WaterServicesClient;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{health_check, river_conditions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("river_conditions=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = load_service_config()?;

    // Upstream client (infrastructure layer)
    let source = Arc::new(WaterServicesClient::new(
        config.upstream.base_url.clone(),
        config.upstream.timeout(),
    )?);

    // Conditions service (application layer)
    let topology = Arc::new(SiteTopology::builtin()?);
    let cache = Arc::new(RefreshCache::new(config.cache.ttl()));
    let conditions_service = ConditionsService::new(source, topology.clone(), cache);

    let state = Arc::new(AppState { conditions_service });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/api/data", get(river_conditions))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config.server.bind_addr.parse()?;
    tracing::info!(
        %addr,
        sites = topology.entries().len(),
        stations = topology.all_station_ids().len(),
        upstream = %config.upstream.base_url,
        "Starting river-conditions service"
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
