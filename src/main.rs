// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{routing::{get, post}, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::health_service::HealthService;
use crate::application::query_service::QueryService;
use crate::infrastructure::config::load_config;
use crate::infrastructure::fiap_client::FiapClient;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{check_health, query_data};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_config().context("Failed to load configuration")?;
    if let Err(e) = config.datasource.server_offset() {
        tracing::warn!("Queries will be rejected until server_timezone is fixed: {}", e);
    }

    // Create client (infrastructure layer); it serves both fetching and health checks
    let client = Arc::new(FiapClient::new(config.datasource.url.clone())?);

    // Create services (application layer)
    let query_service = QueryService::new(config.datasource.clone(), client.clone());
    let health_service = HealthService::new(client);

    let state = Arc::new(AppState {
        query_service,
        health_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/query", post(query_data))
        .route("/health", get(check_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind_address))?;
    tracing::info!("Starting fiap-datasource on {} for {}", addr, config.datasource.url);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
