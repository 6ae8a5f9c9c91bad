// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use anyhow::Context;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::level1_service::Level1Service;
use crate::application::level2_service::Level2Service;
use crate::application::statistics_service::StatisticsService;
use crate::infrastructure::config::load_odin_config;
use crate::infrastructure::odin_api_repository::OdinApiRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    calendar_events, calendar_start, cross_sections, day_overview, freqmode_info,
    freqmode_selector, health_check, period_overview, project_selector, scan_plots, scan_table,
    search_scans, statistics, stream_calendar,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_odin_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(OdinApiRepository::new(
        config.api.base_url.clone(),
        Duration::from_secs(config.api.timeout_secs),
    )?);

    // Create services (application layer)
    let level1_service = Level1Service::new(repository.clone());
    let level2_service = Level2Service::new(repository.clone());
    let statistics_service = StatisticsService::new(repository);

    // Create application state
    let state = Arc::new(AppState {
        level1_service,
        level2_service,
        statistics_service,
        calendar_periods: config.server.calendar_periods,
    });

    // Build router (presentation layer)
    // Compression is negotiated in the JSON response builder; the NDJSON stream stays uncompressed.
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/freqmodes", get(freqmode_info))
        .route("/level1/calendar/:date", get(calendar_events))
        .route("/level1/calendar/:date/start", get(calendar_start))
        .route("/level1/calendar/:date/stream", get(stream_calendar))
        .route("/level1/:date", get(day_overview))
        .route("/level1/:date/:freqmode", get(scan_table))
        .route("/level1/:date/:freqmode/plots", get(scan_plots))
        .route("/level2/projects", get(project_selector))
        .route("/level2/:mode/:project/freqmodes", get(freqmode_selector))
        .route("/level2/:mode/:project/area", get(period_overview))
        .route("/level2/:mode/:project/:freqmode/:kind", get(search_scans))
        .route("/level2/:mode/:project/:freqmode/:kind/plots", get(cross_sections))
        .route("/statistics", get(statistics))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.server.listen_addr))?;
    tracing::info!("Starting odin-dashboard service on {} (API {})", addr, config.api.base_url);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
