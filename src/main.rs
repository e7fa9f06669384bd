// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trail-Tracker API Server
//!
//! Keeps daily step ledgers and walks users along famous trails,
//! awarding landmarks, streaks and badges as they go.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use trail_tracker::{
    config::Config,
    db::MemoryStore,
    services::{ActivityProcessor, BadgeService, FreeTierAllowlist, TrailService},
    time_utils::SystemClock,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Trail-Tracker API");

    // Load trail catalog
    tracing::info!(path = %config.trails_path, "Loading trail catalog");
    let trails = TrailService::load_from_file(&config.trails_path)?;
    tracing::info!(count = trails.trails().len(), "Trail catalog loaded");

    let entitlement = match &config.free_trail_ids {
        Some(ids) => FreeTierAllowlist::new(ids.iter().cloned()),
        None => FreeTierAllowlist::from_catalog(&trails),
    };

    let store = MemoryStore::new();
    let processor = ActivityProcessor::new(
        Arc::new(store),
        trails,
        BadgeService::default(),
        Arc::new(SystemClock),
    );
    tracing::info!(
        badges = processor.badges().definitions().len(),
        "Activity processor initialized"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        processor,
        entitlement,
    });

    // Build router
    let app = trail_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive("trail_tracker=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
