// ABOUTME: HTTP server binary for the workout formatter
// ABOUTME: Loads configuration, builds the provider, and serves the formatter routes with tracing and CORS
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Workout Formatter Server
//!
//! Serves `POST /api/format-workout`, `GET /health`, and `GET /ready`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use workout_formatter::{
    config::ServerConfig,
    formatter::WorkoutFormatter,
    llm::create_provider,
    logging,
    middleware::{create_request_span, setup_cors},
    routes::app_router,
};

/// Request bodies carry the whole exercise library
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Parser)]
#[command(name = "workout-formatter-server")]
#[command(about = "Workout Formatter - Turns free-form workout notes into structured JSON")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {e:#}");
            return Err(e);
        }
    };
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    info!("{}", config.summary());

    let provider = create_provider(&config.llm)?;
    let formatter = Arc::new(WorkoutFormatter::with_options(
        provider,
        config.formatter.clone(),
    ));

    let app = app_router(formatter)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(setup_cors(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http().make_span_with(create_request_span::<Body>));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = TcpListener::bind(addr).await?;
    info!("Workout formatter listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Workout formatter stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
    }
    info!("Shutdown signal received");
}
