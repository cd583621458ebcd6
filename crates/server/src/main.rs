mod api;
mod config;
mod dto;
mod state;

use crate::{config::ServerConfig, state::AppState};
use axum::routing::get;
use ridership::{engine::Engine, source::SourceReader};
use std::{path::Path, sync::Arc, time::Instant};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    info!("Starting server...");
    let args: Vec<_> = std::env::args().collect();
    if args.len() < 2 {
        error!("Usage: ridership-server <data dir or zip> [config.json]");
        std::process::exit(1);
    }

    let config = match args.get(2) {
        Some(path) => ServerConfig::from_file(path).unwrap_or_else(|err| {
            error!("Failed to read config {path}: {err}");
            std::process::exit(1);
        }),
        None => ServerConfig::default(),
    };

    let path = Path::new(&args[1]);
    let reader = SourceReader::new(config.sources);
    let reader = if path.extension().is_some_and(|ext| ext == "zip") {
        reader.from_zip(path)
    } else {
        reader.from_dir(path)
    };

    info!("Loading data...");
    let now = Instant::now();
    let engine = Engine::load(&reader, config.dashboard).unwrap_or_else(|err| {
        error!("Failed to load data: {err}");
        std::process::exit(1);
    });
    info!(
        "Loading {} records took {:?}",
        engine.dataset().records().len(),
        now.elapsed()
    );
    let state = Arc::new(AppState::new(engine));

    let app = axum::Router::new()
        .route("/lines", get(api::lines))
        .route("/stations", get(api::stations))
        .route("/selection", get(api::selection))
        .route("/bar", get(api::bar))
        .route("/heatmap", get(api::heatmap))
        .route("/trend", get(api::trend))
        .route("/map", get(api::map))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .unwrap_or_else(|err| {
            error!("Failed to bind port {}: {err}", config.port);
            std::process::exit(1);
        });
    info!("Listening to port {}", config.port);
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server stopped: {err}");
    }
}
