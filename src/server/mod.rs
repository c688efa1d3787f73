mod handlers;
mod state;

use axum::Router;
use axum::routing::{get, post};
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::clock::SystemClock;
use crate::convert::Converter;
use crate::location::{NominatimGeocoder, TimeApiZones};

pub fn build_router() -> Router {
    let state = Arc::new(AppState {
        converter: Converter::new(
            NominatimGeocoder::default(),
            TimeApiZones::default(),
            SystemClock,
        ),
    });

    Router::new()
        .route("/", get(handlers::health))
        .route("/convert", post(handlers::convert))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16) {
    let app = build_router();
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error: Cannot bind to {}: {}", addr, e);
            std::process::exit(1);
        });

    eprintln!("  Meridian server listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Server error: {}", e);
            std::process::exit(1);
        });
}
