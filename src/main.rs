mod app;
mod handlers;
mod models;
mod services;
mod utils;

use app::config::Config;
use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use services::{AttributionClient, CheckoutService, GatewayClient, InMemoryCorrelationStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    info!("Starting PIX checkout service on port {}", config.server_port);

    let store = Arc::new(InMemoryCorrelationStore::new());
    let gateway = Arc::new(GatewayClient::new(&config));
    let attribution = Arc::new(AttributionClient::new(&config));
    let service = Arc::new(CheckoutService::new(gateway, attribution, store, &config));

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/checkout", post(handlers::checkout::create_checkout))
        .route("/status", get(handlers::status::get_status))
        .route("/webhook", post(handlers::webhook::receive_webhook))
        .route("/seller", get(handlers::seller::get_seller))
        .route("/metrics", get(handlers::metrics::get_metrics))
        .with_state(service);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr).await.unwrap();
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await.unwrap();
}

async fn health_handler() -> StatusCode {
    StatusCode::OK
}
