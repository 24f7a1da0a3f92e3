use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use crate::models::webhook::WebhookEnvelope;
use crate::services::CheckoutService;

pub async fn receive_webhook(
    State(service): State<Arc<CheckoutService>>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    // logged only; the sender is not authenticated
    let event_header = header_value(&headers, "x-webhook-event");
    let source_header = header_value(&headers, "x-webhook-source");
    info!(
        "Webhook received (event: {}, source: {})",
        event_header, source_header
    );

    let envelope: WebhookEnvelope = match serde_json::from_value(payload) {
        Ok(envelope) => envelope,
        Err(e) => {
            error!("Unparseable webhook payload: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "invalid webhook payload"})),
            );
        }
    };

    let message = service.handle_webhook(envelope).await;
    (
        StatusCode::OK,
        Json(serde_json::json!({"success": true, "message": message})),
    )
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
}
