use axum::{extract::State, response::Json};
use std::sync::Arc;

use crate::services::CheckoutService;

pub async fn get_metrics(
    State(service): State<Arc<CheckoutService>>,
) -> Json<serde_json::Value> {
    let metrics = service.metrics();

    Json(serde_json::json!({
        "checkouts_accepted": metrics.get_checkouts_accepted(),
        "checkouts_rejected": metrics.get_checkouts_rejected(),
        "gateway_failures": metrics.get_gateway_failures(),
        "webhooks_received": metrics.get_webhooks_received(),
        "attribution_events": {
            "sent": metrics.get_attribution_sent(),
            "failed": metrics.get_attribution_failed()
        }
    }))
}
