use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use crate::models::order::CheckoutRequest;
use crate::services::{CheckoutError, CheckoutService};

pub async fn create_checkout(
    State(service): State<Arc<CheckoutService>>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let request: CheckoutRequest = match serde_json::from_value(payload) {
        Ok(request) => request,
        Err(e) => {
            error!("Invalid checkout request: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "invalid request body"})),
            );
        }
    };

    info!("Received checkout request for {}", request.customer.email);

    match service.checkout(request).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "orderId": outcome.order_id,
                "transactionId": outcome.transaction_id,
                "pix": {
                    "qrcode": outcome.qrcode,
                    "qrCodeBase64": outcome.qr_code_base64,
                    "expiresAt": outcome.expires_at
                }
            })),
        ),
        Err(CheckoutError::Validation(message)) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": message})),
        ),
        Err(CheckoutError::Gateway(message)) => {
            error!("Checkout failed at the gateway: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": message})),
            )
        }
    }
}
