use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

use crate::services::{CheckoutError, CheckoutService};

#[derive(Deserialize)]
pub struct StatusQuery {
    #[serde(rename = "transactionId")]
    transaction_id: Option<String>,
}

pub async fn get_status(
    State(service): State<Arc<CheckoutService>>,
    Query(query): Query<StatusQuery>,
) -> (StatusCode, Json<Value>) {
    let transaction_id = match query.transaction_id.filter(|id| !id.is_empty()) {
        Some(id) => id,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "transactionId is required"})),
            );
        }
    };

    match service.charge_status(&transaction_id).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "transactionId": outcome.transaction_id,
                "status": outcome.status.as_str(),
                "paidAt": outcome.paid_at,
                "endToEndId": outcome.end_to_end_id
            })),
        ),
        Err(CheckoutError::Gateway(message)) | Err(CheckoutError::Validation(message)) => {
            error!("Status lookup failed for {}: {}", transaction_id, message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": message})),
            )
        }
    }
}
