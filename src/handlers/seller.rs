use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

use crate::services::CheckoutService;

/// Store identity for the checkout page header.
pub async fn get_seller(
    State(service): State<Arc<CheckoutService>>,
) -> (StatusCode, Json<Value>) {
    match service.seller_profile().await {
        Ok(profile) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "name": profile.name,
                "legalName": profile.legal_name,
                "taxId": profile.tax_id,
                "logoUrl": profile.logo_url
            })),
        ),
        Err(e) => {
            error!("Seller profile lookup failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
        }
    }
}
