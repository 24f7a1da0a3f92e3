use serde::Serialize;

use crate::models::order::TrackingParams;

/// Order lifecycle event pushed to the marketing-attribution service.
/// Write-only: this system never reads attribution state back.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionEvent {
    pub order_id: String,
    pub platform: String,
    pub payment_method: String,
    pub status: AttributionStatus,
    pub created_at: String,
    pub approved_date: Option<String>,
    pub refunded_at: Option<String>,
    pub customer: AttributionCustomer,
    pub products: Vec<AttributionProduct>,
    pub tracking_parameters: TrackingParams,
    pub commission: Commission,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributionStatus {
    WaitingPayment,
    Paid,
    Refused,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionCustomer {
    pub name: String,
    pub email: String,
    /// Digits-only, or null when the source had no usable value.
    pub phone: Option<String>,
    pub document: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionProduct {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub price_in_cents: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Commission {
    pub total_price_in_cents: i64,
    pub gateway_fee_in_cents: i64,
    pub user_commission_in_cents: i64,
    pub currency: String,
}

impl Commission {
    pub fn zeroed() -> Self {
        Self {
            total_price_in_cents: 0,
            gateway_fee_in_cents: 0,
            user_commission_in_cents: 0,
            currency: "BRL".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(AttributionStatus::WaitingPayment).unwrap(),
            "waiting_payment"
        );
        assert_eq!(serde_json::to_value(AttributionStatus::Paid).unwrap(), "paid");
        assert_eq!(
            serde_json::to_value(AttributionStatus::Refused).unwrap(),
            "refused"
        );
    }

    #[test]
    fn test_tracking_parameters_serialize_as_nulls_when_absent() {
        let event = AttributionEvent {
            order_id: "PED-X-0001".to_string(),
            platform: "checkout".to_string(),
            payment_method: "pix".to_string(),
            status: AttributionStatus::WaitingPayment,
            created_at: "2026-08-07 12:00:00".to_string(),
            approved_date: None,
            refunded_at: None,
            customer: AttributionCustomer {
                name: "Maria".to_string(),
                email: "maria@example.com".to_string(),
                phone: None,
                document: None,
            },
            products: vec![],
            tracking_parameters: TrackingParams::default(),
            commission: Commission::zeroed(),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert!(value["trackingParameters"]["utm_source"].is_null());
        assert!(value["approvedDate"].is_null());
        assert_eq!(value["status"], "waiting_payment");
    }
}
