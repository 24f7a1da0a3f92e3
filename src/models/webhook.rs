use serde::{Deserialize, Serialize};

use crate::models::order::TrackingParams;

/// Inbound gateway event envelope. The gateway has shipped several spellings
/// of these fields over time; aliases accept the legacy ones.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEnvelope {
    #[serde(alias = "type")]
    pub event: String,
    #[serde(default, alias = "id")]
    pub transaction_id: Option<String>,
    #[serde(default, alias = "externalRef")]
    pub external_reference: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub customer: Option<WebhookCustomer>,
    #[serde(default)]
    pub paid_at: Option<String>,
    #[serde(default)]
    pub fee: Option<i64>,
    #[serde(default)]
    pub net_amount: Option<i64>,
    #[serde(default)]
    pub metadata: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookCustomer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub document: Option<String>,
}

impl WebhookEnvelope {
    /// The correlation key: external reference when the gateway echoed it,
    /// else the transaction id, else empty.
    pub fn order_id(&self) -> String {
        self.external_reference
            .clone()
            .filter(|v| !v.is_empty())
            .or_else(|| self.transaction_id.clone())
            .unwrap_or_default()
    }
}

/// Known gateway event kinds plus an explicit unrecognized case, so dispatch
/// stays exhaustive as kinds are added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    TransactionCreated,
    TransactionPaid,
    TransactionFailed,
    /// The gateway operator's own payout lifecycle; irrelevant to orders.
    Withdrawal,
    Unrecognized(String),
}

impl WebhookEvent {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "transaction.created" => WebhookEvent::TransactionCreated,
            "transaction.paid" => WebhookEvent::TransactionPaid,
            "transaction.failed" => WebhookEvent::TransactionFailed,
            _ if raw.starts_with("withdrawal.") => WebhookEvent::Withdrawal,
            other => WebhookEvent::Unrecognized(other.to_string()),
        }
    }
}

/// Opaque metadata attached to the charge at creation time and echoed back
/// on webhook events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeMetadata {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_params: Option<TrackingParams>,
}

impl ChargeMetadata {
    pub fn encode(order_id: &str, tracking_params: Option<&TrackingParams>) -> String {
        serde_json::to_string(&ChargeMetadata {
            order_id: Some(order_id.to_string()),
            tracking_params: tracking_params.cloned(),
        })
        .unwrap_or_default()
    }
}

/// Recovers tracking parameters from the echoed metadata string. Supports
/// the nested `trackingParams` key and the flat legacy shape; anything
/// unparseable degrades to an all-null block.
pub fn tracking_from_metadata(raw: &str) -> TrackingParams {
    if let Ok(metadata) = serde_json::from_str::<ChargeMetadata>(raw) {
        if let Some(params) = metadata.tracking_params {
            return params;
        }
    }
    serde_json::from_str::<TrackingParams>(raw).unwrap_or_default()
}
