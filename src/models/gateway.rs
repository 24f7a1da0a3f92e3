use serde::{Deserialize, Serialize};

// Payloads trocados com o gateway de pagamento

/// Create-sale request body. Amounts are integer cents.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeRequest {
    pub amount: i64,
    pub currency: String,
    pub payment_method: String,
    pub items: Vec<ChargeItem>,
    pub customer: ChargeCustomer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping: Option<ChargeAddress>,
    pub pix: PixConfig,
    pub postback_url: String,
    pub external_ref: String,
    /// Serialized order id + tracking parameters, echoed back verbatim on
    /// webhook events. The durable fallback when the correlation store has
    /// lost state by the time the webhook arrives.
    pub metadata: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeItem {
    pub title: String,
    pub unit_price: i64,
    pub quantity: u32,
    /// Product lines are tangible, shipping lines are not.
    pub tangible: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub document: ChargeDocument,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChargeDocument {
    pub number: String,
    #[serde(rename = "type")]
    pub doc_type: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeAddress {
    pub street: String,
    pub number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixConfig {
    pub expires_in_days: u32,
}

/// Successful create-sale response, already unwrapped by the client.
#[derive(Debug, Clone)]
pub struct ChargeCreated {
    pub transaction_id: String,
    pub status: String,
    pub amount: i64,
    pub net_amount: i64,
    pub fee: i64,
    pub pix: PixArtifacts,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PixArtifacts {
    pub qr_code: Option<String>,
    pub copy_paste: Option<String>,
    pub qr_code_base64: Option<String>,
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChargeStatusInfo {
    pub status: String,
    pub paid_at: Option<String>,
    pub end_to_end_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub legal_name: String,
    #[serde(default)]
    pub tax_id: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Charge lifecycle as reported by the gateway. The gateway owns the
/// authoritative state machine; this is only a read-side mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeStatus {
    Pending,
    Paid,
    Cancelled,
    Refunded,
}

impl ChargeStatus {
    /// Case-insensitive; anything unrecognized reads as still pending.
    pub fn from_raw(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "PAID" => ChargeStatus::Paid,
            "CANCELLED" => ChargeStatus::Cancelled,
            "REFUNDED" => ChargeStatus::Refunded,
            _ => ChargeStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChargeStatus::Pending => "pending",
            ChargeStatus::Paid => "paid",
            ChargeStatus::Cancelled => "cancelled",
            ChargeStatus::Refunded => "refunded",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping_case_insensitive() {
        assert_eq!(ChargeStatus::from_raw("paid"), ChargeStatus::Paid);
        assert_eq!(ChargeStatus::from_raw("PAID"), ChargeStatus::Paid);
        assert_eq!(ChargeStatus::from_raw("Paid"), ChargeStatus::Paid);
        assert_eq!(ChargeStatus::from_raw("CANCELLED"), ChargeStatus::Cancelled);
        assert_eq!(ChargeStatus::from_raw("refunded"), ChargeStatus::Refunded);
        assert_eq!(ChargeStatus::from_raw("PENDING"), ChargeStatus::Pending);
    }

    #[test]
    fn test_unknown_status_defaults_to_pending() {
        assert_eq!(ChargeStatus::from_raw("bogus"), ChargeStatus::Pending);
        assert_eq!(ChargeStatus::from_raw(""), ChargeStatus::Pending);
    }

    #[test]
    fn test_charge_request_wire_shape() {
        let request = ChargeRequest {
            amount: 9980,
            currency: "BRL".to_string(),
            payment_method: "pix".to_string(),
            items: vec![ChargeItem {
                title: "Camiseta".to_string(),
                unit_price: 4990,
                quantity: 2,
                tangible: true,
            }],
            customer: ChargeCustomer {
                name: "Maria Silva".to_string(),
                email: "maria@example.com".to_string(),
                phone: "5511988887777".to_string(),
                document: ChargeDocument {
                    number: "12345678909".to_string(),
                    doc_type: "cpf".to_string(),
                },
            },
            shipping: None,
            pix: PixConfig { expires_in_days: 1 },
            postback_url: "https://checkout.example.com/webhook".to_string(),
            external_ref: "PED-ABC-1234".to_string(),
            metadata: "{}".to_string(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["paymentMethod"], "pix");
        assert_eq!(value["externalRef"], "PED-ABC-1234");
        assert_eq!(value["pix"]["expiresInDays"], 1);
        assert_eq!(value["items"][0]["unitPrice"], 4990);
        assert_eq!(value["customer"]["document"]["type"], "cpf");
        assert!(value.get("shipping").is_none());
    }
}
