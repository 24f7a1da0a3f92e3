use serde::{Deserialize, Serialize};

/// Checkout request body as sent by the storefront. Orders are transient:
/// reconstructed per request, never persisted as an entity.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub customer: Customer,
    #[serde(default)]
    pub address: Option<ShippingAddress>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub shipping: Option<ShippingLine>,
    #[serde(default, rename = "trackingParams")]
    pub tracking_params: Option<TrackingParams>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(default, rename = "documentType")]
    pub document_type: Option<String>,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub complement: Option<String>,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderItem {
    pub name: String,
    /// Unit price in decimal currency units, converted to cents exactly once
    /// when the gateway payload is built.
    pub price: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShippingLine {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
}

/// Marketing-origin tags carried from checkout through to the attribution
/// event. All fields optional; absent values go over the wire as null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingParams {
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub sck: Option<String>,
    #[serde(default)]
    pub utm_source: Option<String>,
    #[serde(default)]
    pub utm_campaign: Option<String>,
    #[serde(default)]
    pub utm_medium: Option<String>,
    #[serde(default)]
    pub utm_content: Option<String>,
    #[serde(default)]
    pub utm_term: Option<String>,
}

impl CheckoutRequest {
    /// Rejects incomplete orders before any outbound call is made.
    pub fn validate(&self) -> Result<(), String> {
        if self.customer.name.trim().is_empty() {
            return Err("customer name is required".to_string());
        }
        if self.customer.email.trim().is_empty() {
            return Err("customer email is required".to_string());
        }
        if self.customer.cpf.trim().is_empty() {
            return Err("customer cpf is required".to_string());
        }
        if self.customer.phone.trim().is_empty() {
            return Err("customer phone is required".to_string());
        }
        if self.items.is_empty() {
            return Err("order must contain at least one item".to_string());
        }
        if !(self.total > 0.0) {
            return Err("order total must be a positive number".to_string());
        }
        Ok(())
    }
}
