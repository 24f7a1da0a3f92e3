use crate::app::config::Config;
use crate::models::gateway::{
    ChargeCreated, ChargeRequest, ChargeStatusInfo, PixArtifacts, SellerProfile,
};
use crate::utils::money::from_cents;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

/// Any gateway failure, transport or logical, becomes a `GatewayError`
/// carrying a message. The client never panics; the orchestrator branches on
/// this value to decide the HTTP response.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Rejected(String),
    #[error("payment gateway connection error: {0}")]
    Connection(#[from] reqwest::Error),
}

impl GatewayError {
    /// Message safe to forward to the storefront.
    pub fn message(&self) -> String {
        match self {
            GatewayError::Rejected(message) => message.clone(),
            GatewayError::Connection(_) => "payment gateway connection error".to_string(),
        }
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_charge(&self, request: &ChargeRequest) -> Result<ChargeCreated, GatewayError>;
    async fn get_status(&self, transaction_id: &str) -> Result<ChargeStatusInfo, GatewayError>;
    async fn get_seller_profile(&self) -> Result<SellerProfile, GatewayError>;
}

pub struct GatewayClient {
    client: Client,
    config: Config,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SaleResponse {
    id: Option<String>,
    status: Option<String>,
    amount: Option<i64>,
    net_amount: Option<i64>,
    fee: Option<i64>,
    pix: Option<PixArtifacts>,
    paid_at: Option<String>,
    end_to_end_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl GatewayClient {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(15000))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            config: config.clone(),
        }
    }

    /// Secret key wins when both credentials are configured.
    fn api_key(&self) -> &str {
        if !self.config.gateway_secret_key.is_empty() {
            &self.config.gateway_secret_key
        } else {
            &self.config.gateway_public_key
        }
    }

    /// Combined key under the current header names plus the raw credentials
    /// under the legacy ones, so both gateway credential schemes accept us.
    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        let key = self.api_key();
        request
            .header("x-api-key", key)
            .header("Authorization", format!("Bearer {}", key))
            .header("x-public-key", &self.config.gateway_public_key)
            .header("x-secret-key", &self.config.gateway_secret_key)
    }

    async fn rejection(response: reqwest::Response) -> GatewayError {
        let status = response.status();
        let body: ErrorBody = response.json().await.unwrap_or_default();
        let message = body
            .message
            .or(body.error)
            .unwrap_or_else(|| format!("payment gateway returned status {}", status));
        GatewayError::Rejected(message)
    }
}

#[async_trait]
impl PaymentGateway for GatewayClient {
    async fn create_charge(&self, request: &ChargeRequest) -> Result<ChargeCreated, GatewayError> {
        let url = format!("{}/v1/sales", self.config.gateway_base_url);
        let response = self
            .with_auth(self.client.post(&url))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let err = Self::rejection(response).await;
            error!("create charge rejected for {}: {}", request.external_ref, err);
            return Err(err);
        }

        let sale: SaleResponse = response.json().await?;
        let transaction_id = sale.id.unwrap_or_default();
        info!(
            "charge {} created for order {} (R$ {:.2})",
            transaction_id,
            request.external_ref,
            from_cents(request.amount)
        );

        Ok(ChargeCreated {
            transaction_id,
            status: sale.status.unwrap_or_default(),
            amount: sale.amount.unwrap_or(request.amount),
            net_amount: sale.net_amount.unwrap_or(0),
            fee: sale.fee.unwrap_or(0),
            pix: sale.pix.unwrap_or_default(),
        })
    }

    async fn get_status(&self, transaction_id: &str) -> Result<ChargeStatusInfo, GatewayError> {
        let url = format!("{}/v1/sales/{}", self.config.gateway_base_url, transaction_id);
        let response = self.with_auth(self.client.get(&url)).send().await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let sale: SaleResponse = response.json().await?;
        Ok(ChargeStatusInfo {
            status: sale.status.unwrap_or_default(),
            paid_at: sale.paid_at,
            end_to_end_id: sale.end_to_end_id,
        })
    }

    async fn get_seller_profile(&self) -> Result<SellerProfile, GatewayError> {
        let url = format!("{}/v1/seller", self.config.gateway_base_url);
        let response = self.with_auth(self.client.get(&url)).send().await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        Ok(response.json().await?)
    }
}
