use crate::app::config::Config;
use crate::models::attribution::AttributionEvent;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum AttributionError {
    #[error("attribution service returned status {0}")]
    Rejected(u16),
    #[error("attribution service connection error: {0}")]
    Connection(#[from] reqwest::Error),
}

/// Attribution is a best-effort side channel: callers catch and log failures
/// and never let them affect the primary operation's outcome.
#[async_trait]
pub trait AttributionSink: Send + Sync {
    async fn submit_order_event(&self, event: &AttributionEvent) -> Result<(), AttributionError>;
}

pub struct AttributionClient {
    client: Client,
    config: Config,
}

impl AttributionClient {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(10000))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            config: config.clone(),
        }
    }
}

#[async_trait]
impl AttributionSink for AttributionClient {
    async fn submit_order_event(&self, event: &AttributionEvent) -> Result<(), AttributionError> {
        let response = self
            .client
            .post(&self.config.attribution_api_url)
            .header("x-api-token", &self.config.attribution_api_token)
            .json(event)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AttributionError::Rejected(response.status().as_u16()));
        }

        info!("attribution event sent for order {}", event.order_id);
        Ok(())
    }
}

/// Timestamp format the attribution service expects, always UTC.
pub fn format_attribution_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Parses a gateway timestamp; empty string when the input is unparseable.
pub fn format_gateway_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => format_attribution_date(parsed.with_timezone(&Utc)),
        Err(_) => String::new(),
    }
}
