pub mod attribution_client;
pub mod checkout_service;
pub mod correlation_store;
pub mod gateway_client;
pub mod service_metrics;

pub use attribution_client::AttributionClient;
pub use checkout_service::{CheckoutError, CheckoutService};
pub use correlation_store::InMemoryCorrelationStore;
pub use gateway_client::GatewayClient;
