use crate::app::config::Config;
use crate::models::attribution::{
    AttributionCustomer, AttributionEvent, AttributionProduct, AttributionStatus, Commission,
};
use crate::models::gateway::{
    ChargeAddress, ChargeCreated, ChargeCustomer, ChargeDocument, ChargeItem, ChargeRequest,
    ChargeStatus, PixConfig, SellerProfile,
};
use crate::models::order::{CheckoutRequest, TrackingParams};
use crate::models::webhook::{tracking_from_metadata, ChargeMetadata, WebhookEnvelope, WebhookEvent};
use crate::services::attribution_client::{
    format_attribution_date, format_gateway_timestamp, AttributionSink,
};
use crate::services::correlation_store::CorrelationStore;
use crate::services::gateway_client::PaymentGateway;
use crate::services::service_metrics::ServiceMetrics;
use crate::utils::money::to_cents;
use crate::utils::order_id::generate_order_id;
use crate::utils::strings::digits_only;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

const CURRENCY: &str = "BRL";
const PAYMENT_METHOD: &str = "pix";
const PLATFORM_TAG: &str = "pix-checkout";
const PIX_EXPIRES_IN_DAYS: u32 = 1;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Gateway(String),
}

#[derive(Debug)]
pub struct CheckoutOutcome {
    pub order_id: String,
    pub transaction_id: String,
    /// Copy-paste payment string when the gateway provided one, else the raw
    /// QR string.
    pub qrcode: String,
    pub qr_code_base64: Option<String>,
    pub expires_at: Option<String>,
}

#[derive(Debug)]
pub struct StatusOutcome {
    pub transaction_id: String,
    pub status: ChargeStatus,
    pub paid_at: Option<String>,
    pub end_to_end_id: Option<String>,
}

/// Glue between the storefront, the payment gateway and the attribution
/// service. Holds no order state of its own beyond the correlation store.
pub struct CheckoutService {
    gateway: Arc<dyn PaymentGateway>,
    attribution: Arc<dyn AttributionSink>,
    store: Arc<dyn CorrelationStore>,
    metrics: Arc<ServiceMetrics>,
    config: Config,
}

impl CheckoutService {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        attribution: Arc<dyn AttributionSink>,
        store: Arc<dyn CorrelationStore>,
        config: &Config,
    ) -> Self {
        Self {
            gateway,
            attribution,
            store,
            metrics: Arc::new(ServiceMetrics::new()),
            config: config.clone(),
        }
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.metrics
    }

    /// Creates a PIX charge for the order. Tracking parameters are persisted
    /// before the gateway call so the webhook path can recover them; the
    /// `waiting_payment` attribution event goes out only after the gateway
    /// accepted the charge, and its failure never fails the checkout.
    pub async fn checkout(&self, request: CheckoutRequest) -> Result<CheckoutOutcome, CheckoutError> {
        request.validate().map_err(|message| {
            self.metrics.increment_checkouts_rejected();
            CheckoutError::Validation(message)
        })?;

        let order_id = generate_order_id();
        info!("checkout accepted, order {}", order_id);

        if let Some(params) = &request.tracking_params {
            self.store.save(&order_id, params.clone());
        }

        let charge = self.build_charge_request(&request, &order_id);
        let created = match self.gateway.create_charge(&charge).await {
            Ok(created) => created,
            Err(err) => {
                self.metrics.increment_gateway_failures();
                return Err(CheckoutError::Gateway(err.message()));
            }
        };

        info!(
            "order {} charge {} accepted ({})",
            order_id, created.transaction_id, created.status
        );

        let event = self.build_checkout_event(&request, &order_id, &created);
        self.send_attribution(&event).await;
        self.metrics.increment_checkouts_accepted();

        let qrcode = created
            .pix
            .copy_paste
            .clone()
            .or_else(|| created.pix.qr_code.clone())
            .unwrap_or_default();

        Ok(CheckoutOutcome {
            order_id,
            transaction_id: created.transaction_id,
            qrcode,
            qr_code_base64: created.pix.qr_code_base64,
            expires_at: created.pix.expires_at,
        })
    }

    pub async fn charge_status(&self, transaction_id: &str) -> Result<StatusOutcome, CheckoutError> {
        let info = self.gateway.get_status(transaction_id).await.map_err(|err| {
            self.metrics.increment_gateway_failures();
            CheckoutError::Gateway(err.message())
        })?;

        Ok(StatusOutcome {
            transaction_id: transaction_id.to_string(),
            status: ChargeStatus::from_raw(&info.status),
            paid_at: info.paid_at,
            end_to_end_id: info.end_to_end_id,
        })
    }

    pub async fn seller_profile(&self) -> Result<SellerProfile, CheckoutError> {
        self.gateway.get_seller_profile().await.map_err(|err| {
            self.metrics.increment_gateway_failures();
            CheckoutError::Gateway(err.message())
        })
    }

    /// Dispatches a decoded gateway event. Every recognized or safely
    /// ignorable event is acknowledged so the gateway does not retry events
    /// this system cannot act on differently.
    pub async fn handle_webhook(&self, envelope: WebhookEnvelope) -> &'static str {
        self.metrics.increment_webhooks_received();
        let order_id = envelope.order_id();
        info!(
            "webhook event {} for order {} (status {})",
            envelope.event,
            order_id,
            envelope.status.as_deref().unwrap_or("-")
        );

        match WebhookEvent::parse(&envelope.event) {
            WebhookEvent::TransactionCreated => {
                // waiting_payment was already sent at checkout time
                "transaction acknowledged"
            }
            WebhookEvent::TransactionPaid => {
                let tracking = self.resolve_tracking(&order_id, &envelope);
                let event =
                    self.build_webhook_event(&envelope, &order_id, tracking, AttributionStatus::Paid);
                if self.send_attribution(&event).await {
                    self.store.delete(&order_id);
                }
                "payment confirmation processed"
            }
            WebhookEvent::TransactionFailed => {
                let tracking = self.resolve_tracking(&order_id, &envelope);
                let event = self.build_webhook_event(
                    &envelope,
                    &order_id,
                    tracking,
                    AttributionStatus::Refused,
                );
                self.send_attribution(&event).await;
                self.store.delete(&order_id);
                "payment failure processed"
            }
            WebhookEvent::Withdrawal => "withdrawal event ignored",
            WebhookEvent::Unrecognized(kind) => {
                info!("ignoring unrecognized webhook event {}", kind);
                "event ignored"
            }
        }
    }

    /// Store lookup first; the metadata echoed back by the gateway is the
    /// durable fallback when this process lost the entry (restart).
    fn resolve_tracking(&self, order_id: &str, envelope: &WebhookEnvelope) -> TrackingParams {
        if let Some(params) = self.store.get(order_id) {
            return params;
        }
        envelope
            .metadata
            .as_deref()
            .map(tracking_from_metadata)
            .unwrap_or_default()
    }

    async fn send_attribution(&self, event: &AttributionEvent) -> bool {
        match self.attribution.submit_order_event(event).await {
            Ok(()) => {
                self.metrics.increment_attribution_sent();
                true
            }
            Err(err) => {
                self.metrics.increment_attribution_failed();
                warn!("attribution event failed for order {}: {}", event.order_id, err);
                false
            }
        }
    }

    fn build_charge_request(&self, request: &CheckoutRequest, order_id: &str) -> ChargeRequest {
        let mut items: Vec<ChargeItem> = request
            .items
            .iter()
            .map(|item| ChargeItem {
                title: item.name.clone(),
                unit_price: to_cents(item.price),
                quantity: item.quantity,
                tangible: true,
            })
            .collect();

        if let Some(shipping) = &request.shipping {
            if shipping.price > 0.0 {
                items.push(ChargeItem {
                    title: if shipping.name.is_empty() {
                        "Frete".to_string()
                    } else {
                        shipping.name.clone()
                    },
                    unit_price: to_cents(shipping.price),
                    quantity: 1,
                    tangible: false,
                });
            }
        }

        ChargeRequest {
            amount: to_cents(request.total),
            currency: CURRENCY.to_string(),
            payment_method: PAYMENT_METHOD.to_string(),
            items,
            customer: ChargeCustomer {
                name: request.customer.name.clone(),
                email: request.customer.email.clone(),
                phone: digits_only(&request.customer.phone),
                document: ChargeDocument {
                    number: digits_only(&request.customer.cpf),
                    doc_type: request
                        .customer
                        .document_type
                        .clone()
                        .unwrap_or_else(|| "cpf".to_string()),
                },
            },
            shipping: request.address.as_ref().map(|address| ChargeAddress {
                street: address.street.clone(),
                number: address.number.clone(),
                complement: address.complement.clone(),
                neighborhood: address.neighborhood.clone(),
                city: address.city.clone(),
                state: address.state.clone(),
                zip_code: digits_only(&address.zip_code),
            }),
            pix: PixConfig {
                expires_in_days: PIX_EXPIRES_IN_DAYS,
            },
            postback_url: self.config.webhook_url(),
            external_ref: order_id.to_string(),
            metadata: ChargeMetadata::encode(order_id, request.tracking_params.as_ref()),
        }
    }

    fn build_checkout_event(
        &self,
        request: &CheckoutRequest,
        order_id: &str,
        created: &ChargeCreated,
    ) -> AttributionEvent {
        let products = request
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| AttributionProduct {
                id: format!("{}-{}", order_id, index + 1),
                name: item.name.clone(),
                quantity: item.quantity,
                price_in_cents: to_cents(item.price),
            })
            .collect();

        AttributionEvent {
            order_id: order_id.to_string(),
            platform: PLATFORM_TAG.to_string(),
            payment_method: PAYMENT_METHOD.to_string(),
            status: AttributionStatus::WaitingPayment,
            created_at: format_attribution_date(Utc::now()),
            approved_date: None,
            refunded_at: None,
            customer: AttributionCustomer {
                name: request.customer.name.clone(),
                email: request.customer.email.clone(),
                phone: non_empty(digits_only(&request.customer.phone)),
                document: non_empty(digits_only(&request.customer.cpf)),
            },
            products,
            tracking_parameters: request.tracking_params.clone().unwrap_or_default(),
            commission: Commission {
                total_price_in_cents: created.amount,
                gateway_fee_in_cents: created.fee,
                user_commission_in_cents: created.net_amount,
                currency: CURRENCY.to_string(),
            },
        }
    }

    fn build_webhook_event(
        &self,
        envelope: &WebhookEnvelope,
        order_id: &str,
        tracking: TrackingParams,
        status: AttributionStatus,
    ) -> AttributionEvent {
        let amount = envelope.amount.unwrap_or(0);
        let customer = envelope.customer.clone().unwrap_or_default();

        let approved_date = match status {
            AttributionStatus::Paid => Some(
                envelope
                    .paid_at
                    .as_deref()
                    .map(format_gateway_timestamp)
                    .filter(|formatted| !formatted.is_empty())
                    .unwrap_or_else(|| format_attribution_date(Utc::now())),
            ),
            _ => None,
        };

        let commission = match status {
            AttributionStatus::Refused => Commission::zeroed(),
            _ => Commission {
                total_price_in_cents: amount,
                gateway_fee_in_cents: envelope.fee.unwrap_or(0),
                user_commission_in_cents: envelope.net_amount.unwrap_or(0),
                currency: CURRENCY.to_string(),
            },
        };

        AttributionEvent {
            order_id: order_id.to_string(),
            platform: PLATFORM_TAG.to_string(),
            payment_method: PAYMENT_METHOD.to_string(),
            status,
            created_at: format_attribution_date(Utc::now()),
            approved_date,
            refunded_at: None,
            customer: AttributionCustomer {
                name: customer.name.unwrap_or_default(),
                email: customer.email.unwrap_or_default(),
                phone: customer
                    .phone
                    .as_deref()
                    .map(digits_only)
                    .and_then(non_empty),
                document: customer
                    .document
                    .as_deref()
                    .map(digits_only)
                    .and_then(non_empty),
            },
            products: vec![AttributionProduct {
                id: order_id.to_string(),
                name: format!("Pedido {}", order_id),
                quantity: 1,
                price_in_cents: amount,
            }],
            tracking_parameters: tracking,
            commission,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::gateway::{ChargeStatusInfo, PixArtifacts};
    use crate::services::attribution_client::AttributionError;
    use crate::services::correlation_store::InMemoryCorrelationStore;
    use crate::services::gateway_client::GatewayError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubGateway {
        reject_with: Option<String>,
        pix: PixArtifacts,
        raw_status: String,
        charges: Mutex<Vec<ChargeRequest>>,
    }

    impl StubGateway {
        fn accepting(pix: PixArtifacts) -> Self {
            Self {
                reject_with: None,
                pix,
                raw_status: "PENDING".to_string(),
                charges: Mutex::new(Vec::new()),
            }
        }

        fn rejecting(message: &str) -> Self {
            Self {
                reject_with: Some(message.to_string()),
                pix: PixArtifacts::default(),
                raw_status: "PENDING".to_string(),
                charges: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PaymentGateway for StubGateway {
        async fn create_charge(
            &self,
            request: &ChargeRequest,
        ) -> Result<ChargeCreated, GatewayError> {
            self.charges.lock().unwrap().push(request.clone());
            if let Some(message) = &self.reject_with {
                return Err(GatewayError::Rejected(message.clone()));
            }
            Ok(ChargeCreated {
                transaction_id: "tx_123".to_string(),
                status: self.raw_status.clone(),
                amount: request.amount,
                net_amount: request.amount - 120,
                fee: 120,
                pix: self.pix.clone(),
            })
        }

        async fn get_status(&self, _transaction_id: &str) -> Result<ChargeStatusInfo, GatewayError> {
            if let Some(message) = &self.reject_with {
                return Err(GatewayError::Rejected(message.clone()));
            }
            Ok(ChargeStatusInfo {
                status: self.raw_status.clone(),
                paid_at: Some("2026-08-07T10:00:00Z".to_string()),
                end_to_end_id: Some("E00000000202608071000".to_string()),
            })
        }

        async fn get_seller_profile(&self) -> Result<SellerProfile, GatewayError> {
            Ok(SellerProfile {
                name: "Loja Teste".to_string(),
                legal_name: "Loja Teste LTDA".to_string(),
                tax_id: "12345678000190".to_string(),
                logo_url: None,
            })
        }
    }

    struct RecordingAttribution {
        reject: bool,
        events: Mutex<Vec<AttributionEvent>>,
    }

    impl RecordingAttribution {
        fn accepting() -> Self {
            Self {
                reject: false,
                events: Mutex::new(Vec::new()),
            }
        }

        fn rejecting() -> Self {
            Self {
                reject: true,
                events: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AttributionSink for RecordingAttribution {
        async fn submit_order_event(&self, event: &AttributionEvent) -> Result<(), AttributionError> {
            self.events.lock().unwrap().push(event.clone());
            if self.reject {
                return Err(AttributionError::Rejected(500));
            }
            Ok(())
        }
    }

    fn test_config() -> Config {
        Config {
            server_port: 0,
            gateway_base_url: "http://gateway.test".to_string(),
            gateway_public_key: "pk_test".to_string(),
            gateway_secret_key: "sk_test".to_string(),
            app_base_url: "http://app.test".to_string(),
            attribution_api_url: "http://attribution.test/orders".to_string(),
            attribution_api_token: "token".to_string(),
        }
    }

    fn build_service(
        gateway: Arc<StubGateway>,
        attribution: Arc<RecordingAttribution>,
    ) -> (CheckoutService, Arc<InMemoryCorrelationStore>) {
        let store = Arc::new(InMemoryCorrelationStore::new());
        let service = CheckoutService::new(
            gateway,
            attribution,
            store.clone(),
            &test_config(),
        );
        (service, store)
    }

    fn checkout_request(tracking: Option<TrackingParams>) -> CheckoutRequest {
        let mut value = serde_json::json!({
            "customer": {
                "name": "Maria Silva",
                "email": "maria@example.com",
                "cpf": "123.456.789-09",
                "phone": "+55 (11) 98888-7777"
            },
            "address": {
                "street": "Rua das Flores",
                "number": "100",
                "neighborhood": "Centro",
                "city": "São Paulo",
                "state": "SP",
                "zipCode": "01000-000"
            },
            "items": [{"name": "Camiseta", "price": 49.9, "quantity": 2}],
            "shipping": {"name": "Sedex", "price": 15.5},
            "total": 115.3
        });
        if let Some(tracking) = tracking {
            value["trackingParams"] = serde_json::to_value(tracking).unwrap();
        }
        serde_json::from_value(value).unwrap()
    }

    fn tracking() -> TrackingParams {
        TrackingParams {
            src: Some("fb".to_string()),
            utm_source: Some("meta".to_string()),
            utm_campaign: Some("lancamento".to_string()),
            ..Default::default()
        }
    }

    fn paid_envelope(order_id: &str, metadata: Option<String>) -> WebhookEnvelope {
        serde_json::from_value(serde_json::json!({
            "event": "transaction.paid",
            "transactionId": "tx_123",
            "externalReference": order_id,
            "status": "PAID",
            "amount": 11530,
            "fee": 120,
            "netAmount": 11410,
            "paidAt": "2026-08-07T10:00:00Z",
            "customer": {"name": "Maria Silva", "email": "maria@example.com"},
            "metadata": metadata
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn checkout_returns_pix_payload_and_sends_waiting_payment() {
        let gateway = Arc::new(StubGateway::accepting(PixArtifacts {
            qr_code: Some("qr-raw".to_string()),
            copy_paste: Some("copia-e-cola".to_string()),
            qr_code_base64: Some("aW1n".to_string()),
            expires_at: Some("2026-08-08T10:00:00Z".to_string()),
        }));
        let attribution = Arc::new(RecordingAttribution::accepting());
        let (service, store) = build_service(gateway.clone(), attribution.clone());

        let outcome = service
            .checkout(checkout_request(Some(tracking())))
            .await
            .unwrap();

        // copy-paste string wins over the raw QR string
        assert_eq!(outcome.qrcode, "copia-e-cola");
        assert_eq!(outcome.transaction_id, "tx_123");
        assert!(outcome.order_id.starts_with("PED-"));

        // tracking persisted under the new order id before the gateway call
        assert_eq!(store.get(&outcome.order_id), Some(tracking()));

        let charges = gateway.charges.lock().unwrap();
        let charge = &charges[0];
        assert_eq!(charge.amount, 11530);
        assert_eq!(charge.external_ref, outcome.order_id);
        assert_eq!(charge.postback_url, "http://app.test/webhook");
        assert_eq!(charge.customer.phone, "5511988887777");
        // product line tangible, shipping line appended as intangible
        assert_eq!(charge.items.len(), 2);
        assert!(charge.items[0].tangible);
        assert_eq!(charge.items[0].unit_price, 4990);
        assert!(!charge.items[1].tangible);
        assert_eq!(charge.items[1].unit_price, 1550);
        assert!(charge.metadata.contains(&outcome.order_id));

        let events = attribution.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].status, AttributionStatus::WaitingPayment);
        assert_eq!(events[0].order_id, outcome.order_id);
        assert_eq!(events[0].tracking_parameters, tracking());
        assert_eq!(events[0].commission.gateway_fee_in_cents, 120);
    }

    #[tokio::test]
    async fn checkout_falls_back_to_qr_string() {
        let gateway = Arc::new(StubGateway::accepting(PixArtifacts {
            qr_code: Some("qr-raw".to_string()),
            copy_paste: None,
            qr_code_base64: None,
            expires_at: None,
        }));
        let attribution = Arc::new(RecordingAttribution::accepting());
        let (service, _) = build_service(gateway, attribution);

        let outcome = service.checkout(checkout_request(None)).await.unwrap();
        assert_eq!(outcome.qrcode, "qr-raw");
    }

    #[tokio::test]
    async fn checkout_gateway_failure_skips_attribution() {
        let gateway = Arc::new(StubGateway::rejecting("saldo insuficiente"));
        let attribution = Arc::new(RecordingAttribution::accepting());
        let (service, _) = build_service(gateway, attribution.clone());

        let err = service
            .checkout(checkout_request(None))
            .await
            .unwrap_err();

        match err {
            CheckoutError::Gateway(message) => assert_eq!(message, "saldo insuficiente"),
            other => panic!("expected gateway error, got {:?}", other),
        }
        assert!(attribution.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn checkout_validation_failure_makes_no_outbound_calls() {
        let gateway = Arc::new(StubGateway::accepting(PixArtifacts::default()));
        let attribution = Arc::new(RecordingAttribution::accepting());
        let (service, _) = build_service(gateway.clone(), attribution.clone());

        let mut request = checkout_request(None);
        request.items.clear();

        let err = service.checkout(request).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(_)));
        assert!(gateway.charges.lock().unwrap().is_empty());
        assert!(attribution.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn checkout_survives_attribution_failure() {
        let gateway = Arc::new(StubGateway::accepting(PixArtifacts {
            copy_paste: Some("copia-e-cola".to_string()),
            ..Default::default()
        }));
        let attribution = Arc::new(RecordingAttribution::rejecting());
        let (service, _) = build_service(gateway, attribution.clone());

        let outcome = service.checkout(checkout_request(None)).await.unwrap();
        assert_eq!(outcome.qrcode, "copia-e-cola");
        // the event was attempted, its failure swallowed
        assert_eq!(attribution.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn webhook_paid_sends_event_and_cleans_store() {
        let gateway = Arc::new(StubGateway::accepting(PixArtifacts::default()));
        let attribution = Arc::new(RecordingAttribution::accepting());
        let (service, store) = build_service(gateway, attribution.clone());

        store.save("PED-X-0001", tracking());
        let message = service
            .handle_webhook(paid_envelope("PED-X-0001", None))
            .await;

        assert_eq!(message, "payment confirmation processed");
        assert_eq!(store.get("PED-X-0001"), None);

        let events = attribution.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].status, AttributionStatus::Paid);
        assert_eq!(events[0].approved_date.as_deref(), Some("2026-08-07 10:00:00"));
        assert_eq!(events[0].tracking_parameters, tracking());
        assert_eq!(events[0].commission.total_price_in_cents, 11530);
        assert_eq!(events[0].commission.user_commission_in_cents, 11410);
    }

    #[tokio::test]
    async fn webhook_paid_keeps_entry_when_attribution_fails() {
        let gateway = Arc::new(StubGateway::accepting(PixArtifacts::default()));
        let attribution = Arc::new(RecordingAttribution::rejecting());
        let (service, store) = build_service(gateway, attribution);

        store.save("PED-X-0001", tracking());
        service
            .handle_webhook(paid_envelope("PED-X-0001", None))
            .await;

        // cleanup only happens after a successful send
        assert_eq!(store.get("PED-X-0001"), Some(tracking()));
    }

    #[tokio::test]
    async fn webhook_paid_recovers_tracking_from_metadata() {
        let gateway = Arc::new(StubGateway::accepting(PixArtifacts::default()));
        let attribution = Arc::new(RecordingAttribution::accepting());
        let (service, store) = build_service(gateway, attribution.clone());

        // store has lost state; metadata is the durable fallback
        assert_eq!(store.get("PED-X-0002"), None);
        let metadata = ChargeMetadata::encode("PED-X-0002", Some(&tracking()));
        service
            .handle_webhook(paid_envelope("PED-X-0002", Some(metadata)))
            .await;

        let events = attribution.events.lock().unwrap();
        assert_eq!(events[0].tracking_parameters, tracking());
    }

    #[tokio::test]
    async fn webhook_failed_sends_refused_with_zeroed_commission() {
        let gateway = Arc::new(StubGateway::accepting(PixArtifacts::default()));
        let attribution = Arc::new(RecordingAttribution::accepting());
        let (service, store) = build_service(gateway, attribution.clone());

        store.save("PED-X-0003", tracking());
        let envelope: WebhookEnvelope = serde_json::from_value(serde_json::json!({
            "event": "transaction.failed",
            "transactionId": "tx_124",
            "externalReference": "PED-X-0003",
            "status": "CANCELLED",
            "amount": 11530
        }))
        .unwrap();

        let message = service.handle_webhook(envelope).await;
        assert_eq!(message, "payment failure processed");
        assert_eq!(store.get("PED-X-0003"), None);

        let events = attribution.events.lock().unwrap();
        assert_eq!(events[0].status, AttributionStatus::Refused);
        assert!(events[0].approved_date.is_none());
        assert_eq!(events[0].commission.total_price_in_cents, 0);
        assert_eq!(events[0].commission.gateway_fee_in_cents, 0);
    }

    #[tokio::test]
    async fn webhook_ignores_created_withdrawal_and_unknown_events() {
        let gateway = Arc::new(StubGateway::accepting(PixArtifacts::default()));
        let attribution = Arc::new(RecordingAttribution::accepting());
        let (service, _) = build_service(gateway, attribution.clone());

        for (event, expected) in [
            ("transaction.created", "transaction acknowledged"),
            ("withdrawal.approved", "withdrawal event ignored"),
            ("subscription.renewed", "event ignored"),
        ] {
            let envelope: WebhookEnvelope = serde_json::from_value(serde_json::json!({
                "event": event,
                "transactionId": "tx_125"
            }))
            .unwrap();
            assert_eq!(service.handle_webhook(envelope).await, expected);
        }

        assert!(attribution.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn charge_status_maps_raw_status() {
        let gateway = Arc::new(StubGateway {
            reject_with: None,
            pix: PixArtifacts::default(),
            raw_status: "PAID".to_string(),
            charges: Mutex::new(Vec::new()),
        });
        let attribution = Arc::new(RecordingAttribution::accepting());
        let (service, _) = build_service(gateway, attribution);

        let outcome = service.charge_status("tx_123").await.unwrap();
        assert_eq!(outcome.status, ChargeStatus::Paid);
        assert_eq!(outcome.transaction_id, "tx_123");
        assert!(outcome.end_to_end_id.is_some());
    }

    #[tokio::test]
    async fn charge_status_forwards_gateway_message() {
        let gateway = Arc::new(StubGateway::rejecting("transação não encontrada"));
        let attribution = Arc::new(RecordingAttribution::accepting());
        let (service, _) = build_service(gateway, attribution);

        let err = service.charge_status("tx_999").await.unwrap_err();
        match err {
            CheckoutError::Gateway(message) => assert_eq!(message, "transação não encontrada"),
            other => panic!("expected gateway error, got {:?}", other),
        }
    }
}
