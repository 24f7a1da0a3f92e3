use std::sync::atomic::{AtomicU64, Ordering};

pub struct ServiceMetrics {
    checkouts_accepted: AtomicU64,
    checkouts_rejected: AtomicU64,
    gateway_failures: AtomicU64,
    webhooks_received: AtomicU64,
    attribution_sent: AtomicU64,
    attribution_failed: AtomicU64,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self {
            checkouts_accepted: AtomicU64::new(0),
            checkouts_rejected: AtomicU64::new(0),
            gateway_failures: AtomicU64::new(0),
            webhooks_received: AtomicU64::new(0),
            attribution_sent: AtomicU64::new(0),
            attribution_failed: AtomicU64::new(0),
        }
    }

    pub fn increment_checkouts_accepted(&self) {
        self.checkouts_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_checkouts_rejected(&self) {
        self.checkouts_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_gateway_failures(&self) {
        self.gateway_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_webhooks_received(&self) {
        self.webhooks_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_attribution_sent(&self) {
        self.attribution_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_attribution_failed(&self) {
        self.attribution_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_checkouts_accepted(&self) -> u64 {
        self.checkouts_accepted.load(Ordering::Relaxed)
    }

    pub fn get_checkouts_rejected(&self) -> u64 {
        self.checkouts_rejected.load(Ordering::Relaxed)
    }

    pub fn get_gateway_failures(&self) -> u64 {
        self.gateway_failures.load(Ordering::Relaxed)
    }

    pub fn get_webhooks_received(&self) -> u64 {
        self.webhooks_received.load(Ordering::Relaxed)
    }

    pub fn get_attribution_sent(&self) -> u64 {
        self.attribution_sent.load(Ordering::Relaxed)
    }

    pub fn get_attribution_failed(&self) -> u64 {
        self.attribution_failed.load(Ordering::Relaxed)
    }
}
