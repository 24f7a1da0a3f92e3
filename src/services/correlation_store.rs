use dashmap::DashMap;

use crate::models::order::TrackingParams;

/// Short-lived association from an order id to the tracking parameters the
/// checkout carried, so the asynchronous webhook path can recover them.
///
/// Constructed once at startup and injected into the service. The in-memory
/// implementation loses state on restart and has no TTL; entries for orders
/// that never reach a terminal event leak. A multi-instance deployment needs
/// a shared external store behind this trait instead.
pub trait CorrelationStore: Send + Sync {
    fn save(&self, order_id: &str, params: TrackingParams);
    fn get(&self, order_id: &str) -> Option<TrackingParams>;
    fn delete(&self, order_id: &str);
}

pub struct InMemoryCorrelationStore {
    entries: DashMap<String, TrackingParams>,
}

impl InMemoryCorrelationStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl Default for InMemoryCorrelationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CorrelationStore for InMemoryCorrelationStore {
    fn save(&self, order_id: &str, params: TrackingParams) {
        self.entries.insert(order_id.to_string(), params);
    }

    fn get(&self, order_id: &str) -> Option<TrackingParams> {
        self.entries.get(order_id).map(|entry| entry.clone())
    }

    fn delete(&self, order_id: &str) {
        self.entries.remove(order_id);
    }
}
