use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use healwatch_core::error::Result;
use healwatch_core::model::ThreatEvent;

/// Consumer of stream events (map markers, alerts, ...).
#[async_trait]
pub trait EventHandler: Send + Sync {
    fn name(&self) -> &'static str;
    async fn handle(&self, ev: &ThreatEvent) -> Result<()>;
}

/// Fans every inbound event out to all registered handlers.
///
/// Handlers are independent: one failing does not stop the others.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: DashMap<&'static str, Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    pub fn register(&self, handler: Arc<dyn EventHandler>) {
        self.handlers.insert(handler.name(), handler);
    }

    pub fn registered(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|e| *e.key()).collect()
    }

    pub async fn dispatch(&self, ev: &ThreatEvent) {
        // snapshot first; never hold a shard guard across an await
        let handlers: Vec<Arc<dyn EventHandler>> =
            self.handlers.iter().map(|e| Arc::clone(e.value())).collect();

        for h in handlers {
            if let Err(e) = h.handle(ev).await {
                tracing::warn!(handler = h.name(), ip = %ev.ip, code = e.code().as_str(), error = %e, "event handler failed");
            }
        }
    }
}
