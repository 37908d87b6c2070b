use std::sync::Arc;

use async_trait::async_trait;

use healwatch_core::display::AlertSeverity;
use healwatch_core::error::Result;
use healwatch_core::model::ThreatEvent;

use crate::dispatch::EventHandler;
use crate::obs::ClientMetrics;
use crate::render::{Alert, RenderSink};

/// Raises one transient alert per event whose classifier fired.
pub struct PatternAlertHandler {
    sink: Arc<dyn RenderSink>,
    metrics: Arc<ClientMetrics>,
    high_confidence: f64,
}

impl PatternAlertHandler {
    pub fn new(sink: Arc<dyn RenderSink>, metrics: Arc<ClientMetrics>, high_confidence: f64) -> Self {
        Self {
            sink,
            metrics,
            high_confidence,
        }
    }

    /// The alert an event would raise, if any.
    pub fn evaluate(&self, ev: &ThreatEvent) -> Option<Alert> {
        if !ev.pattern_detected {
            return None;
        }
        let confidence = ev.confidence_or_zero();
        Some(Alert {
            ip: ev.ip.clone(),
            attack_type: ev
                .attack_type
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            confidence,
            severity: AlertSeverity::classify(confidence, self.high_confidence),
        })
    }
}

#[async_trait]
impl EventHandler for PatternAlertHandler {
    fn name(&self) -> &'static str {
        "pattern_alert"
    }

    async fn handle(&self, ev: &ThreatEvent) -> Result<()> {
        if let Some(alert) = self.evaluate(ev) {
            self.metrics
                .alerts
                .inc(&[("severity", alert.severity.as_str())]);
            tracing::info!(ip = %alert.ip, severity = alert.severity.as_str(), "pattern detected");
            self.sink.alert(&alert);
        }
        Ok(())
    }
}
