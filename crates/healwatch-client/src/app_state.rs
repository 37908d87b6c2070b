//! Shared application state for the healwatch client.
//!
//! Builds the transports, render layer and scheduler from a validated config.
//! Startup errors are returned, not panicked on.

use std::sync::Arc;

use healwatch_core::error::{HealwatchError, Result};

use crate::config::ClientConfig;
use crate::dispatch::EventDispatcher;
use crate::obs::ClientMetrics;
use crate::render::{DashboardView, LogSink, RenderSink};
use crate::scheduler::{RefreshScheduler, SchedulerOptions};
use crate::services::{MarkerHandler, PatternAlertHandler};
use crate::transport::{HttpSource, MetricsSource, StreamConnector, WsConnector};

#[derive(Clone)]
pub struct AppState {
    cfg: Arc<ClientConfig>,
    metrics: Arc<ClientMetrics>,
    scheduler: Arc<RefreshScheduler>,
}

impl AppState {
    /// Production wiring: reqwest + tokio-tungstenite, rendering to the log.
    pub fn new(cfg: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("healwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HealwatchError::Internal(format!("http client build failed: {e}")))?;

        let source = Arc::new(HttpSource::new(client, &cfg.endpoint));
        Ok(Self::with_parts(cfg, source, Arc::new(WsConnector::new()), Arc::new(LogSink::new())))
    }

    /// Wiring with caller-supplied transports and sink.
    pub fn with_parts(
        cfg: ClientConfig,
        source: Arc<dyn MetricsSource>,
        connector: Arc<dyn StreamConnector>,
        sink: Arc<dyn RenderSink>,
    ) -> Self {
        let metrics = Arc::new(ClientMetrics::new());

        let dispatcher = EventDispatcher::new();
        dispatcher.register(Arc::new(MarkerHandler::new(Arc::clone(&sink))));
        dispatcher.register(Arc::new(PatternAlertHandler::new(
            Arc::clone(&sink),
            Arc::clone(&metrics),
            cfg.alerts.high_confidence,
        )));

        let view = Arc::new(DashboardView::new(sink));
        let scheduler = Arc::new(RefreshScheduler::new(
            source,
            connector,
            view,
            Arc::new(dispatcher),
            Arc::clone(&metrics),
            SchedulerOptions::from_config(&cfg),
        ));

        Self {
            cfg: Arc::new(cfg),
            metrics,
            scheduler,
        }
    }

    pub fn cfg(&self) -> &ClientConfig {
        &self.cfg
    }

    pub fn metrics(&self) -> Arc<ClientMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn scheduler(&self) -> Arc<RefreshScheduler> {
        Arc::clone(&self.scheduler)
    }
}
