//! Polled resources: `/metrics`, `/api/metrics_history`, `/api/active-threats`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use healwatch_core::error::{HealwatchError, Result};
use healwatch_core::model::{ActiveThreats, HistorySeries};

use crate::config::EndpointSection;

/// The three resources fetched by every polling cycle.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Raw exposition body.
    async fn fetch_metrics_text(&self) -> Result<String>;
    async fn fetch_history(&self) -> Result<HistorySeries>;
    async fn fetch_active_threats(&self) -> Result<ActiveThreats>;
}

/// `reqwest`-backed source. No per-request timeout is applied.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    metrics_url: String,
    history_url: String,
    threats_url: String,
}

impl HttpSource {
    pub fn new(client: reqwest::Client, endpoint: &EndpointSection) -> Self {
        Self {
            client,
            metrics_url: endpoint.metrics_url(),
            history_url: endpoint.history_url(),
            threats_url: endpoint.threats_url(),
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HealwatchError::Transport(format!("GET {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(HealwatchError::Http {
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|e| HealwatchError::Transport(format!("read {url} failed: {e}")))?;
        serde_json::from_slice(&body)
            .map_err(|e| HealwatchError::Decode(format!("invalid json from {url}: {e}")))
    }
}

#[async_trait]
impl MetricsSource for HttpSource {
    async fn fetch_metrics_text(&self) -> Result<String> {
        self.get(&self.metrics_url)
            .await?
            .text()
            .await
            .map_err(|e| HealwatchError::Transport(format!("read {} failed: {e}", self.metrics_url)))
    }

    async fn fetch_history(&self) -> Result<HistorySeries> {
        let history: HistorySeries = self.get_json(&self.history_url).await?;
        history.validate()?;
        Ok(history)
    }

    async fn fetch_active_threats(&self) -> Result<ActiveThreats> {
        self.get_json(&self.threats_url).await
    }
}
