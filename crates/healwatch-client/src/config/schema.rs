use std::time::Duration;

use healwatch_core::error::{HealwatchError, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub version: u32,

    #[serde(default)]
    pub endpoint: EndpointSection,

    #[serde(default)]
    pub polling: PollingSection,

    #[serde(default)]
    pub stream: StreamSection,

    #[serde(default)]
    pub alerts: AlertSection,
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(HealwatchError::UnsupportedVersion);
        }

        self.endpoint.validate()?;
        self.polling.validate()?;
        self.stream.validate()?;
        self.alerts.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,

    #[serde(default = "default_history_path")]
    pub history_path: String,

    #[serde(default = "default_threats_path")]
    pub threats_path: String,

    #[serde(default = "default_stream_path")]
    pub stream_path: String,
}

impl Default for EndpointSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            metrics_path: default_metrics_path(),
            history_path: default_history_path(),
            threats_path: default_threats_path(),
            stream_path: default_stream_path(),
        }
    }
}

impl EndpointSection {
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(HealwatchError::BadConfig(
                "endpoint.base_url must start with http:// or https://".into(),
            ));
        }
        for (field, path) in [
            ("metrics_path", &self.metrics_path),
            ("history_path", &self.history_path),
            ("threats_path", &self.threats_path),
            ("stream_path", &self.stream_path),
        ] {
            if !path.starts_with('/') {
                return Err(HealwatchError::BadConfig(format!(
                    "endpoint.{field} must start with '/'"
                )));
            }
        }
        Ok(())
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn metrics_url(&self) -> String {
        format!("{}{}", self.base(), self.metrics_path)
    }

    pub fn history_url(&self) -> String {
        format!("{}{}", self.base(), self.history_path)
    }

    pub fn threats_url(&self) -> String {
        format!("{}{}", self.base(), self.threats_path)
    }

    /// `http` -> `ws`, `https` -> `wss`.
    pub fn stream_url(&self) -> String {
        let base = self.base();
        let ws_base = match base.strip_prefix("https://") {
            Some(rest) => format!("wss://{rest}"),
            None => format!("ws://{}", base.trim_start_matches("http://")),
        };
        format!("{ws_base}{}", self.stream_path)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PollingSection {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Discard a cycle's result when a newer cycle has already rendered.
    #[serde(default = "default_drop_stale_cycles")]
    pub drop_stale_cycles: bool,
}

impl Default for PollingSection {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            drop_stale_cycles: default_drop_stale_cycles(),
        }
    }
}

impl PollingSection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=3_600_000).contains(&self.interval_ms) {
            return Err(HealwatchError::BadConfig(
                "polling.interval_ms must be between 100 and 3600000".into(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreamSection {
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,

    /// `None` keeps reconnecting forever.
    #[serde(default)]
    pub max_reconnect_attempts: Option<u32>,
}

impl Default for StreamSection {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: default_reconnect_delay_ms(),
            max_reconnect_attempts: None,
        }
    }
}

impl StreamSection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=600_000).contains(&self.reconnect_delay_ms) {
            return Err(HealwatchError::BadConfig(
                "stream.reconnect_delay_ms must be between 100 and 600000".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlertSection {
    #[serde(default = "default_high_confidence")]
    pub high_confidence: f64,
}

impl Default for AlertSection {
    fn default() -> Self {
        Self {
            high_confidence: default_high_confidence(),
        }
    }
}

impl AlertSection {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.high_confidence) {
            return Err(HealwatchError::BadConfig(
                "alerts.high_confidence must be between 0.0 and 1.0".into(),
            ));
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".into()
}
fn default_metrics_path() -> String {
    "/metrics".into()
}
fn default_history_path() -> String {
    "/api/metrics_history".into()
}
fn default_threats_path() -> String {
    "/api/active-threats".into()
}
fn default_stream_path() -> String {
    "/ws".into()
}
fn default_interval_ms() -> u64 {
    5000
}
fn default_drop_stale_cycles() -> bool {
    false
}
fn default_reconnect_delay_ms() -> u64 {
    5000
}
fn default_high_confidence() -> f64 {
    0.8
}
