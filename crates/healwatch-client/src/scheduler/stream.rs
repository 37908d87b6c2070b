use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::task::JoinHandle;

use healwatch_core::error::ErrorCode;

use crate::config::StreamSection;
use crate::transport::{Inbound, InboundStream};

use super::{RefreshScheduler, SocketState};

/// Fixed-delay reconnect policy. `max_attempts: None` retries forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub delay: Duration,
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(5000),
            max_attempts: None,
        }
    }
}

impl ReconnectPolicy {
    pub fn from_config(s: &StreamSection) -> Self {
        Self {
            delay: Duration::from_millis(s.reconnect_delay_ms),
            max_attempts: s.max_reconnect_attempts,
        }
    }
}

/// Returned only when a bounded policy runs out of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamExit {
    pub reconnects: u32,
}

impl RefreshScheduler {
    pub fn connect_stream(self: &Arc<Self>, url: impl Into<String>) -> JoinHandle<StreamExit> {
        let this = Arc::clone(self);
        let url = url.into();
        tokio::spawn(async move { this.run_stream(&url).await })
    }

    /// Connect, pump messages until the connection closes, wait the policy
    /// delay, repeat. Connect failures count as closes.
    pub async fn run_stream(&self, url: &str) -> StreamExit {
        let policy = self.opts.reconnect;
        let mut reconnects: u32 = 0;

        loop {
            self.set_socket(SocketState::Connecting);
            match self.connector.connect(url).await {
                Ok(stream) => {
                    self.metrics.stream_connects.inc(&[("outcome", "open")]);
                    self.set_socket(SocketState::Open);
                    tracing::info!(%url, reconnects, "event stream connected");
                    self.pump(stream).await;
                }
                Err(e) => {
                    self.metrics.stream_connects.inc(&[("outcome", "failed")]);
                    tracing::warn!(%url, code = e.code().as_str(), error = %e, "event stream connect failed");
                }
            }
            self.set_socket(SocketState::Closed);

            if policy.max_attempts.is_some_and(|max| reconnects >= max) {
                tracing::info!(%url, reconnects, "event stream reconnect attempts exhausted");
                return StreamExit { reconnects };
            }

            reconnects = reconnects.saturating_add(1);
            tracing::warn!(
                %url,
                attempt = reconnects,
                delay_ms = u64::try_from(policy.delay.as_millis()).unwrap_or(u64::MAX),
                "event stream closed; reconnecting"
            );
            tokio::time::sleep(policy.delay).await;
        }
    }

    async fn pump(&self, mut stream: InboundStream) {
        while let Some(item) = stream.next().await {
            match item {
                Ok(Inbound::Event(ev)) => {
                    self.metrics.stream_messages.inc(&[("kind", "event")]);
                    self.dispatcher.dispatch(&ev).await;
                }
                Ok(Inbound::Control) => {
                    self.metrics.stream_messages.inc(&[("kind", "control")]);
                }
                Ok(Inbound::Close) => break,
                Err(e) if e.code() == ErrorCode::Decode => {
                    self.metrics.stream_messages.inc(&[("kind", "invalid")]);
                    tracing::warn!(error = %e, "stream message dropped");
                }
                Err(e) => {
                    tracing::warn!(code = e.code().as_str(), error = %e, "event stream failed");
                    break;
                }
            }
        }
    }
}
