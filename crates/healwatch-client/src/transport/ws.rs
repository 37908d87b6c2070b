//! WebSocket event stream (`/ws`).

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;

use healwatch_core::error::{HealwatchError, Result};

use crate::transport::codec::{decode, Inbound};

/// Decoded inbound frames of one connection. The stream ends when the
/// connection does.
pub type InboundStream = BoxStream<'static, Result<Inbound>>;

/// Opens one connection per call; reconnecting is the caller's job.
#[async_trait]
pub trait StreamConnector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<InboundStream>;
}

/// `tokio-tungstenite` connector.
#[derive(Debug, Default, Clone)]
pub struct WsConnector;

impl WsConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StreamConnector for WsConnector {
    async fn connect(&self, url: &str) -> Result<InboundStream> {
        let (ws, _resp) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| HealwatchError::Transport(format!("connect {url} failed: {e}")))?;

        let stream = ws.map(|incoming| match incoming {
            Ok(msg) => decode(msg),
            Err(e) => Err(HealwatchError::Transport(format!("stream read failed: {e}"))),
        });
        Ok(stream.boxed())
    }
}
