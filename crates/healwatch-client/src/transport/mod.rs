//! Transport layer (HTTP polling + WebSocket event stream).
//!
//! Both inputs sit behind traits so the scheduler can be driven by mocks in
//! tests and by `reqwest` / `tokio-tungstenite` in production.

pub mod codec;
pub mod http;
pub mod ws;

pub use codec::{decode, Inbound};
pub use http::{HttpSource, MetricsSource};
pub use ws::{InboundStream, StreamConnector, WsConnector};
