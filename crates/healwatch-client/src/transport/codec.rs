//! Decode-once codec for the event stream.
//!
//! - Text frames => `ThreatEvent` (JSON)
//! - Binary frames => `ThreatEvent` (UTF-8 JSON bytes)
//! - Ping/Pong are surfaced as control frames, Close ends the connection

use bytes::Bytes;
use tokio_tungstenite::tungstenite::Message;

use healwatch_core::error::Result;
use healwatch_core::model::ThreatEvent;

#[derive(Debug)]
pub enum Inbound {
    Event(ThreatEvent),
    Control,
    Close,
}

pub fn decode(msg: Message) -> Result<Inbound> {
    match msg {
        Message::Text(s) => Ok(Inbound::Event(ThreatEvent::from_json(&s)?)),
        Message::Binary(b) => Ok(Inbound::Event(ThreatEvent::from_bytes(&Bytes::from(b))?)),
        Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => Ok(Inbound::Control),
        Message::Close(_) => Ok(Inbound::Close),
    }
}
