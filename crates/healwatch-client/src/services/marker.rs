use std::sync::Arc;

use async_trait::async_trait;

use healwatch_core::error::Result;
use healwatch_core::model::ThreatEvent;

use crate::dispatch::EventHandler;
use crate::render::{MapMarker, RenderSink};

/// Places a map marker for every geolocated event.
pub struct MarkerHandler {
    sink: Arc<dyn RenderSink>,
}

impl MarkerHandler {
    pub fn new(sink: Arc<dyn RenderSink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl EventHandler for MarkerHandler {
    fn name(&self) -> &'static str {
        "marker"
    }

    async fn handle(&self, ev: &ThreatEvent) -> Result<()> {
        match MapMarker::from_event(ev) {
            Some(marker) => self.sink.marker(&marker),
            None => tracing::trace!(ip = %ev.ip, "event without coordinates; no marker"),
        }
        Ok(())
    }
}
