//! Headless sink: every widget mutation becomes a structured log line.

use healwatch_core::display::GaugeLevel;

use crate::render::sink::{Alert, ChartData, ChartUpdate, MapMarker, RenderSink};

#[derive(Debug, Default, Clone)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

impl RenderSink for LogSink {
    fn progress(&self, id: &str, percent: f64, level: GaugeLevel) {
        tracing::info!(widget = %id, percent, level = level.as_str(), "gauge");
    }

    fn text(&self, id: &str, value: &str) {
        tracing::info!(widget = %id, %value, "text");
    }

    fn chart(&self, id: &str, data: &ChartData, update: ChartUpdate) {
        let points = data.datasets.iter().map(|d| d.values.len()).sum::<usize>();
        match update {
            ChartUpdate::Created => {
                tracing::info!(widget = %id, kind = ?data.kind, series = data.datasets.len(), points, "chart created")
            }
            ChartUpdate::Updated { revision } => {
                tracing::debug!(widget = %id, revision, points, "chart updated")
            }
        }
    }

    fn marker(&self, marker: &MapMarker) {
        tracing::info!(
            ip = %marker.ip,
            lat = marker.latitude,
            lon = marker.longitude,
            country = marker.country.as_deref().unwrap_or("Unknown"),
            "map marker"
        );
    }

    fn alert(&self, alert: &Alert) {
        tracing::warn!(
            ip = %alert.ip,
            attack = %alert.attack_type,
            confidence = alert.confidence,
            severity = alert.severity.as_str(),
            "pattern alert"
        );
    }
}
