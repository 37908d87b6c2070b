use healwatch_core::display::{AlertSeverity, GaugeLevel};
use healwatch_core::model::ThreatEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<f64>,
}

impl Dataset {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

/// Full contents of one chart. Replaced wholesale on every update.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// Whether a chart update created the chart or mutated an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartUpdate {
    Created,
    Updated { revision: u64 },
}

/// Map marker for a geolocated threat event.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub ip: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
    pub attack_type: Option<String>,
    pub confidence: f64,
}

impl MapMarker {
    /// `None` when the event carries no location or lacks a coordinate.
    pub fn from_event(ev: &ThreatEvent) -> Option<Self> {
        let loc = ev.location.as_ref()?;
        let (latitude, longitude) = loc.coordinates()?;
        Some(Self {
            ip: ev.ip.clone(),
            latitude,
            longitude,
            country: loc.country.clone(),
            attack_type: ev.attack_type.clone(),
            confidence: ev.confidence_or_zero(),
        })
    }
}

/// Transient pattern alert banner.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub ip: String,
    pub attack_type: String,
    pub confidence: f64,
    pub severity: AlertSeverity,
}

/// View sink. Any UI toolkit (or a log) can implement it.
pub trait RenderSink: Send + Sync {
    fn progress(&self, id: &str, percent: f64, level: GaugeLevel);
    fn text(&self, id: &str, value: &str);
    fn chart(&self, id: &str, data: &ChartData, update: ChartUpdate);
    fn marker(&self, marker: &MapMarker);
    fn alert(&self, alert: &Alert);
}
