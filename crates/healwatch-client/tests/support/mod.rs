//! Test doubles shared by the scheduler tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use tokio::time::Instant;

use healwatch_client::app_state::AppState;
use healwatch_client::config;
use healwatch_client::render::{Alert, ChartData, ChartUpdate, MapMarker, RenderSink};
use healwatch_client::transport::{Inbound, InboundStream, MetricsSource, StreamConnector};
use healwatch_core::display::GaugeLevel;
use healwatch_core::error::{HealwatchError, Result};
use healwatch_core::model::{ActiveThreats, HistorySeries, ThreatEvent};

// ---------- render spy ----------

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Progress { id: String, percent: f64, level: GaugeLevel },
    Text { id: String, value: String },
    Chart { id: String, data: ChartData, update: ChartUpdate },
    Marker(MapMarker),
    Alert(Alert),
}

#[derive(Default)]
pub struct SpySink {
    calls: Mutex<Vec<Call>>,
}

impl SpySink {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn total(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn text(&self, id: &str) -> Option<String> {
        self.calls().into_iter().rev().find_map(|c| match c {
            Call::Text { id: i, value } if i == id => Some(value),
            _ => None,
        })
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Alert(a) => Some(a),
                _ => None,
            })
            .collect()
    }

    pub fn markers(&self) -> Vec<MapMarker> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Marker(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn chart_updates(&self, id: &str) -> Vec<ChartUpdate> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Chart { id: i, update, .. } if i == id => Some(update),
                _ => None,
            })
            .collect()
    }

    fn push(&self, c: Call) {
        self.calls.lock().unwrap().push(c);
    }
}

impl RenderSink for SpySink {
    fn progress(&self, id: &str, percent: f64, level: GaugeLevel) {
        self.push(Call::Progress { id: id.into(), percent, level });
    }
    fn text(&self, id: &str, value: &str) {
        self.push(Call::Text { id: id.into(), value: value.into() });
    }
    fn chart(&self, id: &str, data: &ChartData, update: ChartUpdate) {
        self.push(Call::Chart { id: id.into(), data: data.clone(), update });
    }
    fn marker(&self, marker: &MapMarker) {
        self.push(Call::Marker(marker.clone()));
    }
    fn alert(&self, alert: &Alert) {
        self.push(Call::Alert(alert.clone()));
    }
}

// ---------- metrics source ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Metrics,
    History,
    Threats,
}

pub const METRICS_TEXT: &str = "\
# TYPE cpu_load_simulation gauge
cpu_load_simulation 42.5
memory_usage_percent 71
system_cpu_percent 93.2
process_virtual_memory_bytes 188743680
process_resident_memory_bytes 1536
process_open_fds 7
process_cpu_seconds_total 12.5
python_gc_objects_collected_total{generation=\"0\"} 512
python_gc_collections_total{generation=\"2\"} 3
";

pub struct MockSource {
    fail: Mutex<Option<Resource>>,
    /// Delay applied to the metrics fetch, one entry per cycle (then `slow`).
    delays: Mutex<VecDeque<Duration>>,
    slow: Duration,
    calls: AtomicUsize,
}

impl MockSource {
    pub fn ok() -> Self {
        Self {
            fail: Mutex::new(None),
            delays: Mutex::new(VecDeque::new()),
            slow: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(resource: Resource) -> Self {
        Self {
            fail: Mutex::new(Some(resource)),
            ..Self::ok()
        }
    }

    pub fn set_failing(&self, resource: Option<Resource>) {
        *self.fail.lock().unwrap() = resource;
    }

    pub fn with_delays(delays: &[Duration]) -> Self {
        Self {
            delays: Mutex::new(delays.iter().copied().collect()),
            ..Self::ok()
        }
    }

    /// Every metrics fetch takes `delay`.
    pub fn slow(delay: Duration) -> Self {
        Self {
            slow: delay,
            ..Self::ok()
        }
    }

    /// Number of metrics fetches (one per cycle).
    pub fn cycles(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self, r: Resource) -> Result<()> {
        if *self.fail.lock().unwrap() == Some(r) {
            return Err(HealwatchError::Transport(format!("{r:?} unreachable")));
        }
        Ok(())
    }
}

#[async_trait]
impl MetricsSource for MockSource {
    async fn fetch_metrics_text(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delays.lock().unwrap().pop_front().unwrap_or(self.slow);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.check(Resource::Metrics)?;
        Ok(METRICS_TEXT.to_string())
    }

    async fn fetch_history(&self) -> Result<HistorySeries> {
        self.check(Resource::History)?;
        Ok(HistorySeries {
            timestamps: vec!["t0".into(), "t1".into()],
            ddos_prob: vec![0.1, 0.9],
            network_in: vec![100.0, 200.0],
            network_out: vec![50.0, 60.0],
            connections: vec![3.0, 4.0],
        })
    }

    async fn fetch_active_threats(&self) -> Result<ActiveThreats> {
        self.check(Resource::Threats)?;
        Ok(serde_json::from_str(r#"{"threats":[{"confidence":0.25},{"confidence":0.75}]}"#).unwrap())
    }
}

// ---------- stream connector ----------

pub enum Script {
    Refuse,
    Frames(Vec<Result<Inbound>>),
}

#[derive(Default)]
pub struct MockConnector {
    script: Mutex<VecDeque<Script>>,
    connects: Mutex<Vec<Instant>>,
}

impl MockConnector {
    pub fn scripted(script: Vec<Script>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            connects: Mutex::new(Vec::new()),
        }
    }

    pub fn connect_times(&self) -> Vec<Instant> {
        self.connects.lock().unwrap().clone()
    }
}

#[async_trait]
impl StreamConnector for MockConnector {
    async fn connect(&self, _url: &str) -> Result<InboundStream> {
        self.connects.lock().unwrap().push(Instant::now());
        // an unscripted connection opens and closes straight away
        match self.script.lock().unwrap().pop_front() {
            Some(Script::Refuse) => Err(HealwatchError::Transport("connection refused".into())),
            Some(Script::Frames(frames)) => Ok(stream::iter(frames).boxed()),
            None => Ok(stream::empty().boxed()),
        }
    }
}

pub fn event(json: &str) -> Result<Inbound> {
    Ok(Inbound::Event(ThreatEvent::from_json(json).unwrap()))
}

// ---------- wiring ----------

pub fn state(
    yaml: &str,
    source: Arc<dyn MetricsSource>,
    connector: Arc<dyn StreamConnector>,
    sink: Arc<SpySink>,
) -> AppState {
    let cfg = config::load_from_str(yaml).unwrap();
    AppState::with_parts(cfg, source, connector, sink)
}

pub const DEFAULT_YAML: &str = "version: 1\n";
