//! Maps one poll snapshot onto dashboard widgets.

use std::sync::Arc;

use healwatch_core::display::{clamp_percent, format_bytes, format_percent, GaugeLevel};
use healwatch_core::exposition::split_key;
use healwatch_core::model::{ActiveThreats, HistorySeries};
use healwatch_core::MetricSample;

use crate::render::registry::ChartRegistry;
use crate::render::sink::{ChartData, ChartKind, Dataset, RenderSink};
use crate::scheduler::PollSnapshot;

const GENERATIONS: [&str; 3] = ["0", "1", "2"];

/// Percentage gauges: widget id -> metric name.
const GAUGES: [(&str, &str); 3] = [
    ("cpuLoad", "cpu_load_simulation"),
    ("memoryUsage", "memory_usage_percent"),
    ("systemCpu", "system_cpu_percent"),
];

pub struct DashboardView {
    sink: Arc<dyn RenderSink>,
    charts: ChartRegistry,
}

impl DashboardView {
    pub fn new(sink: Arc<dyn RenderSink>) -> Self {
        Self {
            sink,
            charts: ChartRegistry::new(),
        }
    }

    pub fn sink(&self) -> Arc<dyn RenderSink> {
        Arc::clone(&self.sink)
    }

    pub fn charts(&self) -> &ChartRegistry {
        &self.charts
    }

    /// Render a complete snapshot. Only called once all three resources of a
    /// cycle arrived.
    pub fn render(&self, snap: &PollSnapshot) {
        self.render_gauges(&snap.metrics);
        self.render_process(&snap.metrics);
        self.render_gc(&snap.metrics);
        self.render_python_info(&snap.metrics);
        self.render_history(&snap.history);
        self.render_threats(&snap.threats);
    }

    fn render_gauges(&self, m: &MetricSample) {
        for (id, metric) in GAUGES {
            let v = clamp_percent(m.get_or(metric, 0.0));
            self.sink.progress(id, v, GaugeLevel::for_percent(v));
        }
    }

    fn render_process(&self, m: &MetricSample) {
        self.sink.text(
            "virtualMemory",
            &format_bytes(m.get_or("process_virtual_memory_bytes", 0.0)),
        );
        self.sink.text(
            "residentMemory",
            &format_bytes(m.get_or("process_resident_memory_bytes", 0.0)),
        );
        self.sink
            .text("openFds", &m.get_or("process_open_fds", 0.0).to_string());
        self.sink.text(
            "cpuTime",
            &format!("{:.2} seconds", m.get_or("process_cpu_seconds_total", 0.0)),
        );
    }

    fn render_gc(&self, m: &MetricSample) {
        let objects = ChartData {
            kind: ChartKind::Bar,
            labels: generation_labels(),
            datasets: vec![
                Dataset::new(
                    "Objects Collected",
                    per_generation(m, "python_gc_objects_collected_total"),
                ),
                Dataset::new(
                    "Objects Uncollectable",
                    per_generation(m, "python_gc_objects_uncollectable_total"),
                ),
            ],
        };
        self.apply_chart("gcObjects", objects);

        let collections = ChartData {
            kind: ChartKind::Bar,
            labels: generation_labels(),
            datasets: vec![Dataset::new(
                "Collections",
                per_generation(m, "python_gc_collections_total"),
            )],
        };
        self.apply_chart("gcCollections", collections);
    }

    fn render_python_info(&self, m: &MetricSample) {
        self.sink.text("pythonInfo", &python_info(m));
    }

    fn render_history(&self, h: &HistorySeries) {
        let chart = ChartData {
            kind: ChartKind::Line,
            labels: h.timestamps.clone(),
            datasets: vec![
                Dataset::new("DDoS Probability", h.ddos_prob.clone()),
                Dataset::new("Network In", h.network_in.clone()),
                Dataset::new("Network Out", h.network_out.clone()),
                Dataset::new("Connections", h.connections.clone()),
            ],
        };
        self.apply_chart("history", chart);
    }

    fn render_threats(&self, t: &ActiveThreats) {
        self.sink.text("activeThreats", &t.count().to_string());
        self.sink
            .text("peakThreatConfidence", &format_percent(t.max_confidence() * 100.0));
    }

    fn apply_chart(&self, id: &str, data: ChartData) {
        let update = self.charts.upsert(id, data.clone());
        self.sink.chart(id, &data, update);
    }
}

fn generation_labels() -> Vec<String> {
    GENERATIONS
        .iter()
        .map(|g| format!("Generation {g}"))
        .collect()
}

fn per_generation(m: &MetricSample, name: &str) -> Vec<f64> {
    GENERATIONS
        .iter()
        .map(|g| m.labeled_or(name, &[("generation", *g)], 0.0))
        .collect()
}

/// `"<implementation> <version>"` from any `python_info` sample.
fn python_info(m: &MetricSample) -> String {
    m.family("python_info")
        .filter(|(_, v)| *v != 0.0 && !v.is_nan())
        .filter_map(|(k, _)| split_key(k))
        .find_map(|(_, labels)| {
            let find = |name: &str| {
                labels
                    .iter()
                    .find(|(k, _)| k == name)
                    .map(|(_, v)| v.clone())
            };
            match (find("implementation"), find("version")) {
                (Some(imp), Some(ver)) => Some(format!("{imp} {ver}")),
                (None, Some(ver)) => Some(ver),
                _ => None,
            }
        })
        .unwrap_or_else(|| "Unknown".to_string())
}
