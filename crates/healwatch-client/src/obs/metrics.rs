//! Minimal metrics registry for the client itself.
//!
//! Counter/gauge/histogram types with dynamic labels backed by `DashMap`.
//! Keys are built with `metric_key`, so the rendered exposition is exactly the
//! format `parse_exposition` reads back. Histograms record microseconds, so
//! sub-millisecond local fetches still show up in `_sum`.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

use healwatch_core::metric_key;

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<String, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let key = metric_key("", labels);
        let counter = self.map.entry(key).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for one label set (0 if never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&metric_key("", labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        for r in self.map.iter() {
            let _ = writeln!(out, "{}{} {}", name, r.key(), r.value().load(Ordering::Relaxed));
        }
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<String, AtomicI64>,
}

impl GaugeVec {
    /// Set to an absolute value.
    pub fn set(&self, labels: &[(&str, &str)], v: i64) {
        let gauge = self
            .map
            .entry(metric_key("", labels))
            .or_insert_with(|| AtomicI64::new(0));
        gauge.store(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> i64 {
        self.map
            .get(&metric_key("", labels))
            .map(|g| g.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} gauge", name);
        for r in self.map.iter() {
            let _ = writeln!(out, "{}{} {}", name, r.key(), r.value().load(Ordering::Relaxed));
        }
    }
}

// Fixed buckets in microseconds: 500us .. 10s
const BUCKETS_MICROS: [u64; 8] = [
    500, 5_000, 25_000, 100_000, 250_000, 1_000_000, 5_000_000, 10_000_000,
];

#[derive(Default)]
struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; 8],
}

/// Histogram keyed by raw label pairs (the `le` label is appended at render).
#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<Vec<(String, String)>, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a duration into cumulative buckets (microsecond scale).
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let mut key: Vec<(String, String)> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        key.sort();

        let hist = self.map.entry(key).or_default();
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum.fetch_add(micros, Ordering::Relaxed);

        for (i, &b) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} histogram", name);
        for r in self.map.iter() {
            let hist = r.value();
            let labels: Vec<(&str, &str)> =
                r.key().iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();

            for (i, le) in BUCKETS_MICROS.iter().enumerate() {
                let le = le.to_string();
                let mut with_le = labels.clone();
                with_le.push(("le", le.as_str()));
                let count = hist.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(out, "{} {}", metric_key(&format!("{name}_bucket"), &with_le), count);
            }
            let count = hist.count.load(Ordering::Relaxed);
            let mut inf = labels.clone();
            inf.push(("le", "+Inf"));
            let _ = writeln!(out, "{} {}", metric_key(&format!("{name}_bucket"), &inf), count);

            let sum = hist.sum.load(Ordering::Relaxed);
            let _ = writeln!(out, "{} {}", metric_key(&format!("{name}_sum"), &labels), sum);
            let _ = writeln!(out, "{} {}", metric_key(&format!("{name}_count"), &labels), count);
        }
    }
}

#[derive(Default)]
pub struct ClientMetrics {
    /// outcome = rendered | failed | stale
    pub poll_cycles: CounterVec,
    /// resource = metrics | history | threats
    pub fetch_duration: HistogramVec,
    /// outcome = open | failed
    pub stream_connects: CounterVec,
    /// kind = event | control | invalid
    pub stream_messages: CounterVec,
    /// 1 while the stream is open, 0 otherwise
    pub stream_open: GaugeVec,
    /// severity = low | high
    pub alerts: CounterVec,
}

impl ClientMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render all metrics in exposition format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.poll_cycles.render("healwatch_poll_cycles_total", &mut out);
        self.fetch_duration.render("healwatch_fetch_duration_micros", &mut out);
        self.stream_connects.render("healwatch_stream_connects_total", &mut out);
        self.stream_messages.render("healwatch_stream_messages_total", &mut out);
        self.stream_open.render("healwatch_stream_open", &mut out);
        self.alerts.render("healwatch_alerts_total", &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use healwatch_core::parse_exposition;

    #[test]
    fn rendered_output_reads_back_through_parser() {
        let m = ClientMetrics::new();
        m.poll_cycles.inc(&[("outcome", "rendered")]);
        m.poll_cycles.inc(&[("outcome", "rendered")]);
        m.poll_cycles.inc(&[("outcome", "failed")]);
        m.stream_open.set(&[], 1);
        m.fetch_duration
            .observe(&[("resource", "metrics")], Duration::from_millis(40));

        let s = parse_exposition(&m.render());
        assert_eq!(
            s.labeled_or("healwatch_poll_cycles_total", &[("outcome", "rendered")], 0.0),
            2.0
        );
        assert_eq!(
            s.labeled_or("healwatch_poll_cycles_total", &[("outcome", "failed")], 0.0),
            1.0
        );
        assert_eq!(s.get_or("healwatch_stream_open", 0.0), 1.0);
        assert_eq!(
            s.labeled_or(
                "healwatch_fetch_duration_micros_bucket",
                &[("resource", "metrics"), ("le", "25000")],
                -1.0
            ),
            0.0
        );
        assert_eq!(
            s.labeled_or(
                "healwatch_fetch_duration_micros_bucket",
                &[("le", "100000"), ("resource", "metrics")],
                0.0
            ),
            1.0
        );
        assert_eq!(
            s.labeled_or("healwatch_fetch_duration_micros_sum", &[("resource", "metrics")], 0.0),
            40_000.0
        );
    }

    #[test]
    fn sub_millisecond_fetches_are_not_lost() {
        let m = ClientMetrics::new();
        m.fetch_duration
            .observe(&[("resource", "threats")], Duration::from_micros(300));

        let s = parse_exposition(&m.render());
        assert_eq!(
            s.labeled_or("healwatch_fetch_duration_micros_sum", &[("resource", "threats")], 0.0),
            300.0
        );
        assert_eq!(
            s.labeled_or(
                "healwatch_fetch_duration_micros_bucket",
                &[("le", "500"), ("resource", "threats")],
                0.0
            ),
            1.0
        );
    }

    #[test]
    fn counters_default_to_zero() {
        let m = ClientMetrics::new();
        assert_eq!(m.alerts.get(&[("severity", "high")]), 0);
    }
}
