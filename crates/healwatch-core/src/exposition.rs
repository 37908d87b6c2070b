//! Exposition-text parsing (`GET /metrics`).
//!
//! Parsing rules:
//! - One record per line: `<key> <value> [timestamp]`.
//! - Blank lines and `#` comment lines never produce an entry.
//! - A record whose value is missing or malformed still yields its key,
//!   mapped to `NaN`. Parsing never fails the batch.
//! - Later records overwrite earlier records with the same key.
//!
//! Label-qualified keys are re-encoded through [`metric_key`], so lookups built
//! with `metric_key` match regardless of the label order a server emits.

use std::collections::HashMap;

/// Escape a label value for the exposition format.
pub fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Build the canonical key for a metric name and label set.
///
/// Labels are sorted by name; with no labels the key is the bare name.
pub fn metric_key(name: &str, labels: &[(&str, &str)]) -> String {
    if labels.is_empty() {
        return name.to_string();
    }

    let mut sorted = labels.to_vec();
    sorted.sort();

    let body = sorted
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",");
    format!("{name}{{{body}}}")
}

/// Split a label-qualified key into its metric name and (unescaped) labels.
///
/// Returns `None` when the key carries no well-formed `{...}` block.
pub fn split_key(raw: &str) -> Option<(&str, Vec<(String, String)>)> {
    let open = raw.find('{')?;
    let name = &raw[..open];
    if name.is_empty() {
        return None;
    }
    let mut rest = raw[open + 1..].strip_suffix('}')?.trim_start();

    let mut labels = Vec::new();
    while !rest.is_empty() {
        let eq = rest.find('=')?;
        let key = rest[..eq].trim();
        if key.is_empty() {
            return None;
        }

        let quoted = rest[eq + 1..].trim_start().strip_prefix('"')?;
        let mut value = String::new();
        let mut escaped = false;
        let mut end = None;
        for (i, c) in quoted.char_indices() {
            if escaped {
                value.push(if c == 'n' { '\n' } else { c });
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                end = Some(i);
                break;
            } else {
                value.push(c);
            }
        }
        let end = end?;
        labels.push((key.to_string(), value));

        rest = quoted[end + 1..].trim_start();
        if let Some(r) = rest.strip_prefix(',') {
            rest = r.trim_start();
        } else if !rest.is_empty() {
            return None;
        }
    }

    Some((name, labels))
}

/// Canonical form of a raw key; opaque keys are returned unchanged.
pub fn canonical_key(raw: &str) -> String {
    match split_key(raw) {
        Some((name, labels)) => {
            let refs: Vec<(&str, &str)> = labels
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            metric_key(name, &refs)
        }
        None => raw.to_string(),
    }
}

/// One poll's worth of metrics: canonical key -> value.
///
/// Created fresh for every polling cycle; never merged with a previous one.
#[derive(Debug, Clone, Default)]
pub struct MetricSample {
    values: HashMap<String, f64>,
}

impl MetricSample {
    /// Raw lookup. `NaN` is returned as stored.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Lookup with fallback: absent keys and `NaN` values resolve to `default`.
    pub fn get_or(&self, key: &str, default: f64) -> f64 {
        match self.values.get(key) {
            Some(v) if !v.is_nan() => *v,
            _ => default,
        }
    }

    /// `get_or` for a label-qualified metric.
    pub fn labeled_or(&self, name: &str, labels: &[(&str, &str)], default: f64) -> f64 {
        self.get_or(&metric_key(name, labels), default)
    }

    /// All samples of one metric family (bare name or any label set).
    pub fn family<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.values.iter().filter_map(move |(k, v)| {
            let is_member = k == name
                || k.strip_prefix(name).is_some_and(|rest| rest.starts_with('{'));
            is_member.then_some((k.as_str(), *v))
        })
    }

    pub fn insert(&mut self, key: String, value: f64) {
        self.values.insert(key, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parse an exposition body into a [`MetricSample`]. Never fails.
pub fn parse_exposition(text: &str) -> MetricSample {
    let mut sample = MetricSample::default();
    let mut malformed = 0usize;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(key) = tokens.next() else { continue };
        let value = tokens
            .next()
            .and_then(|t| t.parse::<f64>().ok())
            .unwrap_or(f64::NAN);
        if value.is_nan() {
            malformed += 1;
        }
        sample.insert(canonical_key(key), value);
    }

    if malformed > 0 {
        tracing::trace!(malformed, entries = sample.len(), "exposition lines without a numeric value");
    }
    sample
}
