//! JSON payloads served by the monitoring endpoints.
//!
//! - `/ws` pushes one [`ThreatEvent`] per message.
//! - `/api/metrics_history` returns a [`HistorySeries`].
//! - `/api/active-threats` returns [`ActiveThreats`].

use bytes::Bytes;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{HealwatchError, Result};

/// Geolocation attached to a threat event. The geoip lookup may leave any
/// field null.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoLocation {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// One analysis result pushed over the event stream.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreatEvent {
    pub ip: String,
    #[serde(default)]
    pub location: Option<GeoLocation>,
    #[serde(default)]
    pub pattern_detected: bool,
    #[serde(default)]
    pub attack_type: Option<String>,
    /// Classifier confidence in `[0, 1]`.
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub request_count: Option<u64>,
}

impl GeoLocation {
    /// `(latitude, longitude)` when both are present and finite.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}

impl ThreatEvent {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s)
            .map_err(|e| HealwatchError::Decode(format!("invalid threat event json: {e}")))
    }

    pub fn from_bytes(b: &Bytes) -> Result<Self> {
        serde_json::from_slice(b)
            .map_err(|e| HealwatchError::Decode(format!("invalid threat event json: {e}")))
    }

    /// Confidence with a missing value read as 0.
    pub fn confidence_or_zero(&self) -> f64 {
        self.confidence.filter(|c| !c.is_nan()).unwrap_or(0.0)
    }
}

/// Index-aligned history arrays.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistorySeries {
    #[serde(default)]
    pub timestamps: Vec<String>,
    #[serde(default)]
    pub ddos_prob: Vec<f64>,
    #[serde(default)]
    pub network_in: Vec<f64>,
    #[serde(default)]
    pub network_out: Vec<f64>,
    #[serde(default)]
    pub connections: Vec<f64>,
}

impl HistorySeries {
    /// Every series must have one value per timestamp.
    pub fn validate(&self) -> Result<()> {
        let n = self.timestamps.len();
        for (name, len) in [
            ("ddos_prob", self.ddos_prob.len()),
            ("network_in", self.network_in.len()),
            ("network_out", self.network_out.len()),
            ("connections", self.connections.len()),
        ] {
            if len != n {
                return Err(HealwatchError::Misaligned(format!(
                    "{name} has {len} points, timestamps has {n}"
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// A cached threat as served by `/api/active-threats`.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreatRecord {
    #[serde(default)]
    pub confidence: f64,
    /// Remaining fields are passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActiveThreats {
    #[serde(default)]
    pub threats: Vec<ThreatRecord>,
}

impl ActiveThreats {
    pub fn count(&self) -> usize {
        self.threats.len()
    }

    /// Highest confidence among active threats; 0 when there are none.
    pub fn max_confidence(&self) -> f64 {
        self.threats
            .iter()
            .map(|t| t.confidence)
            .filter(|c| !c.is_nan())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn misaligned_history_is_rejected() {
        let h: HistorySeries = serde_json::from_str(
            r#"{"timestamps":["a","b"],"ddos_prob":[0.1,0.2],"network_in":[1],"network_out":[1,2],"connections":[3,4]}"#,
        )
        .unwrap();
        let err = h.validate().unwrap_err();
        assert_eq!(err.code().as_str(), "MISALIGNED");
    }

    #[test]
    fn active_threats_keeps_extra_fields() {
        let t: ActiveThreats = serde_json::from_str(
            r#"{"threats":[{"confidence":0.4,"ip":"10.0.0.1"},{"confidence":0.7}]}"#,
        )
        .unwrap();
        assert_eq!(t.count(), 2);
        assert!((t.max_confidence() - 0.7).abs() < 1e-9);
        assert_eq!(t.threats[0].extra.get("ip").and_then(|v| v.as_str()), Some("10.0.0.1"));
    }

    #[test]
    fn empty_threat_list_has_zero_peak() {
        let t = ActiveThreats::default();
        assert_eq!(t.max_confidence(), 0.0);
    }
}
