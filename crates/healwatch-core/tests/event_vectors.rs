//! Threat event / history payload vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]


use bytes::Bytes;
use healwatch_core::model::{HistorySeries, ThreatEvent};
use vector_loader::load;

#[test]
fn parse_event_full() {
    let ev = ThreatEvent::from_json(&load("event_full.json")).unwrap();
    assert_eq!(ev.ip, "203.0.113.7");
    assert!(ev.pattern_detected);
    assert_eq!(ev.attack_type.as_deref(), Some("HTTP Flood"));
    assert_eq!(ev.request_count, Some(128));
    let loc = ev.location.unwrap();
    assert_eq!(loc.country.as_deref(), Some("Netherlands"));
    let (lat, lon) = loc.coordinates().unwrap();
    assert!((lat - 52.37).abs() < 1e-9);
    assert!((lon - 4.89).abs() < 1e-9);
}

#[test]
fn parse_event_with_null_geolocation() {
    let ev = ThreatEvent::from_json(&load("event_null_geo.json")).unwrap();
    assert!(ev.pattern_detected);
    assert_eq!(ev.confidence, Some(0.9));
    let loc = ev.location.unwrap();
    assert!(loc.country.is_none());
    assert_eq!(loc.latitude, None);
    assert!(loc.coordinates().is_none());
}

#[test]
fn parse_event_min_with_null_attack_type() {
    let ev = ThreatEvent::from_json(&load("event_min.json")).unwrap();
    assert!(!ev.pattern_detected);
    assert!(ev.attack_type.is_none());
    assert!(ev.location.is_none());
    assert_eq!(ev.confidence_or_zero(), 0.0);
}

#[test]
fn parse_event_from_binary_frame() {
    let ev = ThreatEvent::from_bytes(&Bytes::from(load("event_full.json"))).unwrap();
    assert_eq!(ev.confidence, Some(0.9));
}

#[test]
fn malformed_event_is_a_decode_error() {
    let err = ThreatEvent::from_json("{\"pattern_detected\": tru").unwrap_err();
    assert_eq!(err.code().as_str(), "DECODE");

    // ip is required
    let err = ThreatEvent::from_json("{\"pattern_detected\": true}").unwrap_err();
    assert_eq!(err.code().as_str(), "DECODE");
}

#[test]
fn aligned_history_validates() {
    let h: HistorySeries = serde_json::from_str(&load("history_aligned.json")).unwrap();
    h.validate().unwrap();
    assert_eq!(h.len(), 3);
    assert_eq!(h.connections[2], 310.0);
}
