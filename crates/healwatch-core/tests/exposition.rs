//! Exposition parser behaviour on realistic and hostile input.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]


use healwatch_core::{metric_key, parse_exposition};
use vector_loader::load;

#[test]
fn two_token_line_maps_key_to_value() {
    let s = parse_exposition("requests_total 1027\n");
    assert_eq!(s.get("requests_total"), Some(1027.0));
    assert_eq!(s.len(), 1);
}

#[test]
fn comments_and_blank_lines_never_produce_entries() {
    let s = parse_exposition("# HELP x help\n\n   \n# TYPE x gauge\n#x 3\n");
    assert!(s.is_empty());
}

#[test]
fn duplicate_key_later_line_wins() {
    let s = parse_exposition("temp 1\ntemp 2\n");
    assert_eq!(s.get("temp"), Some(2.0));
}

#[test]
fn missing_key_reads_as_default() {
    let s = parse_exposition("a 1\n");
    assert_eq!(s.get_or("absent", 0.0), 0.0);
    assert_eq!(s.labeled_or("absent", &[("g", "0")], 0.0), 0.0);
}

#[test]
fn line_without_value_is_nan_not_an_error() {
    let s = parse_exposition("lonely\nok 5\n");
    assert!(s.get("lonely").unwrap().is_nan());
    assert_eq!(s.get_or("lonely", 0.0), 0.0);
    assert_eq!(s.get("ok"), Some(5.0));
}

#[test]
fn malformed_number_only_affects_its_key() {
    let s = parse_exposition("bad 12abc\ngood 3.5\n");
    assert!(s.get("bad").unwrap().is_nan());
    assert_eq!(s.get("good"), Some(3.5));
}

#[test]
fn trailing_timestamp_and_crlf_are_tolerated() {
    let s = parse_exposition("up 1 1700000000000\r\nspecial +Inf\r\n");
    assert_eq!(s.get("up"), Some(1.0));
    assert_eq!(s.get("special"), Some(f64::INFINITY));
}

#[test]
fn labeled_keys_match_regardless_of_server_label_order() {
    let s = parse_exposition("http_requests{method=\"get\",code=\"200\"} 9\n");
    let key = metric_key("http_requests", &[("method", "get"), ("code", "200")]);
    assert_eq!(s.get(&key), Some(9.0));
    assert_eq!(s.labeled_or("http_requests", &[("code", "200"), ("method", "get")], 0.0), 9.0);
}

#[test]
fn realistic_process_exposition() {
    let s = parse_exposition(&load("metrics.txt"));
    assert_eq!(s.get_or("process_resident_memory_bytes", 0.0), 1536.0);
    assert_eq!(s.get_or("process_virtual_memory_bytes", 0.0), 188_743_680.0);
    assert_eq!(
        s.labeled_or("python_gc_objects_collected_total", &[("generation", "1")], 0.0),
        64.0
    );
    assert_eq!(s.family("python_info").count(), 1);
}
