//! Display helpers shared by renderers.

const BYTE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Human-readable byte count (1024-based, up to two decimals).
///
/// `0`, negative and non-finite inputs render as `"0 Bytes"`.
pub fn format_bytes(bytes: f64) -> String {
    if !bytes.is_finite() || bytes <= 0.0 {
        return "0 Bytes".to_string();
    }

    let mut scaled = bytes;
    let mut unit = 0;
    while scaled >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }

    format!("{} {}", trim_decimals(scaled), BYTE_UNITS[unit])
}

/// Two decimals, trailing zeros dropped (`1.50` -> `1.5`, `1.00` -> `1`).
fn trim_decimals(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

/// Colour tier of a percentage gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeLevel {
    /// Below 60%.
    Normal,
    /// 60% up to 80%.
    Elevated,
    /// 80% and above.
    Critical,
}

impl GaugeLevel {
    pub fn for_percent(percent: f64) -> Self {
        let p = clamp_percent(percent);
        if p < 60.0 {
            GaugeLevel::Normal
        } else if p < 80.0 {
            GaugeLevel::Elevated
        } else {
            GaugeLevel::Critical
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GaugeLevel::Normal => "normal",
            GaugeLevel::Elevated => "elevated",
            GaugeLevel::Critical => "critical",
        }
    }
}

/// Clamp into `0..=100`; `NaN` becomes 0.
pub fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

/// `42.0` -> `"42.0%"`, after clamping.
pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", clamp_percent(percent))
}

/// Severity tier of a pattern alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    Low,
    High,
}

impl AlertSeverity {
    /// `confidence >= high_threshold` is High; anything else (including a
    /// missing confidence, passed as 0) is Low.
    pub fn classify(confidence: f64, high_threshold: f64) -> Self {
        if confidence >= high_threshold {
            AlertSeverity::High
        } else {
            AlertSeverity::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::High => "high",
        }
    }
}
