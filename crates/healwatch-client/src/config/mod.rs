//! Client config loader (strict parsing).

pub mod schema;

use std::fs;

use healwatch_core::error::{HealwatchError, Result};

pub use schema::{AlertSection, ClientConfig, EndpointSection, PollingSection, StreamSection};

pub fn load_from_file(path: &str) -> Result<ClientConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| HealwatchError::BadConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ClientConfig> {
    let cfg: ClientConfig = serde_yaml::from_str(s)
        .map_err(|e| HealwatchError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
