//! healwatch core: transport-agnostic primitives for the monitoring client.
//!
//! This crate defines the metric key encoding, the exposition-text parser, the
//! JSON payload models served by the monitoring endpoints, and the small
//! display helpers shared by every renderer. It intentionally carries no
//! transport or runtime dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed exposition lines degrade to `NaN` values; every other fallible
//! path surfaces as `HealwatchError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod display;
pub mod error;
pub mod exposition;
pub mod model;

/// Shared result type.
pub use error::{HealwatchError, Result};
pub use exposition::{metric_key, parse_exposition, MetricSample};
