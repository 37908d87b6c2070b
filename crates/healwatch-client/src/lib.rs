//! healwatch client library entry.
//!
//! This crate wires the transports, the refresh scheduler, the event
//! dispatcher and the render layer into one monitoring client. It is intended
//! to be consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod dispatch;
pub mod obs;
pub mod render;
pub mod scheduler;
pub mod services;
pub mod transport;
