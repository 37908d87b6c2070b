//! Dispatcher module exports.
//!
//! Re-exports the event dispatcher and handler trait so downstream consumers
//! can depend on this module directly.

pub mod dispatcher;

pub use dispatcher::{EventDispatcher, EventHandler};
