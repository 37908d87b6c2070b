//! Built-in stream event handlers.

mod alert;
mod marker;

pub use alert::PatternAlertHandler;
pub use marker::MarkerHandler;
