//! Render layer: opaque widget sinks plus the poll-snapshot view.
//!
//! Widgets are addressed by string ids (`cpuLoad`, `gcObjects`, ...). A
//! [`RenderSink`] receives every mutation; [`ChartRegistry`] keeps one handle
//! per chart so charts are created once and updated in place afterwards.

pub mod log_sink;
pub mod registry;
pub mod sink;
pub mod view;

pub use log_sink::LogSink;
pub use registry::ChartRegistry;
pub use sink::{Alert, ChartData, ChartKind, ChartUpdate, Dataset, MapMarker, RenderSink};
pub use view::DashboardView;
