//! RefreshScheduler: the polling loop and the reconnecting event stream.
//!
//! - Polling: one fetch -> parse -> render cycle per tick. Cycles are spawned
//!   and may overlap; each one carries a monotonically increasing number.
//! - Stream: one connection at a time, reconnected after a fixed delay.
//!
//! Both inputs fan out to the render layer; neither ever surfaces an error to
//! the view.

mod poll;
mod stream;

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use healwatch_core::model::{ActiveThreats, HistorySeries};
use healwatch_core::MetricSample;

use crate::config::ClientConfig;
use crate::dispatch::EventDispatcher;
use crate::obs::ClientMetrics;
use crate::render::DashboardView;
use crate::transport::{MetricsSource, StreamConnector};

pub use poll::CycleOutcome;
pub use stream::{ReconnectPolicy, StreamExit};

/// Everything one successful polling cycle fetched.
#[derive(Debug, Clone)]
pub struct PollSnapshot {
    pub cycle: u64,
    pub metrics: MetricSample,
    pub history: HistorySeries,
    pub threats: ActiveThreats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketState {
    Connecting,
    Open,
    Closed,
}

impl SocketState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => SocketState::Connecting,
            1 => SocketState::Open,
            _ => SocketState::Closed,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            SocketState::Connecting => 0,
            SocketState::Open => 1,
            SocketState::Closed => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerOptions {
    /// Skip a cycle's render when a newer cycle has already rendered.
    pub drop_stale_cycles: bool,
    pub reconnect: ReconnectPolicy,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            drop_stale_cycles: false,
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl SchedulerOptions {
    pub fn from_config(cfg: &ClientConfig) -> Self {
        Self {
            drop_stale_cycles: cfg.polling.drop_stale_cycles,
            reconnect: ReconnectPolicy::from_config(&cfg.stream),
        }
    }
}

pub struct RefreshScheduler {
    source: Arc<dyn MetricsSource>,
    connector: Arc<dyn StreamConnector>,
    view: Arc<DashboardView>,
    dispatcher: Arc<EventDispatcher>,
    metrics: Arc<ClientMetrics>,
    opts: SchedulerOptions,
    /// Number of the most recently started cycle.
    cycles: AtomicU64,
    /// Last rendered snapshot; the lock also serialises render passes.
    last_poll: Mutex<Option<Arc<PollSnapshot>>>,
    socket: AtomicU8,
}

impl RefreshScheduler {
    pub fn new(
        source: Arc<dyn MetricsSource>,
        connector: Arc<dyn StreamConnector>,
        view: Arc<DashboardView>,
        dispatcher: Arc<EventDispatcher>,
        metrics: Arc<ClientMetrics>,
        opts: SchedulerOptions,
    ) -> Self {
        Self {
            source,
            connector,
            view,
            dispatcher,
            metrics,
            opts,
            cycles: AtomicU64::new(0),
            last_poll: Mutex::new(None),
            socket: AtomicU8::new(SocketState::Closed.as_u8()),
        }
    }

    /// Most recently rendered snapshot (replaced wholesale each cycle).
    pub async fn last_poll(&self) -> Option<Arc<PollSnapshot>> {
        self.last_poll.lock().await.clone()
    }

    /// Number of polling cycles started so far.
    pub fn cycles_started(&self) -> u64 {
        self.cycles.load(Ordering::SeqCst)
    }

    pub fn socket_state(&self) -> SocketState {
        SocketState::from_u8(self.socket.load(Ordering::SeqCst))
    }

    fn set_socket(&self, state: SocketState) {
        self.socket.store(state.as_u8(), Ordering::SeqCst);
        let open = i64::from(state == SocketState::Open);
        self.metrics.stream_open.set(&[], open);
    }

    pub fn metrics(&self) -> Arc<ClientMetrics> {
        Arc::clone(&self.metrics)
    }
}
