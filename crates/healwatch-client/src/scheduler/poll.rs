use std::future::Future;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use healwatch_core::error::Result;
use healwatch_core::parse_exposition;

use super::{PollSnapshot, RefreshScheduler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// All three resources arrived and the view was updated.
    Rendered,
    /// At least one resource failed; nothing was rendered.
    Failed,
    /// A newer cycle rendered before this one finished; result discarded.
    Stale,
}

impl CycleOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            CycleOutcome::Rendered => "rendered",
            CycleOutcome::Failed => "failed",
            CycleOutcome::Stale => "stale",
        }
    }
}

impl RefreshScheduler {
    /// Start one polling cycle.
    ///
    /// The cycle number is assigned when this is called, not when the returned
    /// future is first polled.
    pub fn run_cycle(self: &Arc<Self>) -> impl Future<Output = CycleOutcome> + Send + 'static {
        let cycle = self.cycles.fetch_add(1, Ordering::SeqCst) + 1;
        let this = Arc::clone(self);
        async move {
            let outcome = this.complete_cycle(cycle).await;
            this.metrics
                .poll_cycles
                .inc(&[("outcome", outcome.as_str())]);
            outcome
        }
    }

    /// First cycle immediately, then one per `interval` until the handle is
    /// aborted. A slow cycle does not delay the next tick.
    pub fn start_polling(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tick.tick().await;
                tokio::spawn(this.run_cycle());
            }
        })
    }

    async fn complete_cycle(&self, cycle: u64) -> CycleOutcome {
        let fetched = tokio::try_join!(
            self.timed("metrics", self.source.fetch_metrics_text()),
            self.timed("history", self.source.fetch_history()),
            self.timed("threats", self.source.fetch_active_threats()),
        );

        let (text, history, threats) = match fetched {
            Ok(parts) => parts,
            Err(e) => {
                tracing::warn!(cycle, code = e.code().as_str(), error = %e, "poll cycle failed; view left unchanged");
                return CycleOutcome::Failed;
            }
        };

        let snapshot = Arc::new(PollSnapshot {
            cycle,
            metrics: parse_exposition(&text),
            history,
            threats,
        });

        let mut last = self.last_poll.lock().await;
        if self.opts.drop_stale_cycles {
            if let Some(rendered) = last.as_ref().map(|s| s.cycle).filter(|&c| c > cycle) {
                tracing::debug!(cycle, rendered, "stale poll cycle dropped");
                return CycleOutcome::Stale;
            }
        }

        self.view.render(&snapshot);
        tracing::debug!(cycle, metrics = snapshot.metrics.len(), history = snapshot.history.len(), "poll cycle rendered");
        *last = Some(snapshot);
        CycleOutcome::Rendered
    }

    async fn timed<T>(&self, resource: &'static str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        let started = Instant::now();
        let res = fut.await;
        self.metrics
            .fetch_duration
            .observe(&[("resource", resource)], started.elapsed());
        res
    }
}
