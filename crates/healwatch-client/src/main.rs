//! healwatch client
//!
//! - Polls /metrics, /api/metrics_history, /api/active-threats every interval
//! - Subscribes to /ws threat events, reconnecting after a fixed delay
//! - Renders through the log sink until Ctrl-C

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use healwatch_client::{app_state::AppState, config};

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "healwatch.yaml".to_string());

    let cfg = match config::load_from_file(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(%path, code = e.code().as_str(), error = %e, "config load failed");
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::new(cfg) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            return ExitCode::FAILURE;
        }
    };

    let scheduler = state.scheduler();
    let endpoint = &state.cfg().endpoint;
    tracing::info!(base_url = %endpoint.base_url, interval_ms = state.cfg().polling.interval_ms, "healwatch starting");

    let poller = scheduler.start_polling(state.cfg().polling.interval());
    let stream = scheduler.connect_stream(endpoint.stream_url());

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "signal handler failed");
    }

    poller.abort();
    stream.abort();
    tracing::info!(cycles = scheduler.cycles_started(), "healwatch stopping");
    tracing::debug!(exposition = %state.metrics().render(), "client metrics");
    ExitCode::SUCCESS
}
