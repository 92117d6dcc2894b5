use std::{sync::Arc, time::Duration};

use log::info;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::events::{EngineEvent, EventSink};
use crate::ticker::{RepeatingTimer, TickFlow};

use super::state::{format_elapsed, StopwatchState, StopwatchStatus};

/// What the stopwatch view renders.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StopwatchSnapshot {
    pub status: StopwatchStatus,
    pub elapsed_ms: u64,
    pub display: String,
}

impl StopwatchSnapshot {
    fn capture(state: &StopwatchState, now: std::time::Instant) -> Self {
        let elapsed = state.elapsed(now);
        Self {
            status: state.status,
            elapsed_ms: elapsed.as_millis().min(u64::MAX as u128) as u64,
            display: format_elapsed(elapsed),
        }
    }
}

// Goes through tokio's clock so paused-time tests drive the stopwatch too.
fn monotonic_now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}

/// Owns the stopwatch and its redraw ticker. Cheap to clone; clones share
/// the same stopwatch.
#[derive(Clone)]
pub struct StopwatchController {
    state: Arc<Mutex<StopwatchState>>,
    ticker: Arc<Mutex<RepeatingTimer>>,
    sink: Arc<dyn EventSink>,
}

impl StopwatchController {
    pub fn new(sink: Arc<dyn EventSink>, refresh: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(StopwatchState::new())),
            ticker: Arc::new(Mutex::new(RepeatingTimer::new("stopwatch", refresh))),
            sink,
        }
    }

    pub async fn start(&self) -> StopwatchSnapshot {
        let started = self.state.lock().await.start(monotonic_now());
        if started {
            info!("Stopwatch started");
            self.spawn_ticker().await;
        }
        self.snapshot().await
    }

    pub async fn stop(&self) -> StopwatchSnapshot {
        let stopped = self.state.lock().await.stop(monotonic_now());
        if stopped {
            self.ticker.lock().await.cancel();
        }
        let snapshot = self.snapshot().await;
        if stopped {
            info!("Stopwatch stopped at {}", snapshot.display);
            self.sink.emit(EngineEvent::StopwatchTick(snapshot.clone()));
        }
        snapshot
    }

    pub async fn reset(&self) -> StopwatchSnapshot {
        self.state.lock().await.reset();
        self.ticker.lock().await.cancel();

        let snapshot = self.snapshot().await;
        info!("Stopwatch reset");
        self.sink.emit(EngineEvent::StopwatchTick(snapshot.clone()));
        snapshot
    }

    pub async fn elapsed(&self) -> Duration {
        self.state.lock().await.elapsed(monotonic_now())
    }

    pub async fn snapshot(&self) -> StopwatchSnapshot {
        let guard = self.state.lock().await;
        StopwatchSnapshot::capture(&guard, monotonic_now())
    }

    pub async fn is_ticking(&self) -> bool {
        self.ticker.lock().await.is_active()
    }

    async fn spawn_ticker(&self) {
        let state = self.state.clone();
        let sink = self.sink.clone();

        self.ticker.lock().await.start(move || {
            let state = state.clone();
            let sink = sink.clone();
            async move {
                let snapshot = {
                    let guard = state.lock().await;
                    if !guard.is_running() {
                        return TickFlow::Stop;
                    }
                    StopwatchSnapshot::capture(&guard, monotonic_now())
                };
                sink.emit(EngineEvent::StopwatchTick(snapshot));
                TickFlow::Continue
            }
        });
    }
}
