use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// What a tick callback wants to happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    Continue,
    Stop,
}

/// A periodic callback with explicit start/cancel.
///
/// Each tick body is awaited to completion before the next tick is polled.
/// Late ticks are skipped rather than replayed in a burst, so a stalled
/// runtime loses the ticks it missed.
pub struct RepeatingTimer {
    name: &'static str,
    period: Duration,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl RepeatingTimer {
    pub fn new(name: &'static str, period: Duration) -> Self {
        Self {
            name,
            period,
            handle: None,
            cancel_token: None,
        }
    }

    /// Starts ticking, replacing any loop this timer already runs. The first
    /// tick fires immediately.
    pub fn start<F, Fut>(&mut self, mut on_tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = TickFlow> + Send + 'static,
    {
        self.cancel();

        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();
        let name = self.name;
        let period = self.period;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            log_debug!("{name} ticker started ({}ms)", period.as_millis());

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if on_tick().await == TickFlow::Stop {
                            log_debug!("{name} ticker stopped by its callback");
                            break;
                        }
                    }
                    _ = token.cancelled() => {
                        log_debug!("{name} ticker cancelled");
                        break;
                    }
                }
            }
        });

        log_info!("{} ticker scheduled every {}ms", self.name, self.period.as_millis());
        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
    }

    /// Stops future ticks. A tick body already running finishes first.
    pub fn cancel(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        self.handle = None;
    }

    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for RepeatingTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
