use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum StopwatchStatus {
    #[default]
    Stopped,
    Running,
}

/// Stopwatch bookkeeping. All arithmetic is on monotonic `Instant`s handed
/// in by the caller, so the state itself never reads a clock.
#[derive(Debug, Clone, Default)]
pub struct StopwatchState {
    pub status: StopwatchStatus,
    /// Time banked from completed running segments.
    pub accumulated: Duration,
    /// Start of the running segment; `Some` exactly while running.
    pub run_started_at: Option<Instant>,
}

impl StopwatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.status == StopwatchStatus::Running
    }

    /// Returns `true` if the stopwatch actually started.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_running() {
            return false;
        }
        self.status = StopwatchStatus::Running;
        self.run_started_at = Some(now);
        true
    }

    /// Banks the running segment. Returns `true` if the stopwatch was running.
    pub fn stop(&mut self, now: Instant) -> bool {
        if !self.is_running() {
            return false;
        }
        if let Some(started) = self.run_started_at.take() {
            self.accumulated = self
                .accumulated
                .saturating_add(now.saturating_duration_since(started));
        }
        self.status = StopwatchStatus::Stopped;
        true
    }

    /// Clears everything, discarding any running segment unbanked.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match (self.status, self.run_started_at) {
            (StopwatchStatus::Running, Some(started)) => self
                .accumulated
                .saturating_add(now.saturating_duration_since(started)),
            _ => self.accumulated,
        }
    }
}

/// Renders `HH:MM:SS.cc`. Hours keep counting past 24.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let (mins, secs) = (total_secs / 60, total_secs % 60);
    let (hours, mins) = (mins / 60, mins % 60);
    let centis = elapsed.subsec_millis() / 10;
    format!("{hours:02}:{mins:02}:{secs:02}.{centis:02}")
}
