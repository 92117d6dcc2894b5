use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use crate::alarm::AlarmFiredEvent;
use crate::events::{ClockTickEvent, EngineEvent, EventSink};
use crate::stopwatch::StopwatchStatus;

/// Renders engine events on stdout for the terminal host.
#[derive(Default)]
pub struct TerminalDisplay {
    latest_tick: Mutex<Option<ClockTickEvent>>,
    notification: Mutex<Option<AlarmFiredEvent>>,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest_tick(&self) -> Option<ClockTickEvent> {
        self.latest_tick
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn pending_notification(&self) -> Option<AlarmFiredEvent> {
        self.notification
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn dismiss(&self) -> Option<AlarmFiredEvent> {
        self.notification
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl EventSink for TerminalDisplay {
    fn emit(&self, event: EngineEvent) {
        let mut out = io::stdout().lock();
        match event {
            EngineEvent::ClockTick(tick) => {
                *self.latest_tick.lock().unwrap_or_else(PoisonError::into_inner) = Some(tick);
            }
            EngineEvent::StopwatchTick(snapshot) => {
                let _ = match snapshot.status {
                    StopwatchStatus::Running => write!(out, "\rstopwatch {}", snapshot.display),
                    StopwatchStatus::Stopped => writeln!(out, "\rstopwatch {}", snapshot.display),
                };
            }
            EngineEvent::AlarmFired(fired) => {
                let _ = writeln!(
                    out,
                    "\n*** Alarm {} ***\n  \"{}\"\n  (type `dismiss` to close)",
                    fired.target, fired.quote
                );
                *self.notification.lock().unwrap_or_else(PoisonError::into_inner) = Some(fired);
            }
        }
        let _ = out.flush();
    }
}
