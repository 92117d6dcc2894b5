use serde::Serialize;

use crate::alarm::AlarmFiredEvent;
use crate::clock::ClockFace;
use crate::stopwatch::StopwatchSnapshot;
use crate::world_clock::ZoneReading;

/// Payload of the 1-second tick: everything the main views redraw.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockTickEvent {
    pub face: ClockFace,
    pub alarm: String,
    pub zones: Vec<ZoneReading>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum EngineEvent {
    ClockTick(ClockTickEvent),
    StopwatchTick(StopwatchSnapshot),
    AlarmFired(AlarmFiredEvent),
}

impl EngineEvent {
    pub fn name(&self) -> &'static str {
        match self {
            EngineEvent::ClockTick(_) => "clock-tick",
            EngineEvent::StopwatchTick(_) => "stopwatch-tick",
            EngineEvent::AlarmFired(_) => "alarm-fired",
        }
    }
}

/// Where the engine pushes rendered output. The UI layer implements this.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}
