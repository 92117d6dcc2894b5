use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;

/// Format used for the clock face and for alarm comparison.
pub const TIME_OF_DAY_FORMAT: &str = "%I:%M:%S %p";
const DATE_FORMAT: &str = "%d %B %Y";

/// One read of the wall clock: the UTC instant plus the local civil time
/// it corresponds to. Taken once per tick and shared by everything the tick
/// computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    pub utc: DateTime<Utc>,
    pub local: NaiveDateTime,
}

impl ClockReading {
    pub fn in_zone<Tz: TimeZone>(utc: DateTime<Utc>, zone: &Tz) -> Self {
        Self {
            utc,
            local: utc.with_timezone(zone).naive_local(),
        }
    }

    pub fn face(&self) -> ClockFace {
        ClockFace {
            time: self.local.format(TIME_OF_DAY_FORMAT).to_string(),
            date: self.local.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Rendered current time and date shown by the main clock view.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClockFace {
    pub time: String,
    pub date: String,
}

/// Port for wall-clock time.
///
/// Only display and alarm comparison read the wall clock; elapsed durations
/// use `std::time::Instant` so clock adjustments never leak into them.
pub trait WallClock: Send + Sync {
    fn read(&self) -> ClockReading;

    fn name(&self) -> &str {
        "WallClock"
    }
}

/// The host's clock, rendered in the system's local zone.
pub struct SystemWallClock;

impl SystemWallClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemWallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClock for SystemWallClock {
    fn read(&self) -> ClockReading {
        ClockReading::in_zone(Utc::now(), &Local)
    }

    fn name(&self) -> &str {
        "SystemWallClock"
    }
}
