use serde::Serialize;

use super::target::AlarmTarget;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AlarmStatus {
    Idle,
    Armed,
    Triggered,
}

/// Single-alarm state machine: Idle -> Armed -> Triggered, and back to
/// Armed only through `set_alarm`.
#[derive(Debug, Clone, Default)]
pub struct AlarmScheduler {
    target: Option<AlarmTarget>,
    /// `target` rendered once, compared against every tick.
    formatted: Option<String>,
    triggered: bool,
}

impl AlarmScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> AlarmStatus {
        match (self.target.is_some(), self.triggered) {
            (false, _) => AlarmStatus::Idle,
            (true, false) => AlarmStatus::Armed,
            (true, true) => AlarmStatus::Triggered,
        }
    }

    pub fn target(&self) -> Option<AlarmTarget> {
        self.target
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Replaces any previous alarm and re-arms, even after it fired.
    pub fn set_alarm(&mut self, target: AlarmTarget) {
        self.formatted = Some(target.formatted());
        self.target = Some(target);
        self.triggered = false;
    }

    /// Checks one tick's time of day. Returns `true` on the single tick that
    /// fires the alarm.
    ///
    /// Only an exact match counts: a tick that lands after the target second
    /// without hitting it misses the alarm.
    pub fn evaluate(&mut self, time_of_day: &str) -> bool {
        if self.status() != AlarmStatus::Armed {
            return false;
        }
        match self.formatted.as_deref() {
            Some(target) if target == time_of_day => {
                self.triggered = true;
                true
            }
            _ => false,
        }
    }

    pub fn label(&self) -> String {
        match &self.formatted {
            Some(formatted) => format!("Alarm set for {formatted}"),
            None => "No alarm set".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::target::Meridiem;

    fn target(h: u8, m: u8, s: u8, meridiem: Meridiem) -> AlarmTarget {
        AlarmTarget::new(h, m, s, meridiem).unwrap()
    }

    #[test]
    fn idle_scheduler_never_fires() {
        let mut scheduler = AlarmScheduler::new();
        assert_eq!(scheduler.status(), AlarmStatus::Idle);
        assert!(!scheduler.evaluate("12:00:00 AM"));
        assert_eq!(scheduler.label(), "No alarm set");
    }

    #[test]
    fn fires_once_on_exact_match() {
        let mut scheduler = AlarmScheduler::new();
        scheduler.set_alarm(target(11, 59, 59, Meridiem::Pm));
        assert_eq!(scheduler.status(), AlarmStatus::Armed);
        assert_eq!(scheduler.label(), "Alarm set for 11:59:59 PM");

        assert!(!scheduler.evaluate("11:59:58 PM"));
        assert!(scheduler.evaluate("11:59:59 PM"));
        assert_eq!(scheduler.status(), AlarmStatus::Triggered);

        // Same time of day on the following day.
        assert!(!scheduler.evaluate("11:59:59 PM"));
        assert!(scheduler.is_triggered());
    }

    #[test]
    fn late_tick_misses_the_alarm() {
        let mut scheduler = AlarmScheduler::new();
        scheduler.set_alarm(target(6, 30, 0, Meridiem::Am));

        assert!(!scheduler.evaluate("06:29:59 AM"));
        assert!(!scheduler.evaluate("06:30:01 AM"));
        assert_eq!(scheduler.status(), AlarmStatus::Armed);
    }

    #[test]
    fn meridiem_must_match() {
        let mut scheduler = AlarmScheduler::new();
        scheduler.set_alarm(target(8, 0, 0, Meridiem::Am));
        assert!(!scheduler.evaluate("08:00:00 PM"));
        assert!(scheduler.evaluate("08:00:00 AM"));
    }

    #[test]
    fn set_alarm_rearms_after_trigger() {
        let mut scheduler = AlarmScheduler::new();
        scheduler.set_alarm(target(1, 0, 0, Meridiem::Pm));
        assert!(scheduler.evaluate("01:00:00 PM"));

        scheduler.set_alarm(target(1, 0, 0, Meridiem::Pm));
        assert!(!scheduler.is_triggered());
        assert_eq!(scheduler.status(), AlarmStatus::Armed);
        assert!(scheduler.evaluate("01:00:00 PM"));
    }

    #[test]
    fn new_target_replaces_old_one() {
        let mut scheduler = AlarmScheduler::new();
        scheduler.set_alarm(target(9, 0, 0, Meridiem::Am));
        scheduler.set_alarm(target(10, 0, 0, Meridiem::Am));

        assert!(!scheduler.evaluate("09:00:00 AM"));
        assert!(scheduler.evaluate("10:00:00 AM"));
    }
}
