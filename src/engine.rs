use std::sync::Arc;
use std::time::Duration;

use log::info;
use tokio::sync::Mutex;

use crate::alarm::{AlarmController, QuotePool};
use crate::audio::{AlarmChime, SoundPort};
use crate::clock::{ClockFace, WallClock};
use crate::events::{ClockTickEvent, EngineEvent, EventSink};
use crate::settings::EngineSettings;
use crate::stopwatch::StopwatchController;
use crate::ticker::{RepeatingTimer, TickFlow};
use crate::world_clock::{filter_regions, FilterView, WorldClock};

const ENABLE_LOGS: bool = true;

/// Alarm matching compares whole seconds, so this cadence is fixed.
pub const CLOCK_TICK: Duration = Duration::from_secs(1);

use crate::log_debug;

/// Work done on every 1-second tick. Cloned into the ticker task.
#[derive(Clone)]
struct SecondTick {
    wall_clock: Arc<dyn WallClock>,
    alarm: AlarmController,
    world: Arc<Mutex<WorldClock>>,
    last_face: Arc<Mutex<ClockFace>>,
    sink: Arc<dyn EventSink>,
}

impl SecondTick {
    async fn run(&self) -> ClockTickEvent {
        // One read per tick; the face, the alarm and every zone share it.
        let reading = self.wall_clock.read();
        let face = reading.face();
        log_debug!("tick {} {}", face.time, face.date);

        self.alarm.on_tick(&face.time).await;

        let zones = {
            let mut world = self.world.lock().await;
            world.refresh(reading.utc);
            world.readings()
        };

        *self.last_face.lock().await = face.clone();

        let event = ClockTickEvent {
            face,
            alarm: self.alarm.label().await,
            zones,
        };
        self.sink.emit(EngineEvent::ClockTick(event.clone()));
        event
    }
}

/// Application context owning the stopwatch, the alarm, the world clock and
/// the 1-second ticker. The UI layer holds it by reference.
pub struct Engine {
    stopwatch: StopwatchController,
    alarm: AlarmController,
    tick: SecondTick,
    ticker: Mutex<RepeatingTimer>,
}

impl Engine {
    pub fn new(
        settings: &EngineSettings,
        wall_clock: Arc<dyn WallClock>,
        sound_port: Arc<dyn SoundPort>,
        world: WorldClock,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let stopwatch = StopwatchController::new(sink.clone(), settings.stopwatch_refresh());
        let chime = AlarmChime::new(sound_port, settings.alarm_sound.clone());
        let alarm = AlarmController::new(chime, QuotePool::default(), sink.clone());

        info!(
            "Engine ready: {} world clock zones, clock {}",
            world.zone_count(),
            wall_clock.name()
        );

        let tick = SecondTick {
            wall_clock,
            alarm: alarm.clone(),
            world: Arc::new(Mutex::new(world)),
            last_face: Arc::new(Mutex::new(ClockFace::default())),
            sink,
        };

        Self {
            stopwatch,
            alarm,
            tick,
            ticker: Mutex::new(RepeatingTimer::new("clock", CLOCK_TICK)),
        }
    }

    pub fn stopwatch(&self) -> &StopwatchController {
        &self.stopwatch
    }

    pub fn alarm(&self) -> &AlarmController {
        &self.alarm
    }

    /// Starts the 1-second ticker. The first tick runs immediately.
    pub async fn start(&self) {
        let tick = self.tick.clone();
        self.ticker.lock().await.start(move || {
            let tick = tick.clone();
            async move {
                tick.run().await;
                TickFlow::Continue
            }
        });
    }

    pub async fn shutdown(&self) {
        self.ticker.lock().await.cancel();
        self.stopwatch.stop().await;
        info!("Engine stopped");
    }

    pub async fn is_ticking(&self) -> bool {
        self.ticker.lock().await.is_active()
    }

    /// Runs one 1-second tick by hand.
    pub async fn tick(&self) -> ClockTickEvent {
        self.tick.run().await
    }

    pub async fn last_face(&self) -> ClockFace {
        self.tick.last_face.lock().await.clone()
    }

    pub async fn filter_zones(&self, query: &str) -> FilterView {
        let world = self.tick.world.lock().await;
        filter_regions(world.regions(), query)
    }

    /// Visible zones with the times from the last tick, as `(id, time)`.
    pub async fn visible_zone_times(&self, query: &str) -> Vec<(String, String)> {
        let world = self.tick.world.lock().await;
        let view = filter_regions(world.regions(), query);
        view.visible_zone_ids()
            .filter_map(|id| world.find(id))
            .map(|entry| (entry.id.clone(), entry.rendered_time.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::{AlarmStatus, AlarmTarget, Meridiem};
    use crate::audio::testing::RecordingSoundPort;
    use crate::audio::PlaybackOutcome;
    use crate::clock::testing::FixedWallClock;
    use crate::events::testing::RecordingSink;
    use crate::settings::AlarmSoundSettings;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use chrono_tz::{America, Asia, Europe};

    struct Fixture {
        engine: Engine,
        clock: Arc<FixedWallClock>,
        sink: Arc<RecordingSink>,
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn fixture(start: DateTime<Utc>) -> Fixture {
        let clock = Arc::new(FixedWallClock::utc(start));
        let sink = Arc::new(RecordingSink::default());
        let settings = EngineSettings {
            alarm_sound: AlarmSoundSettings {
                enabled: false,
                path: "unused.wav".into(),
            },
            ..EngineSettings::default()
        };
        let world = WorldClock::from_zones(
            [Europe::London, America::New_York, Asia::Tokyo, Asia::Kolkata],
            &[],
        );
        let engine = Engine::new(
            &settings,
            clock.clone(),
            Arc::new(RecordingSoundPort::new(PlaybackOutcome::Played)),
            world,
            sink.clone(),
        );
        Fixture {
            engine,
            clock,
            sink,
        }
    }

    #[tokio::test]
    async fn tick_renders_face_and_alarm_label() {
        let f = fixture(at(2026, 10, 19, 21, 5, 0));
        let event = f.engine.tick().await;

        assert_eq!(event.face.time, "09:05:00 PM");
        assert_eq!(event.face.date, "19 October 2026");
        assert_eq!(event.alarm, "No alarm set");
        assert_eq!(f.engine.last_face().await, event.face);
        assert_eq!(f.sink.count("clock-tick"), 1);
    }

    #[tokio::test]
    async fn alarm_fires_once_across_days() {
        let f = fixture(at(2026, 10, 19, 23, 59, 58));
        f.engine
            .alarm()
            .set_alarm(AlarmTarget::new(11, 59, 59, Meridiem::Pm).unwrap())
            .await;

        f.engine.tick().await;
        assert!(f.sink.alarms().is_empty());

        f.clock.set(at(2026, 10, 19, 23, 59, 59));
        let event = f.engine.tick().await;
        assert_eq!(event.alarm, "Alarm set for 11:59:59 PM");
        assert_eq!(f.sink.alarms().len(), 1);

        f.clock.set(at(2026, 10, 20, 23, 59, 59));
        f.engine.tick().await;
        assert_eq!(f.sink.alarms().len(), 1);
        assert_eq!(f.engine.alarm().status().await, AlarmStatus::Triggered);
    }

    #[tokio::test]
    async fn skipped_second_misses_the_alarm() {
        let f = fixture(at(2026, 10, 19, 6, 29, 59));
        f.engine
            .alarm()
            .set_alarm(AlarmTarget::new(6, 30, 0, Meridiem::Am).unwrap())
            .await;

        f.engine.tick().await;
        f.clock.set(at(2026, 10, 19, 6, 30, 1));
        f.engine.tick().await;

        assert!(f.sink.alarms().is_empty());
        assert_eq!(f.engine.alarm().status().await, AlarmStatus::Armed);
    }

    #[tokio::test]
    async fn zones_share_the_tick_instant() {
        let instant = at(2024, 3, 10, 12, 0, 0);
        let f = fixture(instant);
        let event = f.engine.tick().await;

        assert_eq!(event.zones.len(), 4);
        for zone in &event.zones {
            let expected = (instant + Duration::seconds(zone.utc_offset_secs as i64))
                .format("%I:%M:%S %p")
                .to_string();
            assert_eq!(zone.time, expected, "{}", zone.id);
        }
        let kolkata = event.zones.iter().find(|z| z.id == "Asia/Kolkata").unwrap();
        assert_eq!(kolkata.time, "05:30:00 PM");
    }

    #[tokio::test]
    async fn filter_reads_last_tick() {
        let f = fixture(at(2024, 1, 15, 12, 0, 0));
        f.engine.tick().await;

        let view = f.engine.filter_zones("lon").await;
        assert!(view.is_zone_visible("Europe/London"));
        assert!(!view.is_zone_visible("Asia/Tokyo"));

        let times = f.engine.visible_zone_times("tok").await;
        assert_eq!(times, vec![("Asia/Tokyo".to_string(), "09:00:00 PM".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_drives_ticks_until_shutdown() {
        let f = fixture(at(2024, 1, 15, 12, 0, 0));
        f.engine.start().await;
        tokio::time::sleep(std::time::Duration::from_millis(2500)).await;
        assert_eq!(f.sink.count("clock-tick"), 3);
        assert!(f.engine.is_ticking().await);

        f.engine.shutdown().await;
        tokio::time::sleep(std::time::Duration::from_secs(3)).await;
        assert_eq!(f.sink.count("clock-tick"), 3);
        assert!(!f.engine.is_ticking().await);
    }
}
