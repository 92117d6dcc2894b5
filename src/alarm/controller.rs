use std::sync::Arc;

use log::info;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::audio::AlarmChime;
use crate::events::{EngineEvent, EventSink};
use crate::settings::AlarmSoundSettings;

use super::quotes::QuotePool;
use super::scheduler::{AlarmScheduler, AlarmStatus};
use super::target::AlarmTarget;

/// Notification the UI shows when the alarm goes off; dismissed by the user.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AlarmFiredEvent {
    pub target: String,
    pub quote: String,
}

#[derive(Clone)]
pub struct AlarmController {
    scheduler: Arc<Mutex<AlarmScheduler>>,
    chime: Arc<Mutex<AlarmChime>>,
    quotes: QuotePool,
    sink: Arc<dyn EventSink>,
}

impl AlarmController {
    pub fn new(chime: AlarmChime, quotes: QuotePool, sink: Arc<dyn EventSink>) -> Self {
        Self {
            scheduler: Arc::new(Mutex::new(AlarmScheduler::new())),
            chime: Arc::new(Mutex::new(chime)),
            quotes,
            sink,
        }
    }

    /// Arms `target`, replacing any previous alarm. Returns the new label.
    pub async fn set_alarm(&self, target: AlarmTarget) -> String {
        let mut scheduler = self.scheduler.lock().await;
        scheduler.set_alarm(target);
        info!("Alarm armed for {target}");
        scheduler.label()
    }

    pub async fn label(&self) -> String {
        self.scheduler.lock().await.label()
    }

    pub async fn status(&self) -> AlarmStatus {
        self.scheduler.lock().await.status()
    }

    pub async fn set_sound(&self, settings: AlarmSoundSettings) {
        self.chime.lock().await.set_settings(settings);
    }

    pub async fn sound(&self) -> AlarmSoundSettings {
        self.chime.lock().await.settings().clone()
    }

    /// Evaluates one tick's time of day. On the firing tick this starts the
    /// chime in the background and emits the quote notification.
    pub async fn on_tick(&self, time_of_day: &str) -> Option<AlarmFiredEvent> {
        let target = {
            let mut scheduler = self.scheduler.lock().await;
            if !scheduler.evaluate(time_of_day) {
                return None;
            }
            scheduler.target()?
        };

        info!("Alarm triggered at {time_of_day}");
        // Detached: the tick never waits on playback.
        let _ = self.chime.lock().await.ring();

        let fired = AlarmFiredEvent {
            target: target.formatted(),
            quote: self.quotes.random_quote().to_string(),
        };
        self.sink.emit(EngineEvent::AlarmFired(fired.clone()));
        Some(fired)
    }
}
