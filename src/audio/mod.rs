#[cfg(feature = "playback")]
pub mod rodio_port;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::settings::AlarmSoundSettings;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    Played,
    Unavailable,
}

/// Plays a sound file to completion. May block; callers run it off the tick
/// loop. Implementations report failure as `Unavailable` instead of erroring.
pub trait SoundPort: Send + Sync {
    fn play(&self, path: &Path) -> PlaybackOutcome;
}

/// Used when the crate is built without an audio backend.
pub struct NoSoundBackend;

impl SoundPort for NoSoundBackend {
    fn play(&self, _path: &Path) -> PlaybackOutcome {
        PlaybackOutcome::Unavailable
    }
}

/// The best sound port this build supports.
pub fn system_sound_port() -> Arc<dyn SoundPort> {
    #[cfg(feature = "playback")]
    {
        Arc::new(rodio_port::RodioSoundPort::new())
    }

    #[cfg(not(feature = "playback"))]
    {
        Arc::new(NoSoundBackend)
    }
}

pub fn ring_terminal_bell() {
    let mut stdout = io::stdout();
    let _ = stdout.write_all(b"\x07");
    let _ = stdout.flush();
}

/// The alarm's sound side effect.
#[derive(Clone)]
pub struct AlarmChime {
    port: Arc<dyn SoundPort>,
    settings: AlarmSoundSettings,
}

impl AlarmChime {
    pub fn new(port: Arc<dyn SoundPort>, settings: AlarmSoundSettings) -> Self {
        Self { port, settings }
    }

    pub fn settings(&self) -> &AlarmSoundSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: AlarmSoundSettings) {
        self.settings = settings;
    }

    /// Plays the alarm on a detached thread and returns immediately.
    ///
    /// The thread owns a copy of the sound path taken now; later settings
    /// changes do not affect a chime already ringing. Nothing is reported back
    /// to the caller. The handle is only useful to tests.
    pub fn ring(&self) -> Option<JoinHandle<()>> {
        let port = Arc::clone(&self.port);
        let enabled = self.settings.enabled;
        let path: PathBuf = self.settings.path.clone();

        let spawned = thread::Builder::new()
            .name("alarm-chime".to_string())
            .spawn(move || play_or_bell(port.as_ref(), enabled, &path));

        match spawned {
            Ok(handle) => Some(handle),
            Err(err) => {
                log_error!("Failed to spawn alarm sound thread: {err}; ringing bell");
                ring_terminal_bell();
                None
            }
        }
    }
}

fn play_or_bell(port: &dyn SoundPort, enabled: bool, path: &Path) {
    if !enabled {
        ring_terminal_bell();
        return;
    }
    if !path.is_file() {
        log_warn!("No alarm sound at {}, falling back to bell", path.display());
        ring_terminal_bell();
        return;
    }
    match port.play(path) {
        PlaybackOutcome::Played => log_info!("Alarm sound played from {}", path.display()),
        PlaybackOutcome::Unavailable => {
            log_warn!("Sound backend unavailable, falling back to bell");
            ring_terminal_bell();
        }
    }
}
