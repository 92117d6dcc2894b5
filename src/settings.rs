use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
    time::Duration,
};

pub const SETTINGS_ENV: &str = "TIMEMATE_SETTINGS";
const SETTINGS_FILE: &str = "timemate.json";
const ALARM_SOUND_FILE: &str = "alarm.wav";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct AlarmSoundSettings {
    pub enabled: bool,
    pub path: PathBuf,
}

impl Default for AlarmSoundSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_alarm_sound_path(),
        }
    }
}

/// `alarm.wav` beside the executable, or in the working directory when the
/// executable path is unknown.
fn default_alarm_sound_path() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(ALARM_SOUND_FILE)))
        .unwrap_or_else(|| PathBuf::from(ALARM_SOUND_FILE))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineSettings {
    pub alarm_sound: AlarmSoundSettings,
    pub stopwatch_refresh_ms: u64,
    /// Regions to load into the world clock. Empty loads all of them.
    pub world_regions: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            alarm_sound: AlarmSoundSettings::default(),
            stopwatch_refresh_ms: 50,
            world_regions: Vec::new(),
        }
    }
}

impl EngineSettings {
    pub fn stopwatch_refresh(&self) -> Duration {
        Duration::from_millis(self.stopwatch_refresh_ms.max(1))
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<EngineSettings>,
}

impl SettingsStore {
    /// Reads `$TIMEMATE_SETTINGS`, falling back to `timemate.json` in the
    /// working directory.
    pub fn from_env() -> Result<Self> {
        let path = env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
        Self::new(path)
    }

    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(
                    "Ignoring malformed settings in {}: {err}; using defaults",
                    path.display()
                );
                EngineSettings::default()
            })
        } else {
            EngineSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> EngineSettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn alarm_sound(&self) -> AlarmSoundSettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .alarm_sound
            .clone()
    }

    pub fn update_alarm_sound(&self, settings: AlarmSoundSettings) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        guard.alarm_sound = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &EngineSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
