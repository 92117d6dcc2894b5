use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, Sink};

use super::{PlaybackOutcome, SoundPort};

const ENABLE_LOGS: bool = true;

use crate::log_warn;

/// Decodes and plays a file on the default output device, blocking until it
/// finishes. A fresh stream is opened per call because the chime thread that
/// calls it is short-lived.
pub struct RodioSoundPort;

impl RodioSoundPort {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioSoundPort {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundPort for RodioSoundPort {
    fn play(&self, path: &Path) -> PlaybackOutcome {
        match play_to_end(path) {
            Ok(()) => PlaybackOutcome::Played,
            Err(err) => {
                log_warn!("Alarm playback failed for {}: {err:#}", path.display());
                PlaybackOutcome::Unavailable
            }
        }
    }
}

fn play_to_end(path: &Path) -> Result<()> {
    let (_stream, handle) =
        OutputStream::try_default().context("Failed to create audio output stream")?;
    let sink = Sink::try_new(&handle).context("Failed to create audio sink")?;

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let source = Decoder::new(BufReader::new(file))
        .with_context(|| format!("Failed to decode {}", path.display()))?;

    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}
