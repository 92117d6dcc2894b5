use std::path::PathBuf;
use std::str::FromStr;

use crate::alarm::{AlarmTarget, Meridiem};
use crate::settings::AlarmSoundSettings;
use crate::AppState;

pub const HELP: &str = "\
commands:
  start | stop | reset | lap        stopwatch control (lap shows elapsed time)
  alarm HH MM SS AM|PM              arm the alarm (also HH:MM:SS AM|PM)
  alarm                             show the current alarm
  now                               show the current time and date
  zones [query]                     world clock, filtered by query
  sound on | off | <path>           alarm sound preference
  dismiss                           close the alarm notification
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundCommand {
    On,
    Off,
    Path(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartStopwatch,
    StopStopwatch,
    ResetStopwatch,
    ShowStopwatch,
    SetAlarm {
        hour: u8,
        minute: u8,
        second: u8,
        meridiem: Meridiem,
    },
    ShowAlarm,
    Now,
    Zones(String),
    Sound(SoundCommand),
    Dismiss,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Reply(String),
    Quit,
}

fn parse_field(name: &str, value: &str) -> Result<u8, String> {
    value
        .parse::<u8>()
        .map_err(|_| format!("{name} must be a number, got {value:?}"))
}

fn parse_alarm(args: &[&str]) -> Result<Command, String> {
    let fields: Vec<&str> = match args {
        [time, _] => time.split(':').collect(),
        [h, m, s, _] => vec![*h, *m, *s],
        _ => return Err("usage: alarm HH MM SS AM|PM".into()),
    };
    let [hour, minute, second] = fields[..] else {
        return Err("usage: alarm HH:MM:SS AM|PM".into());
    };
    let meridiem = args[args.len() - 1]
        .parse::<Meridiem>()
        .map_err(|e| e.to_string())?;

    Ok(Command::SetAlarm {
        hour: parse_field("hour", hour)?,
        minute: parse_field("minute", minute)?,
        second: parse_field("second", second)?,
        meridiem,
    })
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err("empty command".into());
        };
        let args: Vec<&str> = words.collect();

        match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("start", []) => Ok(Command::StartStopwatch),
            ("stop", []) => Ok(Command::StopStopwatch),
            ("reset", []) => Ok(Command::ResetStopwatch),
            ("lap", []) => Ok(Command::ShowStopwatch),
            ("alarm", []) => Ok(Command::ShowAlarm),
            ("alarm", args) => parse_alarm(args),
            ("now", []) => Ok(Command::Now),
            ("zones", args) => Ok(Command::Zones(args.join(" "))),
            ("sound", ["on"]) => Ok(Command::Sound(SoundCommand::On)),
            ("sound", ["off"]) => Ok(Command::Sound(SoundCommand::Off)),
            ("sound", [path]) => Ok(Command::Sound(SoundCommand::Path(PathBuf::from(*path)))),
            ("dismiss", []) => Ok(Command::Dismiss),
            ("help", _) => Ok(Command::Help),
            ("quit" | "exit", []) => Ok(Command::Quit),
            (other, _) => Err(format!("unknown command {other:?}; try help")),
        }
    }
}

pub async fn dispatch(state: &AppState, command: Command) -> Result<Outcome, String> {
    let engine = &state.engine;
    let reply = match command {
        Command::StartStopwatch => engine.stopwatch().start().await.display,
        Command::StopStopwatch => engine.stopwatch().stop().await.display,
        Command::ResetStopwatch => engine.stopwatch().reset().await.display,
        Command::ShowStopwatch => engine.stopwatch().snapshot().await.display,
        Command::SetAlarm {
            hour,
            minute,
            second,
            meridiem,
        } => {
            let target =
                AlarmTarget::new(hour, minute, second, meridiem).map_err(|e| e.to_string())?;
            engine.alarm().set_alarm(target).await
        }
        Command::ShowAlarm => engine.alarm().label().await,
        Command::Now => {
            let face = engine.last_face().await;
            let mut text = format!("{}  {}", face.time, face.date);
            if let Some(notice) = state.display.pending_notification() {
                text.push_str(&format!("\n[alarm {}] {}", notice.target, notice.quote));
            }
            text
        }
        Command::Zones(query) => {
            let zones = engine.visible_zone_times(&query).await;
            if zones.is_empty() {
                format!("no zones match {query:?}")
            } else {
                zones
                    .iter()
                    .map(|(id, time)| format!("{id:<36} {time}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        Command::Sound(change) => {
            let mut sound = engine.alarm().sound().await;
            match change {
                SoundCommand::On => sound.enabled = true,
                SoundCommand::Off => sound.enabled = false,
                SoundCommand::Path(path) => {
                    sound = AlarmSoundSettings {
                        enabled: true,
                        path,
                    }
                }
            }
            state
                .settings
                .update_alarm_sound(sound.clone())
                .map_err(|e| e.to_string())?;
            engine.alarm().set_sound(sound.clone()).await;
            if sound.enabled {
                format!("alarm sound: {}", sound.path.display())
            } else {
                "alarm sound off (bell only)".to_string()
            }
        }
        Command::Dismiss => match state.display.dismiss() {
            Some(_) => "notification dismissed".to_string(),
            None => "nothing to dismiss".to_string(),
        },
        Command::Help => HELP.to_string(),
        Command::Quit => return Ok(Outcome::Quit),
    };
    Ok(Outcome::Reply(reply))
}
