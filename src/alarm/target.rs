use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Meridiem::Am => "AM",
            Meridiem::Pm => "PM",
        }
    }
}

impl FromStr for Meridiem {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AM" => Ok(Meridiem::Am),
            "PM" => Ok(Meridiem::Pm),
            other => Err(anyhow!("meridiem must be AM or PM, got {other:?}")),
        }
    }
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated 12-hour time of day. Range checks happen here so that
/// arming an alarm can never fail.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AlarmTarget {
    hour: u8,
    minute: u8,
    second: u8,
    meridiem: Meridiem,
}

impl AlarmTarget {
    pub fn new(hour: u8, minute: u8, second: u8, meridiem: Meridiem) -> Result<Self> {
        if !(1..=12).contains(&hour) {
            bail!("hour must be between 1 and 12, got {hour}");
        }
        if minute > 59 {
            bail!("minute must be between 0 and 59, got {minute}");
        }
        if second > 59 {
            bail!("second must be between 0 and 59, got {second}");
        }
        Ok(Self {
            hour,
            minute,
            second,
            meridiem,
        })
    }

    /// Same shape as the clock face (`%I:%M:%S %p`), so the two compare as
    /// plain strings.
    pub fn formatted(&self) -> String {
        format!(
            "{:02}:{:02}:{:02} {}",
            self.hour, self.minute, self.second, self.meridiem
        )
    }
}

impl fmt::Display for AlarmTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}
