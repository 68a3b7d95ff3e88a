use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Wall-clock time of day at which the daily report fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSpec {
    hour: u32,
    minute: u32,
}

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{1,2}):?(\d{2})").expect("valid time regex"))
}

impl ScheduleSpec {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour <= 23 && minute <= 59).then_some(Self { hour, minute })
    }

    /// Parse "0835", "08:35", "8:35" or "8：35". Returns `None` for anything
    /// out of range or not shaped like a time.
    pub fn parse(spec: &str) -> Option<Self> {
        let normalized = spec.trim().replace('：', ":");
        let caps = time_pattern().captures(&normalized)?;
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        Self::new(hour, minute)
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Six-field cron expression (seconds first) firing once a day.
    pub fn cron_expression(&self) -> String {
        format!("0 {} {} * * *", self.minute, self.hour)
    }
}

impl fmt::Display for ScheduleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ScheduleSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid time of day: {s}. Use HH:MM or HHMM"))
    }
}
