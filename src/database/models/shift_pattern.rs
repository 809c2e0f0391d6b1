use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftId(pub u32);

impl std::fmt::Display for ShiftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ShiftId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(ShiftId)
    }
}

impl From<u32> for ShiftId {
    fn from(id: u32) -> Self {
        ShiftId(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftPattern {
    pub id: ShiftId,
    pub name: String,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone)]
pub struct ShiftPatternInput {
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl ShiftPatternInput {
    /// Build from user-entered text, e.g. `("Night", "22:00", "06:00")`.
    pub fn parse(name: &str, start: &str, end: &str) -> AppResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidShiftPattern(
                "shift name cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            start_time: parse_hhmm(start)?,
            end_time: parse_hhmm(end)?,
        })
    }
}

impl ShiftPattern {
    /// A shift whose end is earlier than its start finishes on the following day.
    pub fn crosses_midnight(&self) -> bool {
        self.end_time < self.start_time
    }

    pub fn time_range(&self) -> String {
        format!(
            "{} - {}",
            self.start_time.format(hhmm::FORMAT),
            self.end_time.format(hhmm::FORMAT)
        )
    }
}

/// Label for a shift id whose pattern no longer exists.
pub fn fallback_label(id: ShiftId) -> String {
    format!("Shift {}", id)
}

pub fn parse_hhmm(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), hhmm::FORMAT)
        .map_err(|_| AppError::InvalidShiftPattern(format!("'{}' is not a valid HH:MM time", value)))
}

pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
