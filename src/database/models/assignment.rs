use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

use super::ShiftId;

pub const UNASSIGNED: &str = "unassigned";

/// A calendar date plus a shift pattern id: the unit of assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey {
    pub date: NaiveDate,
    pub shift_id: ShiftId,
}

impl SlotKey {
    pub fn new(date: NaiveDate, shift_id: impl Into<ShiftId>) -> Self {
        Self {
            date,
            shift_id: shift_id.into(),
        }
    }

    pub fn in_month(&self, year: i32, month: u32) -> bool {
        self.date.year() == year && self.date.month() == month
    }
}

// Wire form is "{year}-{month}-{day}-{shiftId}" with no zero padding.
impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.date.year(),
            self.date.month(),
            self.date.day(),
            self.shift_id
        )
    }
}

impl std::str::FromStr for SlotKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();
        let [year, month, day, shift] = parts.as_slice() else {
            return Err(format!("Invalid slot key: {}", s));
        };
        let number = |part: &str| -> Result<u32, String> {
            part.parse::<u32>()
                .map_err(|_| format!("Invalid slot key: {}", s))
        };
        let year = number(year)? as i32;
        let date = NaiveDate::from_ymd_opt(year, number(month)?, number(day)?)
            .ok_or_else(|| format!("Slot key has no such date: {}", s))?;
        Ok(SlotKey::new(date, ShiftId(number(shift)?)))
    }
}

impl Serialize for SlotKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Assignee {
    #[default]
    Unassigned,
    Staff(String),
}

impl Assignee {
    pub fn staff(&self) -> Option<&str> {
        match self {
            Assignee::Staff(name) => Some(name),
            Assignee::Unassigned => None,
        }
    }

    pub fn is(&self, name: &str) -> bool {
        self.staff() == Some(name)
    }

    pub fn as_str(&self) -> &str {
        self.staff().unwrap_or(UNASSIGNED)
    }
}

impl From<&str> for Assignee {
    fn from(value: &str) -> Self {
        if value == UNASSIGNED {
            Assignee::Unassigned
        } else {
            Assignee::Staff(value.to_string())
        }
    }
}

impl std::fmt::Display for Assignee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Assignee {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Assignee {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Assignee::from(s.as_str()))
    }
}

/// Every slot ever written. Slots missing from the map read as unassigned.
pub type Ledger = BTreeMap<SlotKey, Assignee>;

/// An assignment resolved against the catalog for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedSlot {
    pub slot: SlotKey,
    pub shift_label: String,
    pub orphaned: bool,
}
