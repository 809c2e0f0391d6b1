use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

use super::ShiftId;
use super::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub enum Day {
        Mon => "mon",
        Tue => "tue",
        Wed => "wed",
        Thu => "thu",
        Fri => "fri",
        Sat => "sat",
        Sun => "sun",
    }
}

impl From<Weekday> for Day {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Day::Mon,
            Weekday::Tue => Day::Tue,
            Weekday::Wed => Day::Wed,
            Weekday::Thu => Day::Thu,
            Weekday::Fri => Day::Fri,
            Weekday::Sat => Day::Sat,
            Weekday::Sun => Day::Sun,
        }
    }
}

impl Day {
    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }
}

/// Preference map key, `"{shiftId}_{day}"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PreferenceKey {
    pub shift_id: ShiftId,
    pub day: Day,
}

impl PreferenceKey {
    pub fn new(shift_id: impl Into<ShiftId>, day: Day) -> Self {
        Self {
            shift_id: shift_id.into(),
            day,
        }
    }
}

impl std::fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.shift_id, self.day)
    }
}

impl std::str::FromStr for PreferenceKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (shift, day) = s
            .split_once('_')
            .ok_or_else(|| format!("Invalid preference key: {}", s))?;
        let shift_id = shift
            .parse::<ShiftId>()
            .map_err(|_| format!("Invalid preference key: {}", s))?;
        Ok(PreferenceKey::new(shift_id, day.parse()?))
    }
}

impl Serialize for PreferenceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PreferenceKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Per-staff availability. Missing entries mean "not on holiday" and "not preferred".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySettings {
    #[serde(default)]
    pub holidays: BTreeSet<NaiveDate>,
    #[serde(default)]
    pub day_preferences: BTreeMap<PreferenceKey, bool>,
}

impl AvailabilitySettings {
    pub fn is_on_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    pub fn is_preferred(&self, shift_id: ShiftId, date: NaiveDate) -> bool {
        self.day_preferences
            .get(&PreferenceKey::new(shift_id, Day::of(date)))
            .copied()
            .unwrap_or(false)
    }

    pub fn classify(&self, shift_id: ShiftId, date: NaiveDate) -> AvailabilityClass {
        if self.is_on_holiday(date) {
            AvailabilityClass::OnHoliday
        } else if self.is_preferred(shift_id, date) {
            AvailabilityClass::Preferred
        } else {
            AvailabilityClass::Normal
        }
    }

    /// Insert each date not already present; returns how many were new.
    pub fn add_holidays(&mut self, dates: impl IntoIterator<Item = NaiveDate>) -> usize {
        dates
            .into_iter()
            .filter(|date| self.holidays.insert(*date))
            .count()
    }
}

string_enum! {
    /// UI hint for a (staff, slot) pair. Holiday wins over preference.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub enum AvailabilityClass {
        Preferred => "preferred",
        Normal => "normal",
        OnHoliday => "on_holiday",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum QuickHoliday {
        Today => "today",
        Tomorrow => "tomorrow",
        ThisWeekend => "weekend",
        NextWeek => "next_week",
    }
}

impl QuickHoliday {
    /// Dates covered relative to `today`, using Sunday = 0 .. Saturday = 6.
    pub fn dates(&self, today: NaiveDate) -> Vec<NaiveDate> {
        let weekday = u64::from(today.weekday().num_days_from_sunday());
        let offset = |days: u64| today.checked_add_days(Days::new(days));
        let run = |start: u64, len: u64| -> Vec<NaiveDate> {
            (start..start + len).filter_map(offset).collect()
        };
        match self {
            QuickHoliday::Today => run(0, 1),
            QuickHoliday::Tomorrow => run(1, 1),
            QuickHoliday::ThisWeekend => run((6 - weekday) % 7, 2),
            QuickHoliday::NextWeek => run((8 - weekday) % 7, 7),
        }
    }
}
