use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::database::{
    keys,
    models::{AvailabilitySettings, Day, PreferenceKey, QuickHoliday, ShiftId},
    store::Store,
};
use crate::error::{AppError, AppResult};

/// Per-staff holidays and day-of-week shift preferences, one record per staff member.
#[derive(Clone)]
pub struct AvailabilityRepository {
    store: Store,
}

impl AvailabilityRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Settings for a staff member; fresh defaults when none are stored.
    pub fn get_settings(&self, staff: &str) -> AppResult<AvailabilitySettings> {
        self.store.load_or_default(&keys::staff_settings(staff))
    }

    pub fn has_settings(&self, staff: &str) -> AppResult<bool> {
        Ok(self.store.get_raw(&keys::staff_settings(staff))?.is_some())
    }

    pub fn save_settings(&self, staff: &str, settings: &AvailabilitySettings) -> AppResult<()> {
        self.store.save(&keys::staff_settings(staff), settings)
    }

    pub fn add_holiday(&self, staff: &str, date: NaiveDate) -> AppResult<usize> {
        self.add_holidays(staff, [date])
    }

    /// Add every date from `start` to `end` inclusive. Returns how many were new.
    pub fn add_holiday_range(
        &self,
        staff: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<usize> {
        if end < start {
            return Err(AppError::InvalidRange { start, end });
        }
        self.add_holidays(staff, start.iter_days().take_while(|d| *d <= end))
    }

    pub fn add_quick_holiday(
        &self,
        staff: &str,
        kind: QuickHoliday,
        today: NaiveDate,
    ) -> AppResult<usize> {
        self.add_holidays(staff, kind.dates(today))
    }

    fn add_holidays(
        &self,
        staff: &str,
        dates: impl IntoIterator<Item = NaiveDate>,
    ) -> AppResult<usize> {
        let mut settings = self.get_settings(staff)?;
        let added = settings.add_holidays(dates);
        if added > 0 {
            self.save_settings(staff, &settings)?;
            log::info!("Added {} holiday day(s) for {}", added, staff);
        }
        Ok(added)
    }

    pub fn remove_holiday(&self, staff: &str, date: NaiveDate) -> AppResult<bool> {
        let mut settings = self.get_settings(staff)?;
        if !settings.holidays.remove(&date) {
            return Ok(false);
        }
        self.save_settings(staff, &settings)?;
        Ok(true)
    }

    /// Sorted holidays grouped by (year, month).
    pub fn holidays_by_month(
        &self,
        staff: &str,
    ) -> AppResult<BTreeMap<(i32, u32), Vec<NaiveDate>>> {
        let mut grouped: BTreeMap<(i32, u32), Vec<NaiveDate>> = BTreeMap::new();
        for date in self.get_settings(staff)?.holidays {
            grouped
                .entry((date.year(), date.month()))
                .or_default()
                .push(date);
        }
        Ok(grouped)
    }

    pub fn set_preference(
        &self,
        staff: &str,
        shift_id: ShiftId,
        day: Day,
        preferred: bool,
    ) -> AppResult<()> {
        let mut settings = self.get_settings(staff)?;
        settings
            .day_preferences
            .insert(PreferenceKey::new(shift_id, day), preferred);
        self.save_settings(staff, &settings)
    }

    pub fn is_on_holiday(&self, staff: &str, date: NaiveDate) -> AppResult<bool> {
        Ok(self.get_settings(staff)?.is_on_holiday(date))
    }

    pub fn is_preferred(&self, staff: &str, shift_id: ShiftId, date: NaiveDate) -> AppResult<bool> {
        Ok(self.get_settings(staff)?.is_preferred(shift_id, date))
    }

    pub fn delete_all(&self, staff: &str) -> AppResult<()> {
        self.store.remove(&keys::staff_settings(staff))
    }

    /// Every stored settings record, keyed by staff name.
    pub fn all_settings(&self) -> AppResult<BTreeMap<String, AvailabilitySettings>> {
        let mut all = BTreeMap::new();
        for key in self.store.keys()? {
            if let Some(staff) = keys::staff_name_from_settings_key(&key) {
                all.insert(staff.to_string(), self.get_settings(staff)?);
            }
        }
        Ok(all)
    }

    /// Drop every stored record and write `settings` in their place.
    pub fn replace_all(&self, settings: &BTreeMap<String, AvailabilitySettings>) -> AppResult<()> {
        for key in self.store.keys()? {
            if let Some(staff) = keys::staff_name_from_settings_key(&key) {
                if !settings.contains_key(staff) {
                    self.store.remove(&key)?;
                }
            }
        }
        for (staff, record) in settings {
            self.save_settings(staff, record)?;
        }
        Ok(())
    }
}
