use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::database::{
    keys,
    models::{ShiftId, ShiftPattern, ShiftPatternInput, fallback_label},
    store::Store,
};
use crate::error::{AppError, AppResult};

/// The ordered catalog of shift patterns. Order is display order only.
#[derive(Clone)]
pub struct ShiftPatternRepository {
    store: Store,
    // highest id handed out this session, so deleted ids are never reused
    high_water: Rc<Cell<u32>>,
}

impl ShiftPatternRepository {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            high_water: Rc::new(Cell::new(0)),
        }
    }

    pub fn list(&self) -> AppResult<Vec<ShiftPattern>> {
        let patterns: Vec<ShiftPattern> = self.store.load_or_default(keys::SHIFT_PATTERNS)?;
        ensure_unique_ids(&patterns)
            .map_err(|reason| AppError::corrupt_record(keys::SHIFT_PATTERNS, reason))?;
        Ok(patterns)
    }

    pub fn get(&self, id: ShiftId) -> AppResult<Option<ShiftPattern>> {
        Ok(self.list()?.into_iter().find(|p| p.id == id))
    }

    pub fn is_empty(&self) -> AppResult<bool> {
        Ok(self.list()?.is_empty())
    }

    /// Display name for a shift id, falling back to "Shift {id}" for deleted patterns.
    pub fn label(&self, id: ShiftId) -> AppResult<String> {
        Ok(self
            .get(id)?
            .map(|p| p.name)
            .unwrap_or_else(|| fallback_label(id)))
    }

    pub fn add(&self, input: ShiftPatternInput) -> AppResult<ShiftPattern> {
        let mut patterns = self.list()?;
        let max_existing = patterns.iter().map(|p| p.id.0).max().unwrap_or(0);
        let id = ShiftId(max_existing.max(self.high_water.get()) + 1);
        self.high_water.set(id.0);

        let pattern = ShiftPattern {
            id,
            name: input.name,
            start_time: input.start_time,
            end_time: input.end_time,
        };
        patterns.push(pattern.clone());
        self.store.save(keys::SHIFT_PATTERNS, &patterns)?;

        log::info!(
            "Added shift pattern {} '{}' ({})",
            pattern.id,
            pattern.name,
            pattern.time_range()
        );
        Ok(pattern)
    }

    pub fn update(&self, id: ShiftId, input: ShiftPatternInput) -> AppResult<ShiftPattern> {
        let mut patterns = self.list()?;
        let pattern = patterns
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("shift pattern {}", id)))?;
        pattern.name = input.name;
        pattern.start_time = input.start_time;
        pattern.end_time = input.end_time;
        let updated = pattern.clone();
        self.store.save(keys::SHIFT_PATTERNS, &patterns)?;

        log::info!("Updated shift pattern {} '{}'", updated.id, updated.name);
        Ok(updated)
    }

    /// Remove a pattern. Ledger entries and preferences pointing at it are left alone.
    pub fn remove(&self, id: ShiftId) -> AppResult<bool> {
        let mut patterns = self.list()?;
        let before = patterns.len();
        patterns.retain(|p| p.id != id);
        if patterns.len() == before {
            return Ok(false);
        }
        self.high_water.set(self.high_water.get().max(id.0));
        self.store.save(keys::SHIFT_PATTERNS, &patterns)?;

        log::info!("Removed shift pattern {}", id);
        Ok(true)
    }

    /// Replace the whole catalog (backup import).
    pub fn replace_all(&self, patterns: &[ShiftPattern]) -> AppResult<()> {
        ensure_unique_ids(patterns).map_err(AppError::InvalidBackupFormat)?;
        self.store.save(keys::SHIFT_PATTERNS, patterns)?;
        if let Some(max) = patterns.iter().map(|p| p.id.0).max() {
            self.high_water.set(self.high_water.get().max(max));
        }
        Ok(())
    }
}

fn ensure_unique_ids(patterns: &[ShiftPattern]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for pattern in patterns {
        if !seen.insert(pattern.id) {
            return Err(format!("duplicate shift pattern id {}", pattern.id));
        }
    }
    Ok(())
}
