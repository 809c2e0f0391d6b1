use crate::database::{
    keys,
    models::{Assignee, Ledger, SlotKey},
    store::Store,
};
use crate::error::AppResult;

/// Sparse slot -> staff ledger. Absent slots read as unassigned.
#[derive(Clone)]
pub struct AssignmentRepository {
    store: Store,
}

impl AssignmentRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn ledger(&self) -> AppResult<Ledger> {
        self.store.load_or_default(keys::SHIFT_ASSIGNMENTS)
    }

    pub fn get(&self, slot: &SlotKey) -> AppResult<Assignee> {
        Ok(self.ledger()?.remove(slot).unwrap_or_default())
    }

    pub fn set(&self, slot: SlotKey, assignee: Assignee) -> AppResult<()> {
        let mut ledger = self.ledger()?;
        ledger.insert(slot, assignee);
        self.store.save(keys::SHIFT_ASSIGNMENTS, &ledger)
    }

    /// Write both slots in a single store update.
    pub fn set_pair(&self, first: (SlotKey, Assignee), second: (SlotKey, Assignee)) -> AppResult<()> {
        let mut ledger = self.ledger()?;
        ledger.insert(first.0, first.1);
        ledger.insert(second.0, second.1);
        self.store.save(keys::SHIFT_ASSIGNMENTS, &ledger)
    }

    /// Slots currently held by `staff`, in date then shift order.
    pub fn slots_for(&self, staff: &str) -> AppResult<Vec<SlotKey>> {
        Ok(self
            .ledger()?
            .into_iter()
            .filter(|(_, assignee)| assignee.is(staff))
            .map(|(slot, _)| slot)
            .collect())
    }

    pub fn count_for_month(&self, staff: &str, year: i32, month: u32) -> AppResult<usize> {
        Ok(self
            .ledger()?
            .iter()
            .filter(|(slot, assignee)| slot.in_month(year, month) && assignee.is(staff))
            .count())
    }

    /// Overwrite every slot held by `staff` with unassigned; returns the released slots.
    pub fn release_staff(&self, staff: &str) -> AppResult<Vec<SlotKey>> {
        let mut ledger = self.ledger()?;
        let mut released = Vec::new();
        for (slot, assignee) in ledger.iter_mut() {
            if assignee.is(staff) {
                *assignee = Assignee::Unassigned;
                released.push(*slot);
            }
        }
        if !released.is_empty() {
            self.store.save(keys::SHIFT_ASSIGNMENTS, &ledger)?;
        }
        Ok(released)
    }

    pub fn replace_all(&self, ledger: &Ledger) -> AppResult<()> {
        self.store.save(keys::SHIFT_ASSIGNMENTS, ledger)
    }
}
