use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

use crate::database::{
    models::{AssignedSlot, Assignee, AvailabilityClass, ShiftId, SlotKey, fallback_label},
    repositories::{
        AssignmentRepository, AvailabilityRepository, ShiftPatternRepository, StaffRepository,
    },
    repositories::staff::normalize_name,
};
use crate::error::{AppError, AppResult, OrphanSource, OrphanedReference};

/// The two overnight shifts that overlap: one staff member may hold at most one of them per day.
pub const PAIRED_NIGHT_SHIFTS: (ShiftId, ShiftId) = (ShiftId(2), ShiftId(3));

/// The other half of the night-shift pair, if `shift_id` is in it.
pub fn night_shift_sibling(shift_id: ShiftId) -> Option<ShiftId> {
    let (first, second) = PAIRED_NIGHT_SHIFTS;
    if shift_id == first {
        Some(second)
    } else if shift_id == second {
        Some(first)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub staff: String,
    pub class: AvailabilityClass,
}

/// Validation and mutation over the assignment ledger.
///
/// Every write goes through the holiday and night-shift checks first; a rejected
/// request leaves the ledger untouched.
#[derive(Clone)]
pub struct AssignmentEngine {
    assignments: AssignmentRepository,
    availability: AvailabilityRepository,
    shift_patterns: ShiftPatternRepository,
    staff: StaffRepository,
}

impl AssignmentEngine {
    pub fn new(
        assignments: AssignmentRepository,
        availability: AvailabilityRepository,
        shift_patterns: ShiftPatternRepository,
        staff: StaffRepository,
    ) -> Self {
        Self {
            assignments,
            availability,
            shift_patterns,
            staff,
        }
    }

    pub fn assign(&self, staff: &str, date: NaiveDate, shift_id: ShiftId) -> AppResult<()> {
        let slot = SlotKey::new(date, shift_id);
        self.check_assignable(staff, slot, None)?;
        self.assignments
            .set(slot, Assignee::Staff(staff.to_string()))?;

        log::info!("Assigned {} to shift {} on {}", staff, shift_id, date);
        Ok(())
    }

    pub fn unassign(&self, date: NaiveDate, shift_id: ShiftId) -> AppResult<()> {
        self.assignments
            .set(SlotKey::new(date, shift_id), Assignee::Unassigned)?;

        log::info!("Unassigned shift {} on {}", shift_id, date);
        Ok(())
    }

    /// Move whoever holds `from` into `to`, vacating `from` only if the target accepts them.
    ///
    /// The source slot counts as already vacated for the night-shift check, so a staff member
    /// can be dragged from one night shift to its sibling on the same day.
    pub fn move_assignment(&self, from: SlotKey, to: SlotKey) -> AppResult<Option<String>> {
        if from == to {
            return Ok(self.assignments.get(&from)?.staff().map(str::to_string));
        }
        let Assignee::Staff(staff) = self.assignments.get(&from)? else {
            return Ok(None);
        };
        self.check_assignable(&staff, to, Some(from))?;
        self.assignments.set_pair(
            (to, Assignee::Staff(staff.clone())),
            (from, Assignee::Unassigned),
        )?;

        log::info!(
            "Moved {} from shift {} on {} to shift {} on {}",
            staff,
            from.shift_id,
            from.date,
            to.shift_id,
            to.date
        );
        Ok(Some(staff))
    }

    fn check_assignable(&self, staff: &str, slot: SlotKey, vacating: Option<SlotKey>) -> AppResult<()> {
        if normalize_name(staff)? != staff {
            return Err(AppError::InvalidName(format!(
                "'{}' has surrounding whitespace",
                staff
            )));
        }

        if self.availability.is_on_holiday(staff, slot.date)? {
            log::warn!("Rejected {} on {}: on holiday", staff, slot.date);
            return Err(AppError::HolidayConflict {
                staff: staff.to_string(),
                date: slot.date,
            });
        }

        if let Some(sibling) = night_shift_sibling(slot.shift_id) {
            let sibling_slot = SlotKey::new(slot.date, sibling);
            if Some(sibling_slot) != vacating && self.assignments.get(&sibling_slot)?.is(staff) {
                log::warn!(
                    "Rejected {} on shift {} {}: already on shift {}",
                    staff,
                    slot.shift_id,
                    slot.date,
                    sibling
                );
                return Err(AppError::NightShiftConflict {
                    staff: staff.to_string(),
                    date: slot.date,
                    sibling,
                });
            }
        }
        Ok(())
    }

    pub fn get_assignment(&self, date: NaiveDate, shift_id: ShiftId) -> AppResult<Assignee> {
        self.assignments.get(&SlotKey::new(date, shift_id))
    }

    pub fn count_assignments(&self, staff: &str, year: i32, month: u32) -> AppResult<usize> {
        self.assignments.count_for_month(staff, year, month)
    }

    /// Assignment counts for the month for every rostered staff member, zero-filled.
    pub fn workload(&self, year: i32, month: u32) -> AppResult<BTreeMap<String, usize>> {
        let mut counts: BTreeMap<String, usize> = self
            .staff
            .list()?
            .into_iter()
            .map(|name| (name, 0))
            .collect();
        for (slot, assignee) in self.assignments.ledger()? {
            if !slot.in_month(year, month) {
                continue;
            }
            if let Some(count) = assignee.staff().and_then(|name| counts.get_mut(name)) {
                *count += 1;
            }
        }
        Ok(counts)
    }

    /// Pure read; safe to call for every staff option on every render.
    pub fn classify(
        &self,
        staff: &str,
        date: NaiveDate,
        shift_id: ShiftId,
    ) -> AppResult<AvailabilityClass> {
        Ok(self.availability.get_settings(staff)?.classify(shift_id, date))
    }

    /// Rostered staff for a slot: preferred first, holiday last, roster order otherwise.
    pub fn rank_candidates(&self, date: NaiveDate, shift_id: ShiftId) -> AppResult<Vec<Candidate>> {
        let mut candidates = self
            .staff
            .list()?
            .into_iter()
            .map(|staff| {
                let class = self.classify(&staff, date, shift_id)?;
                Ok(Candidate { staff, class })
            })
            .collect::<AppResult<Vec<_>>>()?;
        // stable sort keeps roster order within a class
        candidates.sort_by_key(|c| c.class);
        Ok(candidates)
    }

    /// Slots held by `staff` with display labels; deleted shifts get a fallback label.
    pub fn assignments_for(&self, staff: &str) -> AppResult<Vec<AssignedSlot>> {
        let patterns = self.shift_patterns.list()?;
        Ok(self
            .assignments
            .slots_for(staff)?
            .into_iter()
            .map(|slot| {
                let pattern = patterns.iter().find(|p| p.id == slot.shift_id);
                AssignedSlot {
                    slot,
                    shift_label: pattern
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| fallback_label(slot.shift_id)),
                    orphaned: pattern.is_none(),
                }
            })
            .collect())
    }

    /// Ledger entries and preferences that point at shift ids no longer in the catalog.
    pub fn orphaned_references(&self) -> AppResult<Vec<OrphanedReference>> {
        let known: HashSet<ShiftId> = self.shift_patterns.list()?.iter().map(|p| p.id).collect();
        let mut orphans = Vec::new();

        for (slot, assignee) in self.assignments.ledger()? {
            if let Some(staff) = assignee.staff() {
                if !known.contains(&slot.shift_id) {
                    orphans.push(OrphanedReference {
                        shift_id: slot.shift_id,
                        source: OrphanSource::Assignment {
                            date: slot.date,
                            staff: staff.to_string(),
                        },
                    });
                }
            }
        }

        for (staff, settings) in self.availability.all_settings()? {
            let stale: HashSet<ShiftId> = settings
                .day_preferences
                .keys()
                .map(|key| key.shift_id)
                .filter(|id| !known.contains(id))
                .collect();
            let mut stale: Vec<ShiftId> = stale.into_iter().collect();
            stale.sort();
            orphans.extend(stale.into_iter().map(|shift_id| OrphanedReference {
                shift_id,
                source: OrphanSource::Preference {
                    staff: staff.clone(),
                },
            }));
        }

        for orphan in &orphans {
            log::warn!("Orphaned reference: {}", orphan);
        }
        Ok(orphans)
    }
}
