use crate::database::{
    models::SlotKey,
    repositories::{AssignmentRepository, AvailabilityRepository, StaffRepository},
};
use crate::error::{AppError, AppResult};

/// Result of removing a staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffRemoval {
    pub name: String,
    pub released_slots: Vec<SlotKey>,
}

/// The staff roster contract: adding validates the name, removing cascades into the
/// ledger (slots become unassigned) and the availability store (settings deleted).
#[derive(Clone)]
pub struct StaffRoster {
    staff: StaffRepository,
    assignments: AssignmentRepository,
    availability: AvailabilityRepository,
}

impl StaffRoster {
    pub fn new(
        staff: StaffRepository,
        assignments: AssignmentRepository,
        availability: AvailabilityRepository,
    ) -> Self {
        Self {
            staff,
            assignments,
            availability,
        }
    }

    pub fn list(&self) -> AppResult<Vec<String>> {
        self.staff.list()
    }

    pub fn contains(&self, name: &str) -> AppResult<bool> {
        self.staff.contains(name)
    }

    /// Add a staff member; returns the trimmed name actually stored.
    pub fn add(&self, name: &str) -> AppResult<String> {
        let name = self.staff.insert(name)?;
        log::info!("Added staff member {}", name);
        Ok(name)
    }

    pub fn remove(&self, name: &str) -> AppResult<StaffRemoval> {
        if !self.staff.contains(name)? {
            return Err(AppError::NotFound(format!("staff member {}", name)));
        }
        // roster entry goes last so an interrupted removal can simply be retried
        let released_slots = self.assignments.release_staff(name)?;
        self.availability.delete_all(name)?;
        self.staff.delete(name)?;

        log::info!(
            "Removed staff member {} ({} shift(s) now unassigned)",
            name,
            released_slots.len()
        );
        Ok(StaffRemoval {
            name: name.to_string(),
            released_slots,
        })
    }
}
