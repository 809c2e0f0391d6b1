use crate::database::{keys, models::UNASSIGNED, store::Store};
use crate::error::{AppError, AppResult};

/// Raw storage for the staff list. Cascades on removal live in `services::StaffRoster`.
#[derive(Clone)]
pub struct StaffRepository {
    store: Store,
}

impl StaffRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Staff names in insertion order.
    pub fn list(&self) -> AppResult<Vec<String>> {
        self.store.load_or_default(keys::STAFF_MEMBERS)
    }

    pub fn contains(&self, name: &str) -> AppResult<bool> {
        Ok(self.list()?.iter().any(|existing| existing == name))
    }

    /// Append a name after validating it. Duplicates are matched case-insensitively.
    pub fn insert(&self, name: &str) -> AppResult<String> {
        let name = normalize_name(name)?;
        let mut staff = self.list()?;
        if let Some(existing) = find_case_insensitive(&staff, &name) {
            return Err(AppError::DuplicateStaff(existing.to_string()));
        }
        staff.push(name.clone());
        self.store.save(keys::STAFF_MEMBERS, &staff)?;
        Ok(name)
    }

    /// Remove an exact name; returns false if it was not present.
    pub fn delete(&self, name: &str) -> AppResult<bool> {
        let mut staff = self.list()?;
        let before = staff.len();
        staff.retain(|existing| existing != name);
        if staff.len() == before {
            return Ok(false);
        }
        self.store.save(keys::STAFF_MEMBERS, &staff)?;
        Ok(true)
    }

    pub fn replace_all(&self, staff: &[String]) -> AppResult<()> {
        self.store.save(keys::STAFF_MEMBERS, staff)
    }
}

/// Longest staff name accepted, in UTF-8 bytes. Keeps the settings key storable as a file name.
pub const MAX_NAME_BYTES: usize = 100;

/// Trim and validate a staff name.
pub fn normalize_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidName("name cannot be empty".to_string()));
    }
    if trimmed.len() > MAX_NAME_BYTES {
        return Err(AppError::InvalidName(format!(
            "name is longer than {} bytes",
            MAX_NAME_BYTES
        )));
    }
    if trimmed.eq_ignore_ascii_case(UNASSIGNED) {
        return Err(AppError::InvalidName(format!(
            "'{}' is reserved for empty slots",
            trimmed
        )));
    }
    Ok(trimmed.to_string())
}

fn find_case_insensitive<'a>(staff: &'a [String], name: &str) -> Option<&'a str> {
    let needle = name.to_lowercase();
    staff
        .iter()
        .find(|existing| existing.to_lowercase() == needle)
        .map(String::as_str)
}
