// Persisted key space. These names are shared with older exports and must not change.

pub const SHIFT_PATTERNS: &str = "shiftPatterns";
pub const STAFF_MEMBERS: &str = "staffMembers";
pub const SHIFT_ASSIGNMENTS: &str = "shiftAssignments";
pub const USER_NAME: &str = "userName";
pub const SETUP_COMPLETE: &str = "setupComplete";

const STAFF_SETTINGS_PREFIX: &str = "staffSettings_";

pub fn staff_settings(name: &str) -> String {
    format!("{}{}", STAFF_SETTINGS_PREFIX, name)
}

/// Recover the staff name from a settings key, if it is one.
pub fn staff_name_from_settings_key(key: &str) -> Option<&str> {
    key.strip_prefix(STAFF_SETTINGS_PREFIX)
}
