use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{AvailabilitySettings, Ledger, ShiftPattern};

/// Full-state backup document.
///
/// Every field is optional at the type level so partial documents parse; which fields
/// are required is decided by the importer, not the schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignments: Option<Ledger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_patterns: Option<Vec<ShiftPattern>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_complete: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_settings: Option<BTreeMap<String, AvailabilitySettings>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BackupField {
    Assignments,
    Staff,
    ShiftPatterns,
    UserName,
    SetupComplete,
    StaffSettings,
}

impl BackupField {
    /// Field name as it appears in the JSON document.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupField::Assignments => "assignments",
            BackupField::Staff => "staff",
            BackupField::ShiftPatterns => "shiftPatterns",
            BackupField::UserName => "userName",
            BackupField::SetupComplete => "setupComplete",
            BackupField::StaffSettings => "staffSettings",
        }
    }
}

impl std::fmt::Display for BackupField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an import actually applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub applied: Vec<BackupField>,
    pub missing: Vec<BackupField>,
    pub staff_count: usize,
    pub shift_pattern_count: usize,
    pub assignment_count: usize,
    pub settings_count: usize,
}

impl ImportReport {
    pub fn applied(&self, field: BackupField) -> bool {
        self.applied.contains(&field)
    }
}
