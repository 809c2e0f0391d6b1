use chrono::{NaiveDate, Utc};
use std::collections::HashSet;

use crate::database::{
    models::{BackupDocument, BackupField, ImportReport},
    repositories::{
        AssignmentRepository, AvailabilityRepository, SettingsRepository, ShiftPatternRepository,
        StaffRepository,
        staff::{MAX_NAME_BYTES, normalize_name},
    },
};
use crate::error::{AppError, AppResult};
use crate::services::file_names;

/// Serializes the full application state to a backup document and restores it.
#[derive(Clone)]
pub struct BackupService {
    shift_patterns: ShiftPatternRepository,
    staff: StaffRepository,
    assignments: AssignmentRepository,
    availability: AvailabilityRepository,
    settings: SettingsRepository,
}

impl BackupService {
    pub fn new(
        shift_patterns: ShiftPatternRepository,
        staff: StaffRepository,
        assignments: AssignmentRepository,
        availability: AvailabilityRepository,
        settings: SettingsRepository,
    ) -> Self {
        Self {
            shift_patterns,
            staff,
            assignments,
            availability,
            settings,
        }
    }

    pub fn export(&self) -> AppResult<BackupDocument> {
        Ok(BackupDocument {
            assignments: Some(self.assignments.ledger()?),
            staff: Some(self.staff.list()?),
            shift_patterns: Some(self.shift_patterns.list()?),
            user_name: Some(self.settings.user_name()?.unwrap_or_default()),
            setup_complete: Some(self.settings.setup_complete()?),
            staff_settings: Some(self.availability.all_settings()?),
            timestamp: Some(Utc::now()),
        })
    }

    pub fn export_json(&self, pretty: bool) -> AppResult<String> {
        let document = self.export()?;
        let json = if pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(json)
    }

    pub fn backup_file_name(&self, today: NaiveDate) -> AppResult<String> {
        Ok(file_names::backup(self.settings.user_name()?.as_deref(), today))
    }

    /// Parse a backup file. Any schema violation rejects the whole document.
    pub fn parse(json: &str) -> AppResult<BackupDocument> {
        serde_json::from_str(json).map_err(|e| AppError::InvalidBackupFormat(e.to_string()))
    }

    pub fn import_json(&self, json: &str) -> AppResult<ImportReport> {
        self.import(&Self::parse(json)?)
    }

    /// Strict restore: `assignments` and `staff` must both be present.
    ///
    /// Each present field replaces its stored counterpart wholesale; absent fields, an
    /// empty shift pattern list and a blank user name leave stored state untouched.
    pub fn import(&self, document: &BackupDocument) -> AppResult<ImportReport> {
        let mut missing = Vec::new();
        if document.assignments.is_none() {
            missing.push(BackupField::Assignments.as_str());
        }
        if document.staff.is_none() {
            missing.push(BackupField::Staff.as_str());
        }
        if !missing.is_empty() {
            return Err(AppError::InvalidBackupFormat(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )));
        }
        validate(document)?;

        let report = self.apply(document, false)?;
        log::info!(
            "Imported backup: {} staff, {} shift pattern(s), {} assignment(s)",
            report.staff_count,
            report.shift_pattern_count,
            report.assignment_count
        );
        Ok(report)
    }

    /// Lenient restore used during first-time setup: applies whatever non-empty fields
    /// the document carries and reports what was missing.
    pub fn import_partial(&self, document: &BackupDocument) -> AppResult<ImportReport> {
        validate(document)?;
        let report = self.apply(document, true)?;
        if !report.missing.is_empty() {
            log::warn!(
                "Partial backup imported; missing: {}",
                report
                    .missing
                    .iter()
                    .map(BackupField::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        Ok(report)
    }

    fn apply(&self, document: &BackupDocument, skip_empty: bool) -> AppResult<ImportReport> {
        let mut report = ImportReport::default();

        match document.shift_patterns.as_deref() {
            Some(patterns) if !patterns.is_empty() => {
                self.shift_patterns.replace_all(patterns)?;
                report.shift_pattern_count = patterns.len();
                report.applied.push(BackupField::ShiftPatterns);
            }
            _ => report.missing.push(BackupField::ShiftPatterns),
        }

        match document.staff.as_deref() {
            Some(staff) if !(skip_empty && staff.is_empty()) => {
                self.staff.replace_all(staff)?;
                report.staff_count = staff.len();
                report.applied.push(BackupField::Staff);
            }
            _ => report.missing.push(BackupField::Staff),
        }

        match &document.assignments {
            Some(ledger) if !(skip_empty && ledger.is_empty()) => {
                self.assignments.replace_all(ledger)?;
                report.assignment_count = ledger.len();
                report.applied.push(BackupField::Assignments);
            }
            _ => report.missing.push(BackupField::Assignments),
        }

        match document.user_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                self.settings.set_user_name(name)?;
                report.applied.push(BackupField::UserName);
            }
            _ => report.missing.push(BackupField::UserName),
        }

        match document.setup_complete {
            Some(complete) => {
                self.settings.set_setup_complete(complete)?;
                report.applied.push(BackupField::SetupComplete);
            }
            None => report.missing.push(BackupField::SetupComplete),
        }

        match &document.staff_settings {
            Some(settings) if !(skip_empty && settings.is_empty()) => {
                self.availability.replace_all(settings)?;
                report.settings_count = settings.len();
                report.applied.push(BackupField::StaffSettings);
            }
            _ => report.missing.push(BackupField::StaffSettings),
        }

        Ok(report)
    }
}

/// Cross-field checks run before anything is written.
fn validate(document: &BackupDocument) -> AppResult<()> {
    if let Some(staff) = &document.staff {
        let mut seen = HashSet::new();
        for name in staff {
            // stored names must already satisfy the roster's own rules
            let normalized = normalize_name(name).map_err(|e| {
                AppError::InvalidBackupFormat(format!("staff list: {}", e))
            })?;
            if normalized != *name {
                return Err(AppError::InvalidBackupFormat(format!(
                    "staff name '{}' has surrounding whitespace",
                    name
                )));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(AppError::InvalidBackupFormat(format!(
                    "staff name '{}' appears more than once",
                    name
                )));
            }
        }
    }
    if let Some(settings) = &document.staff_settings {
        if let Some(name) = settings.keys().find(|name| name.len() > MAX_NAME_BYTES) {
            return Err(AppError::InvalidBackupFormat(format!(
                "settings for '{}' exceed the {} byte name limit",
                name, MAX_NAME_BYTES
            )));
        }
    }
    if let Some(patterns) = &document.shift_patterns {
        let mut ids: Vec<_> = patterns.iter().map(|p| p.id).collect();
        ids.sort();
        if ids.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(AppError::InvalidBackupFormat(
                "shift patterns contain a duplicate id".to_string(),
            ));
        }
    }
    Ok(())
}
