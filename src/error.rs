use chrono::NaiveDate;
use thiserror::Error;

use crate::database::models::ShiftId;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Staff member \"{0}\" already exists")]
    DuplicateStaff(String),

    #[error("Invalid staff name: {0}")]
    InvalidName(String),

    #[error("Invalid date range: end date {end} is before start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Cannot assign {staff} on {date} - they are on holiday")]
    HolidayConflict { staff: String, date: NaiveDate },

    #[error("{staff} is already assigned to the other night shift (shift {sibling}) on {date}")]
    NightShiftConflict {
        staff: String,
        date: NaiveDate,
        sibling: ShiftId,
    },

    #[error("Invalid backup file format: {0}")]
    InvalidBackupFormat(String),

    #[error("Invalid shift pattern: {0}")]
    InvalidShiftPattern(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Stored record '{key}' is corrupt: {reason}")]
    CorruptRecord { key: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(serde_json::Error),
}

impl AppError {
    pub fn corrupt_record(key: impl Into<String>, reason: impl ToString) -> Self {
        AppError::CorruptRecord {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Validation failures the caller can recover from by re-prompting.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::DuplicateStaff(_)
                | AppError::InvalidName(_)
                | AppError::InvalidRange { .. }
                | AppError::HolidayConflict { .. }
                | AppError::NightShiftConflict { .. }
                | AppError::InvalidShiftPattern(_)
                | AppError::InvalidDate(_)
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        log::error!("Storage error: {}", error);
        AppError::Storage(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        log::error!("Serialization error: {}", error);
        AppError::Serialization(error)
    }
}

/// A ledger or availability entry that still points at a deleted shift pattern.
///
/// Never fatal: the entry stays where it is and is rendered with a fallback label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanedReference {
    pub shift_id: ShiftId,
    pub source: OrphanSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrphanSource {
    Assignment { date: NaiveDate, staff: String },
    Preference { staff: String },
}

impl std::fmt::Display for OrphanedReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            OrphanSource::Assignment { date, staff } => write!(
                f,
                "assignment of {} on {} references deleted shift {}",
                staff, date, self.shift_id
            ),
            OrphanSource::Preference { staff } => write!(
                f,
                "preference of {} references deleted shift {}",
                staff, self.shift_id
            ),
        }
    }
}
