pub mod assignment_engine;
pub mod backup;
pub mod calendar_export;
pub mod file_names;
pub mod setup;
pub mod staff_roster;

pub use assignment_engine::{AssignmentEngine, Candidate};
pub use backup::BackupService;
pub use calendar_export::CalendarExporter;
pub use setup::{SetupService, SetupStatus};
pub use staff_roster::{StaffRemoval, StaffRoster};
