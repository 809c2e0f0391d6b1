pub mod assignment;
pub mod availability;
pub mod settings;
pub mod shift_pattern;
pub mod staff;

// Re-export all repositories for easy importing
pub use assignment::AssignmentRepository;
pub use availability::AvailabilityRepository;
pub use settings::SettingsRepository;
pub use shift_pattern::ShiftPatternRepository;
pub use staff::StaffRepository;
