pub mod assignment;
pub mod availability;
pub mod backup;
pub(crate) mod macros;
pub mod shift_pattern;

// Re-export all models for easy importing
pub use assignment::*;
pub use availability::*;
pub use backup::*;
pub use shift_pattern::*;
