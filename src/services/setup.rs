use crate::database::repositories::{SettingsRepository, ShiftPatternRepository, StaffRepository};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupStatus {
    pub complete: bool,
    pub user_name: Option<String>,
    pub shift_pattern_count: usize,
    pub staff_count: usize,
}

impl SetupStatus {
    /// The wizard has to run: never completed, or the catalog has since been emptied.
    pub fn needs_wizard(&self) -> bool {
        !self.complete || self.shift_pattern_count == 0
    }
}

/// First-run wizard state.
#[derive(Clone)]
pub struct SetupService {
    shift_patterns: ShiftPatternRepository,
    staff: StaffRepository,
    settings: SettingsRepository,
}

impl SetupService {
    pub fn new(
        shift_patterns: ShiftPatternRepository,
        staff: StaffRepository,
        settings: SettingsRepository,
    ) -> Self {
        Self {
            shift_patterns,
            staff,
            settings,
        }
    }

    pub fn status(&self) -> AppResult<SetupStatus> {
        Ok(SetupStatus {
            complete: self.settings.setup_complete()?,
            user_name: self.settings.user_name()?,
            shift_pattern_count: self.shift_patterns.list()?.len(),
            staff_count: self.staff.list()?.len(),
        })
    }

    /// Finish the wizard. Requires a display name and at least one shift pattern.
    pub fn complete(&self, user_name: &str) -> AppResult<()> {
        let user_name = user_name.trim();
        if user_name.is_empty() {
            return Err(AppError::InvalidName("user name cannot be empty".to_string()));
        }
        if self.shift_patterns.is_empty()? {
            return Err(AppError::InvalidShiftPattern(
                "at least one shift pattern is required to finish setup".to_string(),
            ));
        }

        self.settings.set_user_name(user_name)?;
        self.settings.set_setup_complete(true)?;
        log::info!("Setup completed for {}", user_name);
        Ok(())
    }

    /// Drop the completion flag when the catalog has been emptied, so the wizard runs
    /// again on next start. Returns true if the flag was cleared.
    pub fn reconcile(&self) -> AppResult<bool> {
        if self.settings.setup_complete()? && self.shift_patterns.is_empty()? {
            self.settings.clear_setup_complete()?;
            log::warn!("No shift patterns defined; setup will run again");
            return Ok(true);
        }
        Ok(false)
    }
}
