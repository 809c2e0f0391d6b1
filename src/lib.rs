pub mod config;
pub mod database;
pub mod error;
pub mod services;

pub use config::Config;
pub use database::repositories::{
    AssignmentRepository, AvailabilityRepository, SettingsRepository, ShiftPatternRepository,
    StaffRepository,
};
pub use database::store::Store;
pub use error::{AppError, AppResult};
pub use services::{AssignmentEngine, BackupService, CalendarExporter, SetupService, StaffRoster};

/// Every repository and service, wired to one shared store.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub settings: SettingsRepository,
    pub shift_patterns: ShiftPatternRepository,
    pub availability: AvailabilityRepository,
    pub staff_roster: StaffRoster,
    pub engine: AssignmentEngine,
    pub backup: BackupService,
    pub calendar: CalendarExporter,
    pub setup: SetupService,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        let shift_patterns = ShiftPatternRepository::new(store.clone());
        let staff = StaffRepository::new(store.clone());
        let assignments = AssignmentRepository::new(store.clone());
        let availability = AvailabilityRepository::new(store.clone());
        let settings = SettingsRepository::new(store.clone());

        let staff_roster =
            StaffRoster::new(staff.clone(), assignments.clone(), availability.clone());
        let engine = AssignmentEngine::new(
            assignments.clone(),
            availability.clone(),
            shift_patterns.clone(),
            staff.clone(),
        );
        let backup = BackupService::new(
            shift_patterns.clone(),
            staff.clone(),
            assignments.clone(),
            availability.clone(),
            settings.clone(),
        );
        let calendar = CalendarExporter::new(
            assignments,
            shift_patterns.clone(),
            settings.clone(),
            config.default_organizer.clone(),
        );
        let setup = SetupService::new(shift_patterns.clone(), staff, settings.clone());

        Self {
            config,
            store,
            settings,
            shift_patterns,
            availability,
            staff_roster,
            engine,
            backup,
            calendar,
            setup,
        }
    }

    /// Open the file-backed store under `config.data_dir`.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let store = database::init_store(&config.data_dir)?;
        Ok(Self::new(store, config))
    }

    pub fn in_memory(config: Config) -> Self {
        Self::new(Store::in_memory(), config)
    }
}
