#![allow(dead_code)]

use chrono::NaiveDate;
use fake::Fake;
use fake::faker::name::en::Name;
use tempfile::TempDir;

use rota::database::models::{ShiftId, ShiftPattern, ShiftPatternInput};
use rota::database::store::{FileStore, Store};
use rota::{AppState, Config};

pub fn setup_test_env() {
    // Keep test output quiet unless RUST_LOG is set explicitly
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A fully wired application over an isolated store.
pub struct TestContext {
    pub state: AppState,
    _temp_dir: Option<TempDir>,
}

impl TestContext {
    /// In-memory store.
    pub fn new() -> Self {
        setup_test_env();
        Self {
            state: AppState::in_memory(Config::for_tests()),
            _temp_dir: None,
        }
    }

    /// File-backed store inside a fresh temporary directory.
    pub fn on_disk() -> Self {
        setup_test_env();
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(FileStore::open(temp_dir.path()).unwrap());
        let mut config = Config::for_tests();
        config.data_dir = temp_dir.path().to_path_buf();
        Self {
            state: AppState::new(store, config),
            _temp_dir: Some(temp_dir),
        }
    }

    /// Reopen the same directory as a new session.
    pub fn reopen(&self) -> AppState {
        let dir = self
            ._temp_dir
            .as_ref()
            .expect("reopen needs an on-disk context")
            .path();
        let store = Store::new(FileStore::open(dir).unwrap());
        AppState::new(store, self.state.config.clone())
    }

    pub fn add_shift(&self, name: &str, start: &str, end: &str) -> ShiftPattern {
        self.state
            .shift_patterns
            .add(ShiftPatternInput::parse(name, start, end).unwrap())
            .unwrap()
    }

    /// Day (1), the paired night shifts (2, 3) and Evening (4).
    pub fn with_standard_shifts(self) -> Self {
        self.add_shift("Day", "09:00", "17:00");
        self.add_shift("Night A", "22:00", "06:00");
        self.add_shift("Night B", "23:00", "07:00");
        self.add_shift("Evening", "17:00", "22:00");
        self
    }

    pub fn with_staff(self, names: &[&str]) -> Self {
        for name in names {
            self.state.staff_roster.add(name).unwrap();
        }
        self
    }

    pub fn assign(&self, staff: &str, date: NaiveDate, shift: u32) {
        self.state.engine.assign(staff, date, ShiftId(shift)).unwrap();
    }
}

pub struct MockData;

impl MockData {
    /// Distinct generated names, none of them the reserved word.
    pub fn staff_names(count: usize) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        while names.len() < count {
            let name: String = Name().fake();
            if !names.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
                names.push(name);
            }
        }
        names
    }
}
