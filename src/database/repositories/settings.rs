use crate::database::{keys, store::Store};
use crate::error::AppResult;

/// Scalar application settings: the manager's display name and the setup flag.
#[derive(Clone)]
pub struct SettingsRepository {
    store: Store,
}

impl SettingsRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Stored display name, `None` when unset or blank.
    pub fn user_name(&self) -> AppResult<Option<String>> {
        let name: Option<String> = self.store.load(keys::USER_NAME)?;
        Ok(name.filter(|n| !n.trim().is_empty()))
    }

    pub fn set_user_name(&self, name: &str) -> AppResult<()> {
        self.store.save(keys::USER_NAME, name.trim())
    }

    pub fn setup_complete(&self) -> AppResult<bool> {
        Ok(self.store.load(keys::SETUP_COMPLETE)?.unwrap_or(false))
    }

    pub fn set_setup_complete(&self, complete: bool) -> AppResult<()> {
        self.store.save(keys::SETUP_COMPLETE, &complete)
    }

    pub fn clear_setup_complete(&self) -> AppResult<()> {
        self.store.remove(keys::SETUP_COMPLETE)
    }
}
