use anyhow::Result;
use std::path::Path;

pub mod keys;
pub mod models;
pub mod repositories;
pub mod store;

use store::{FileStore, Store};

pub fn init_store(data_dir: &Path) -> Result<Store> {
    // Create data directory if it doesn't exist
    if !data_dir.exists() {
        log::info!("Creating data directory {}", data_dir.display());
    }
    let backend = FileStore::open(data_dir)?;
    log::info!("Using data directory {}", backend.dir().display());

    Ok(Store::new(backend))
}
