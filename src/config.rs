use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub environment: String,
    pub default_organizer: String,
    pub pretty_backups: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    /// This is useful for testing where you want to control the environment directly
    pub fn from_env_only() -> Result<Self> {
        Ok(Config {
            data_dir: env::var("ROTA_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./rota-data")),
            environment: env::var("ROTA_ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            default_organizer: env::var("ROTA_DEFAULT_ORGANIZER")
                .ok()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "Rota Manager".to_string()),
            pretty_backups: env::var("ROTA_PRETTY_BACKUPS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
        })
    }

    pub fn for_tests() -> Self {
        Config {
            data_dir: PathBuf::from("./rota-test-data"),
            environment: "test".to_string(),
            default_organizer: "Rota Manager".to_string(),
            pretty_backups: true,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
