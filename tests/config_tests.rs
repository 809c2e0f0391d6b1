use pretty_assertions::assert_eq;
use rota::config::Config;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

mod common;

const VARS: [&str; 4] = [
    "ROTA_DATA_DIR",
    "ROTA_ENVIRONMENT",
    "ROTA_DEFAULT_ORGANIZER",
    "ROTA_PRETTY_BACKUPS",
];

fn with_env<F: FnOnce()>(values: &[(&str, &str)], test: F) {
    // Store original values
    let original: Vec<(&str, Option<String>)> =
        VARS.iter().map(|key| (*key, env::var(key).ok())).collect();

    unsafe {
        for key in VARS {
            env::remove_var(key);
        }
        for (key, value) in values {
            env::set_var(key, value);
        }
    }

    test();

    // Restore original values
    unsafe {
        for (key, value) in original {
            match value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

#[test]
#[serial]
fn test_config_defaults() {
    common::setup_test_env();

    with_env(&[], || {
        let config = Config::from_env_only().unwrap();

        assert_eq!(config.data_dir, PathBuf::from("./rota-data"));
        assert_eq!(config.environment, "development");
        assert_eq!(config.default_organizer, "Rota Manager");
        assert!(config.pretty_backups);
    });
}

#[test]
#[serial]
fn test_config_custom_values() {
    with_env(
        &[
            ("ROTA_DATA_DIR", "/var/lib/rota"),
            ("ROTA_ENVIRONMENT", "production"),
            ("ROTA_DEFAULT_ORGANIZER", "  Night Desk "),
            ("ROTA_PRETTY_BACKUPS", "false"),
        ],
        || {
            let config = Config::from_env_only().unwrap();

            assert_eq!(config.data_dir, PathBuf::from("/var/lib/rota"));
            assert_eq!(config.environment, "production");
            assert_eq!(config.default_organizer, "Night Desk");
            assert!(!config.pretty_backups);
        },
    );
}

#[test]
#[serial]
fn test_config_invalid_values_fall_back() {
    with_env(
        &[("ROTA_PRETTY_BACKUPS", "sometimes"), ("ROTA_DEFAULT_ORGANIZER", "   ")],
        || {
            let config = Config::from_env_only().unwrap();

            assert!(config.pretty_backups);
            assert_eq!(config.default_organizer, "Rota Manager");
        },
    );
}

#[test]
fn test_config_environment_detection() {
    let mut config = Config::for_tests();
    assert!(!config.is_production());
    assert!(!config.is_development());

    config.environment = "production".to_string();
    assert!(config.is_production());

    config.environment = "development".to_string();
    assert!(config.is_development());
}
