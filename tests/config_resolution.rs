#![allow(clippy::unwrap_used)]
//! Config resolution contract tests.
//!
//! Relative paths in the configuration file resolve as follows:
//! 1. `translation.key_file` against the directory of the config file
//! 2. `auth_cache` against the user cache directory
//!
//! Absolute paths are used as given.

use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use ytapi_cli::cli::commands::load_config;
use ytapi_cli::cloud::DEFAULT_USER_AGENT;

const CONFIG: &str = r#"
dictionary = "dict.1.1.test"
auth_cache = "token.json"

[translation]
folder_id = "b1g-test-folder"
key_id = "aje-key-id"
service_account_id = "aje-service-account"
key_file = "keys/key.pem"
"#;

fn with_cache_home<F: FnOnce()>(dir: &std::path::Path, f: F) {
    let original = std::env::var("XDG_CACHE_HOME").ok();
    unsafe { std::env::set_var("XDG_CACHE_HOME", dir) };

    f();

    match original {
        Some(v) => unsafe { std::env::set_var("XDG_CACHE_HOME", v) },
        None => unsafe { std::env::remove_var("XDG_CACHE_HOME") },
    }
}

#[test]
#[serial]
fn test_relative_paths_resolve_against_their_directories() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, CONFIG).unwrap();
    let cache_home = temp_dir.path().join("cache");

    with_cache_home(&cache_home, || {
        let resolved = load_config(Some(config_path.as_path()), false).unwrap();

        assert_eq!(
            resolved.account.key_file,
            temp_dir.path().join("keys/key.pem")
        );
        assert_eq!(
            resolved.auth_cache,
            Some(cache_home.join("ytapi").join("token.json"))
        );
        assert_eq!(resolved.user_agent, DEFAULT_USER_AGENT);
        assert!(!resolved.debug);
    });
}

#[test]
#[serial]
fn test_absolute_paths_are_used_as_given() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    let contents = CONFIG
        .replace("\"token.json\"", "\"/var/tmp/ytapi-token.json\"")
        .replace("\"keys/key.pem\"", "\"/etc/ytapi/key.pem\"");
    fs::write(&config_path, contents).unwrap();

    with_cache_home(temp_dir.path(), || {
        let resolved = load_config(Some(config_path.as_path()), true).unwrap();

        assert_eq!(resolved.account.key_file, PathBuf::from("/etc/ytapi/key.pem"));
        assert_eq!(
            resolved.auth_cache,
            Some(PathBuf::from("/var/tmp/ytapi-token.json"))
        );
        assert!(resolved.debug);
    });
}

#[test]
#[serial]
fn test_cli_debug_flag_or_file_enables_debug() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, format!("debug = true\n{CONFIG}")).unwrap();

    with_cache_home(temp_dir.path(), || {
        assert!(load_config(Some(config_path.as_path()), false).unwrap().debug);
    });
}

#[test]
fn test_invalid_toml_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "dictionary = [unclosed").unwrap();

    let err = load_config(Some(config_path.as_path()), false).unwrap_err();

    assert!(err.to_string().contains("Failed to parse config file"));
}
