//! XDG-style locations of the configuration file and the token cache.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "ytapi";

/// Returns the configuration directory.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/ytapi` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/ytapi` otherwise
pub fn config_dir() -> Result<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

/// Returns the cache directory holding the IAM token file.
///
/// Resolution order:
/// 1. `$XDG_CACHE_HOME/ytapi` if `XDG_CACHE_HOME` is set
/// 2. `~/.cache/ytapi` otherwise
pub fn cache_dir() -> Result<PathBuf> {
    xdg_dir("XDG_CACHE_HOME", ".cache")
}

/// Default configuration file path.
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

fn xdg_dir(variable: &str, fallback: &str) -> Result<PathBuf> {
    match std::env::var(variable) {
        Ok(xdg) if !xdg.is_empty() => Ok(PathBuf::from(xdg).join(APP_DIR)),
        _ => Ok(home_dir()?.join(fallback).join(APP_DIR)),
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Failed to determine home directory")
}
