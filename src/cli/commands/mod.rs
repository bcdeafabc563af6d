//! Subcommand implementations.

use anyhow::Result;
use std::path::Path;

use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};

/// Language list command handler.
pub mod languages;

/// Translation command handler.
pub mod translate;

/// Loads the configuration file (the default one unless `path` is given)
/// and validates it.
pub fn load_config(path: Option<&Path>, debug: bool) -> Result<ResolvedConfig> {
    let manager = match path {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };

    let config_file = manager.load()?;
    let options = ResolveOptions::for_config_file(manager.config_path(), debug)?;

    resolve_config(&options, &config_file)
}
