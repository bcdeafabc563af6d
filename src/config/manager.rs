use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cloud::{Account, CredentialStore, DEFAULT_USER_AGENT, Gateway};
use crate::context::{ApiContext, Endpoints};
use crate::fs::create_private_dir;
use crate::paths;

/// Service account settings in the `[translation]` section of config.toml.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslationSection {
    /// Cloud folder the translation requests are billed to.
    pub folder_id: Option<String>,
    /// ID of the authorized key used to sign token requests.
    pub key_id: Option<String>,
    pub service_account_id: Option<String>,
    /// PEM file with the private part of the authorized key.
    pub key_file: Option<String>,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/ytapi/config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Explicit HTTP proxy; the standard proxy variables apply otherwise.
    #[serde(default)]
    pub proxy_url: Option<String>,
    /// API key of the dictionary service.
    #[serde(default)]
    pub dictionary: Option<String>,
    /// Token cache file; no durable cache when unset.
    #[serde(default)]
    pub auth_cache: Option<String>,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub translation: TranslationSection,
    #[serde(default)]
    pub endpoints: Endpoints,
}

/// Configuration with every required key present and every path resolved.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub user_agent: String,
    pub proxy_url: Option<String>,
    pub dictionary_key: String,
    pub folder_id: String,
    pub account: Account,
    /// Absolute path of the token cache, if enabled.
    pub auth_cache: Option<PathBuf>,
    pub debug: bool,
    pub endpoints: Endpoints,
}

/// Directories relative paths in the configuration file resolve against.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Base of a relative `key_file`.
    pub config_dir: PathBuf,
    /// Base of a relative `auth_cache`.
    pub cache_dir: PathBuf,
    /// Forces debug output regardless of the file.
    pub debug: bool,
}

impl ResolveOptions {
    /// Options for a configuration file at `config_path`: key files are
    /// looked up next to it, the token cache lives in the user cache dir.
    pub fn for_config_file(config_path: &Path, debug: bool) -> Result<Self> {
        let config_dir = config_path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        Ok(Self {
            config_dir,
            cache_dir: paths::cache_dir()?,
            debug,
        })
    }
}

fn required(value: Option<&String>, key: &str) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.clone()),
        _ => bail!(
            "Missing required configuration: '{key}'\n\n\
             Please set it in ~/.config/ytapi/config.toml\n\
             (or the file given with --config)"
        ),
    }
}

fn resolve_path(base: &Path, value: &str) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Validates the configuration file and resolves its relative paths.
///
/// # Errors
///
/// Returns an error naming the first missing required key.
pub fn resolve_config(options: &ResolveOptions, config_file: &ConfigFile) -> Result<ResolvedConfig> {
    let translation = &config_file.translation;

    let dictionary_key = required(config_file.dictionary.as_ref(), "dictionary")?;
    let folder_id = required(translation.folder_id.as_ref(), "translation.folder_id")?;
    let key_id = required(translation.key_id.as_ref(), "translation.key_id")?;
    let service_account_id = required(
        translation.service_account_id.as_ref(),
        "translation.service_account_id",
    )?;
    let key_file = required(translation.key_file.as_ref(), "translation.key_file")?;

    let auth_cache = config_file
        .auth_cache
        .as_deref()
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(|path| resolve_path(&options.cache_dir, path));

    let user_agent = config_file
        .user_agent
        .clone()
        .filter(|ua| !ua.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

    let proxy_url = config_file
        .proxy_url
        .clone()
        .filter(|url| !url.trim().is_empty());

    Ok(ResolvedConfig {
        user_agent,
        proxy_url,
        dictionary_key,
        folder_id,
        account: Account {
            service_account_id,
            key_id,
            key_file: resolve_path(&options.config_dir, &key_file),
        },
        auth_cache,
        debug: options.debug || config_file.debug,
        endpoints: config_file.endpoints.clone(),
    })
}

impl ResolvedConfig {
    /// Builds the shared API context.
    ///
    /// With `read_cache` false a cached token is ignored, though a newly
    /// issued one still replaces it. A missing cache directory is created
    /// with owner-only permissions.
    pub fn into_context(self, read_cache: bool) -> Result<ApiContext> {
        let gateway = Gateway::new(&self.user_agent, self.proxy_url.as_deref())
            .context("Failed to create HTTP client")?;

        let mut credentials =
            CredentialStore::new(self.account, gateway.clone(), self.endpoints.token.clone());

        if let Some(path) = self.auth_cache {
            if let Some(dir) = path.parent()
                && !dir.exists()
            {
                create_private_dir(dir).with_context(|| {
                    format!("Failed to create cache directory: {}", dir.display())
                })?;
            }
            credentials = credentials.with_cache(path, read_cache);
        }

        Ok(ApiContext {
            gateway,
            credentials,
            endpoints: self.endpoints,
            folder_id: self.folder_id,
            dictionary_key: self.dictionary_key,
        })
    }
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a config manager for the default location.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/ytapi/config.toml`
    /// or `~/.config/ytapi/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_file()?,
        })
    }

    /// Creates a config manager for an explicit file.
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse config file: {}", self.config_path.display())
        })?;

        Ok(config_file)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager::with_path(temp_dir.path().join("config.toml"))
    }

    fn create_test_options() -> ResolveOptions {
        ResolveOptions {
            config_dir: PathBuf::from("/etc/ytapi"),
            cache_dir: PathBuf::from("/var/cache/ytapi"),
            debug: false,
        }
    }

    fn create_test_config() -> ConfigFile {
        ConfigFile {
            dictionary: Some("dict-key".to_string()),
            auth_cache: Some("token.json".to_string()),
            translation: TranslationSection {
                folder_id: Some("folder".to_string()),
                key_id: Some("key-id".to_string()),
                service_account_id: Some("account".to_string()),
                key_file: Some("key.pem".to_string()),
            },
            ..ConfigFile::default()
        }
    }

    #[test]
    fn test_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(
            manager.config_path(),
            r#"dictionary = "dict-key"
auth_cache = "token.json"

[translation]
folder_id = "folder"
key_id = "key-id"
service_account_id = "account"
key_file = "key.pem"

[endpoints]
translate = "http://localhost:8080/translate"
"#,
        )
        .unwrap();

        let loaded = manager.load().unwrap();

        assert_eq!(loaded.dictionary, Some("dict-key".to_string()));
        assert_eq!(loaded.translation.key_id, Some("key-id".to_string()));
        assert_eq!(loaded.endpoints.translate, "http://localhost:8080/translate");
        assert_eq!(loaded.endpoints.token, Endpoints::default().token);
    }

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        let result = manager.load();
        assert!(result.is_err());
    }

    #[test]
    fn test_load_partial_endpoints() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(
            manager.config_path(),
            "dictionary = \"k\"\n[endpoints]\nspelling = \"http://speller\"\n",
        )
        .unwrap();

        let loaded = manager.load().unwrap();

        assert_eq!(loaded.endpoints.spelling, "http://speller");
        assert_eq!(loaded.endpoints.dictionary, Endpoints::default().dictionary);
        assert!(!loaded.debug);
    }

    #[test]
    fn test_resolve_relative_paths() {
        let resolved = resolve_config(&create_test_options(), &create_test_config()).unwrap();

        assert_eq!(resolved.account.key_file, PathBuf::from("/etc/ytapi/key.pem"));
        assert_eq!(
            resolved.auth_cache,
            Some(PathBuf::from("/var/cache/ytapi/token.json"))
        );
        assert_eq!(resolved.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(resolved.proxy_url, None);
    }

    #[test]
    fn test_resolve_absolute_paths_are_kept() {
        let mut config = create_test_config();
        config.translation.key_file = Some("/keys/key.pem".to_string());
        config.auth_cache = Some("/tmp/token.json".to_string());

        let resolved = resolve_config(&create_test_options(), &config).unwrap();

        assert_eq!(resolved.account.key_file, PathBuf::from("/keys/key.pem"));
        assert_eq!(resolved.auth_cache, Some(PathBuf::from("/tmp/token.json")));
    }

    #[test]
    fn test_resolve_without_auth_cache() {
        let mut config = create_test_config();
        config.auth_cache = Some(String::new());
        assert!(resolve_config(&create_test_options(), &config).unwrap().auth_cache.is_none());

        config.auth_cache = None;
        assert!(resolve_config(&create_test_options(), &config).unwrap().auth_cache.is_none());
    }

    #[test]
    fn test_resolve_missing_keys_are_named() {
        let mut config = create_test_config();
        config.translation.folder_id = None;
        let err = resolve_config(&create_test_options(), &config).unwrap_err();
        assert!(err.to_string().contains("'translation.folder_id'"));

        let mut config = create_test_config();
        config.dictionary = Some("  ".to_string());
        let err = resolve_config(&create_test_options(), &config).unwrap_err();
        assert!(err.to_string().contains("'dictionary'"));

        let err = resolve_config(&create_test_options(), &ConfigFile::default()).unwrap_err();
        assert!(err.to_string().contains("Missing required configuration"));
    }

    #[test]
    fn test_resolve_debug_from_either_side() {
        let mut options = create_test_options();
        let mut config = create_test_config();
        assert!(!resolve_config(&options, &config).unwrap().debug);

        config.debug = true;
        assert!(resolve_config(&options, &config).unwrap().debug);

        config.debug = false;
        options.debug = true;
        assert!(resolve_config(&options, &config).unwrap().debug);
    }

    #[test]
    fn test_resolve_custom_user_agent_and_proxy() {
        let mut config = create_test_config();
        config.user_agent = Some("custom/1.0".to_string());
        config.proxy_url = Some("http://proxy:3128".to_string());

        let resolved = resolve_config(&create_test_options(), &config).unwrap();

        assert_eq!(resolved.user_agent, "custom/1.0");
        assert_eq!(resolved.proxy_url.as_deref(), Some("http://proxy:3128"));
    }

    #[test]
    fn test_options_for_config_file() {
        let options =
            ResolveOptions::for_config_file(Path::new("/home/me/ytapi/config.toml"), true).unwrap();

        assert_eq!(options.config_dir, PathBuf::from("/home/me/ytapi"));
        assert!(options.debug);
    }

    #[tokio::test]
    async fn test_into_context_creates_cache_dir() {
        let temp_dir = TempDir::new().unwrap();
        let options = ResolveOptions {
            config_dir: temp_dir.path().to_path_buf(),
            cache_dir: temp_dir.path().join("cache"),
            debug: false,
        };

        let resolved = resolve_config(&options, &create_test_config()).unwrap();
        let ctx = resolved.into_context(true).unwrap();

        assert!(temp_dir.path().join("cache").is_dir());
        assert_eq!(ctx.folder_id, "folder");
        assert_eq!(ctx.dictionary_key, "dict-key");
    }
}
