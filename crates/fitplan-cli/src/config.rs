//! Configuration file management for fitplan.
//!
//! Provides a TOML-based config file at `~/.config/fitplan/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use fitplan_core::chat::ChatConfig;
use fitplan_core::paths::config_path;
use fitplan_db::config::DbConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub ai: AiSection,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: Option<String>,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AiSection {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    save_config_to(&config_path(), config)
}

/// Write `config` to `path`. Sets file permissions to 0600 on Unix since
/// the file may hold an API key.
pub fn save_config_to(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct FitplanConfig {
    pub db_config: DbConfig,
    pub chat_config: ChatConfig,
}

impl FitplanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - DB URL: `cli_db_url` > `FITPLAN_DATABASE_URL` > `database.url` > `DbConfig::DEFAULT_URL`
    /// - AI base URL / model / key: `FITPLAN_AI_*` > `[ai]` > defaults (no key)
    ///
    /// A missing or unreadable config file is treated as empty.
    pub fn resolve(cli_db_url: Option<&str>) -> Self {
        let file_config = load_config().ok();
        Self::resolve_with(cli_db_url, |name| std::env::var(name).ok(), file_config.as_ref())
    }

    fn resolve_with(
        cli_db_url: Option<&str>,
        lookup_env: impl Fn(&str) -> Option<String>,
        file: Option<&ConfigFile>,
    ) -> Self {
        let env = |name: &str| lookup_env(name).filter(|v| !v.is_empty());

        let db_url = cli_db_url
            .map(str::to_owned)
            .or_else(|| env(DbConfig::ENV_VAR))
            .or_else(|| file.and_then(|f| f.database.url.clone()))
            .unwrap_or_else(|| DbConfig::DEFAULT_URL.to_owned());

        let ai = file.map(|f| &f.ai);
        let base_url = env(ChatConfig::BASE_URL_ENV)
            .or_else(|| ai.and_then(|a| a.base_url.clone()))
            .unwrap_or_else(|| ChatConfig::DEFAULT_BASE_URL.to_owned());
        let model = env(ChatConfig::MODEL_ENV)
            .or_else(|| ai.and_then(|a| a.model.clone()))
            .unwrap_or_else(|| ChatConfig::DEFAULT_MODEL.to_owned());
        let api_key = env(ChatConfig::API_KEY_ENV)
            .or_else(|| ai.and_then(|a| a.api_key.clone()))
            .filter(|k| !k.is_empty());

        Self {
            db_config: DbConfig::new(db_url),
            chat_config: ChatConfig {
                base_url,
                api_key,
                model,
            },
        }
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
