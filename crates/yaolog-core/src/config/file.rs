//! File-based configuration provider (YAML)
//!
//! Supports user-level (~/.config/yaolog/config.yaml) and workspace-level
//! (.config/yaolog/config.yaml) config.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use super::model::LoggingConfig;
use super::traits::{ConfigError, ConfigProvider, ConfigResult};

/// Config level (user or workspace)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLevel {
    /// User-level config (~/.config/yaolog/config.yaml)
    User,
    /// Workspace-level config (.config/yaolog/config.yaml in workspace root)
    Workspace,
}

impl ConfigLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigLevel::User => "user",
            ConfigLevel::Workspace => "workspace",
        }
    }
}

/// File-based configuration provider
///
/// A missing file yields the default configuration.
///
/// # Example
///
/// ```no_run
/// use yaolog_core::config::{ConfigProvider, FileConfigProvider};
///
/// let config = FileConfigProvider::workspace("/path/to/app").load().unwrap_or_default();
/// ```
pub struct FileConfigProvider {
    path: PathBuf,
    level: ConfigLevel,
    cache: RwLock<Option<LoggingConfig>>,
}

impl FileConfigProvider {
    /// Create a new file config provider for a specific path
    pub fn new(path: impl Into<PathBuf>, level: ConfigLevel) -> Self {
        Self {
            path: path.into(),
            level,
            cache: RwLock::new(None),
        }
    }

    /// Create a user-level config provider (~/.config/yaolog/config.yaml)
    pub fn user() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        let path = config_dir.join("yaolog").join("config.yaml");
        Self::new(path, ConfigLevel::User)
    }

    /// Create a workspace-level config provider (.config/yaolog/config.yaml)
    pub fn workspace(workspace_root: impl AsRef<Path>) -> Self {
        let path = workspace_root.as_ref().join(".config").join("yaolog").join("config.yaml");
        Self::new(path, ConfigLevel::Workspace)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn level(&self) -> ConfigLevel {
        self.level
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn read(&self) -> ConfigResult<LoggingConfig> {
        if !self.path.exists() {
            return Ok(LoggingConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(format!("{}: {}", self.path.display(), e)))
    }

    /// Write `config` to the file and refresh the cache
    pub fn save(&self, config: &LoggingConfig) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(config).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(&self.path, content)?;

        *self.cache.write() = Some(config.clone());
        Ok(())
    }

    /// Reload config from disk (invalidate cache)
    pub fn reload(&self) -> ConfigResult<LoggingConfig> {
        let config = self.read()?;
        *self.cache.write() = Some(config.clone());
        Ok(config)
    }

    /// Create a backup of the current config file
    pub fn backup(&self) -> ConfigResult<Option<PathBuf>> {
        if !self.exists() {
            return Ok(None);
        }

        let backup_path = self.path.with_extension("yaml.backup");
        fs::copy(&self.path, &backup_path)?;
        Ok(Some(backup_path))
    }

    /// Export the current config as JSON
    pub fn export_json(&self) -> ConfigResult<String> {
        let config = self.load()?;
        serde_json::to_string_pretty(&config).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Replace the config file with one given as JSON
    pub fn import_json(&self, json: &str) -> ConfigResult<()> {
        let config: LoggingConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        self.save(&config)
    }
}

impl std::fmt::Debug for FileConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfigProvider")
            .field("path", &self.path)
            .field("level", &self.level)
            .field("exists", &self.exists())
            .finish()
    }
}

impl ConfigProvider for FileConfigProvider {
    fn load(&self) -> ConfigResult<LoggingConfig> {
        if let Some(config) = self.cache.read().as_ref() {
            return Ok(config.clone());
        }
        self.reload()
    }

    fn source(&self) -> String {
        format!("{} ({})", self.path.display(), self.level.as_str())
    }
}
