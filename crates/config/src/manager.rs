//! Configuration manager - main API for config operations

use crate::app_config::LogLevel;
use crate::error::join_errors;
use crate::persistence::ConfigPersistence;
use crate::{Config, ConfigError, ConfigResult};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const ENV_DEFAULT_VOLUME: &str = "CHAPTERSHELF_PLAYER_DEFAULT_VOLUME";
pub const ENV_DEFAULT_SPEED: &str = "CHAPTERSHELF_PLAYER_DEFAULT_SPEED";
pub const ENV_LIBRARY_PATH: &str = "CHAPTERSHELF_APP_LIBRARY_PATH";
pub const ENV_LOG_LEVEL: &str = "CHAPTERSHELF_APP_LOG_LEVEL";

/// Main configuration manager
///
/// Owns the config file location and hands out loaded, validated configs.
pub struct ConfigManager {
    persistence: ConfigPersistence,
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager using the default config directory
    ///
    /// The default directory follows the platform conventions:
    /// - Linux: `~/.config/chaptershelf/`
    /// - macOS: `~/Library/Application Support/chaptershelf/`
    /// - Windows: `%APPDATA%\chaptershelf\`
    pub fn new() -> ConfigResult<Self> {
        let config_dir = Self::default_config_dir()?;
        Ok(Self::with_directory(config_dir))
    }

    /// Creates a config manager with a custom config directory
    pub fn with_directory(config_dir: PathBuf) -> Self {
        let persistence = ConfigPersistence::new(config_dir.join("config.toml"));
        Self {
            persistence,
            config_dir,
        }
    }

    fn default_config_dir() -> ConfigResult<PathBuf> {
        ProjectDirs::from("", "", "chaptershelf")
            .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
            .ok_or_else(|| ConfigError::PathResolutionError {
                reason: "Could not determine user config directory".to_string(),
            })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Returns the full config file path
    pub fn config_path(&self) -> &Path {
        self.persistence.path()
    }

    /// Resolves `app.library_path` against the config directory
    pub fn library_path(&self, config: &Config) -> PathBuf {
        if config.app.library_path.is_absolute() {
            config.app.library_path.clone()
        } else {
            self.config_dir.join(&config.app.library_path)
        }
    }

    /// Loads the configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file is corrupted, returns an error.
    pub fn load(&self) -> ConfigResult<Config> {
        self.persistence.load()
    }

    /// Loads the configuration, falling back to defaults on any error
    pub fn load_or_default(&self) -> Config {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config: {}, using defaults", e);
                Config::default()
            }
        }
    }

    /// Validates and atomically writes `config`
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        self.persistence.save(config)
    }

    /// Loads, applies `update_fn`, and saves the result
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use chaptershelf_config::ConfigManager;
    /// # let manager = ConfigManager::new().unwrap();
    /// manager.update(|config| {
    ///     config.player.default_speed = 1.25;
    /// }).expect("Failed to update config");
    /// ```
    pub fn update<F>(&self, update_fn: F) -> ConfigResult<()>
    where
        F: FnOnce(&mut Config),
    {
        let mut config = self.load()?;
        update_fn(&mut config);
        self.save(&config)
    }

    /// Generates a default config file if one doesn't exist
    ///
    /// Returns Ok(true) if a new file was created, Ok(false) if one already exists.
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.config_path().exists() {
            log::info!(
                "Config file already exists at {}",
                self.config_path().display()
            );
            return Ok(false);
        }

        self.persistence.generate_default_with_comments()?;
        Ok(true)
    }

    /// Overwrites the config file with default values
    pub fn reset(&self) -> ConfigResult<()> {
        self.save(&Config::default())
    }

    /// Validates the current configuration file
    ///
    /// Returns every validation message, or an empty list if valid.
    pub fn validate(&self) -> ConfigResult<Vec<String>> {
        let config = self.load()?;

        match config.validate() {
            Ok(()) => Ok(Vec::new()),
            Err(errors) => Ok(errors.iter().map(|e| e.to_string()).collect()),
        }
    }

    /// Loads the config and applies `CHAPTERSHELF_*` environment overrides
    ///
    /// Unparseable values are logged and ignored.
    pub fn load_with_env_overrides(&self) -> ConfigResult<Config> {
        let mut config = self.load()?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());

        if let Err(errors) = config.validate() {
            log::warn!(
                "Config validation warnings after env overrides: {}",
                join_errors(&errors)
            );
        }

        Ok(config)
    }
}

/// Applies overrides read through `lookup`, so tests need not touch the process environment
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(volume) = lookup(ENV_DEFAULT_VOLUME) {
        match volume.trim().parse::<u8>() {
            Ok(v) => config.player.default_volume = v,
            Err(_) => log::warn!("Ignoring {}={}: not a volume", ENV_DEFAULT_VOLUME, volume),
        }
    }

    if let Some(speed) = lookup(ENV_DEFAULT_SPEED) {
        match speed.trim().parse::<f64>() {
            Ok(s) => config.player.default_speed = s,
            Err(_) => log::warn!("Ignoring {}={}: not a speed", ENV_DEFAULT_SPEED, speed),
        }
    }

    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        match level.parse::<LogLevel>() {
            Ok(l) => config.app.log_level = l,
            Err(e) => log::warn!("Ignoring {}: {}", ENV_LOG_LEVEL, e),
        }
    }

    if let Some(path) = lookup(ENV_LIBRARY_PATH) {
        if !path.trim().is_empty() {
            config.app.library_path = PathBuf::from(path);
        }
    }
}
