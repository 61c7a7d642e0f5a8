//! File system persistence for configuration
//!
//! This module handles reading and writing config files with:
//! - Atomic writes (no partial/corrupted files)
//! - A `.toml.backup` copy before every overwrite
//! - Directory creation
//! - A warning for files written by a newer version

use crate::error::join_errors;
use crate::{Config, ConfigError, ConfigResult, CONFIG_VERSION};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const DEFAULT_HEADER: &str = "\
# ChapterShelf configuration
#
# [app]     log_level, color_scheme, library_path
# [player]  default_volume (0-100), default_speed, speed_presets, tick_interval_ms
# [library] require_cover, supported_extensions

";

/// Handles configuration file persistence
pub struct ConfigPersistence {
    config_path: PathBuf,
}

impl ConfigPersistence {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Loads configuration from file
    ///
    /// If the file doesn't exist, returns the default config.
    /// If the file is empty or corrupted, returns an error.
    pub fn load(&self) -> ConfigResult<Config> {
        if !self.config_path.exists() {
            log::info!(
                "Config file not found at {}, using defaults",
                self.config_path.display()
            );
            return Ok(Config::default());
        }

        let contents =
            fs::read_to_string(&self.config_path).map_err(|e| ConfigError::ReadError {
                path: self.config_path.clone(),
                source: e,
            })?;

        // Empty or whitespace-only files are corrupted, not defaults
        if contents.trim().is_empty() {
            return Err(ConfigError::ReadError {
                path: self.config_path.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "Config file is empty or contains only whitespace",
                ),
            });
        }

        let config: Config = toml::from_str(&contents).map_err(|e| self.parse_error(e))?;

        // Unknown keys are dropped by serde; the file itself is left alone
        if config.version > CONFIG_VERSION {
            log::warn!(
                "Config file version {} is newer than supported version {}, unknown keys are ignored",
                config.version,
                CONFIG_VERSION
            );
        }

        // Invalid values are reported but not fatal, so the user can fix them
        if let Err(errors) = config.validate() {
            log::warn!("Config validation warnings: {}", join_errors(&errors));
        }

        Ok(config)
    }

    /// Saves configuration to file atomically
    ///
    /// Invalid configs are refused.
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        let toml_string = toml::to_string_pretty(config)?;
        self.write_validated(config, &toml_string)
    }

    /// Writes the default config with a short header describing each section
    pub fn generate_default_with_comments(&self) -> ConfigResult<()> {
        let default_config = Config::default();
        let body = toml::to_string_pretty(&default_config)?;
        self.write_validated(&default_config, &format!("{}{}", DEFAULT_HEADER, body))?;

        log::info!("Generated default config at {}", self.config_path.display());
        Ok(())
    }

    fn write_validated(&self, config: &Config, content: &str) -> ConfigResult<()> {
        if let Err(errors) = config.validate() {
            return Err(ConfigError::ValidationError(join_errors(&errors)));
        }

        if let Some(parent) = self.config_path.parent() {
            self.ensure_directory_exists(parent)?;
        }

        if self.config_path.exists() {
            self.backup_config()?;
        }

        let temp_file = self.create_temp_file()?;
        self.write_atomic(temp_file, content)?;

        log::info!("Config saved to {}", self.config_path.display());
        Ok(())
    }

    fn parse_error(&self, source: toml::de::Error) -> ConfigError {
        ConfigError::ParseError {
            path: self.config_path.clone(),
            source,
        }
    }

    /// Ensures a directory exists, creating it if necessary
    fn ensure_directory_exists(&self, path: &Path) -> ConfigResult<()> {
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path).map_err(|e| ConfigError::DirectoryCreationError {
                path: path.to_path_buf(),
                source: e,
            })?;
            log::info!("Created config directory: {}", path.display());
        }
        Ok(())
    }

    /// Copies the current file to `config.toml.backup`
    fn backup_config(&self) -> ConfigResult<()> {
        let backup_path = self.config_path.with_extension("toml.backup");
        fs::copy(&self.config_path, &backup_path)
            .map_err(|e| ConfigError::BackupError { source: e })?;
        log::debug!("Backed up config to {}", backup_path.display());
        Ok(())
    }

    /// Creates a temporary file in the same directory as the config file
    fn create_temp_file(&self) -> ConfigResult<NamedTempFile> {
        let dir = self
            .config_path
            .parent()
            .ok_or_else(|| ConfigError::PathResolutionError {
                reason: "Config path has no parent directory".to_string(),
            })?;

        NamedTempFile::new_in(dir).map_err(ConfigError::IoError)
    }

    /// Writes content to a temporary file and atomically renames it
    fn write_atomic(&self, mut temp_file: NamedTempFile, content: &str) -> ConfigResult<()> {
        temp_file
            .write_all(content.as_bytes())
            .map_err(ConfigError::IoError)?;
        temp_file.flush().map_err(ConfigError::IoError)?;

        temp_file
            .persist(&self.config_path)
            .map_err(|e| ConfigError::WriteError {
                path: self.config_path.clone(),
                source: e.error,
            })?;

        Ok(())
    }
}
