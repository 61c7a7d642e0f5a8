//! ChapterShelf Configuration System
//!
//! One TOML file with an `[app]`, `[player]` and `[library]` section. Each
//! section implements [`ConfigSection`] so it validates and merges itself.
//!
//! - **Graceful degradation**: invalid values are reported, not fatal on load
//! - **Atomic writes**: config files are never left half-written
//! - **Forward tolerance**: keys from newer versions are ignored, not fatal
//!
//! # Example
//!
//! ```rust,no_run
//! use chaptershelf_config::{Config, ConfigManager};
//!
//! let manager = ConfigManager::new().expect("Failed to initialize config");
//! let config = manager.load().unwrap_or_else(|e| {
//!     eprintln!("Config error: {}, using defaults", e);
//!     Config::default()
//! });
//!
//! println!("Speed: {}x", config.player.default_speed);
//! ```

mod error;
mod manager;
mod persistence;
mod validation;

// Config sections
pub mod app_config;
mod library_config;
mod player_config;

pub use error::{ConfigError, ConfigResult, ValidationError};
pub use manager::{
    apply_env_overrides, ConfigManager, ENV_DEFAULT_SPEED, ENV_DEFAULT_VOLUME, ENV_LIBRARY_PATH,
    ENV_LOG_LEVEL,
};
pub use validation::{ConfigSection, Validator};

pub use app_config::{AppConfig, ColorScheme, LogLevel};
pub use library_config::LibraryConfig;
pub use player_config::PlayerConfig;

use serde::{Deserialize, Serialize};

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Config file format version
    pub version: u32,

    pub app: AppConfig,

    /// Defaults applied when the player opens a book
    pub player: PlayerConfig,

    pub library: LibraryConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates every section, returning all errors found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(mut e) = self.app.validate() {
            errors.append(&mut e);
        }

        if let Err(mut e) = self.player.validate() {
            errors.append(&mut e);
        }

        if let Err(mut e) = self.library.validate() {
            errors.append(&mut e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Merges this config with another, preferring values from `other`
    pub fn merge(&mut self, other: Config) {
        self.app.merge(other.app);
        self.player.merge(other.player);
        self.library.merge(other.library);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            app: AppConfig::default(),
            player: PlayerConfig::default(),
            library: LibraryConfig::default(),
        }
    }
}
