//! Application-level configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Log level for application logging
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(ValidationError::with_value(
                "app.log_level",
                "must be one of: error, warn, info, debug, trace",
                s,
            )),
        }
    }
}

/// Light/dark preference for front ends that render colour
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Auto,
    Light,
    Dark,
}

impl std::fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorScheme::Auto => write!(f, "auto"),
            ColorScheme::Light => write!(f, "light"),
            ColorScheme::Dark => write!(f, "dark"),
        }
    }
}

/// Application-level settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Log level for application output
    pub log_level: LogLevel,

    pub color_scheme: ColorScheme,

    /// Library file (relative to config dir if not absolute)
    pub library_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            color_scheme: ColorScheme::Auto,
            library_path: PathBuf::from("library.json"),
        }
    }
}

impl ConfigSection for AppConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = Vec::new();

        if self.library_path.as_os_str().is_empty() {
            results.push(Err(ValidationError::new(
                "app.library_path",
                "must not be empty",
            )));
        }

        if self.library_path.is_dir() {
            results.push(Err(ValidationError::with_value(
                "app.library_path",
                "must be a file, not a directory",
                self.library_path.display(),
            )));
        }

        Validator::collect_errors(results)
    }

    fn merge(&mut self, other: Self) {
        self.log_level = other.log_level;
        self.color_scheme = other.color_scheme;
        self.library_path = other.library_path;
    }

    fn section_name(&self) -> &'static str {
        "app"
    }
}
