//! Playback-related value types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Output volume in the range 0.0 - 1.0
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Volume(f64);

impl Volume {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 1.0;

    /// Full volume, the transport default
    pub const FULL: Self = Self(1.0);

    /// Creates a volume, rejecting NaN and values outside 0.0 - 1.0
    pub fn new(value: f64) -> Result<Self, String> {
        if !value.is_finite() {
            return Err(format!("Volume must be a finite number, got {}", value));
        }

        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(format!(
                "Volume must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            ));
        }

        Ok(Self(value))
    }

    /// Creates a volume from a 0-100 slider position
    pub fn from_percent(percent: u8) -> Self {
        Self(f64::from(percent.min(100)) / 100.0)
    }

    /// Returns the numeric value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Returns the volume as a 0-100 slider position
    pub fn as_percent(&self) -> u8 {
        (self.0 * 100.0).round() as u8
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::FULL
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

/// Playback speed multiplier
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct PlaybackRate(f64);

impl PlaybackRate {
    pub const DEFAULT: f64 = 1.0;

    /// Speeds offered by the player's speed selector
    pub const PRESETS: [f64; 6] = [0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

    /// Creates a playback rate, rejecting non-finite and non-positive values
    pub fn new(value: f64) -> Result<Self, String> {
        if !value.is_finite() {
            return Err(format!(
                "Playback rate must be a finite number, got {}",
                value
            ));
        }

        if value <= 0.0 {
            return Err(format!("Playback rate must be positive, got {}", value));
        }

        Ok(Self(value))
    }

    /// Returns the numeric value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Checks if this is normal speed
    pub fn is_normal(&self) -> bool {
        (self.0 - Self::DEFAULT).abs() < f64::EPSILON
    }

    /// Index of this rate in [`Self::PRESETS`], if it is one of them
    pub fn preset_index(&self) -> Option<usize> {
        Self::PRESETS
            .iter()
            .position(|preset| (preset - self.0).abs() < f64::EPSILON)
    }
}

impl Default for PlaybackRate {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl fmt::Display for PlaybackRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}
