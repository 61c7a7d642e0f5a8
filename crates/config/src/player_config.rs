//! Player configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};

/// Player defaults applied when a book is opened
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Volume slider position on open (0-100)
    pub default_volume: u8,

    /// Playback speed on open; must be one of `speed_presets`
    pub default_speed: f64,

    /// Speeds offered by the speed selector
    pub speed_presets: Vec<f64>,

    /// How often a simulated transport reports its position, in milliseconds
    pub tick_interval_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_volume: 100,
            default_speed: 1.0,
            speed_presets: vec![0.5, 0.75, 1.0, 1.25, 1.5, 2.0],
            tick_interval_ms: 250,
        }
    }
}

impl PlayerConfig {
    /// Default volume as a 0.0 - 1.0 transport value
    pub fn volume_fraction(&self) -> f64 {
        f64::from(self.default_volume.min(100)) / 100.0
    }
}

impl ConfigSection for PlayerConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = vec![
            Validator::in_range(self.default_volume, 0, 100, "player.default_volume"),
            Validator::positive(self.default_speed, "player.default_speed"),
            Validator::not_empty_list(&self.speed_presets, "player.speed_presets"),
            Validator::in_range(self.tick_interval_ms, 16, 1000, "player.tick_interval_ms"),
        ];

        for (i, preset) in self.speed_presets.iter().enumerate() {
            results.push(Validator::positive(
                *preset,
                &format!("player.speed_presets[{}]", i),
            ));
        }

        if !self.speed_presets.is_empty() {
            results.push(Validator::one_of(
                &self.default_speed,
                &self.speed_presets,
                "player.default_speed",
            ));
        }

        Validator::collect_errors(results)
    }

    fn merge(&mut self, other: Self) {
        self.default_volume = other.default_volume;
        self.default_speed = other.default_speed;
        self.speed_presets = other.speed_presets;
        self.tick_interval_ms = other.tick_interval_ms;
    }

    fn section_name(&self) -> &'static str {
        "player"
    }
}
