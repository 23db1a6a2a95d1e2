//! Tuning configuration. Loaded from `hoverboard.ron` at startup.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::board::BoardConfig;
use crate::impact::{ImpactConfig, VelocityHitConfig};
use crate::mode::ModeConfig;
use crate::pid::PidGains;
use crate::tricks::TrickConfig;
use crate::walk::WalkConfig;

pub const CONFIG_FILE: &str = "hoverboard.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid RON: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid tuning value: {0}")]
    Invalid(String),
}

/// Rider mount and spawn placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Where the rider stands, in board space.
    pub rider_offset: Vec3,
    /// Where the board appears relative to the character when mounting.
    pub board_spawn_offset: Vec3,
    /// Seed for cosmetic randomness (trick animation variants).
    pub seed: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            rider_offset: Vec3::new(0.0, 0.35, 0.0),
            board_spawn_offset: Vec3::new(0.0, 0.25, 0.0),
            seed: 0x5eed,
        }
    }
}

/// Every tunable of the rider core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    pub board: BoardConfig,
    pub pid: PidGains,
    pub tricks: TrickConfig,
    pub walk: WalkConfig,
    pub mode: ModeConfig,
    pub impact: ImpactConfig,
    pub velocity_hit: VelocityHitConfig,
    pub player: PlayerConfig,
}

impl TuningConfig {
    /// Load `hoverboard.ron` from the current directory. Missing or invalid files give defaults.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Invalid tuning at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&data)
    }

    pub fn from_ron(data: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation would divide by or clamp with inverted bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.board;
        positive("board.hover_height", b.hover_height)?;
        positive("board.maximum_velocity", b.maximum_velocity)?;
        positive("board.drift_amount", b.drift_amount)?;
        positive("board.backward_velocity_divider", b.backward_velocity_divider)?;
        positive("board.boost_divide_factor", b.boost_divide_factor)?;
        ordered("board.min_boost", b.min_boost, "board.max_boost", b.max_boost)?;
        ordered(
            "board.jump_min_load_time",
            b.jump_min_load_time,
            "board.jump_max_load_time",
            b.jump_max_load_time,
        )?;
        ordered("pid.min_output", self.pid.min_output, "pid.max_output", self.pid.max_output)?;
        non_negative("board.alignment_rate", b.alignment_rate)?;
        positive("impact.ragdoll_threshold", self.impact.ragdoll_threshold)?;
        non_negative("mode.state_switch_cooldown", self.mode.state_switch_cooldown)?;
        non_negative("tricks.max_trick_speed", self.tricks.max_trick_speed)?;
        non_negative("walk.turn_rate", self.walk.turn_rate)?;
        positive("walk.stand_height", self.walk.stand_height)?;
        ordered(
            "walk.stand_height",
            self.walk.stand_height,
            "walk.grounded_ray_length",
            self.walk.grounded_ray_length,
        )?;
        Ok(())
    }

    /// Pretty RON of the current values, for writing a starting file.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }
}

fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
    }
}

fn non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must not be negative, got {value}")))
    }
}

fn ordered(low_name: &str, low: f32, high_name: &str, high: f32) -> Result<(), ConfigError> {
    if low <= high {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{low_name} ({low}) is greater than {high_name} ({high})"
        )))
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(CONFIG_FILE)
}
