//! Run configuration
//!
//! Everything the original globals held (arena size, speed, frame directory)
//! lives in one `SimulationConfig`, built once per run and passed down.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{Arena, ConfigError, PolicyKind, Spawner, StepRules, Viewport};

/// Frame capture settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Write every presented frame to disk
    pub enabled: bool,
    /// Parent directory; each run gets its own subdirectory
    pub dir: PathBuf,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: PathBuf::from("frames"),
        }
    }
}

/// Configuration for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the run's RNG stream
    pub seed: u64,
    pub arena: Arena,
    /// Radius of every body (fixed for the run)
    pub body_radius: f64,
    /// Per-axis displacement per tick of a freshly spawned body
    pub base_speed: f64,
    /// Minimum clearance between a new body's center and the wall (None = body radius)
    pub spawn_margin: Option<f64>,
    /// Bodies spawned before the first tick
    pub initial_bodies: usize,
    pub policy: PolicyKind,
    /// Rectangle used by the off-screen cleanup rule
    pub viewport: Viewport,
    /// Ticks per second (speed is tuned for this rate)
    pub tick_rate: u32,
    /// Cap on ticks run in one driver poll after a stall
    pub max_catch_up_ticks: u32,
    pub capture: CaptureConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            arena: Arena::default(),
            body_radius: BODY_RADIUS,
            base_speed: BASE_SPEED,
            spawn_margin: None,
            initial_bodies: 1,
            policy: PolicyKind::BounceAndDuplicate,
            viewport: Viewport::default(),
            tick_rate: TICK_RATE,
            max_catch_up_ticks: MAX_CATCH_UP_TICKS,
            capture: CaptureConfig::default(),
        }
    }
}

/// Failure to load a configuration file
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(ConfigError),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "Failed to read config: {}", e),
            SettingsError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            SettingsError::Invalid(e) => write!(f, "Invalid config: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
            SettingsError::Invalid(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

impl From<ConfigError> for SettingsError {
    fn from(e: ConfigError) -> Self {
        SettingsError::Invalid(e)
    }
}

fn positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl SimulationConfig {
    /// Default configuration with a different escape policy
    pub fn with_policy(policy: PolicyKind) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Write this config as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_arena()?;
        self.validate_bodies()?;
        self.validate_timing()?;
        // Spawner construction is the final word on whether bodies fit
        self.spawner()?;

        if !self.arena_fits_viewport() {
            log::warn!("Arena extends past the viewport; bodies may be culled without escaping");
        }
        Ok(())
    }

    fn validate_arena(&self) -> Result<(), ConfigError> {
        let arena = &self.arena;
        if !positive_finite(arena.radius) || !arena.center.is_finite() {
            return Err(ConfigError::InvalidArenaRadius(arena.radius));
        }
        if !positive_finite(arena.gap.half_width) {
            return Err(ConfigError::InvalidGapHalfWidth(arena.gap.half_width));
        }
        if !arena.gap.center_offset.is_finite() {
            return Err(ConfigError::InvalidGapOffset(arena.gap.center_offset));
        }
        if !positive_finite(self.viewport.width) || !positive_finite(self.viewport.height) {
            return Err(ConfigError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        Ok(())
    }

    fn validate_bodies(&self) -> Result<(), ConfigError> {
        if !positive_finite(self.body_radius) {
            return Err(ConfigError::InvalidBodyRadius(self.body_radius));
        }
        if !positive_finite(self.base_speed) {
            return Err(ConfigError::InvalidBaseSpeed(self.base_speed));
        }
        match self.spawn_margin {
            Some(margin) if !(margin.is_finite() && margin >= 0.0) => {
                Err(ConfigError::InvalidSpawnMargin(margin))
            }
            _ => Ok(()),
        }
    }

    fn validate_timing(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 || self.max_catch_up_ticks == 0 {
            return Err(ConfigError::InvalidTickRate);
        }
        Ok(())
    }

    fn arena_fits_viewport(&self) -> bool {
        let c = self.arena.center;
        let r = self.arena.radius;
        c.x - r >= 0.0
            && c.y - r >= 0.0
            && c.x + r <= self.viewport.width
            && c.y + r <= self.viewport.height
    }

    /// Spawner for this run's arena and body constants
    pub fn spawner(&self) -> Result<Spawner, ConfigError> {
        Spawner::new(self.arena, self.body_radius, self.base_speed, self.spawn_margin)
    }

    /// Everything the tick needs besides the policy and the RNG
    pub fn step_rules(&self) -> Result<StepRules, ConfigError> {
        Ok(StepRules::new(self.spawner()?, Some(self.viewport)))
    }

    /// Fixed tick length in seconds
    pub fn tick_seconds(&self) -> f64 {
        1.0 / self.tick_rate.max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GapSide;

    #[test]
    fn test_default_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.arena_fits_viewport());
        assert_eq!(config.policy, PolicyKind::BounceAndDuplicate);
        assert!((config.tick_seconds() - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "seed": 7,
            "policy": "pass_through",
            "arena": {
                "center": [300.0, 300.0],
                "radius": 150.0,
                "gap": { "center_offset": 10.0, "half_width": 30.0, "side": "bottom" }
            }
        }"#;
        let config = SimulationConfig::from_json(json).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.policy, PolicyKind::PassThrough);
        assert_eq!(config.arena.radius, 150.0);
        assert_eq!(config.arena.gap.side, GapSide::Bottom);
        assert_eq!(config.body_radius, BODY_RADIUS);
        assert_eq!(config.tick_rate, TICK_RATE);
        assert!(!config.capture.enabled);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = SimulationConfig::default();
        config.arena.radius = -1.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidArenaRadius(-1.0)));

        let mut config = SimulationConfig::default();
        config.arena.gap.half_width = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidGapHalfWidth(0.0)));

        let mut config = SimulationConfig::default();
        config.tick_rate = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidTickRate));

        let mut config = SimulationConfig::default();
        config.viewport.height = f64::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidViewport { .. })));
    }

    #[test]
    fn test_rejects_arena_smaller_than_margin() {
        let mut config = SimulationConfig::default();
        config.arena.radius = 12.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ArenaTooSmall { .. })
        ));
    }

    #[test]
    fn test_invalid_json_reports_parse_error() {
        let err = SimulationConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));

        let err = SimulationConfig::from_json(r#"{ "body_radius": 0.0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(ConfigError::InvalidBodyRadius(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("gap-arena-settings-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");

        let mut config = SimulationConfig::with_policy(PolicyKind::Absorb);
        config.seed = 1234;
        config.save(&path).unwrap();
        let loaded = SimulationConfig::load(&path).unwrap();
        assert_eq!(loaded, config);

        fs::remove_dir_all(&dir).unwrap();
    }
}
