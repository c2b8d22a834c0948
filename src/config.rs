//! Startup configuration
//!
//! A static set of named options read once at startup. Every key is optional
//! in the JSON form and falls back to the defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Color;

/// How the engine treats a body that crosses an arena wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum WallPolicy {
    /// Flip the velocity component only; the body may render slightly past the wall
    #[default]
    Reflect,
    /// Flip the velocity component and pull the body back inside the bounds
    ReflectAndClamp,
}

/// Errors raised while loading or validating a [`Config`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    pub background_color: Color,
    pub wall_policy: WallPolicy,

    // === Balls ===
    /// Radius of spawned balls when no load sampler is running
    pub ball_radius: f32,
    /// Spawn velocity bound when no load sampler is running
    pub max_velocity: f32,
    pub start_ball_count: usize,
    /// Selected ball movement per held frame
    pub move_step: f32,

    // === Session ===
    pub game_duration_seconds: u32,
    pub tick_rate: u32,
    /// RNG seed; a fresh one is drawn when absent
    pub seed: Option<u64>,

    // === Sampler ===
    pub sampler_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            background_color: Color::BLACK,
            wall_policy: WallPolicy::Reflect,

            ball_radius: BALL_RADIUS,
            max_velocity: MAX_VELOCITY,
            start_ball_count: START_BALL_COUNT,
            move_step: MOVE_STEP,

            game_duration_seconds: GAME_DURATION_SECS,
            tick_rate: TICK_RATE,
            seed: None,

            sampler_interval_ms: SAMPLER_INTERVAL_MS,
        }
    }
}

impl Config {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ball_radius.is_finite() && self.ball_radius > 0.0) {
            return Err(ConfigError::Invalid("ballRadius must be positive"));
        }
        if !(self.arena_width.is_finite() && self.arena_height.is_finite()) {
            return Err(ConfigError::Invalid("arena dimensions must be finite"));
        }
        if self.arena_width <= 2.0 * self.ball_radius || self.arena_height <= 2.0 * self.ball_radius
        {
            return Err(ConfigError::Invalid(
                "arena must be larger than one ball diameter on each axis",
            ));
        }
        if !(self.max_velocity.is_finite() && self.max_velocity >= 0.0) {
            return Err(ConfigError::Invalid("maxVelocity must be non-negative"));
        }
        if !(self.move_step.is_finite() && self.move_step >= 0.0) {
            return Err(ConfigError::Invalid("moveStep must be non-negative"));
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid("tickRate must be positive"));
        }
        if self.sampler_interval_ms == 0 {
            return Err(ConfigError::Invalid("samplerIntervalMs must be positive"));
        }
        Ok(())
    }

    /// Spawn parameters used when no load sample is available
    pub fn base_spawn(&self) -> crate::SpawnParams {
        crate::SpawnParams {
            radius: self.ball_radius,
            speed: self.max_velocity,
        }
    }

    /// Ticks in a full session
    pub fn duration_ticks(&self) -> u64 {
        self.game_duration_seconds as u64 * self.tick_rate as u64
    }
}
