//! Ball Sweep - an arena ball-collision game
//!
//! Core modules:
//! - `sim`: Simulation (bodies, collisions, input handling, session timer)
//! - `config`: Startup configuration (arena size, ball defaults, timing)
//! - `sampler`: Background host-load sampler feeding spawn radius/speed

pub mod config;
pub mod sampler;
pub mod sim;

pub use config::{Config, ConfigError, WallPolicy};
pub use sampler::{SpawnKnobs, SpawnParams};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 20.0;
    /// Velocity components are drawn from [-MAX_VELOCITY, MAX_VELOCITY]
    pub const MAX_VELOCITY: f32 = 5.0;
    pub const START_BALL_COUNT: usize = 5;
    /// Smallest radius a body may have
    pub const MIN_BODY_RADIUS: f32 = 1.0;

    /// Selected ball movement per held frame
    pub const MOVE_STEP: f32 = 10.0;

    /// Held-key velocity scaling applied to every non-selected ball
    pub const DAMPEN_FACTOR: f32 = 0.95;
    pub const ENERGIZE_FACTOR: f32 = 1.05;

    /// Session length
    pub const GAME_DURATION_SECS: u32 = 30;
    /// Fixed update rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Multiplier applied to the remaining-seconds score
    pub const SCORE_SCALE: u64 = 100;

    /// Network throughput that counts as full load for spawn speed
    pub const NET_SATURATION_BYTES_PER_SEC: f64 = 1_000_000.0;
    /// Default sampler polling interval
    pub const SAMPLER_INTERVAL_MS: u64 = 1000;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Unit vector along `d`, or `fallback` when `d` has no usable length
#[inline]
pub fn unit_normal(d: Vec2, fallback: Vec2) -> Vec2 {
    let len = d.length();
    if len > f32::EPSILON && len.is_finite() {
        d / len
    } else {
        fallback
    }
}

/// True if `coord` lies in `[radius, extent - radius]`
#[inline]
pub fn within_bounds(coord: f32, radius: f32, extent: f32) -> bool {
    coord >= radius && coord <= extent - radius
}
