//! Game state and core simulation types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::body::Color;
use super::controller::random_velocity;
use super::engine::Arena;
use super::registry::BodyRegistry;
use super::session::{Outcome, Session};
use crate::consts::MIN_BODY_RADIUS;
use crate::{Config, SpawnParams};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Waiting for the start signal
    Intro,
    /// Countdown running
    Playing,
    /// Won or timed out
    Ended,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG for spawns
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Set once the phase is `Ended`
    pub outcome: Option<Outcome>,
    pub score: u64,
    pub session: Session,
    pub registry: BodyRegistry,
    pub arena: Arena,
    pub background: Color,
    pub move_step: f32,
    pub start_ball_count: usize,
}

impl GameState {
    /// Create a new game state in the intro phase
    pub fn new(config: &Config, seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Intro,
            outcome: None,
            score: 0,
            session: Session::new(config.game_duration_seconds, config.tick_rate),
            registry: BodyRegistry::new(),
            arena: Arena::from_config(config),
            background: config.background_color,
            move_step: config.move_step,
            start_ball_count: config.start_ball_count,
        }
    }

    /// Scatter the starting balls across the arena
    pub fn populate(&mut self, spawn: SpawnParams) {
        let radius = spawn.radius.max(MIN_BODY_RADIUS);
        for _ in 0..self.start_ball_count {
            let pos = Vec2::new(
                random_coord(&mut self.rng, radius, self.arena.width),
                random_coord(&mut self.rng, radius, self.arena.height),
            );
            let vel = random_velocity(&mut self.rng, spawn.speed);
            let color = Color::random(&mut self.rng);
            self.registry.insert(pos, vel, color, radius);
        }
        log::debug!("Populated arena with {} balls", self.start_ball_count);
    }

    /// Read-only view for the renderer and HUD
    pub fn snapshot(&self) -> Frame {
        let selected = self.registry.selected_id();
        Frame {
            bodies: self
                .registry
                .bodies()
                .iter()
                .map(|b| BodyView {
                    pos: b.pos,
                    radius: b.radius(),
                    color: b.color,
                    selected: Some(b.id) == selected,
                })
                .collect(),
            background: self.background,
            remaining_secs: self.session.remaining_secs(),
            score: self.score,
            phase: self.phase,
            outcome: self.outcome,
        }
    }
}

/// Uniform in `[radius, extent - radius]`, or the middle if the body does not fit
fn random_coord<R: Rng>(rng: &mut R, radius: f32, extent: f32) -> f32 {
    if 2.0 * radius >= extent {
        extent * 0.5
    } else {
        rng.random_range(radius..=extent - radius)
    }
}

/// One body as the renderer sees it
#[derive(Debug, Clone, Serialize)]
pub struct BodyView {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
    pub selected: bool,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub bodies: Vec<BodyView>,
    pub background: Color,
    pub remaining_secs: u64,
    pub score: u64,
    pub phase: GamePhase,
    pub outcome: Option<Outcome>,
}
