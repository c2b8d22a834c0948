//! Session timer and scoring

use serde::{Deserialize, Serialize};

use super::registry::BodyRegistry;
use crate::consts::SCORE_SCALE;

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Only the selected body is left
    Won,
    /// The countdown ran out first
    TimedOut,
}

/// Fixed-length countdown measured in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub duration_secs: u32,
    pub tick_rate: u32,
    pub elapsed_ticks: u64,
}

impl Session {
    pub fn new(duration_secs: u32, tick_rate: u32) -> Self {
        Self {
            duration_secs,
            tick_rate: tick_rate.max(1),
            elapsed_ticks: 0,
        }
    }

    pub fn advance(&mut self) {
        self.elapsed_ticks += 1;
    }

    /// Whole seconds since the session started
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_ticks / self.tick_rate as u64
    }

    /// Whole seconds left on the countdown
    pub fn remaining_secs(&self) -> u64 {
        (self.duration_secs as u64).saturating_sub(self.elapsed_secs())
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed_ticks >= self.duration_secs as u64 * self.tick_rate as u64
    }

    /// Score for winning right now
    pub fn win_score(&self) -> u64 {
        compute_score(self.duration_secs, self.elapsed_secs())
    }

    /// Check end conditions. A win on the same frame the clock runs out still counts.
    pub fn evaluate(&self, registry: &BodyRegistry) -> Option<Outcome> {
        if registry.len() == 1 && registry.selected_id().is_some() {
            Some(Outcome::Won)
        } else if self.is_expired() {
            Some(Outcome::TimedOut)
        } else {
            None
        }
    }
}

/// `max(0, duration - elapsed - 1)`, scaled for display
pub fn compute_score(duration_secs: u32, elapsed_secs: u64) -> u64 {
    (duration_secs as u64)
        .saturating_sub(elapsed_secs)
        .saturating_sub(1)
        * SCORE_SCALE
}
