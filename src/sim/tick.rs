//! Fixed timestep simulation tick
//!
//! One frame: input, then physics, then the end-of-session check.

use super::autopilot::autopilot_input;
use super::controller::{TickInput, apply_input};
use super::engine::{StepReport, step};
use super::session::Outcome;
use super::state::{GamePhase, GameState};
use crate::SpawnParams;

/// Advance the game state by one frame.
///
/// `spawn` is the latest load-derived spawn radius/speed. Returns the physics
/// report when a frame of play actually ran.
pub fn tick(state: &mut GameState, input: &TickInput, spawn: SpawnParams) -> Option<StepReport> {
    let demo;
    let input = if input.idle_mode {
        demo = autopilot_input(state);
        &demo
    } else {
        input
    };

    match state.phase {
        GamePhase::Intro => {
            if input.start {
                state.populate(spawn);
                state.phase = GamePhase::Playing;
                log::info!(
                    "Session started: {} balls, {}s on the clock",
                    state.registry.len(),
                    state.session.duration_secs
                );
            }
            return None;
        }
        GamePhase::Ended => return None,
        GamePhase::Playing => {}
    }

    state.session.advance();

    apply_input(
        &mut state.registry,
        input,
        &state.arena,
        state.move_step,
        spawn,
        &mut state.rng,
    );

    let report = step(&mut state.registry, &state.arena);

    if let Some(outcome) = state.session.evaluate(&state.registry) {
        finish(state, outcome);
    }

    Some(report)
}

fn finish(state: &mut GameState, outcome: Outcome) {
    state.phase = GamePhase::Ended;
    state.outcome = Some(outcome);
    state.score = match outcome {
        Outcome::Won => state.session.win_score(),
        Outcome::TimedOut => 0,
    };
    log::info!(
        "Session ended ({:?}) after {}s, score {}",
        outcome,
        state.session.elapsed_secs(),
        state.score
    );
}
