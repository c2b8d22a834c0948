//! Idle/demo mode
//!
//! Synthesizes player input: start the session, grab the first ball, then
//! chase whichever ball is nearest until none are left.

use super::controller::TickInput;
use super::state::{GamePhase, GameState};

pub fn autopilot_input(state: &GameState) -> TickInput {
    let mut input = TickInput::default();

    match state.phase {
        GamePhase::Intro => {
            input.start = true;
            return input;
        }
        GamePhase::Ended => return input,
        GamePhase::Playing => {}
    }

    let registry = &state.registry;
    let Some(selected) = registry.selected() else {
        if let Some(first) = registry.bodies().first() {
            input.presses.push(first.pos);
        }
        return input;
    };

    let nearest = registry
        .bodies()
        .iter()
        .filter(|b| b.id != selected.id)
        .min_by(|a, b| {
            let da = a.pos.distance_squared(selected.pos);
            let db = b.pos.distance_squared(selected.pos);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });

    if let Some(target) = nearest {
        // Lead the target by one frame: it integrates after our move
        let delta = (target.pos + target.vel) - selected.pos;
        let deadzone = state.move_step * 0.5;
        input.held.left = delta.x < -deadzone;
        input.held.right = delta.x > deadzone;
        input.held.up = delta.y < -deadzone;
        input.held.down = delta.y > deadzone;
    }

    input
}
