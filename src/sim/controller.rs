//! Interaction controller
//!
//! Turns one frame of player input into registry operations.

use glam::Vec2;
use rand::Rng;

use super::body::{Body, BodyId, Color};
use super::engine::Arena;
use super::registry::BodyRegistry;
use crate::SpawnParams;
use crate::consts::{DAMPEN_FACTOR, ENERGIZE_FACTOR};

/// Level-triggered keys, sampled once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Slow every non-selected ball
    pub dampen: bool,
    /// Speed up every non-selected ball
    pub energize: bool,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer presses this frame, arena coordinates, in arrival order
    pub presses: Vec<Vec2>,
    /// Delete key pressed this frame
    pub delete: bool,
    /// Start signal (leaves the intro screen)
    pub start: bool,
    pub held: HeldKeys,
    /// Idle/demo mode - the autopilot plays
    pub idle_mode: bool,
}

/// What a pointer press did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    Selected(BodyId),
    Spawned(BodyId),
}

/// Select the first body under `point`, or spawn a new one there
pub fn pointer_press<R: Rng>(
    registry: &mut BodyRegistry,
    point: Vec2,
    spawn: SpawnParams,
    rng: &mut R,
) -> PressOutcome {
    if let Some(index) = registry.hit_test(point) {
        registry.clear_selection();
        if let Some(id) = registry.select(index) {
            log::debug!("Selected body {:?} at index {}", id, index);
            return PressOutcome::Selected(id);
        }
    }

    let vel = random_velocity(rng, spawn.speed);
    let id = registry.insert(point, vel, Color::random(rng), spawn.radius);
    log::debug!(
        "Spawned body {:?} at ({:.0}, {:.0}) radius {:.1}",
        id,
        point.x,
        point.y,
        spawn.radius
    );
    PressOutcome::Spawned(id)
}

/// Velocity with each component uniform in `[-speed, speed]`
pub fn random_velocity<R: Rng>(rng: &mut R, speed: f32) -> Vec2 {
    if !(speed.is_finite() && speed > 0.0) {
        return Vec2::ZERO;
    }
    Vec2::new(
        rng.random_range(-speed..=speed),
        rng.random_range(-speed..=speed),
    )
}

/// Remove the selected body and clear the selection
pub fn delete_selected(registry: &mut BodyRegistry) -> Option<Body> {
    let id = registry.selected_id()?;
    registry.clear_selection();
    let removed = registry.remove(id);
    if let Some(body) = &removed {
        log::debug!("Deleted selected body {:?}", body.id);
    }
    removed
}

/// Translate the selected body by `delta`.
///
/// An axis whose move would leave `[radius, extent - radius]` is skipped for
/// this call rather than clamped. Returns true if the body moved.
pub fn move_selected(registry: &mut BodyRegistry, delta: Vec2, arena: &Arena) -> bool {
    let Some(body) = registry.selected_mut() else {
        return false;
    };

    let r = body.radius();
    let mut delta = delta;
    if !crate::within_bounds(body.pos.x + delta.x, r, arena.width) {
        delta.x = 0.0;
    }
    if !crate::within_bounds(body.pos.y + delta.y, r, arena.height) {
        delta.y = 0.0;
    }

    body.pos += delta;
    delta != Vec2::ZERO
}

/// Multiply the velocity of every non-selected body by `factor`
pub fn scale_unselected(registry: &mut BodyRegistry, factor: f32) {
    let selected = registry.selected_id();
    for body in registry.bodies_mut() {
        if Some(body.id) != selected {
            body.vel *= factor;
        }
    }
}

/// Apply one frame of input: presses, then delete, then held keys
pub fn apply_input<R: Rng>(
    registry: &mut BodyRegistry,
    input: &TickInput,
    arena: &Arena,
    move_step: f32,
    spawn: SpawnParams,
    rng: &mut R,
) {
    for &point in &input.presses {
        pointer_press(registry, point, spawn, rng);
    }

    if input.delete {
        delete_selected(registry);
    }

    let held = input.held;
    // Screen coordinates: y grows downward
    if held.left {
        move_selected(registry, Vec2::new(-move_step, 0.0), arena);
    }
    if held.right {
        move_selected(registry, Vec2::new(move_step, 0.0), arena);
    }
    if held.up {
        move_selected(registry, Vec2::new(0.0, -move_step), arena);
    }
    if held.down {
        move_selected(registry, Vec2::new(0.0, move_step), arena);
    }

    if held.dampen {
        scale_unselected(registry, DAMPEN_FACTOR);
    }
    if held.energize {
        scale_unselected(registry, ENERGIZE_FACTOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn spawn() -> SpawnParams {
        SpawnParams {
            radius: 20.0,
            speed: 5.0,
        }
    }

    #[test]
    fn test_press_on_empty_space_spawns() {
        let mut reg = BodyRegistry::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let outcome = pointer_press(&mut reg, Vec2::new(200.0, 150.0), spawn(), &mut rng);
        assert!(matches!(outcome, PressOutcome::Spawned(_)));
        assert_eq!(reg.len(), 1);

        let body = &reg.bodies()[0];
        assert_eq!(body.pos, Vec2::new(200.0, 150.0));
        assert_eq!(body.radius(), 20.0);
        assert!(body.vel.x.abs() <= 5.0 && body.vel.y.abs() <= 5.0);
        assert!(reg.selected_id().is_none());
    }

    #[test]
    fn test_press_on_body_selects_it() {
        let mut reg = BodyRegistry::new();
        let mut rng = Pcg32::seed_from_u64(2);
        reg.insert(Vec2::new(100.0, 100.0), Vec2::new(3.0, 3.0), Color::BLACK, 20.0);
        let target = reg.insert(Vec2::new(300.0, 100.0), Vec2::new(3.0, 3.0), Color::BLACK, 20.0);

        let outcome = pointer_press(&mut reg, Vec2::new(305.0, 95.0), spawn(), &mut rng);
        assert_eq!(outcome, PressOutcome::Selected(target));
        assert_eq!(reg.len(), 2);
        let selected = reg.selected().expect("selected");
        assert_eq!(selected.vel, Vec2::ZERO);
        assert_eq!(selected.color, Color::HIGHLIGHT);
    }

    #[test]
    fn test_delete_selected() {
        let mut reg = BodyRegistry::new();
        reg.insert(Vec2::new(100.0, 100.0), Vec2::ZERO, Color::BLACK, 20.0);
        reg.insert(Vec2::new(300.0, 100.0), Vec2::ZERO, Color::BLACK, 20.0);
        reg.select(1);

        assert!(delete_selected(&mut reg).is_some());
        assert_eq!(reg.len(), 1);
        assert!(reg.selected_id().is_none());
        // Nothing selected: no-op
        assert!(delete_selected(&mut reg).is_none());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_move_selected_stops_at_bound() {
        let arena = Arena::new(800.0, 600.0);
        let mut reg = BodyRegistry::new();
        reg.insert(Vec2::new(25.0, 300.0), Vec2::ZERO, Color::BLACK, 20.0);
        reg.select(0);

        // 25 - 10 = 15 < radius: the x move is dropped, not clamped
        assert!(!move_selected(&mut reg, Vec2::new(-10.0, 0.0), &arena));
        assert_eq!(reg.selected().expect("selected").pos.x, 25.0);

        // The other axis still moves
        assert!(move_selected(&mut reg, Vec2::new(-10.0, 10.0), &arena));
        assert_eq!(reg.selected().expect("selected").pos, Vec2::new(25.0, 310.0));
    }

    #[test]
    fn test_move_without_selection_is_noop() {
        let arena = Arena::new(800.0, 600.0);
        let mut reg = BodyRegistry::new();
        reg.insert(Vec2::new(400.0, 300.0), Vec2::ZERO, Color::BLACK, 20.0);
        assert!(!move_selected(&mut reg, Vec2::new(10.0, 0.0), &arena));
        assert_eq!(reg.bodies()[0].pos, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_held_speed_keys_compound() {
        let arena = Arena::new(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut reg = BodyRegistry::new();
        reg.insert(Vec2::new(100.0, 100.0), Vec2::ZERO, Color::BLACK, 20.0);
        reg.insert(Vec2::new(300.0, 300.0), Vec2::new(4.0, -2.0), Color::BLACK, 20.0);
        reg.select(0);
        reg.selected_mut().expect("selected").vel = Vec2::new(1.0, 1.0);

        let input = TickInput {
            held: HeldKeys {
                dampen: true,
                ..Default::default()
            },
            ..Default::default()
        };
        apply_input(&mut reg, &input, &arena, 10.0, spawn(), &mut rng);
        apply_input(&mut reg, &input, &arena, 10.0, spawn(), &mut rng);

        let expected = Vec2::new(4.0, -2.0) * DAMPEN_FACTOR * DAMPEN_FACTOR;
        assert!((reg.bodies()[1].vel - expected).length() < 1e-5);
        // Selected body is left alone
        assert_eq!(reg.bodies()[0].vel, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_energize_compounds_on_unselected() {
        let arena = Arena::new(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(6);
        let mut reg = BodyRegistry::new();
        reg.insert(Vec2::new(100.0, 100.0), Vec2::ZERO, Color::BLACK, 20.0);
        reg.insert(Vec2::new(300.0, 300.0), Vec2::new(2.0, -3.0), Color::BLACK, 20.0);
        reg.insert(Vec2::new(500.0, 300.0), Vec2::new(-1.0, 1.0), Color::BLACK, 20.0);
        reg.select(0);

        let input = TickInput {
            held: HeldKeys {
                energize: true,
                ..Default::default()
            },
            ..Default::default()
        };
        for _ in 0..3 {
            apply_input(&mut reg, &input, &arena, 10.0, spawn(), &mut rng);
        }

        let k = ENERGIZE_FACTOR * ENERGIZE_FACTOR * ENERGIZE_FACTOR;
        assert!((reg.bodies()[1].vel - Vec2::new(2.0, -3.0) * k).length() < 1e-5);
        assert!((reg.bodies()[2].vel - Vec2::new(-1.0, 1.0) * k).length() < 1e-5);
        assert_eq!(reg.bodies()[0].vel, Vec2::ZERO);
    }

    #[test]
    fn test_apply_input_moves_selected() {
        let arena = Arena::new(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(4);
        let mut reg = BodyRegistry::new();
        reg.insert(Vec2::new(400.0, 300.0), Vec2::ZERO, Color::BLACK, 20.0);

        let input = TickInput {
            presses: vec![Vec2::new(400.0, 300.0)],
            held: HeldKeys {
                right: true,
                up: true,
                ..Default::default()
            },
            ..Default::default()
        };
        apply_input(&mut reg, &input, &arena, 10.0, spawn(), &mut rng);
        assert_eq!(reg.selected().expect("selected").pos, Vec2::new(410.0, 290.0));
    }

    #[test]
    fn test_zero_speed_spawns_at_rest() {
        let mut rng = Pcg32::seed_from_u64(5);
        assert_eq!(random_velocity(&mut rng, 0.0), Vec2::ZERO);
        assert_eq!(random_velocity(&mut rng, f32::NAN), Vec2::ZERO);
    }
}
