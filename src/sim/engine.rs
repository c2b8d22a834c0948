//! Per-frame physics step
//!
//! Order is fixed: elimination sweep, integration, wall reflection, then
//! pairwise bounce. The selected body only takes part in the sweep. Under
//! `ReflectAndClamp` a last containment pass runs after the bounce, since
//! overlap correction can push a body back past a wall.

use glam::Vec2;

use super::body::BodyId;
use super::collision::{bodies_overlap, bounce_off_walls, contain, resolve_elastic};
use super::registry::BodyRegistry;
use crate::WallPolicy;

/// Arena bounds and wall handling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub wall_policy: WallPolicy,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            wall_policy: WallPolicy::Reflect,
        }
    }

    pub fn from_config(config: &crate::Config) -> Self {
        Self {
            width: config.arena_width,
            height: config.arena_height,
            wall_policy: config.wall_policy,
        }
    }
}

/// What happened during one step
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    /// Bodies removed by the selected body this frame
    pub eliminated: Vec<BodyId>,
    /// Number of body pairs that bounced
    pub bounces: u32,
    /// Number of wall reflections
    pub wall_hits: u32,
}

/// Advance every body by one frame
pub fn step(registry: &mut BodyRegistry, arena: &Arena) -> StepReport {
    let mut report = StepReport {
        eliminated: elimination_sweep(registry),
        ..Default::default()
    };

    integrate(registry);

    for body in registry.bodies_mut() {
        let hit = bounce_off_walls(body, arena.width, arena.height, arena.wall_policy);
        report.wall_hits += hit.x as u32 + hit.y as u32;
    }

    report.bounces = resolve_pairs(registry);

    if arena.wall_policy == WallPolicy::ReflectAndClamp {
        for body in registry.bodies_mut() {
            contain(body, arena.width, arena.height);
        }
    }

    report
}

/// Remove every non-selected body touching the selected one.
///
/// The cursor stays put after a removal so the body that slid into the slot
/// is tested too. The selected body is stopped again if anything was removed.
pub fn elimination_sweep(registry: &mut BodyRegistry) -> Vec<BodyId> {
    let mut eliminated = Vec::new();
    // The selected body does not move during the sweep
    let Some(selected) = registry.selected().cloned() else {
        return eliminated;
    };

    let mut i = 0;
    while let Some(target) = registry.get(i) {
        let touching = target.id != selected.id && bodies_overlap(&selected, target);
        if !touching {
            i += 1;
            continue;
        }

        if let Some(removed) = registry.remove_at(i) {
            log::debug!("Body {:?} eliminated", removed.id);
            eliminated.push(removed.id);
        }
    }

    if !eliminated.is_empty() {
        if let Some(body) = registry.selected_mut() {
            body.vel = Vec2::ZERO;
        }
    }

    eliminated
}

/// Translate each body by its velocity
pub fn integrate(registry: &mut BodyRegistry) {
    for body in registry.bodies_mut() {
        body.pos += body.vel;
    }
}

/// Bounce every unordered pair not involving the selected body.
/// Returns the number of pairs that were in contact.
pub fn resolve_pairs(registry: &mut BodyRegistry) -> u32 {
    let selected = registry.selected_index();
    let bodies = registry.bodies_mut();
    let n = bodies.len();
    let mut bounces = 0;

    for j in 0..n {
        if Some(j) == selected {
            continue;
        }
        for k in (j + 1)..n {
            if Some(k) == selected {
                continue;
            }
            let (head, tail) = bodies.split_at_mut(k);
            if resolve_elastic(&mut head[j], &mut tail[0]) {
                bounces += 1;
            }
        }
    }

    bounces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Color;

    fn arena() -> Arena {
        Arena::new(800.0, 600.0)
    }

    #[test]
    fn test_head_on_step() {
        let mut reg = BodyRegistry::new();
        reg.insert(Vec2::new(100.0, 300.0), Vec2::new(5.0, 0.0), Color::WHITE, 20.0);
        reg.insert(Vec2::new(130.0, 300.0), Vec2::new(-5.0, 0.0), Color::WHITE, 20.0);

        let report = step(&mut reg, &arena());
        assert_eq!(report.bounces, 1);

        let a = &reg.bodies()[0];
        let b = &reg.bodies()[1];
        assert!(a.vel.x < 0.0 && b.vel.x > 0.0);
        assert!((a.vel.x + 5.0).abs() < 1e-5);
        assert!((b.vel.x - 5.0).abs() < 1e-5);
        assert!((crate::distance(a.pos, b.pos) - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_selected_body_is_immune_to_bounce() {
        let mut reg = BodyRegistry::new();
        reg.insert(Vec2::new(300.0, 300.0), Vec2::ZERO, Color::WHITE, 20.0);
        reg.insert(Vec2::new(500.0, 300.0), Vec2::new(1.0, 0.0), Color::WHITE, 20.0);
        reg.select(0);

        // Park the other body just outside elimination range; integration
        // will not bring it closer because it moves away.
        reg.get_mut(1).expect("body").pos = Vec2::new(341.0, 300.0);
        let report = step(&mut reg, &arena());
        assert!(report.eliminated.is_empty());
        assert_eq!(report.bounces, 0);
        assert_eq!(reg.selected().expect("selected").pos, Vec2::new(300.0, 300.0));
    }

    #[test]
    fn test_sweep_removes_all_touching_and_rearms() {
        let mut reg = BodyRegistry::new();
        // A and B overlap the selected C; D is far away
        let a = reg.insert(Vec2::new(110.0, 100.0), Vec2::new(2.0, 0.0), Color::WHITE, 20.0);
        let b = reg.insert(Vec2::new(100.0, 120.0), Vec2::new(0.0, 2.0), Color::WHITE, 20.0);
        let c = reg.insert(Vec2::new(100.0, 100.0), Vec2::new(3.0, 3.0), Color::WHITE, 20.0);
        reg.insert(Vec2::new(500.0, 500.0), Vec2::ZERO, Color::WHITE, 20.0);
        reg.select(2);
        // Something disturbed the selected body's velocity since selection
        reg.selected_mut().expect("selected").vel = Vec2::new(1.0, 1.0);

        let eliminated = elimination_sweep(&mut reg);
        assert_eq!(eliminated, vec![a, b]);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.selected_id(), Some(c));
        assert_eq!(reg.selected_index(), Some(0));
        assert_eq!(reg.selected().expect("selected").vel, Vec2::ZERO);
    }

    #[test]
    fn test_sweep_uses_both_radii() {
        let mut reg = BodyRegistry::new();
        reg.insert(Vec2::new(100.0, 100.0), Vec2::ZERO, Color::WHITE, 30.0);
        reg.insert(Vec2::new(135.0, 100.0), Vec2::ZERO, Color::WHITE, 10.0);
        reg.insert(Vec2::new(145.0, 100.0), Vec2::ZERO, Color::WHITE, 10.0);
        reg.select(0);

        let eliminated = elimination_sweep(&mut reg);
        assert_eq!(eliminated.len(), 1);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_sweep_without_selection_is_noop() {
        let mut reg = BodyRegistry::new();
        reg.insert(Vec2::new(100.0, 100.0), Vec2::ZERO, Color::WHITE, 20.0);
        reg.insert(Vec2::new(100.0, 100.0), Vec2::ZERO, Color::WHITE, 20.0);
        assert!(elimination_sweep(&mut reg).is_empty());
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_wall_reflection_after_integration() {
        let mut reg = BodyRegistry::new();
        reg.insert(Vec2::new(777.0, 300.0), Vec2::new(5.0, 0.0), Color::WHITE, 20.0);
        let report = step(&mut reg, &arena());
        assert_eq!(report.wall_hits, 1);
        let body = &reg.bodies()[0];
        assert_eq!(body.pos.x, 782.0);
        assert_eq!(body.vel.x, -5.0);
    }

    #[test]
    fn test_clamp_policy_holds_after_bounce_near_wall() {
        let arena = Arena {
            wall_policy: WallPolicy::ReflectAndClamp,
            ..arena()
        };
        let mut reg = BodyRegistry::new();
        reg.insert(Vec2::new(21.0, 300.0), Vec2::new(-1.0, 0.0), Color::WHITE, 20.0);
        reg.insert(Vec2::new(40.0, 300.0), Vec2::new(-1.0, 0.0), Color::WHITE, 20.0);

        let report = step(&mut reg, &arena);
        assert_eq!(report.bounces, 1);
        for body in reg.bodies() {
            let r = body.radius();
            assert!(crate::within_bounds(body.pos.x, r, arena.width), "x={}", body.pos.x);
            assert!(crate::within_bounds(body.pos.y, r, arena.height), "y={}", body.pos.y);
        }
        assert_eq!(reg.bodies()[0].pos.x, 20.0);
    }

    #[test]
    fn test_reflect_policy_leaves_position_alone() {
        let mut reg = BodyRegistry::new();
        reg.insert(Vec2::new(21.0, 300.0), Vec2::new(-1.0, 0.0), Color::WHITE, 20.0);
        reg.insert(Vec2::new(40.0, 300.0), Vec2::new(-1.0, 0.0), Color::WHITE, 20.0);

        step(&mut reg, &arena());
        assert_eq!(reg.bodies()[0].pos.x, 9.5);
    }

    #[test]
    fn test_empty_registry_step() {
        let mut reg = BodyRegistry::new();
        let report = step(&mut reg, &arena());
        assert!(report.eliminated.is_empty());
        assert_eq!(report.bounces, 0);
    }
}
