//! Simulation module
//!
//! All gameplay logic lives here:
//! - Single-threaded, one update per fixed-rate tick
//! - Seeded RNG only
//! - Stable iteration order (insertion order of bodies)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod body;
pub mod collision;
pub mod controller;
pub mod engine;
pub mod registry;
pub mod session;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_input;
pub use body::{Body, BodyId, Color};
pub use collision::{CollisionResult, WallHit, bounce_off_walls, circle_collision, resolve_elastic};
pub use controller::{HeldKeys, PressOutcome, TickInput};
pub use engine::{Arena, StepReport};
pub use registry::BodyRegistry;
pub use session::{Outcome, Session, compute_score};
pub use state::{BodyView, Frame, GamePhase, GameState};
pub use tick::tick;
