//! Ball Sweep entry point
//!
//! Window, drawing and input polling live outside this crate. The native
//! binary runs a headless demo session with the autopilot at the fixed tick
//! rate and logs the HUD once per second.
//!
//! Usage: `ball-sweep [config.json]` (set `RUST_LOG=info` or `debug`).

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use ball_sweep::Config;
use ball_sweep::sampler::{ProcLoadProbe, SpawnKnobs, spawn_sampler};
use ball_sweep::sim::{GamePhase, GameState, TickInput, tick};

fn main() {
    env_logger::init();
    log::info!("Ball Sweep (headless demo) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match Config::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    let seed = config.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    log::info!("Seed: {}", seed);

    let base = config.base_spawn();
    let knobs = Arc::new(SpawnKnobs::new(base));
    let sampler = match spawn_sampler(
        ProcLoadProbe::new(),
        knobs.clone(),
        base,
        Duration::from_millis(config.sampler_interval_ms),
    ) {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::warn!("Load sampler unavailable, using fixed spawn parameters: {}", e);
            None
        }
    };

    let mut state = GameState::new(&config, seed);
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let frame_time = Duration::from_secs_f64(1.0 / config.tick_rate as f64);
    let mut next_frame = Instant::now();
    let mut last_reported = u64::MAX;

    while state.phase != GamePhase::Ended {
        tick(&mut state, &input, knobs.load());

        let remaining = state.session.remaining_secs();
        if state.phase == GamePhase::Playing && remaining != last_reported {
            last_reported = remaining;
            log::info!(
                "{}s left, {} balls on the board",
                remaining,
                state.registry.len()
            );
        }

        next_frame += frame_time;
        let now = Instant::now();
        if next_frame > now {
            std::thread::sleep(next_frame - now);
        } else {
            // Fell behind; don't try to catch up
            next_frame = now;
        }
    }

    match serde_json::to_string(&state.snapshot()) {
        Ok(json) => log::debug!("Final frame: {}", json),
        Err(e) => log::warn!("Could not serialize final frame: {}", e),
    }
    println!(
        "{:?} with score {} ({} ball(s) left)",
        state.outcome,
        state.score,
        state.registry.len()
    );

    if let Some(sampler) = sampler {
        sampler.stop();
    }
}
