//! Simulation plugin: shared state, tick ordering, and the heartbeat clock.
//!
//! ## Tick order
//!
//! Every frame the core runs four chained [`TickSet`]s inside `Update`:
//!
//! | Set         | Systems                                                     |
//! |-------------|-------------------------------------------------------------|
//! | `Emit`      | `emitter_system`                                            |
//! | `Update`    | TTL, animators, asteroid bounds, player movement and weapon |
//! | `Heartbeat` | `heartbeat_clock_system` → `player_heartbeat_system`        |
//! | `Collide`   | `collision_dispatch_system`                                 |
//!
//! Destruction always goes through `Commands`, so an entity despawned during a
//! pass stays queryable until that pass ends.
//!
//! The plugin is headless: it needs only a `Time` resource, which makes it
//! usable from tests without a window, renderer, or physics backend.

use crate::actor::{animator_system, ttl_system};
use crate::asteroid::asteroid_bounds_system;
use crate::audio::StopSoundtrack;
use crate::collision::{collision_dispatch_system, CollisionStarted};
use crate::config::GameConfig;
use crate::particles::emitter_system;
use crate::player::{
    player_heartbeat_system, player_movement_system, player_weapon_system, PlayerIntent,
    PlayerStatus, ViewBounds,
};
use crate::prototype::PrototypeRegistry;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::time::Duration;

// ── Tick ordering ─────────────────────────────────────────────────────────────

/// Fixed per-frame phases of the simulation.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickSet {
    /// Emitters evaluate and spawn.
    Emit,
    /// Per-frame actor updates.
    Update,
    /// Slower fixed-period cadence layered on the frame tick.
    Heartbeat,
    /// Collision-event dispatch.
    Collide,
}

// ── Difficulty ────────────────────────────────────────────────────────────────

/// Session-wide difficulty, threaded into every fresh asteroid spawn.
///
/// The value only ever grows: [`SimulationContext::advance`] is the single
/// mutation and it never subtracts.  Split children do not touch it.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SimulationContext {
    difficulty: f32,
    step: f32,
}

impl SimulationContext {
    /// A fresh session at difficulty 0 that grows by `step` per fresh spawn.
    pub fn new(step: f32) -> Self {
        Self {
            difficulty: 0.0,
            step: step.max(0.0),
        }
    }

    #[inline]
    pub fn difficulty(&self) -> f32 {
        self.difficulty
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Record one fresh top-level spawn.
    pub fn advance(&mut self) {
        self.difficulty += self.step;
    }
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self::new(crate::constants::DIFFICULTY_STEP)
    }
}

// ── Randomness ────────────────────────────────────────────────────────────────

/// The simulation's random source.
///
/// Boxes any `RngCore` so the game can run on entropy while tests plug in a
/// seeded `StdRng` or a constant `StepRng`.
#[derive(Resource)]
pub struct GameRng(Box<dyn RngCore + Send + Sync>);

impl GameRng {
    pub fn new(rng: impl RngCore + Send + Sync + 'static) -> Self {
        Self(Box::new(rng))
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl RngCore for GameRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}

// ── Heartbeat ─────────────────────────────────────────────────────────────────

/// Fixed-period clock layered over the frame tick.
///
/// `beats` holds how many periods elapsed during the current frame, so a long
/// frame still delivers every heartbeat it covered.
#[derive(Resource, Debug, Clone)]
pub struct Heartbeat {
    timer: Timer,
    beats: u32,
}

impl Heartbeat {
    pub fn new(interval_secs: f32) -> Self {
        Self {
            timer: Timer::from_seconds(interval_secs, TimerMode::Repeating),
            beats: 0,
        }
    }

    /// Heartbeats that fired during the most recent tick.
    #[inline]
    pub fn beats(&self) -> u32 {
        self.beats
    }

    #[inline]
    pub fn interval_secs(&self) -> f32 {
        self.timer.duration().as_secs_f32()
    }

    pub fn tick(&mut self, delta: Duration) {
        self.timer.tick(delta);
        self.beats = self.timer.times_finished_this_tick();
    }
}

/// Advance the heartbeat clock by the frame delta.
pub fn heartbeat_clock_system(time: Res<Time>, mut heartbeat: ResMut<Heartbeat>) {
    heartbeat.tick(time.delta());
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Headless spawning core: registry, emitters, asteroids, player state.
///
/// Reads an already-inserted [`GameConfig`] (or the defaults) to seed the
/// derived resources.  Resources that already exist are left alone, so tests
/// and the binary can pre-insert their own.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<GameConfig>()
            .cloned()
            .unwrap_or_default();

        insert_if_missing(app, SimulationContext::new(config.difficulty_step));
        insert_if_missing(app, Heartbeat::new(config.heartbeat_interval));
        insert_if_missing(app, PlayerStatus::from_config(&config));
        insert_if_missing(app, GameRng::default());
        insert_if_missing(app, PrototypeRegistry::default());
        insert_if_missing(app, PlayerIntent::default());
        insert_if_missing(app, ViewBounds::default());
        insert_if_missing(app, config);

        app.add_message::<CollisionStarted>()
            .add_message::<StopSoundtrack>()
            .configure_sets(
                Update,
                (
                    TickSet::Emit,
                    TickSet::Update,
                    TickSet::Heartbeat,
                    TickSet::Collide,
                )
                    .chain(),
            )
            .add_systems(Update, emitter_system.in_set(TickSet::Emit))
            .add_systems(
                Update,
                (
                    ttl_system,
                    animator_system,
                    asteroid_bounds_system,
                    player_movement_system,
                    player_weapon_system,
                )
                    .in_set(TickSet::Update),
            )
            .add_systems(
                Update,
                (heartbeat_clock_system, player_heartbeat_system)
                    .chain()
                    .in_set(TickSet::Heartbeat),
            )
            .add_systems(Update, collision_dispatch_system.in_set(TickSet::Collide));
    }
}

fn insert_if_missing<R: Resource>(app: &mut App, resource: R) {
    if !app.world().contains_resource::<R>() {
        app.insert_resource(resource);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_only_grows() {
        let mut ctx = SimulationContext::new(0.025);
        let mut last = ctx.difficulty();
        for _ in 0..100 {
            ctx.advance();
            assert!(ctx.difficulty() >= last);
            last = ctx.difficulty();
        }
        assert!((ctx.difficulty() - 2.5).abs() < 1e-3);
    }

    #[test]
    fn negative_step_is_clamped_to_zero() {
        let mut ctx = SimulationContext::new(-1.0);
        ctx.advance();
        assert_eq!(ctx.difficulty(), 0.0);
    }

    #[test]
    fn heartbeat_counts_every_period_in_a_long_frame() {
        let mut heartbeat = Heartbeat::new(2.0);
        heartbeat.tick(Duration::from_secs_f32(1.0));
        assert_eq!(heartbeat.beats(), 0);
        heartbeat.tick(Duration::from_secs_f32(1.0));
        assert_eq!(heartbeat.beats(), 1);
        heartbeat.tick(Duration::from_secs(6));
        assert_eq!(heartbeat.beats(), 3);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut a = GameRng::seeded(7);
        let mut b = GameRng::seeded(7);
        assert_eq!(a.next_u64(), b.next_u64());
    }
}
