//! Meteorfall library
//!
//! A prototype-driven spawning core for an asteroid-field shooter: named actor
//! templates, probabilistic emitters, asteroids that split under fire and a
//! player ship with a cooldown-gated weapon and heartbeat-driven ammo.
//!
//! [`simulation::SimulationPlugin`] is the headless core.  [`GamePlugin`]
//! adds input, physics bridging, audio, rendering and the scene on top.

pub mod actor;
pub mod asteroid;
pub mod audio;
pub mod collision;
pub mod config;
pub mod constants;
pub mod error;
pub mod graphics;
pub mod particles;
pub mod player;
pub mod prototype;
pub mod rendering;
pub mod scene;
pub mod simulation;

use bevy::prelude::*;
use collision::{collision_dispatch_system, rapier_collision_bridge_system};
use simulation::{SimulationPlugin, TickSet};

/// Everything the windowed game needs on top of the headless core.
///
/// Expects `RapierPhysicsPlugin` to be added by the caller.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((SimulationPlugin, audio::GameAudioPlugin))
            .add_systems(
                Startup,
                (
                    graphics::setup_camera,
                    scene::setup_scene,
                    player::spawn_player,
                    rendering::setup_hud,
                ),
            )
            .add_systems(
                Update,
                (
                    player::keyboard_to_intent_system,
                    graphics::view_bounds_system,
                )
                    .before(TickSet::Emit),
            )
            .add_systems(
                Update,
                rapier_collision_bridge_system
                    .in_set(TickSet::Collide)
                    .before(collision_dispatch_system),
            )
            .add_systems(
                Update,
                (
                    rendering::gizmo_rendering_system,
                    rendering::hud_status_display_system,
                )
                    .after(TickSet::Collide),
            );
    }
}
