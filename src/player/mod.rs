//! Player module: ship entity, input handling, weapon and death.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | `Player` marker, the `PlayerStatus` resource (hp / ammo / score / timers), `PlayerIntent`, `ViewBounds` |
//! | [`control`] | Keyboard → intent, steering force with soft view clamping |
//! | [`combat`] | Bullet pairs behind a cooldown, heartbeat regeneration and score, death |
//!
//! All public items are re-exported at this level so the rest of the crate
//! can use flat `crate::player::*` imports.

pub mod combat;
pub mod control;
pub mod state;

pub use combat::{damage_player, player_heartbeat_system, player_weapon_system};
pub use control::{keyboard_to_intent_system, player_movement_system, steering_force};
pub use state::{Player, PlayerDamage, PlayerIntent, PlayerStatus, ViewBounds};

// ── Ship spawn ─────────────────────────────────────────────────────────────────

use crate::actor::{ActorKind, Presentation};
use crate::config::GameConfig;
use crate::prototype::{
    BodyBlock, BodyMotion, Block, Prototype, GROUP_ENEMIES, GROUP_PLAYER,
};
use crate::scene::backfire_emitter;
use bevy::prelude::*;

/// Template for the ship.  Never registered: there is exactly one per session.
pub fn player_prototype(config: &GameConfig) -> Prototype {
    let body = BodyBlock {
        motion: BodyMotion::Dynamic {
            mass: config.player_mass,
            linear_damping: config.player_linear_damping,
        },
        ..BodyBlock::kinematic(config.player_collider_radius, GROUP_PLAYER, GROUP_ENEMIES)
    };
    Prototype::new("player", ActorKind::Player)
        .with(Block::Body(body))
        .with(Block::Presentation(Presentation::new(
            [0.55, 0.85, 1.0],
            config.player_collider_radius,
        )))
}

/// Spawn the ship near the bottom of the view with its exhaust emitter.
///
/// Collision groups:
/// - `GROUP_2`: the ship belongs to this group
/// - collides with `GROUP_1` (asteroids) only; never with its own bullets
pub fn spawn_player(mut commands: Commands, config: Res<GameConfig>) {
    let at = Transform::from_xyz(0.0, config.player_start_y, 0.0);
    let ship = player_prototype(&config)
        .instance(at)
        .materialize(&mut commands);
    commands.entity(ship).insert(Player);

    match backfire_emitter(&config) {
        Ok(emitter) => {
            commands.spawn((
                Name::new("backfire-emitter"),
                ActorKind::Effect,
                emitter,
                Transform::from_xyz(0.0, -config.player_collider_radius, 0.0),
                Visibility::default(),
                ChildOf(ship),
            ));
        }
        Err(e) => eprintln!("⚠ Exhaust emitter disabled: {e}"),
    }

    println!("✓ Player ship spawned at y = {}", config.player_start_y);
}
