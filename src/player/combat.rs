//! Player weapon, heartbeat and death.
//!
//! ## Systems
//!
//! | System                    | Set         | Purpose                                  |
//! |---------------------------|-------------|------------------------------------------|
//! | `player_weapon_system`    | `Update`    | Cool the weapon, fire a bullet pair      |
//! | `player_heartbeat_system` | `Heartbeat` | Ammo regeneration and score, per beat    |
//!
//! [`damage_player`] is called from collision dispatch.

use super::state::{Player, PlayerDamage, PlayerIntent, PlayerStatus};
use crate::actor::Presentation;
use crate::audio::StopSoundtrack;
use crate::config::GameConfig;
use crate::constants::{BULLET_PROTOTYPE, EXPLOSIONS_SET_PROTOTYPE};
use crate::prototype::{PrototypeRegistry, SpawnEnv};
use crate::simulation::{GameRng, Heartbeat, SimulationContext};
use bevy::prelude::*;
use bevy_rapier2d::prelude::Sensor;

/// Cool the weapon and, on a fire request, spawn two bullets either side of
/// the ship, pointing the way the ship points.
#[allow(clippy::too_many_arguments)]
pub fn player_weapon_system(
    mut commands: Commands,
    time: Res<Time>,
    intent: Res<PlayerIntent>,
    mut status: ResMut<PlayerStatus>,
    registry: Res<PrototypeRegistry>,
    config: Res<GameConfig>,
    mut sim: ResMut<SimulationContext>,
    mut rng: ResMut<GameRng>,
    q_player: Query<&Transform, With<Player>>,
) {
    if status.is_dead() {
        return;
    }
    // Only touch the resource while cooling so the HUD sees real changes.
    if status.weapon_cooldown > 0.0 {
        status.cool_down(time.delta_secs());
    }
    if !intent.fire {
        return;
    }
    let Ok(ship) = q_player.single() else {
        return;
    };
    if !status.try_fire(config.weapon_cooldown, config.ammo_regen_period) {
        return;
    }

    let mut env = SpawnEnv {
        sim: &mut sim,
        rng: &mut rng,
        config: &config,
    };
    for side in [-1.0_f32, 1.0] {
        let offset = ship.rotation * (Vec3::X * side * config.bullet_offset);
        let at = Transform::from_translation(ship.translation + offset).with_rotation(ship.rotation);
        if let Err(e) = registry.spawn(&mut commands, BULLET_PROTOTYPE, at, &mut env) {
            warn!("Bullet skipped: {}", e);
        }
    }
}

/// Deliver every heartbeat of this frame to the player.
pub fn player_heartbeat_system(
    heartbeat: Res<Heartbeat>,
    config: Res<GameConfig>,
    mut status: ResMut<PlayerStatus>,
) {
    for _ in 0..heartbeat.beats() {
        status.heartbeat(heartbeat.interval_secs(), config.ammo_regen_period);
    }
}

/// Damage the player; on the killing blow turn the ship into black, ethereal
/// wreckage, stop the soundtrack and attach a burst of explosions to it.
#[allow(clippy::too_many_arguments)]
pub fn damage_player(
    commands: &mut Commands,
    status: &mut PlayerStatus,
    player: Entity,
    presentation: Option<&mut Presentation>,
    registry: &PrototypeRegistry,
    env: &mut SpawnEnv,
    stop: &mut MessageWriter<StopSoundtrack>,
    amount: u32,
) -> PlayerDamage {
    let outcome = status.damage(amount);
    if outcome != PlayerDamage::Killed {
        return outcome;
    }

    if let Some(presentation) = presentation {
        presentation.mark_destroyed();
    }
    commands.entity(player).insert(Sensor);
    stop.write(StopSoundtrack);

    match registry.spawn(commands, EXPLOSIONS_SET_PROTOTYPE, Transform::IDENTITY, env) {
        Ok(effect) => {
            commands.entity(effect).insert(ChildOf(player));
        }
        Err(e) => warn!("Player death effect skipped: {}", e),
    }
    info!("Player destroyed, final score {}", status.score);
    outcome
}
