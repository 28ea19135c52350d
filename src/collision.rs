//! Collision dispatch between actor kinds.
//!
//! The physics backend reports contacts as Rapier `CollisionEvent`s.
//! [`rapier_collision_bridge_system`] turns each `Started` event into a
//! [`CollisionStarted`] message carrying both entities and a contact point;
//! [`collision_dispatch_system`] then matches on the pair of [`ActorKind`]s.
//!
//! | Pair                  | Effect                                                     |
//! |-----------------------|------------------------------------------------------------|
//! | asteroid / projectile | projectile consumed, explosion at it, asteroid damaged     |
//! | asteroid / player     | player knocked back, explosion, both sides damaged         |
//! | anything else         | ignored                                                    |
//!
//! An entity destroyed earlier in the same pass is skipped for the rest of
//! it; the despawn itself is deferred until the pass ends.

use crate::actor::{ActorKind, Presentation};
use crate::asteroid::{resolve_asteroid_damage, AsteroidHit, AsteroidStats, DamageOutcome};
use crate::audio::StopSoundtrack;
use crate::config::GameConfig;
use crate::constants::EXPLOSION_PROTOTYPE;
use crate::player::{damage_player, Player, PlayerStatus};
use crate::prototype::{PrototypeRegistry, SourcePrototype, SpawnEnv};
use crate::simulation::{GameRng, SimulationContext};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use std::collections::HashSet;

/// A new contact between two actors.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct CollisionStarted {
    pub a: Entity,
    pub b: Entity,
    /// World-space contact point.
    pub contact: Vec2,
}

/// Forward Rapier contact starts as [`CollisionStarted`] messages.
///
/// The contact point is approximated by the midpoint of the two bodies.
pub fn rapier_collision_bridge_system(
    mut events: MessageReader<CollisionEvent>,
    transforms: Query<&GlobalTransform>,
    mut started: MessageWriter<CollisionStarted>,
) {
    for event in events.read() {
        let (a, b) = match event {
            CollisionEvent::Started(e1, e2, _) => (*e1, *e2),
            CollisionEvent::Stopped(..) => continue,
        };
        let contact = match (transforms.get(a), transforms.get(b)) {
            (Ok(ta), Ok(tb)) => (ta.translation().truncate() + tb.translation().truncate()) * 0.5,
            _ => continue,
        };
        started.write(CollisionStarted { a, b, contact });
    }
}

/// Apply every collision reported this frame.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn collision_dispatch_system(
    mut commands: Commands,
    mut collisions: MessageReader<CollisionStarted>,
    q_actors: Query<(&ActorKind, &Transform)>,
    mut q_asteroids: Query<(&mut AsteroidStats, Option<&Velocity>, &SourcePrototype)>,
    mut q_player: Query<(Option<&mut ExternalImpulse>, Option<&mut Presentation>), With<Player>>,
    mut status: ResMut<PlayerStatus>,
    registry: Res<PrototypeRegistry>,
    config: Res<GameConfig>,
    mut sim: ResMut<SimulationContext>,
    mut rng: ResMut<GameRng>,
    mut stop: MessageWriter<StopSoundtrack>,
) {
    let mut consumed: HashSet<Entity> = HashSet::new();
    let mut env = SpawnEnv {
        sim: &mut sim,
        rng: &mut rng,
        config: &config,
    };

    for hit in collisions.read() {
        if consumed.contains(&hit.a) || consumed.contains(&hit.b) {
            continue;
        }
        let (Ok((kind_a, tf_a)), Ok((kind_b, tf_b))) =
            (q_actors.get(hit.a), q_actors.get(hit.b))
        else {
            continue;
        };

        let (asteroid, asteroid_transform, other, other_transform, other_kind) =
            match (*kind_a, *kind_b) {
                (ActorKind::Asteroid, kind @ (ActorKind::Projectile | ActorKind::Player)) => {
                    (hit.a, *tf_a, hit.b, *tf_b, kind)
                }
                (kind @ (ActorKind::Projectile | ActorKind::Player), ActorKind::Asteroid) => {
                    (hit.b, *tf_b, hit.a, *tf_a, kind)
                }
                _ => continue,
            };

        let Ok((mut stats, velocity, source)) = q_asteroids.get_mut(asteroid) else {
            continue;
        };
        let target = AsteroidHit {
            entity: asteroid,
            stats: &mut *stats,
            transform: asteroid_transform,
            velocity: velocity.copied().unwrap_or_default(),
            source: &source.0,
        };

        match other_kind {
            ActorKind::Projectile => {
                consumed.insert(other);
                commands.entity(other).try_despawn();
                let at = Transform::from_translation(other_transform.translation);
                if let Err(e) = registry.spawn(&mut commands, EXPLOSION_PROTOTYPE, at, &mut env) {
                    warn!("Impact explosion skipped: {}", e);
                }
                let outcome = resolve_asteroid_damage(
                    &mut commands,
                    &registry,
                    &mut env,
                    target,
                    config.projectile_damage,
                );
                if is_lethal(outcome) {
                    consumed.insert(asteroid);
                }
            }
            ActorKind::Player => {
                // A wreck still knocks and chips asteroids; damage_player ignores it.
                let Ok((impulse, presentation)) = q_player.get_mut(other) else {
                    continue;
                };
                let away = (other_transform.translation - asteroid_transform.translation)
                    .truncate()
                    .normalize_or_zero();
                let strength = (target.stats.speed_factor * target.stats.scale_factor)
                    .min(config.ram_impulse_cap)
                    * config.ram_impulse_scale;
                if let Some(mut impulse) = impulse {
                    impulse.impulse += away * strength;
                }

                let at = Transform::from_translation((hit.contact + away).extend(0.0));
                if let Err(e) = registry.spawn(&mut commands, EXPLOSION_PROTOTYPE, at, &mut env) {
                    warn!("Ram explosion skipped: {}", e);
                }

                let outcome = resolve_asteroid_damage(
                    &mut commands,
                    &registry,
                    &mut env,
                    target,
                    config.ram_self_damage,
                );
                if is_lethal(outcome) {
                    consumed.insert(asteroid);
                }
                damage_player(
                    &mut commands,
                    &mut status,
                    other,
                    presentation.map(|p| p.into_inner()),
                    &registry,
                    &mut env,
                    &mut stop,
                    config.ram_player_damage,
                );
            }
            _ => {}
        }
    }
}

fn is_lethal(outcome: DamageOutcome) -> bool {
    matches!(outcome, DamageOutcome::Split(_) | DamageOutcome::Destroyed)
}
