//! Self-replicating asteroids: stat rolls, damage, splitting and cleanup.
//!
//! A fresh asteroid rolls its stats from the session difficulty when the
//! registry spawns it (see [`roll_fresh`]).  Lethal damage either destroys it
//! or, if it is large enough, replaces it with two half-scale children whose
//! stats are transplanted directly (no second roll, no difficulty step).
//!
//! | Roll        | Formula                                         |
//! |-------------|-------------------------------------------------|
//! | scale       | `1 + r · (scale_spread + difficulty)`           |
//! | hp = max_hp | `round(scale · hp_per_unit_scale)`, at least 1  |
//! | speed       | `speed_base + r · difficulty`                   |
//! | velocity    | `-Y · speed · forward_speed`                    |
//! | spin        | `(r − 0.5) · 2 · speed`                          |
//! | position    | `x ∈ ±playfield_width/2`, `y = spawn_distance + scale` |

use crate::config::GameConfig;
use crate::constants::EXPLOSION_PROTOTYPE;
use crate::prototype::{PrototypeRegistry, SpawnEnv};
use bevy::prelude::*;
use bevy_rapier2d::prelude::Velocity;
use rand::Rng;

/// Asteroid controller state.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct AsteroidStats {
    pub hp: i32,
    pub max_hp: i32,
    pub scale_factor: f32,
    pub speed_factor: f32,
}

/// What a single damage application did to an asteroid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// The asteroid was already dead; nothing changed.
    Ignored,
    /// `hp` dropped but stayed positive.
    Survived,
    /// Lethal, and large enough to split into these two children.
    Split([AsteroidStats; 2]),
    /// Lethal, too small to split.
    Destroyed,
}

impl AsteroidStats {
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Apply `amount` damage and decide split-or-destroy on a lethal hit.
    pub fn damage(&mut self, amount: u32, min_split_scale: f32) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::Ignored;
        }
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.hp = self.hp.saturating_sub(amount).min(self.max_hp);
        if !self.is_dead() {
            return DamageOutcome::Survived;
        }
        if self.scale_factor < min_split_scale {
            return DamageOutcome::Destroyed;
        }
        match self.split() {
            Some(child) => DamageOutcome::Split([child, child]),
            None => DamageOutcome::Destroyed,
        }
    }

    /// Stats for one split child: half scale, half max hp (floored), full
    /// health, same speed.  `None` if halving would not shrink the asteroid.
    pub fn split(&self) -> Option<AsteroidStats> {
        let scale_factor = self.scale_factor / 2.0;
        if !scale_factor.is_finite() || scale_factor <= 0.0 || scale_factor >= self.scale_factor {
            return None;
        }
        let max_hp = self.max_hp / 2;
        Some(AsteroidStats {
            hp: max_hp,
            max_hp,
            scale_factor,
            speed_factor: self.speed_factor,
        })
    }
}

// ── Fresh spawn roll ──────────────────────────────────────────────────────────

/// Stats and motion of a freshly rolled asteroid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreshAsteroid {
    pub stats: AsteroidStats,
    pub position: Vec2,
    pub linvel: Vec2,
    pub angvel: f32,
}

/// Roll a top-level asteroid from the current difficulty.
///
/// Does not advance the difficulty; the registry does that once the roll is
/// applied.
pub fn roll_fresh<R: Rng + ?Sized>(difficulty: f32, rng: &mut R, config: &GameConfig) -> FreshAsteroid {
    let difficulty = difficulty.max(0.0);

    let scale_factor = 1.0 + rng.gen::<f32>() * (config.asteroid_scale_spread + difficulty);
    let max_hp = ((scale_factor * config.asteroid_hp_per_unit_scale).round() as i32).max(1);
    let speed_factor = config.asteroid_speed_base + rng.gen::<f32>() * difficulty;

    let linvel = Vec2::NEG_Y * speed_factor * config.asteroid_forward_speed;
    let angvel = (rng.gen::<f32>() - 0.5) * 2.0 * speed_factor;
    let position = Vec2::new(
        (rng.gen::<f32>() - 0.5) * config.playfield_width,
        config.asteroid_spawn_distance + scale_factor,
    );

    FreshAsteroid {
        stats: AsteroidStats {
            hp: max_hp,
            max_hp,
            scale_factor,
            speed_factor,
        },
        position,
        linvel,
        angvel,
    }
}

// ── Damage resolution ─────────────────────────────────────────────────────────

/// An asteroid taking damage, as seen by collision dispatch.
pub struct AsteroidHit<'a> {
    pub entity: Entity,
    pub stats: &'a mut AsteroidStats,
    pub transform: Transform,
    pub velocity: Velocity,
    /// Prototype the children are cloned from.
    pub source: &'a str,
}

/// Damage an asteroid and carry out the outcome: on a lethal hit an explosion
/// is spawned, children (if any) are instantiated, and the asteroid is
/// despawned.
pub fn resolve_asteroid_damage(
    commands: &mut Commands,
    registry: &PrototypeRegistry,
    env: &mut SpawnEnv,
    hit: AsteroidHit,
    amount: u32,
) -> DamageOutcome {
    let outcome = hit.stats.damage(amount, env.config.asteroid_min_split_scale);
    match outcome {
        DamageOutcome::Ignored | DamageOutcome::Survived => return outcome,
        DamageOutcome::Split(children) => {
            spawn_split_children(
                commands,
                registry,
                hit.source,
                &hit.transform,
                hit.velocity,
                children,
                env.config.split_lateral_speed,
            );
        }
        DamageOutcome::Destroyed => {}
    }

    let at = Transform::from_translation(hit.transform.translation);
    if let Err(e) = registry.spawn(commands, EXPLOSION_PROTOTYPE, at, env) {
        warn!("Asteroid {:?} explosion skipped: {}", hit.entity, e);
    }
    commands.entity(hit.entity).try_despawn();
    outcome
}

/// Instantiate two split children from `source` with transplanted stats.
///
/// Children start at the parent's position, inherit its velocity plus an
/// opposite lateral push each, and keep its spin.
pub fn spawn_split_children(
    commands: &mut Commands,
    registry: &PrototypeRegistry,
    source: &str,
    parent: &Transform,
    parent_velocity: Velocity,
    children: [AsteroidStats; 2],
    lateral_speed: f32,
) -> Vec<Entity> {
    let mut spawned = Vec::with_capacity(2);
    for (stats, side) in children.into_iter().zip([-1.0_f32, 1.0]) {
        let transform = Transform::from_translation(parent.translation)
            .with_rotation(parent.rotation)
            .with_scale(Vec3::splat(stats.scale_factor));
        match registry.instantiate(commands, source, transform) {
            Ok(child) => {
                commands.entity(child).insert((
                    stats,
                    Velocity {
                        linvel: parent_velocity.linvel + Vec2::X * side * lateral_speed,
                        angvel: parent_velocity.angvel,
                    },
                ));
                spawned.push(child);
            }
            Err(e) => warn!("Split child of '{}' skipped: {}", source, e),
        }
    }
    spawned
}

// ── Off-screen cleanup ────────────────────────────────────────────────────────

/// Despawn asteroids that have travelled past the bottom of the playfield,
/// whatever their health.
pub fn asteroid_bounds_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    query: Query<(Entity, &Transform, &AsteroidStats)>,
) {
    for (entity, transform, stats) in query.iter() {
        if transform.translation.y < -(config.asteroid_despawn_distance + stats.scale_factor) {
            commands.entity(entity).try_despawn();
        }
    }
}
