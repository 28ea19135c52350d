//! Emission scheduler: probabilistic, interval-gated spawning of prototypes.
//!
//! ## Design
//!
//! A [`ParticleSystem`] is an ordinary actor block.  It owns a list of
//! [`ParticleType`]s, each naming a registered prototype with a per-evaluation
//! spawn probability (`frequency`) and a per-evaluation drift (`frequency_change`).
//!
//! Each tick [`ParticleSystem::advance`]:
//!
//! 1. adds `dt` to the interval accumulator;
//! 2. once the accumulator reaches `interval`, resets it to zero and rolls
//!    every type independently (so several may spawn in the same evaluation);
//! 3. drifts every frequency and clamps it into `[0, 1]`;
//! 4. ages the optional time-to-live and decides on expiry, after the
//!    evaluation, so the expiring tick still spawns.
//!
//! `advance` is pure: it returns the prototype names to spawn and the expiry
//! decision, and [`emitter_system`] applies them through `Commands`.
//!
//! | Placement           | Spawned actor                                     |
//! |---------------------|---------------------------------------------------|
//! | `add_particles_to_root` | root entity at the emitter's world transform  |
//! | otherwise           | child of the emitter (`ChildOf`), identity local  |

use crate::config::GameConfig;
use crate::error::{validate_frequency, SpawnError, SpawnResult};
use crate::prototype::{PrototypeRegistry, SpawnEnv};
use crate::simulation::{GameRng, SimulationContext};
use bevy::prelude::*;
use rand::Rng;

// ── Particle types ────────────────────────────────────────────────────────────

/// One prototype an emitter may spawn, with its live probability.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleType {
    prototype: String,
    frequency: f32,
    frequency_change: f32,
}

impl ParticleType {
    /// `frequency` must be a probability in `[0, 1]`; `frequency_change` must
    /// be finite and may be negative.
    pub fn new(
        prototype: impl Into<String>,
        frequency: f32,
        frequency_change: f32,
    ) -> SpawnResult<Self> {
        validate_frequency(frequency)?;
        if !frequency_change.is_finite() {
            return Err(SpawnError::InvalidFrequency {
                value: frequency_change,
            });
        }
        Ok(Self {
            prototype: prototype.into(),
            frequency,
            frequency_change,
        })
    }

    #[inline]
    pub fn prototype(&self) -> &str {
        &self.prototype
    }

    #[inline]
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    #[inline]
    pub fn frequency_change(&self) -> f32 {
        self.frequency_change
    }

    /// One Bernoulli trial.  A frequency of 0 never spawns.
    fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        self.frequency > 0.0 && rng.gen::<f32>() < self.frequency
    }

    fn drift(&mut self) {
        self.frequency = (self.frequency + self.frequency_change).clamp(0.0, 1.0);
    }
}

// ── Emitter block ─────────────────────────────────────────────────────────────

/// What happens to an emitter whose time-to-live ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Destroy the actor that owns the emitter.
    DestroyOwner,
    /// Keep the owner; the emitter stops evaluating.
    Disabled,
}

/// Result of one [`ParticleSystem::advance`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EmitterTick {
    /// Prototype names to spawn, in type order.
    pub spawns: Vec<String>,
    pub expiry: Option<Expiry>,
}

/// Emitter block: interval-gated probabilistic spawner.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct ParticleSystem {
    types: Vec<ParticleType>,
    interval: f32,
    elapsed: f32,
    time_to_live: Option<f32>,
    destroy_parent_when_expired: bool,
    add_particles_to_root: bool,
    enabled: bool,
}

impl ParticleSystem {
    /// An emitter evaluating every `interval` seconds (0 means every tick).
    pub fn new(interval: f32) -> Self {
        Self {
            types: Vec::new(),
            interval: interval.max(0.0),
            elapsed: 0.0,
            time_to_live: None,
            destroy_parent_when_expired: false,
            add_particles_to_root: false,
            enabled: true,
        }
    }

    pub fn with_type(mut self, particle_type: ParticleType) -> Self {
        self.types.push(particle_type);
        self
    }

    pub fn with_time_to_live(mut self, secs: f32) -> Self {
        self.time_to_live = Some(secs);
        self
    }

    pub fn destroy_parent_when_expired(mut self) -> Self {
        self.destroy_parent_when_expired = true;
        self
    }

    pub fn add_particles_to_root(mut self) -> Self {
        self.add_particles_to_root = true;
        self
    }

    #[inline]
    pub fn types(&self) -> &[ParticleType] {
        &self.types
    }

    #[inline]
    pub fn interval(&self) -> f32 {
        self.interval
    }

    #[inline]
    pub fn time_to_live(&self) -> Option<f32> {
        self.time_to_live
    }

    #[inline]
    pub fn spawns_at_root(&self) -> bool {
        self.add_particles_to_root
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Advance by `dt` seconds and return what the caller should spawn.
    pub fn advance<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) -> EmitterTick {
        let mut tick = EmitterTick::default();
        if !self.enabled {
            return tick;
        }

        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            for particle_type in self.types.iter_mut() {
                if particle_type.roll(rng) {
                    tick.spawns.push(particle_type.prototype.clone());
                }
                particle_type.drift();
            }
        }

        // The expiring tick still gets its evaluation.
        if let Some(ttl) = self.time_to_live.as_mut() {
            *ttl -= dt;
            if *ttl <= 0.0 {
                self.enabled = false;
                tick.expiry = Some(if self.destroy_parent_when_expired {
                    Expiry::DestroyOwner
                } else {
                    Expiry::Disabled
                });
            }
        }
        tick
    }
}

// ── System ────────────────────────────────────────────────────────────────────

/// World transform of an emitter, built from its own `Transform` and its
/// parent's `GlobalTransform`.
///
/// The emitter's own `GlobalTransform` is not read: it is only propagated in
/// `PostUpdate`, so it is still the identity on the frame the emitter spawns.
fn emitter_world_transform(
    local: &Transform,
    child_of: Option<&ChildOf>,
    parents: &Query<&GlobalTransform>,
) -> Transform {
    match child_of.and_then(|c| parents.get(c.parent()).ok()) {
        Some(parent) => parent.mul_transform(*local).compute_transform(),
        None => *local,
    }
}

/// Evaluate every enabled emitter and spawn what it rolled.
///
/// Spawns are fresh spawns: the registry runs their spawn hooks, so asteroid
/// emitters advance difficulty once per asteroid.  An unknown prototype name
/// is logged and skipped.
#[allow(clippy::too_many_arguments)]
pub fn emitter_system(
    mut commands: Commands,
    time: Res<Time>,
    registry: Res<PrototypeRegistry>,
    config: Res<GameConfig>,
    mut sim: ResMut<SimulationContext>,
    mut rng: ResMut<GameRng>,
    mut emitters: Query<(Entity, &mut ParticleSystem, &Transform, Option<&ChildOf>)>,
    parents: Query<&GlobalTransform>,
) {
    let dt = time.delta_secs();
    for (owner, mut emitter, local, child_of) in emitters.iter_mut() {
        let tick = emitter.advance(dt, &mut *rng);

        let root_transform =
            emitter_world_transform(local, child_of, &parents).with_scale(Vec3::ONE);
        let at_root = emitter.spawns_at_root();

        for name in &tick.spawns {
            let transform = if at_root {
                root_transform
            } else {
                Transform::IDENTITY
            };
            let mut env = SpawnEnv {
                sim: &mut sim,
                rng: &mut rng,
                config: &config,
            };
            match registry.spawn(&mut commands, name, transform, &mut env) {
                Ok(spawned) => {
                    if !at_root {
                        commands.entity(spawned).insert(ChildOf(owner));
                    }
                }
                Err(e) => warn!("Emitter {:?} skipped a spawn: {}", owner, e),
            }
        }

        match tick.expiry {
            Some(Expiry::DestroyOwner) => {
                commands.entity(owner).try_despawn();
            }
            Some(Expiry::Disabled) => {
                debug!("Emitter {:?} expired and was disabled", owner);
            }
            None => {}
        }
    }
}
