//! Prototype registry: named actor templates and the clone protocol.
//!
//! A [`Prototype`] is an ordered list of [`Block`]s.  Spawning takes a deep
//! value snapshot of those blocks (an [`Instance`]), optionally runs the
//! one-time spawn hooks on the snapshot, and only then materializes it as
//! ECS components.  Nothing an instance owns is shared with its template or
//! its siblings.
//!
//! There are two factories:
//!
//! | Factory                         | Hooks | Used by                          |
//! |---------------------------------|-------|----------------------------------|
//! | [`PrototypeRegistry::spawn`]       | yes   | emitters, weapons, effects       |
//! | [`PrototypeRegistry::instantiate`] | no    | split children (state transplant)|

use crate::actor::{ActorKind, Animator, Presentation, SpawnRandomizer, TimeToLive};
use crate::asteroid::{roll_fresh, AsteroidStats};
use crate::audio::SpawnSound;
use crate::config::GameConfig;
use crate::error::{SpawnError, SpawnResult};
use crate::particles::ParticleSystem;
use crate::simulation::{GameRng, SimulationContext};
use bevy::ecs::system::EntityCommands;
use bevy::prelude::*;
use bevy_rapier2d::geometry::Group;
use bevy_rapier2d::prelude::*;
use std::collections::HashMap;

// ── Collision groups ──────────────────────────────────────────────────────────

/// Asteroids.
pub const GROUP_ENEMIES: Group = Group::GROUP_1;
/// The player ship.
pub const GROUP_PLAYER: Group = Group::GROUP_2;
/// Friendly projectiles.
pub const GROUP_FRIENDLY_PROJECTILES: Group = Group::GROUP_3;

// ── Blocks ────────────────────────────────────────────────────────────────────

/// How a body is driven by the physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyMotion {
    /// Moves at its constant `Velocity`; forces do not affect it.
    Kinematic,
    /// Fully simulated; accepts steering forces and impulses.
    Dynamic { mass: f32, linear_damping: f32 },
}

/// Physical body handed to Rapier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyBlock {
    pub radius: f32,
    pub motion: BodyMotion,
    /// Initial velocity in the actor's local frame (rotated by the spawn
    /// orientation, so bullets inherit the ship's heading).
    pub velocity: Vec2,
    pub angular_velocity: f32,
    pub ethereal: bool,
    pub memberships: Group,
    pub filters: Group,
}

impl BodyBlock {
    pub fn kinematic(radius: f32, memberships: Group, filters: Group) -> Self {
        Self {
            radius,
            motion: BodyMotion::Kinematic,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            ethereal: false,
            memberships,
            filters,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn ethereal(mut self) -> Self {
        self.ethereal = true;
        self
    }
}

/// One behaviour / state block of a prototype.
#[derive(Debug, Clone)]
pub enum Block {
    Body(BodyBlock),
    Presentation(Presentation),
    TimeToLive(TimeToLive),
    Animator(Animator),
    Emitter(ParticleSystem),
    /// Fresh-spawn only; never materialized as a component.
    Randomizer(SpawnRandomizer),
    /// Asteroid controller.  The template holds zeroed stats; fresh spawns
    /// roll them, split children get theirs transplanted.
    Asteroid(AsteroidStats),
    /// Asset path of a one-shot sound played on appearance.
    Sound(String),
}

// ── Prototype / instance ──────────────────────────────────────────────────────

/// Immutable named template.
#[derive(Debug, Clone)]
pub struct Prototype {
    name: String,
    kind: ActorKind,
    blocks: Vec<Block>,
}

impl Prototype {
    pub fn new(name: impl Into<String>, kind: ActorKind) -> Self {
        Self {
            name: name.into(),
            kind,
            blocks: Vec::new(),
        }
    }

    pub fn with(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Deep value snapshot of this template, placed at `transform`.
    pub fn instance(&self, transform: Transform) -> Instance {
        Instance {
            name: self.name.clone(),
            kind: self.kind,
            transform,
            blocks: self.blocks.clone(),
        }
    }
}

/// Name of the prototype an actor was cloned from.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct SourcePrototype(pub String);

/// Everything a fresh spawn hook may read or advance.
pub struct SpawnEnv<'a> {
    pub sim: &'a mut SimulationContext,
    pub rng: &'a mut GameRng,
    pub config: &'a GameConfig,
}

/// An actor that has been cloned but not yet inserted into the world.
#[derive(Debug, Clone)]
pub struct Instance {
    pub name: String,
    pub kind: ActorKind,
    pub transform: Transform,
    pub blocks: Vec<Block>,
}

impl Instance {
    /// One-time spawn initialization on the snapshot.
    ///
    /// The asteroid controller rolls stats from the current difficulty and
    /// then advances it; randomizers jitter the position and pick a colour.
    /// Results that belong to other blocks are applied in a second pass.
    pub fn run_spawn_hooks(&mut self, env: &mut SpawnEnv) {
        let mut rolled_motion: Option<(Vec2, f32)> = None;
        let mut picked_rgb: Option<[f32; 3]> = None;

        for block in self.blocks.iter_mut() {
            match block {
                Block::Asteroid(stats) => {
                    let fresh = roll_fresh(env.sim.difficulty(), &mut *env.rng, env.config);
                    env.sim.advance();
                    *stats = fresh.stats;
                    self.transform = Transform::from_translation(
                        fresh.position.extend(self.transform.translation.z),
                    )
                    .with_scale(Vec3::splat(fresh.stats.scale_factor));
                    rolled_motion = Some((fresh.linvel, fresh.angvel));
                }
                Block::Randomizer(randomizer) => {
                    self.transform.translation += randomizer.offset(&mut *env.rng).extend(0.0);
                    if let Some(rgb) = randomizer.color(&mut *env.rng) {
                        picked_rgb = Some(rgb);
                    }
                }
                _ => {}
            }
        }

        for block in self.blocks.iter_mut() {
            match block {
                Block::Body(body) => {
                    if let Some((linvel, angvel)) = rolled_motion {
                        body.velocity = linvel;
                        body.angular_velocity = angvel;
                    }
                }
                Block::Presentation(presentation) => {
                    if let Some(rgb) = picked_rgb {
                        presentation.rgb = rgb;
                    }
                }
                _ => {}
            }
        }
    }

    /// Insert the snapshot into the world as a new root entity.
    pub fn materialize(self, commands: &mut Commands) -> Entity {
        let Instance {
            name,
            kind,
            transform,
            blocks,
        } = self;

        let mut entity = commands.spawn((
            kind,
            SourcePrototype(name.clone()),
            Name::new(name),
            transform,
            Visibility::default(),
        ));

        for block in blocks {
            match block {
                Block::Body(body) => insert_body(&mut entity, &body, transform.rotation),
                Block::Presentation(presentation) => {
                    entity.insert(presentation);
                }
                Block::TimeToLive(ttl) => {
                    entity.insert(ttl);
                }
                Block::Animator(animator) => {
                    entity.insert(animator);
                }
                Block::Emitter(system) => {
                    entity.insert(system);
                }
                Block::Asteroid(stats) => {
                    entity.insert(stats);
                }
                Block::Sound(path) => {
                    entity.insert(SpawnSound(path));
                }
                Block::Randomizer(_) => {}
            }
        }

        entity.id()
    }
}

fn insert_body(entity: &mut EntityCommands, body: &BodyBlock, rotation: Quat) {
    let linvel = (rotation * body.velocity.extend(0.0)).truncate();
    entity.insert((
        Collider::ball(body.radius),
        Velocity {
            linvel,
            angvel: body.angular_velocity,
        },
        CollisionGroups::new(body.memberships, body.filters),
        ActiveEvents::COLLISION_EVENTS,
        // Asteroids and bullets are both kinematic; without this pair type
        // Rapier never reports their contacts.
        ActiveCollisionTypes::default()
            | ActiveCollisionTypes::KINEMATIC_KINEMATIC
            | ActiveCollisionTypes::DYNAMIC_KINEMATIC,
    ));
    match body.motion {
        BodyMotion::Kinematic => {
            entity.insert(RigidBody::KinematicVelocityBased);
        }
        BodyMotion::Dynamic {
            mass,
            linear_damping,
        } => {
            entity.insert((
                RigidBody::Dynamic,
                ColliderMassProperties::Mass(mass),
                Damping {
                    linear_damping,
                    angular_damping: linear_damping,
                },
                LockedAxes::ROTATION_LOCKED,
                ExternalForce::default(),
                ExternalImpulse::default(),
            ));
        }
    }
    if body.ethereal {
        entity.insert(Sensor);
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// Owns every registered template.
#[derive(Resource, Debug, Default)]
pub struct PrototypeRegistry {
    prototypes: HashMap<String, Prototype>,
}

impl PrototypeRegistry {
    /// Store a template.  Names are unique.
    pub fn register(&mut self, prototype: Prototype) -> SpawnResult<()> {
        if self.prototypes.contains_key(prototype.name()) {
            return Err(SpawnError::DuplicateName {
                name: prototype.name().to_string(),
            });
        }
        self.prototypes
            .insert(prototype.name().to_string(), prototype);
        Ok(())
    }

    pub fn get(&self, name: &str) -> SpawnResult<&Prototype> {
        self.prototypes
            .get(name)
            .ok_or_else(|| SpawnError::UnknownPrototype {
                name: name.to_string(),
            })
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.prototypes.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    /// Clone `name` into the world without running spawn hooks.
    pub fn instantiate(
        &self,
        commands: &mut Commands,
        name: &str,
        transform: Transform,
    ) -> SpawnResult<Entity> {
        Ok(self.get(name)?.instance(transform).materialize(commands))
    }

    /// Clone `name` into the world and run its one-time spawn hooks.
    pub fn spawn(
        &self,
        commands: &mut Commands,
        name: &str,
        transform: Transform,
        env: &mut SpawnEnv,
    ) -> SpawnResult<Entity> {
        let mut instance = self.get(name)?.instance(transform);
        instance.run_spawn_hooks(env);
        Ok(instance.materialize(commands))
    }
}
