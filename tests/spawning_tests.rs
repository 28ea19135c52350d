//! Headless end-to-end tests for the spawning core.
//!
//! Each test builds a bare `App` with [`SimulationPlugin`] and a manually
//! advanced `Time` resource: no window, no renderer, no physics backend.
//! Contacts are injected as `CollisionStarted` messages, exactly as the Rapier
//! bridge would write them.
//!
//! Covered scenarios:
//! 1. An emitter at interval 0.25 / frequency 1.0 spawns once per 0.25 s tick,
//!    parents its particles to itself unless they go to the root, skips
//!    unknown prototypes and places root particles at its world position.
//! 2. A minimum-roll asteroid has 3 hp and dies to 3 damage with no children.
//! 3. A large asteroid splits into two half-scale children without moving difficulty.
//! 4. Ramming knocks the ship away and damages both sides.
//! 5. The killing blow wrecks the ship, stops the music and attaches explosions.
//! 6. Three 2 s heartbeats regenerate three rounds; a dead ship gets none.
//! 7. The explosions set removes itself when its emitter expires.

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy_rapier2d::prelude::{ExternalImpulse, Sensor, Velocity};
use meteorfall::actor::{ActorKind, Presentation};
use meteorfall::asteroid::AsteroidStats;
use meteorfall::audio::{stop_soundtrack_system, Soundtrack};
use meteorfall::collision::CollisionStarted;
use meteorfall::config::GameConfig;
use meteorfall::constants::{
    ASTEROID_PROTOTYPE, BULLET_PROTOTYPE, EXPLOSIONS_SET_PROTOTYPE,
};
use meteorfall::particles::{ParticleSystem, ParticleType};
use meteorfall::player::{Player, PlayerStatus};
use meteorfall::prototype::{Prototype, PrototypeRegistry, SourcePrototype, SpawnEnv};
use meteorfall::scene::register_prototypes;
use meteorfall::simulation::{GameRng, SimulationContext, SimulationPlugin, TickSet};
use rand::rngs::mock::StepRng;
use std::time::Duration;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Headless core with the full prototype catalogue and a random source whose
/// every `gen::<f32>()` is 0.0 (minimum rolls, every Bernoulli trial passes).
fn build_test_app(config: GameConfig) -> App {
    let mut app = App::new();
    app.init_resource::<Time>();
    let mut registry = PrototypeRegistry::default();
    register_prototypes(&mut registry, &config).expect("catalogue registers");
    app.insert_resource(registry);
    app.insert_resource(GameRng::new(StepRng::new(0, 0)));
    app.insert_resource(config);
    app.add_plugins(SimulationPlugin);
    app
}

fn step(app: &mut App, secs: f32) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f32(secs));
    app.update();
}

/// Fresh spawn through the registry, hooks included.
fn spawn_fresh(app: &mut App, name: &'static str, at: Transform) -> Entity {
    app.world_mut()
        .run_system_once(
            move |mut commands: Commands,
                  registry: Res<PrototypeRegistry>,
                  mut sim: ResMut<SimulationContext>,
                  mut rng: ResMut<GameRng>,
                  config: Res<GameConfig>| {
                let mut env = SpawnEnv {
                    sim: &mut sim,
                    rng: &mut rng,
                    config: &config,
                };
                registry.spawn(&mut commands, name, at, &mut env)
            },
        )
        .expect("spawn system runs")
        .expect("prototype is registered")
}

/// Clone without hooks.
fn instantiate(app: &mut App, name: &'static str, at: Transform) -> Entity {
    app.world_mut()
        .run_system_once(
            move |mut commands: Commands, registry: Res<PrototypeRegistry>| {
                registry.instantiate(&mut commands, name, at)
            },
        )
        .expect("instantiate system runs")
        .expect("prototype is registered")
}

/// Register a bare effect with no lifetime, so emitted copies stay countable.
fn register_beacon(app: &mut App) {
    app.world_mut()
        .resource_mut::<PrototypeRegistry>()
        .register(Prototype::new("beacon", ActorKind::Effect))
        .expect("beacon registers");
}

/// Every emitted beacon with its transform and parent, if any.
fn beacons(app: &mut App) -> Vec<(Transform, Option<Entity>)> {
    app.world_mut()
        .query::<(&SourcePrototype, &Transform, Option<&ChildOf>)>()
        .iter(app.world())
        .filter(|(source, _, _)| source.0 == "beacon")
        .map(|(_, transform, parent)| (*transform, parent.map(|p| p.parent())))
        .collect()
}

fn count_kind(app: &mut App, kind: ActorKind) -> usize {
    app.world_mut()
        .query::<&ActorKind>()
        .iter(app.world())
        .filter(|k| **k == kind)
        .count()
}

fn asteroid_stats(app: &mut App) -> Vec<AsteroidStats> {
    app.world_mut()
        .query::<&AsteroidStats>()
        .iter(app.world())
        .copied()
        .collect()
}

fn collide(app: &mut App, a: Entity, b: Entity, contact: Vec2) {
    app.world_mut()
        .write_message(CollisionStarted { a, b, contact });
}

fn spawn_ship(app: &mut App, at: Vec2) -> Entity {
    app.world_mut()
        .spawn((
            Player,
            ActorKind::Player,
            Transform::from_translation(at.extend(0.0)),
            ExternalImpulse::default(),
            Presentation::new([0.55, 0.85, 1.0], 1.0),
        ))
        .id()
}

// ── Emission ──────────────────────────────────────────────────────────────────

#[test]
fn emitter_spawns_once_per_interval_tick() {
    let mut app = build_test_app(GameConfig::default());
    app.world_mut().spawn((
        ActorKind::Effect,
        ParticleSystem::new(0.25)
            .with_type(ParticleType::new(ASTEROID_PROTOTYPE, 1.0, 0.0).unwrap())
            .add_particles_to_root(),
        Transform::default(),
    ));

    for _ in 0..10 {
        step(&mut app, 0.25);
    }

    assert_eq!(count_kind(&mut app, ActorKind::Asteroid), 10);
    let sim = app.world().resource::<SimulationContext>();
    assert!((sim.difficulty() - 10.0 * sim.step()).abs() < 1e-5);
}

#[test]
fn emitter_parents_particles_unless_they_go_to_the_root() {
    let mut app = build_test_app(GameConfig::default());
    register_beacon(&mut app);
    let emitter = app
        .world_mut()
        .spawn((
            ActorKind::Effect,
            ParticleSystem::new(0.25).with_type(ParticleType::new("beacon", 1.0, 0.0).unwrap()),
            Transform::from_xyz(5.0, 5.0, 0.0),
        ))
        .id();

    for _ in 0..3 {
        step(&mut app, 0.25);
    }

    let spawned = beacons(&mut app);
    assert_eq!(spawned.len(), 3);
    for (transform, parent) in spawned {
        assert_eq!(parent, Some(emitter));
        assert_eq!(transform, Transform::IDENTITY);
    }
}

#[test]
fn unknown_prototype_is_skipped_without_stopping_the_emitter() {
    let mut app = build_test_app(GameConfig::default());
    register_beacon(&mut app);
    let emitter = app
        .world_mut()
        .spawn((
            ActorKind::Effect,
            ParticleSystem::new(0.25)
                .with_type(ParticleType::new("comet", 1.0, 0.0).unwrap())
                .with_type(ParticleType::new("beacon", 1.0, 0.0).unwrap())
                .add_particles_to_root(),
            Transform::default(),
        ))
        .id();

    for _ in 0..4 {
        step(&mut app, 0.25);
    }

    assert_eq!(beacons(&mut app).len(), 4);
    let system = app.world().get::<ParticleSystem>(emitter).unwrap();
    assert!(system.is_enabled());
}

#[test]
fn root_particles_start_at_the_emitter_world_position_on_its_first_frame() {
    let mut app = build_test_app(GameConfig::default());
    register_beacon(&mut app);
    let ship = spawn_ship(&mut app, Vec2::new(3.0, -10.0));
    app.world_mut()
        .entity_mut(ship)
        .insert(GlobalTransform::from_xyz(3.0, -10.0, 0.0));

    // Spawned this frame: its own GlobalTransform has not been propagated.
    app.world_mut().spawn((
        ActorKind::Effect,
        ParticleSystem::new(0.0)
            .with_type(ParticleType::new("beacon", 1.0, 0.0).unwrap())
            .add_particles_to_root(),
        Transform::from_xyz(0.0, -1.0, 0.0),
        ChildOf(ship),
    ));
    step(&mut app, 0.0);

    let spawned = beacons(&mut app);
    assert_eq!(spawned.len(), 1);
    let (transform, parent) = spawned[0];
    assert_eq!(parent, None);
    assert!((transform.translation - Vec3::new(3.0, -11.0, 0.0)).length() < 1e-5);
}

// ── Asteroids ─────────────────────────────────────────────────────────────────

#[test]
fn minimum_roll_asteroid_dies_without_children() {
    let config = GameConfig {
        projectile_damage: 3,
        ..GameConfig::default()
    };
    let mut app = build_test_app(config);
    let rock = spawn_fresh(&mut app, ASTEROID_PROTOTYPE, Transform::IDENTITY);
    let bullet = instantiate(&mut app, BULLET_PROTOTYPE, Transform::from_xyz(0.0, -5.0, 0.0));

    let stats = *app.world().get::<AsteroidStats>(rock).unwrap();
    assert_eq!(stats.scale_factor, 1.0);
    assert_eq!((stats.hp, stats.max_hp), (3, 3));

    collide(&mut app, rock, bullet, Vec2::ZERO);
    step(&mut app, 0.0);

    assert!(app.world().get_entity(rock).is_err());
    assert!(app.world().get_entity(bullet).is_err());
    assert_eq!(count_kind(&mut app, ActorKind::Asteroid), 0);
}

#[test]
fn large_asteroid_splits_into_two_half_scale_children() {
    let mut app = build_test_app(GameConfig::default());
    let rock = instantiate(&mut app, ASTEROID_PROTOTYPE, Transform::IDENTITY);
    app.world_mut().entity_mut(rock).insert((
        AsteroidStats {
            hp: 2,
            max_hp: 7,
            scale_factor: 2.4,
            speed_factor: 1.5,
        },
        Velocity::linear(Vec2::new(0.0, -3.0)),
    ));
    let bullet = instantiate(&mut app, BULLET_PROTOTYPE, Transform::IDENTITY);

    collide(&mut app, bullet, rock, Vec2::ZERO);
    step(&mut app, 0.0);

    assert!(app.world().get_entity(rock).is_err());
    let children = asteroid_stats(&mut app);
    assert_eq!(children.len(), 2);
    for child in &children {
        assert_eq!(child.scale_factor, 1.2);
        assert_eq!((child.hp, child.max_hp), (3, 3));
        assert_eq!(child.speed_factor, 1.5);
    }

    let mut lateral: Vec<f32> = app
        .world_mut()
        .query::<(&AsteroidStats, &Velocity)>()
        .iter(app.world())
        .map(|(_, v)| v.linvel.x)
        .collect();
    lateral.sort_by(f32::total_cmp);
    assert_eq!(lateral, vec![-2.0, 2.0]);

    // Splits are not fresh spawns.
    assert_eq!(app.world().resource::<SimulationContext>().difficulty(), 0.0);
}

#[test]
fn one_projectile_hits_only_once() {
    let mut app = build_test_app(GameConfig::default());
    let a = instantiate(&mut app, ASTEROID_PROTOTYPE, Transform::IDENTITY);
    let b = instantiate(&mut app, ASTEROID_PROTOTYPE, Transform::from_xyz(1.0, 0.0, 0.0));
    for rock in [a, b] {
        app.world_mut().entity_mut(rock).insert(AsteroidStats {
            hp: 5,
            max_hp: 5,
            scale_factor: 1.0,
            speed_factor: 1.35,
        });
    }
    let bullet = instantiate(&mut app, BULLET_PROTOTYPE, Transform::IDENTITY);

    collide(&mut app, a, bullet, Vec2::ZERO);
    collide(&mut app, b, bullet, Vec2::ZERO);
    step(&mut app, 0.0);

    let mut hps: Vec<i32> = asteroid_stats(&mut app).iter().map(|s| s.hp).collect();
    hps.sort();
    assert_eq!(hps, vec![3, 5]);
}

#[test]
fn asteroids_past_the_bottom_are_cleaned_up() {
    let mut app = build_test_app(GameConfig::default());
    let rock = instantiate(&mut app, ASTEROID_PROTOTYPE, Transform::from_xyz(0.0, -17.0, 0.0));
    app.world_mut().entity_mut(rock).insert(AsteroidStats {
        hp: 3,
        max_hp: 3,
        scale_factor: 1.0,
        speed_factor: 1.35,
    });
    step(&mut app, 0.016);
    assert!(app.world().get_entity(rock).is_err());
}

// ── Player ────────────────────────────────────────────────────────────────────

#[test]
fn ramming_knocks_the_ship_away_and_hurts_both() {
    let mut app = build_test_app(GameConfig::default());
    let ship = spawn_ship(&mut app, Vec2::new(0.0, -10.0));
    let rock = instantiate(&mut app, ASTEROID_PROTOTYPE, Transform::from_xyz(0.0, -8.0, 0.0));
    app.world_mut().entity_mut(rock).insert(AsteroidStats {
        hp: 3,
        max_hp: 3,
        scale_factor: 1.0,
        speed_factor: 1.35,
    });

    collide(&mut app, ship, rock, Vec2::new(0.0, -9.0));
    step(&mut app, 0.0);

    let status = app.world().resource::<PlayerStatus>();
    assert_eq!(status.hp, 4);
    assert_eq!(app.world().get::<AsteroidStats>(rock).unwrap().hp, 2);

    let impulse = app.world().get::<ExternalImpulse>(ship).unwrap();
    let expected = 1.35_f32.min(6.5) * GameConfig::default().ram_impulse_scale;
    assert!(impulse.impulse.x.abs() < 1e-5);
    assert!((impulse.impulse.y + expected).abs() < 1e-3);
}

#[test]
fn killing_blow_wrecks_ship_and_stops_music() {
    let mut app = build_test_app(GameConfig::default());
    app.add_systems(Update, stop_soundtrack_system.after(TickSet::Collide));
    let track = app.world_mut().spawn(Soundtrack).id();
    app.world_mut().resource_mut::<PlayerStatus>().hp = 1;

    let ship = spawn_ship(&mut app, Vec2::new(0.0, -10.0));
    let rock = instantiate(&mut app, ASTEROID_PROTOTYPE, Transform::from_xyz(0.0, -8.0, 0.0));
    app.world_mut().entity_mut(rock).insert(AsteroidStats {
        hp: 3,
        max_hp: 3,
        scale_factor: 1.0,
        speed_factor: 1.35,
    });

    collide(&mut app, rock, ship, Vec2::new(0.0, -9.0));
    step(&mut app, 0.0);

    assert!(app.world().resource::<PlayerStatus>().is_dead());
    let look = app.world().get::<Presentation>(ship).unwrap();
    assert_eq!(look.rgb, [0.0, 0.0, 0.0]);
    assert!(look.ethereal);
    assert!(app.world().get::<Sensor>(ship).is_some());
    assert!(app.world().get_entity(track).is_err());

    let attached = app
        .world_mut()
        .query::<(&ChildOf, &ParticleSystem)>()
        .iter(app.world())
        .filter(|(parent, _)| parent.parent() == ship)
        .count();
    assert_eq!(attached, 1);

    // The wreck keeps ramming: the asteroid takes damage, the ship does not
    // die a second time.
    collide(&mut app, rock, ship, Vec2::new(0.0, -9.0));
    step(&mut app, 0.0);
    assert_eq!(app.world().resource::<PlayerStatus>().hp, 0);
    assert_eq!(app.world().get::<AsteroidStats>(rock).unwrap().hp, 1);
    let attached = app
        .world_mut()
        .query::<(&ChildOf, &ParticleSystem)>()
        .iter(app.world())
        .filter(|(parent, _)| parent.parent() == ship)
        .count();
    assert_eq!(attached, 1);
}

#[test]
fn three_heartbeats_regenerate_three_rounds() {
    let mut app = build_test_app(GameConfig::default());
    for _ in 0..3 {
        step(&mut app, 2.0);
    }
    let status = app.world().resource::<PlayerStatus>();
    assert_eq!(status.ammo, 3);
    assert_eq!(status.score, 3);
}

#[test]
fn dead_ship_stops_scoring() {
    let mut app = build_test_app(GameConfig::default());
    app.world_mut().resource_mut::<PlayerStatus>().hp = 0;
    for _ in 0..3 {
        step(&mut app, 2.0);
    }
    let status = app.world().resource::<PlayerStatus>();
    assert_eq!(status.ammo, 0);
    assert_eq!(status.score, 0);
}

// ── Effects ───────────────────────────────────────────────────────────────────

#[test]
fn explosions_set_removes_itself_when_it_expires() {
    let mut app = build_test_app(GameConfig::default());
    let set = spawn_fresh(&mut app, EXPLOSIONS_SET_PROTOTYPE, Transform::IDENTITY);

    for _ in 0..5 {
        step(&mut app, 0.5);
    }
    assert!(app.world().get_entity(set).is_ok());

    step(&mut app, 0.5);
    assert!(app.world().get_entity(set).is_err());
}
