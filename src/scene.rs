//! Scene construction: the prototype catalogue and the emitters that use it.
//!
//! | Prototype        | Kind       | Blocks                                                    |
//! |------------------|------------|-----------------------------------------------------------|
//! | `asteroid`       | Asteroid   | kinematic body, grey outline, asteroid controller         |
//! | `bullet`         | Projectile | ethereal kinematic body, TTL, laser sound                 |
//! | `explosion`      | Effect     | TTL, grow + fade animator, jitter, red→yellow, explode sound |
//! | `explosions-set` | Effect     | emitter of explosions that fades out and removes itself   |
//! | `backfire`       | Effect     | TTL, shrink + fade animator drifting backwards            |

use crate::actor::{ActorKind, Animator, Presentation, SpawnRandomizer, TimeToLive};
use crate::asteroid::AsteroidStats;
use crate::audio::{EXPLODE_SOUND_ASSET, LASER_SOUND_ASSET};
use crate::config::GameConfig;
use crate::constants::{
    ASTEROID_PROTOTYPE, BACKFIRE_PROTOTYPE, BULLET_PROTOTYPE, EXPLOSIONS_SET_PROTOTYPE,
    EXPLOSION_PROTOTYPE,
};
use crate::error::SpawnResult;
use crate::particles::{ParticleSystem, ParticleType};
use crate::prototype::{
    BodyBlock, Block, Prototype, PrototypeRegistry, GROUP_ENEMIES, GROUP_FRIENDLY_PROJECTILES,
    GROUP_PLAYER,
};
use bevy::prelude::*;

const BULLET_RADIUS: f32 = 0.3;

/// Register every prototype the game spawns by name.
pub fn register_prototypes(registry: &mut PrototypeRegistry, config: &GameConfig) -> SpawnResult<()> {
    registry.register(
        Prototype::new(ASTEROID_PROTOTYPE, ActorKind::Asteroid)
            .with(Block::Body(BodyBlock::kinematic(
                config.asteroid_base_radius,
                GROUP_ENEMIES,
                GROUP_PLAYER | GROUP_FRIENDLY_PROJECTILES,
            )))
            .with(Block::Presentation(Presentation::new(
                [0.62, 0.56, 0.5],
                config.asteroid_base_radius,
            )))
            .with(Block::Asteroid(AsteroidStats::default())),
    )?;

    registry.register(
        Prototype::new(BULLET_PROTOTYPE, ActorKind::Projectile)
            .with(Block::Body(
                BodyBlock::kinematic(BULLET_RADIUS, GROUP_FRIENDLY_PROJECTILES, GROUP_ENEMIES)
                    .with_velocity(Vec2::Y * config.bullet_speed)
                    .ethereal(),
            ))
            .with(Block::Presentation(
                Presentation::new([1.0, 0.95, 0.4], BULLET_RADIUS).ethereal(),
            ))
            .with(Block::TimeToLive(TimeToLive::new(config.bullet_lifetime)))
            .with(Block::Sound(LASER_SOUND_ASSET.to_string())),
    )?;

    registry.register(
        Prototype::new(EXPLOSION_PROTOTYPE, ActorKind::Effect)
            .with(Block::Presentation(
                Presentation::new([1.0, 0.0, 0.0], 0.6).ethereal(),
            ))
            .with(Block::TimeToLive(TimeToLive::new(config.explosion_lifetime)))
            .with(Block::Animator(
                Animator::new(config.explosion_lifetime)
                    .scale(0.5, 2.5)
                    .fade(1.0, 0.0),
            ))
            .with(Block::Randomizer(
                SpawnRandomizer::jitter(config.explosion_jitter)
                    .with_color_range([1.0, 0.0, 0.0], [1.0, 1.0, 0.0]),
            ))
            .with(Block::Sound(EXPLODE_SOUND_ASSET.to_string())),
    )?;

    registry.register(
        Prototype::new(EXPLOSIONS_SET_PROTOTYPE, ActorKind::Effect).with(Block::Emitter(
            ParticleSystem::new(config.explosions_set_interval)
                .with_type(ParticleType::new(
                    EXPLOSION_PROTOTYPE,
                    1.0,
                    config.explosions_set_frequency_change,
                )?)
                .with_time_to_live(config.explosions_set_lifetime)
                .destroy_parent_when_expired()
                .add_particles_to_root(),
        )),
    )?;

    registry.register(
        Prototype::new(BACKFIRE_PROTOTYPE, ActorKind::Effect)
            .with(Block::Presentation(
                Presentation::new([1.0, 0.55, 0.1], 0.35).ethereal(),
            ))
            .with(Block::TimeToLive(TimeToLive::new(config.backfire_lifetime)))
            .with(Block::Animator(
                Animator::new(config.backfire_lifetime)
                    .scale(0.5, 0.1)
                    .fade(1.0, 0.0)
                    .drift(Vec2::NEG_Y * config.backfire_drift_speed),
            )),
    )?;

    Ok(())
}

/// Emitter feeding the asteroid field.  Its frequency creeps upward forever.
pub fn asteroid_field_emitter(config: &GameConfig) -> SpawnResult<ParticleSystem> {
    Ok(ParticleSystem::new(config.asteroid_emitter_interval)
        .with_type(ParticleType::new(
            ASTEROID_PROTOTYPE,
            config.asteroid_emitter_frequency,
            config.asteroid_emitter_frequency_change,
        )?)
        .add_particles_to_root())
}

/// Exhaust emitter attached under the ship.
pub fn backfire_emitter(config: &GameConfig) -> SpawnResult<ParticleSystem> {
    Ok(ParticleSystem::new(config.backfire_interval)
        .with_type(ParticleType::new(BACKFIRE_PROTOTYPE, 1.0, 0.0)?)
        .add_particles_to_root())
}

/// Startup: fill the registry and place the asteroid field emitter.
pub fn setup_scene(
    mut commands: Commands,
    mut registry: ResMut<PrototypeRegistry>,
    config: Res<GameConfig>,
) {
    if let Err(e) = register_prototypes(&mut registry, &config) {
        eprintln!("⚠ Prototype registration failed: {e}");
    } else {
        println!("✓ Registered {} prototypes", registry.len());
    }

    match asteroid_field_emitter(&config) {
        Ok(emitter) => {
            commands.spawn((
                Name::new("asteroid-field"),
                ActorKind::Effect,
                emitter,
                Transform::default(),
                Visibility::default(),
            ));
        }
        Err(e) => eprintln!("⚠ Asteroid field disabled: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_registers_every_prototype_once() {
        let mut registry = PrototypeRegistry::default();
        register_prototypes(&mut registry, &GameConfig::default()).unwrap();
        for name in [
            ASTEROID_PROTOTYPE,
            BULLET_PROTOTYPE,
            EXPLOSION_PROTOTYPE,
            EXPLOSIONS_SET_PROTOTYPE,
            BACKFIRE_PROTOTYPE,
        ] {
            assert!(registry.contains(name), "{name} missing");
        }
        assert!(register_prototypes(&mut registry, &GameConfig::default()).is_err());
    }

    #[test]
    fn explosions_set_removes_itself() {
        let mut registry = PrototypeRegistry::default();
        register_prototypes(&mut registry, &GameConfig::default()).unwrap();
        let set = registry.get(EXPLOSIONS_SET_PROTOTYPE).unwrap();
        let Some(Block::Emitter(emitter)) = set.blocks().first() else {
            panic!("explosions-set should be an emitter");
        };
        assert!(emitter.spawns_at_root());
        assert_eq!(emitter.time_to_live(), Some(3.0));
    }

    #[test]
    fn asteroid_field_follows_the_config() {
        let config = GameConfig {
            asteroid_emitter_interval: 0.5,
            asteroid_emitter_frequency: 0.3,
            asteroid_emitter_frequency_change: 0.01,
            ..GameConfig::default()
        };
        let field = asteroid_field_emitter(&config).unwrap();
        assert_eq!(field.interval(), 0.5);
        assert!(field.spawns_at_root());
        assert_eq!(field.time_to_live(), None);

        let [rocks] = field.types() else {
            panic!("asteroid field should have exactly one type");
        };
        assert_eq!(rocks.prototype(), ASTEROID_PROTOTYPE);
        assert_eq!(rocks.frequency(), 0.3);
        assert_eq!(rocks.frequency_change(), 0.01);
    }
}
