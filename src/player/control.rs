//! Player input and steering.
//!
//! ## Pipeline
//!
//! 1. [`keyboard_to_intent_system`] rewrites [`PlayerIntent`] from the keyboard
//!    every frame (arrows / WASD move, Space fires).
//! 2. [`player_movement_system`] turns the intent into an `ExternalForce`,
//!    adding a push back toward the view for every side the ship has crossed.
//!
//! A dead ship receives no force at all; damping brings it to rest.

use super::state::{Player, PlayerIntent, PlayerStatus, ViewBounds};
use crate::config::GameConfig;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Read the keyboard into [`PlayerIntent`].
pub fn keyboard_to_intent_system(keys: Res<ButtonInput<KeyCode>>, mut intent: ResMut<PlayerIntent>) {
    let axis = |negative: [KeyCode; 2], positive: [KeyCode; 2]| -> f32 {
        let mut value = 0.0;
        if keys.any_pressed(negative) {
            value -= 1.0;
        }
        if keys.any_pressed(positive) {
            value += 1.0;
        }
        value
    };

    intent.movement = Vec2::new(
        axis(
            [KeyCode::ArrowLeft, KeyCode::KeyA],
            [KeyCode::ArrowRight, KeyCode::KeyD],
        ),
        axis(
            [KeyCode::ArrowDown, KeyCode::KeyS],
            [KeyCode::ArrowUp, KeyCode::KeyW],
        ),
    );
    intent.fire = keys.pressed(KeyCode::Space);
}

/// Steering force for `movement` at `position`, soft-clamped to `bounds`.
///
/// Each side the ship has crossed adds a push of
/// `move_force · boundary_factor` back toward the view.
pub fn steering_force(
    movement: Vec2,
    position: Vec2,
    bounds: &ViewBounds,
    move_force: f32,
    boundary_factor: f32,
) -> Vec2 {
    let mut force = movement.clamp(Vec2::NEG_ONE, Vec2::ONE) * move_force;
    let overshoot = bounds.overshoot(position);
    let push = move_force * boundary_factor;
    if overshoot.x != 0.0 {
        force.x -= overshoot.x.signum() * push;
    }
    if overshoot.y != 0.0 {
        force.y -= overshoot.y.signum() * push;
    }
    force
}

/// Apply the intent as a force on the ship; zero while dead.
pub fn player_movement_system(
    intent: Res<PlayerIntent>,
    status: Res<PlayerStatus>,
    bounds: Res<ViewBounds>,
    config: Res<GameConfig>,
    mut query: Query<(&Transform, &mut ExternalForce), With<Player>>,
) {
    for (transform, mut force) in query.iter_mut() {
        force.torque = 0.0;
        if status.is_dead() {
            force.force = Vec2::ZERO;
            continue;
        }
        force.force = steering_force(
            intent.movement,
            transform.translation.truncate(),
            &bounds,
            config.player_move_force,
            config.boundary_force_factor,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_test_app(status: PlayerStatus, intent: PlayerIntent) -> App {
        let mut app = App::new();
        app.insert_resource(status);
        app.insert_resource(intent);
        app.insert_resource(ViewBounds::default());
        app.insert_resource(GameConfig::default());
        app.add_systems(Update, player_movement_system);
        app
    }

    fn spawn_test_player(app: &mut App, at: Vec2) -> Entity {
        app.world_mut()
            .spawn((
                Player,
                Transform::from_translation(at.extend(0.0)),
                ExternalForce::default(),
            ))
            .id()
    }

    #[test]
    fn boundary_push_opposes_each_crossed_side() {
        let bounds = ViewBounds::default();
        let force = steering_force(Vec2::ZERO, Vec2::new(30.0, -20.0), &bounds, 750.0, 2.0);
        assert_eq!(force, Vec2::new(-1500.0, 1500.0));

        let inside = steering_force(Vec2::X, Vec2::ZERO, &bounds, 750.0, 2.0);
        assert_eq!(inside, Vec2::new(750.0, 0.0));
    }

    #[test]
    fn movement_intent_sets_force() {
        let mut app = build_test_app(
            PlayerStatus::default(),
            PlayerIntent {
                movement: Vec2::Y,
                fire: false,
            },
        );
        let ship = spawn_test_player(&mut app, Vec2::ZERO);
        app.update();
        let force = app.world().get::<ExternalForce>(ship).unwrap();
        assert_eq!(force.force, Vec2::new(0.0, 750.0));
    }

    #[test]
    fn dead_ship_gets_no_force() {
        let status = PlayerStatus {
            hp: 0,
            ..PlayerStatus::default()
        };
        let mut app = build_test_app(
            status,
            PlayerIntent {
                movement: Vec2::ONE,
                fire: false,
            },
        );
        let ship = spawn_test_player(&mut app, Vec2::new(100.0, 0.0));
        app.update();
        let force = app.world().get::<ExternalForce>(ship).unwrap();
        assert_eq!(force.force, Vec2::ZERO);
    }
}
