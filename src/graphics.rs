use crate::config::GameConfig;
use crate::player::ViewBounds;
use bevy::prelude::*;

/// Setup camera for 2D rendering, zoomed so one world unit spans
/// `pixels_per_unit` screen pixels.
pub fn setup_camera(mut commands: Commands, config: Res<GameConfig>) {
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scale: 1.0 / config.pixels_per_unit,
            ..OrthographicProjection::default_2d()
        }),
    ));
    eprintln!("[SETUP] Camera spawned");
}

/// Refresh [`ViewBounds`] from the camera's visible rectangle.
pub fn view_bounds_system(
    q_camera: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    mut bounds: ResMut<ViewBounds>,
) {
    let Ok((camera, camera_transform)) = q_camera.single() else {
        return;
    };
    let Some(size) = camera.logical_viewport_size() else {
        return;
    };
    let (Ok(top_left), Ok(bottom_right)) = (
        camera.viewport_to_world_2d(camera_transform, Vec2::ZERO),
        camera.viewport_to_world_2d(camera_transform, size),
    ) else {
        return;
    };
    let visible = ViewBounds {
        left: top_left.x,
        right: bottom_right.x,
        bottom: bottom_right.y,
        top: top_left.y,
    };
    if *bounds != visible {
        *bounds = visible;
    }
}
