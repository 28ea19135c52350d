use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;
use meteorfall::config::{load_game_config, CONFIG_PATH};
use meteorfall::simulation::GameRng;
use meteorfall::GamePlugin;
use std::env;

/// Configure Rapier physics: disable gravity for the space simulation.
fn setup_physics_config(mut config: Query<&mut RapierConfiguration>) {
    for mut cfg in config.iter_mut() {
        cfg.gravity = Vec2::ZERO;
    }
}

fn main() {
    // Load config before building the app so every plugin sees the final values.
    let config = load_game_config(CONFIG_PATH);

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Meteorfall".into(),
            resolution: WindowResolution::new(1200, 680),
            ..Default::default()
        }),
        ..Default::default()
    }))
    .insert_resource(ClearColor(Color::BLACK))
    .insert_resource(config);

    // Reproducible runs: METEORFALL_SEED=<u64>
    if let Ok(seed) = env::var("METEORFALL_SEED") {
        match seed.parse::<u64>() {
            Ok(seed) => {
                app.insert_resource(GameRng::seeded(seed));
                println!("✓ Using RNG seed {seed}");
            }
            Err(e) => eprintln!("⚠ Ignoring METEORFALL_SEED={seed}: {e}"),
        }
    }

    // pixels_per_meter(1.0) keeps world units identical to physics units; the
    // camera zoom alone maps them to screen pixels.
    app.add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0))
        .add_plugins(GamePlugin)
        .add_systems(Startup, setup_physics_config);

    app.run();
}
