//! Background music and spawn sound effects.
//!
//! The core never touches audio directly: it writes [`StopSoundtrack`] when
//! the player dies and tags prototypes with a [`SpawnSound`] block.  This
//! plugin turns both into Bevy `AudioPlayer` entities.

use bevy::audio::Volume;
use bevy::prelude::*;

pub const SOUNDTRACK_ASSET: &str = "sounds/back_music.ogg";
pub const EXPLODE_SOUND_ASSET: &str = "sounds/explode.ogg";
pub const LASER_SOUND_ASSET: &str = "sounds/laser.ogg";

/// Marker for the looping background track.
#[derive(Component, Debug, Clone, Copy)]
pub struct Soundtrack;

/// Request to halt the background track.
#[derive(Message, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StopSoundtrack;

/// One-shot sound played when the actor appears.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct SpawnSound(pub String);

pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<StopSoundtrack>()
            .add_systems(Startup, start_soundtrack)
            .add_systems(Update, (play_spawn_sounds_system, stop_soundtrack_system));
    }
}

pub fn start_soundtrack(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.spawn((
        Soundtrack,
        AudioPlayer::new(asset_server.load(SOUNDTRACK_ASSET)),
        PlaybackSettings::LOOP.with_volume(Volume::Linear(0.5)),
    ));
    eprintln!("[SETUP] Soundtrack started");
}

pub fn play_spawn_sounds_system(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    query: Query<&SpawnSound, Added<SpawnSound>>,
) {
    for sound in query.iter() {
        commands.spawn((
            AudioPlayer::new(asset_server.load(sound.0.clone())),
            PlaybackSettings::DESPAWN,
        ));
    }
}

/// Despawn the soundtrack entity once any stop request arrives.
pub fn stop_soundtrack_system(
    mut commands: Commands,
    mut stops: MessageReader<StopSoundtrack>,
    query: Query<Entity, With<Soundtrack>>,
) {
    if stops.read().count() == 0 {
        return;
    }
    for entity in query.iter() {
        commands.entity(entity).try_despawn();
    }
    info!("Soundtrack stopped");
}
