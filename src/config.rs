//! Runtime gameplay configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  Before the app is built, [`load_game_config`] reads
//! `assets/game.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about:
//!
//! ```toml
//! heartbeat_interval = 1.0
//! asteroid_emitter_frequency = 0.2
//! ```
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `GameConfig::default()`.

use crate::constants::*;
use crate::error::{validate_frequency, validate_non_negative, validate_positive, SpawnResult};
use bevy::prelude::*;
use serde::Deserialize;

/// Default location of the config file, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/game.toml";

/// Runtime-tunable gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── World ────────────────────────────────────────────────────────────────
    pub pixels_per_unit: f32,
    pub playfield_width: f32,
    pub asteroid_spawn_distance: f32,
    pub asteroid_despawn_distance: f32,

    // ── Difficulty ───────────────────────────────────────────────────────────
    pub difficulty_step: f32,

    // ── Asteroid rolls ───────────────────────────────────────────────────────
    pub asteroid_base_radius: f32,
    pub asteroid_scale_spread: f32,
    pub asteroid_hp_per_unit_scale: f32,
    pub asteroid_speed_base: f32,
    pub asteroid_forward_speed: f32,

    // ── Asteroid splitting / damage ──────────────────────────────────────────
    pub asteroid_min_split_scale: f32,
    pub split_lateral_speed: f32,
    pub projectile_damage: u32,
    pub ram_self_damage: u32,
    pub ram_player_damage: u32,
    pub ram_impulse_cap: f32,
    pub ram_impulse_scale: f32,

    // ── Player ───────────────────────────────────────────────────────────────
    pub player_max_hp: i32,
    pub player_max_ammo: u32,
    pub player_start_ammo: u32,
    pub ammo_regen_initial_delay: f32,
    pub ammo_regen_period: f32,
    pub weapon_cooldown: f32,
    pub bullet_offset: f32,
    pub bullet_speed: f32,
    pub bullet_lifetime: f32,
    pub player_move_force: f32,
    pub boundary_force_factor: f32,
    pub player_mass: f32,
    pub player_linear_damping: f32,
    pub player_collider_radius: f32,
    pub player_start_y: f32,

    // ── Heartbeat ────────────────────────────────────────────────────────────
    pub heartbeat_interval: f32,

    // ── Emitters ─────────────────────────────────────────────────────────────
    pub asteroid_emitter_interval: f32,
    pub asteroid_emitter_frequency: f32,
    pub asteroid_emitter_frequency_change: f32,
    pub explosions_set_interval: f32,
    pub explosions_set_frequency_change: f32,
    pub explosions_set_lifetime: f32,
    pub backfire_interval: f32,

    // ── Effects ──────────────────────────────────────────────────────────────
    pub explosion_lifetime: f32,
    pub explosion_jitter: f32,
    pub backfire_lifetime: f32,
    pub backfire_drift_speed: f32,

    // ── HUD ──────────────────────────────────────────────────────────────────
    pub hud_font_size: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // World
            pixels_per_unit: PIXELS_PER_UNIT,
            playfield_width: PLAYFIELD_WIDTH,
            asteroid_spawn_distance: ASTEROID_SPAWN_DISTANCE,
            asteroid_despawn_distance: ASTEROID_DESPAWN_DISTANCE,
            // Difficulty
            difficulty_step: DIFFICULTY_STEP,
            // Asteroid rolls
            asteroid_base_radius: ASTEROID_BASE_RADIUS,
            asteroid_scale_spread: ASTEROID_SCALE_SPREAD,
            asteroid_hp_per_unit_scale: ASTEROID_HP_PER_UNIT_SCALE,
            asteroid_speed_base: ASTEROID_SPEED_BASE,
            asteroid_forward_speed: ASTEROID_FORWARD_SPEED,
            // Asteroid splitting / damage
            asteroid_min_split_scale: ASTEROID_MIN_SPLIT_SCALE,
            split_lateral_speed: SPLIT_LATERAL_SPEED,
            projectile_damage: PROJECTILE_DAMAGE,
            ram_self_damage: RAM_SELF_DAMAGE,
            ram_player_damage: RAM_PLAYER_DAMAGE,
            ram_impulse_cap: RAM_IMPULSE_CAP,
            ram_impulse_scale: RAM_IMPULSE_SCALE,
            // Player
            player_max_hp: PLAYER_MAX_HP,
            player_max_ammo: PLAYER_MAX_AMMO,
            player_start_ammo: PLAYER_START_AMMO,
            ammo_regen_initial_delay: AMMO_REGEN_INITIAL_DELAY,
            ammo_regen_period: AMMO_REGEN_PERIOD,
            weapon_cooldown: WEAPON_COOLDOWN,
            bullet_offset: BULLET_OFFSET,
            bullet_speed: BULLET_SPEED,
            bullet_lifetime: BULLET_LIFETIME,
            player_move_force: PLAYER_MOVE_FORCE,
            boundary_force_factor: BOUNDARY_FORCE_FACTOR,
            player_mass: PLAYER_MASS,
            player_linear_damping: PLAYER_LINEAR_DAMPING,
            player_collider_radius: PLAYER_COLLIDER_RADIUS,
            player_start_y: PLAYER_START_Y,
            // Heartbeat
            heartbeat_interval: HEARTBEAT_INTERVAL,
            // Emitters
            asteroid_emitter_interval: ASTEROID_EMITTER_INTERVAL,
            asteroid_emitter_frequency: ASTEROID_EMITTER_FREQUENCY,
            asteroid_emitter_frequency_change: ASTEROID_EMITTER_FREQUENCY_CHANGE,
            explosions_set_interval: EXPLOSIONS_SET_INTERVAL,
            explosions_set_frequency_change: EXPLOSIONS_SET_FREQUENCY_CHANGE,
            explosions_set_lifetime: EXPLOSIONS_SET_LIFETIME,
            backfire_interval: BACKFIRE_INTERVAL,
            // Effects
            explosion_lifetime: EXPLOSION_LIFETIME,
            explosion_jitter: EXPLOSION_JITTER,
            backfire_lifetime: BACKFIRE_LIFETIME,
            backfire_drift_speed: BACKFIRE_DRIFT_SPEED,
            // HUD
            hud_font_size: HUD_FONT_SIZE,
        }
    }
}

impl GameConfig {
    /// Check the values whose misconfiguration would stall or break the
    /// simulation (zero heartbeat, negative intervals, out-of-range emitter
    /// probability).
    pub fn validate(&self) -> SpawnResult<()> {
        validate_positive("pixels_per_unit", self.pixels_per_unit)?;
        validate_positive("heartbeat_interval", self.heartbeat_interval)?;
        validate_positive("asteroid_hp_per_unit_scale", self.asteroid_hp_per_unit_scale)?;
        validate_non_negative("difficulty_step", self.difficulty_step)?;
        validate_non_negative("weapon_cooldown", self.weapon_cooldown)?;
        validate_non_negative("ammo_regen_period", self.ammo_regen_period)?;
        validate_non_negative("asteroid_emitter_interval", self.asteroid_emitter_interval)?;
        validate_non_negative("explosions_set_interval", self.explosions_set_interval)?;
        validate_non_negative("backfire_interval", self.backfire_interval)?;
        validate_frequency(self.asteroid_emitter_frequency)?;
        Ok(())
    }

    /// Parse a TOML document on top of the defaults and validate the result.
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        let loaded: GameConfig = toml::from_str(contents).map_err(|e| e.to_string())?;
        loaded.validate().map_err(|e| e.to_string())?;
        Ok(loaded)
    }
}

/// Load `path` and return the resulting config.
///
/// Missing keys retain their compiled defaults.  Parse and validation errors
/// are printed to stderr but do not abort the game.  A missing file is not an
/// error.
pub fn load_game_config(path: &str) -> GameConfig {
    match std::fs::read_to_string(path) {
        Ok(contents) => match GameConfig::from_toml_str(&contents) {
            Ok(loaded) => {
                println!("✓ Loaded game config from {path}");
                loaded
            }
            Err(e) => {
                eprintln!("⚠ Failed to load {path}: {e}; using defaults");
                GameConfig::default()
            }
        },
        Err(_) => {
            println!("ℹ No {path} found; using compiled defaults");
            GameConfig::default()
        }
    }
}
