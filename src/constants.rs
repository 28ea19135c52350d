//! Centralised gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::GameConfig::default`] mirrors every value below; override
//! any of them at runtime through `assets/game.toml`.
//!
//! Distances are in world units.  The camera maps one world unit to
//! [`PIXELS_PER_UNIT`] screen pixels.

// ── Prototype names ───────────────────────────────────────────────────────────

/// Prototype spawned by the asteroid field emitter.
pub const ASTEROID_PROTOTYPE: &str = "asteroid";

/// Prototype fired in pairs by the player's weapon.
pub const BULLET_PROTOTYPE: &str = "bullet";

/// Single short-lived explosion puff.
pub const EXPLOSION_PROTOTYPE: &str = "explosion";

/// Self-expiring emitter of explosions, attached to the player on death.
pub const EXPLOSIONS_SET_PROTOTYPE: &str = "explosions-set";

/// Engine exhaust particle emitted behind the player ship.
pub const BACKFIRE_PROTOTYPE: &str = "backfire";

// ── World / playfield ─────────────────────────────────────────────────────────

/// Screen pixels per world unit.  Applied as the inverse camera scale.
pub const PIXELS_PER_UNIT: f32 = 22.0;

/// Width of the band asteroids spawn across (centred on x = 0).
pub const PLAYFIELD_WIDTH: f32 = 40.0;

/// Distance above the origin at which fresh asteroids appear (plus their scale).
pub const ASTEROID_SPAWN_DISTANCE: f32 = 15.0;

/// Distance below the origin past which an asteroid is culled (plus its scale).
pub const ASTEROID_DESPAWN_DISTANCE: f32 = 15.0;

// ── Difficulty ────────────────────────────────────────────────────────────────

/// Difficulty added for every fresh (non-split) asteroid.
///
/// Raises both the scale spread and the speed spread of later asteroids.
/// At 0.025 the field is noticeably denser after ~100 asteroids.
pub const DIFFICULTY_STEP: f32 = 0.025;

// ── Asteroid rolls ────────────────────────────────────────────────────────────

/// Collider / presentation radius of an asteroid at scale 1.0.
pub const ASTEROID_BASE_RADIUS: f32 = 1.5;

/// Base spread of the scale roll: `scale = 1 + r · (spread + difficulty)`.
pub const ASTEROID_SCALE_SPREAD: f32 = 1.5;

/// Hit points granted per unit of scale (rounded).
pub const ASTEROID_HP_PER_UNIT_SCALE: f32 = 3.0;

/// Minimum speed factor: `speed = base + r · difficulty`.
pub const ASTEROID_SPEED_BASE: f32 = 1.35;

/// Forward (downward) travel speed per unit of speed factor.
pub const ASTEROID_FORWARD_SPEED: f32 = 2.5;

// ── Asteroid splitting / damage ───────────────────────────────────────────────

/// Asteroids smaller than this scale are destroyed instead of split.
pub const ASTEROID_MIN_SPLIT_SCALE: f32 = 1.65;

/// Sideways speed added (with opposite signs) to the two split children.
pub const SPLIT_LATERAL_SPEED: f32 = 2.0;

/// Damage a friendly projectile deals to an asteroid.
pub const PROJECTILE_DAMAGE: u32 = 2;

/// Damage an asteroid deals to itself when ramming the player.
pub const RAM_SELF_DAMAGE: u32 = 1;

/// Damage an asteroid deals to the player on contact.
pub const RAM_PLAYER_DAMAGE: u32 = 1;

/// Upper bound on `speed · scale` when computing the ram impulse.
pub const RAM_IMPULSE_CAP: f32 = 6.5;

/// Impulse applied to the player per unit of (capped) `speed · scale`.
pub const RAM_IMPULSE_SCALE: f32 = 50.0;

// ── Player ────────────────────────────────────────────────────────────────────

/// Shield points at the start of a session.
pub const PLAYER_MAX_HP: i32 = 5;

/// Ammo capacity.
pub const PLAYER_MAX_AMMO: u32 = 5;

/// Ammo at the start of a session (the weapon starts empty).
pub const PLAYER_START_AMMO: u32 = 0;

/// Delay before the very first ammo point regenerates.
pub const AMMO_REGEN_INITIAL_DELAY: f32 = 1.0;

/// Seconds per regenerated ammo point once the weapon has been used.
pub const AMMO_REGEN_PERIOD: f32 = 2.0;

/// Minimum seconds between two shots.
pub const WEAPON_COOLDOWN: f32 = 0.25;

/// Lateral offset of each bullet in a fired pair.
pub const BULLET_OFFSET: f32 = 1.5;

/// Bullet speed along the ship's forward axis.
pub const BULLET_SPEED: f32 = 40.0;

/// Seconds before an unused bullet expires.
pub const BULLET_LIFETIME: f32 = 1.0;

/// Steering force applied while a movement key is held.
pub const PLAYER_MOVE_FORCE: f32 = 750.0;

/// Multiplier on [`PLAYER_MOVE_FORCE`] for the view-boundary push-back.
pub const BOUNDARY_FORCE_FACTOR: f32 = 2.0;

/// Ship mass.  Together with the move force sets the ship's acceleration.
pub const PLAYER_MASS: f32 = 10.0;

/// Linear damping; high so the ship stops quickly when keys are released.
pub const PLAYER_LINEAR_DAMPING: f32 = 3.0;

/// Collider radius of the ship.
pub const PLAYER_COLLIDER_RADIUS: f32 = 1.0;

/// Vertical start position of the ship (near the bottom of the view).
pub const PLAYER_START_Y: f32 = -10.0;

// ── Heartbeat ─────────────────────────────────────────────────────────────────

/// Seconds between heartbeat ticks (ammo regeneration and score accrual).
pub const HEARTBEAT_INTERVAL: f32 = 2.0;

// ── Emitters ──────────────────────────────────────────────────────────────────

/// Asteroid field: seconds between evaluation passes.
pub const ASTEROID_EMITTER_INTERVAL: f32 = 0.25;

/// Asteroid field: initial per-pass spawn probability.
pub const ASTEROID_EMITTER_FREQUENCY: f32 = 0.08;

/// Asteroid field: per-pass probability drift (the field thickens over time).
pub const ASTEROID_EMITTER_FREQUENCY_CHANGE: f32 = 0.00085;

/// Death effect: seconds between explosion puffs.
pub const EXPLOSIONS_SET_INTERVAL: f32 = 0.05;

/// Death effect: per-pass probability drift (tapers the burst to nothing).
pub const EXPLOSIONS_SET_FREQUENCY_CHANGE: f32 = -0.35;

/// Death effect: seconds until the emitter destroys its own entity.
pub const EXPLOSIONS_SET_LIFETIME: f32 = 3.0;

/// Exhaust: seconds between backfire particles.
pub const BACKFIRE_INTERVAL: f32 = 0.025;

// ── Effects ───────────────────────────────────────────────────────────────────

/// Lifetime of a single explosion puff (also the animator duration).
pub const EXPLOSION_LIFETIME: f32 = 0.5;

/// Random positional jitter applied to explosion puffs of the death effect.
pub const EXPLOSION_JITTER: f32 = 1.5;

/// Lifetime of a backfire particle.
pub const BACKFIRE_LIFETIME: f32 = 0.5;

/// Backward drift speed of a backfire particle.
pub const BACKFIRE_DRIFT_SPEED: f32 = 15.0;

// ── HUD ───────────────────────────────────────────────────────────────────────

/// Font size of the shield / ammo / score read-out.
pub const HUD_FONT_SIZE: f32 = 18.0;
