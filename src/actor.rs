//! Actor life cycle: kinds, presentation state, and the generic per-frame
//! blocks every spawnable actor may carry.
//!
//! An actor goes through
//!
//! 1. **construction**: [`crate::prototype::Instance::materialize`] inserts
//!    the cloned blocks as components;
//! 2. **spawn initialization**: fresh spawns only; the registry runs the
//!    block hooks (stat rolls, randomizers) on the snapshot beforehand;
//! 3. **active ticking**: the per-kind systems in `TickSet::Update`;
//! 4. **termination**: a deferred `try_despawn` from TTL expiry, bounds
//!    checks, damage or an emitter destroying its owner.

use bevy::prelude::*;
use rand::Rng;

// ── Kinds ─────────────────────────────────────────────────────────────────────

/// Tag carried by every spawned actor.  Collision dispatch matches on pairs
/// of kinds instead of on per-type callbacks.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    /// Self-replicating asteroid.
    Asteroid,
    /// The player ship.
    Player,
    /// Friendly projectile.
    Projectile,
    /// Cosmetic effect (explosions, exhaust, emitters of effects).
    Effect,
}

// ── Presentation ──────────────────────────────────────────────────────────────

/// Scalar fields the renderer reads; the core writes them and never draws.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    /// Base colour in sRGB, 0–1 per channel.
    pub rgb: [f32; 3],
    /// Opacity, 0–1.  Faded by [`Animator`].
    pub alpha: f32,
    /// Outline radius at `Transform` scale 1.0.
    pub radius: f32,
    /// Physically non-blocking; still reported by collision detection.
    pub ethereal: bool,
}

impl Presentation {
    pub fn new(rgb: [f32; 3], radius: f32) -> Self {
        Self {
            rgb,
            alpha: 1.0,
            radius,
            ethereal: false,
        }
    }

    pub fn ethereal(mut self) -> Self {
        self.ethereal = true;
        self
    }

    #[inline]
    pub fn color(&self) -> Color {
        Color::srgba(self.rgb[0], self.rgb[1], self.rgb[2], self.alpha)
    }

    /// Render as wreckage: black and non-blocking.
    pub fn mark_destroyed(&mut self) {
        self.rgb = [0.0, 0.0, 0.0];
        self.ethereal = true;
    }
}

// ── Time to live ──────────────────────────────────────────────────────────────

/// Seconds until the actor is despawned.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct TimeToLive {
    pub remaining: f32,
}

impl TimeToLive {
    pub fn new(secs: f32) -> Self {
        Self { remaining: secs }
    }
}

/// Decrement every [`TimeToLive`] and despawn the expired actors.
pub fn ttl_system(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut TimeToLive)>,
) {
    let dt = time.delta_secs();
    for (entity, mut ttl) in query.iter_mut() {
        ttl.remaining -= dt;
        if ttl.remaining <= 0.0 {
            commands.entity(entity).try_despawn();
        }
    }
}

// ── Spawn randomizer ──────────────────────────────────────────────────────────

/// Fresh-spawn hook: jitters the position and picks a colour between two
/// bounds.  Split or transplanted instances skip it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRandomizer {
    /// Maximum offset per axis, in world units.
    pub position_jitter: f32,
    /// Inclusive colour range (sRGB), `None` keeps the prototype colour.
    pub color_range: Option<([f32; 3], [f32; 3])>,
}

impl SpawnRandomizer {
    pub fn jitter(position_jitter: f32) -> Self {
        Self {
            position_jitter,
            color_range: None,
        }
    }

    pub fn with_color_range(mut self, min: [f32; 3], max: [f32; 3]) -> Self {
        self.color_range = Some((min, max));
        self
    }

    pub fn offset<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        if self.position_jitter <= 0.0 {
            return Vec2::ZERO;
        }
        let j = self.position_jitter;
        Vec2::new(rng.gen_range(-j..=j), rng.gen_range(-j..=j))
    }

    pub fn color<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<[f32; 3]> {
        let (min, max) = self.color_range?;
        let t: f32 = rng.gen();
        Some([
            min[0] + (max[0] - min[0]) * t,
            min[1] + (max[1] - min[1]) * t,
            min[2] + (max[2] - min[2]) * t,
        ])
    }
}

// ── Animator ──────────────────────────────────────────────────────────────────

/// Linear scale / alpha interpolation plus a constant drift, over `duration`.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Animator {
    pub duration: f32,
    pub elapsed: f32,
    pub scale: (f32, f32),
    pub alpha: (f32, f32),
    /// World-space drift in units/s (exhaust particles trail backwards).
    pub drift: Vec2,
}

impl Animator {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
            scale: (1.0, 1.0),
            alpha: (1.0, 1.0),
            drift: Vec2::ZERO,
        }
    }

    pub fn scale(mut self, from: f32, to: f32) -> Self {
        self.scale = (from, to);
        self
    }

    pub fn fade(mut self, from: f32, to: f32) -> Self {
        self.alpha = (from, to);
        self
    }

    pub fn drift(mut self, drift: Vec2) -> Self {
        self.drift = drift;
        self
    }

    /// Animation progress, clamped into `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn current_scale(&self) -> f32 {
        self.scale.0 + (self.scale.1 - self.scale.0) * self.progress()
    }

    pub fn current_alpha(&self) -> f32 {
        self.alpha.0 + (self.alpha.1 - self.alpha.0) * self.progress()
    }
}

/// Advance every [`Animator`]: drift the transform, interpolate scale and alpha.
pub fn animator_system(
    time: Res<Time>,
    mut query: Query<(&mut Animator, &mut Transform, Option<&mut Presentation>)>,
) {
    let dt = time.delta_secs();
    for (mut animator, mut transform, presentation) in query.iter_mut() {
        animator.elapsed += dt;
        transform.translation += (animator.drift * dt).extend(0.0);
        transform.scale = Vec3::splat(animator.current_scale());
        if let Some(mut presentation) = presentation {
            presentation.alpha = animator.current_alpha();
        }
    }
}
