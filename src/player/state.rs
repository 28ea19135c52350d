//! Player ECS components and resources.
//!
//! The ship entity carries only the [`Player`] marker plus its body and
//! presentation blocks; every gameplay counter lives in the [`PlayerStatus`]
//! resource so the HUD and the heartbeat never need to query the entity.

use crate::config::GameConfig;
use bevy::prelude::*;

// ── Components ────────────────────────────────────────────────────────────────

/// Marker component for the player ship.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player;

// ── Status ────────────────────────────────────────────────────────────────────

/// Result of [`PlayerStatus::damage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerDamage {
    /// Already dead; nothing changed.
    Ignored,
    Wounded,
    /// This hit took `hp` to zero or below.
    Killed,
}

/// Health, ammunition, score and weapon timers of the single player.
///
/// `is_dead()` is derived from `hp`; once true it stays true, and every
/// mutator except [`PlayerStatus::cool_down`] becomes a no-op.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PlayerStatus {
    pub hp: i32,
    pub max_hp: i32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub score: u64,
    /// Seconds before the weapon may fire again.
    pub weapon_cooldown: f32,
    /// Seconds before the next ammo regeneration.
    pub ammo_regen_timer: f32,
}

impl PlayerStatus {
    /// Session start values: full shield, empty magazine, zero score.
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            hp: config.player_max_hp,
            max_hp: config.player_max_hp,
            ammo: config.player_start_ammo.min(config.player_max_ammo),
            max_ammo: config.player_max_ammo,
            score: 0,
            weapon_cooldown: 0.0,
            ammo_regen_timer: config.ammo_regen_initial_delay,
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub fn damage(&mut self, amount: u32) -> PlayerDamage {
        if self.is_dead() {
            return PlayerDamage::Ignored;
        }
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.hp = self.hp.saturating_sub(amount);
        if self.is_dead() {
            PlayerDamage::Killed
        } else {
            PlayerDamage::Wounded
        }
    }

    /// Count the weapon cooldown down by `dt`, never below zero.
    pub fn cool_down(&mut self, dt: f32) {
        self.weapon_cooldown = (self.weapon_cooldown - dt).max(0.0);
    }

    /// Spend one round if the weapon is ready.
    ///
    /// A successful shot restarts the weapon cooldown and pushes the next
    /// ammo regeneration a full period away.
    pub fn try_fire(&mut self, cooldown: f32, regen_period: f32) -> bool {
        if self.is_dead() || self.weapon_cooldown > 0.0 || self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        self.weapon_cooldown = cooldown;
        self.ammo_regen_timer = regen_period;
        true
    }

    /// One heartbeat: regenerate a round when due, then score a point.
    pub fn heartbeat(&mut self, interval: f32, regen_period: f32) {
        if self.is_dead() {
            return;
        }
        if self.ammo < self.max_ammo {
            self.ammo_regen_timer -= interval;
            if self.ammo_regen_timer <= 0.0 {
                self.ammo += 1;
                self.ammo_regen_timer = regen_period;
            }
        }
        self.score += 1;
    }
}

impl Default for PlayerStatus {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

// ── Intent ────────────────────────────────────────────────────────────────────

/// Per-frame control request, written by the input layer and consumed by
/// the movement and weapon systems.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerIntent {
    /// Desired direction, each axis in `[-1, 1]`.
    pub movement: Vec2,
    /// Fire held this frame.
    pub fire: bool,
}

// ── View bounds ───────────────────────────────────────────────────────────────

/// Visible world rectangle, refreshed from the camera every frame.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Default for ViewBounds {
    fn default() -> Self {
        Self {
            left: -27.0,
            right: 27.0,
            bottom: -15.0,
            top: 15.0,
        }
    }
}

impl ViewBounds {
    /// Per-axis overshoot of `point` outside the rectangle (zero inside).
    pub fn overshoot(&self, point: Vec2) -> Vec2 {
        let x = if point.x < self.left {
            point.x - self.left
        } else if point.x > self.right {
            point.x - self.right
        } else {
            0.0
        };
        let y = if point.y < self.bottom {
            point.y - self.bottom
        } else if point.y > self.top {
            point.y - self.top
        } else {
            0.0
        };
        Vec2::new(x, y)
    }
}
