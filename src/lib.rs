//! Bounce Battle - frame-stepped ball simulations
//!
//! Core modules:
//! - `sim`: Simulation engine (arena bounce, elimination battle, particles, rounds)
//! - `settings`: Battle configuration and validation
//! - `participants`: Participant roster source with built-in fallback

pub mod participants;
pub mod settings;
pub mod sim;

pub use participants::{Participant, fallback_participants, select_participants};
pub use settings::{BattleConfig, ConfigError, Difficulty};

use glam::Vec2;

/// Simulation constants
///
/// All velocities are in pixels per frame; the simulation is frame-relative,
/// never wall-clock-relative.
pub mod consts {
    use glam::Vec2;

    // === Mode A: growing ball arena ===
    /// Arena center in canvas coordinates
    pub const ARENA_CENTER: Vec2 = Vec2::new(400.0, 300.0);
    pub const ARENA_RADIUS: f32 = 250.0;
    /// Gap kept between the fully grown ball and the arena wall
    pub const ARENA_MARGIN: f32 = 10.0;
    pub const ARENA_START_RADIUS: f32 = 20.0;
    /// Per-axis launch speed (sign is random)
    pub const ARENA_START_SPEED: f32 = 5.0;
    /// Velocity scale applied on every wall hit
    pub const ARENA_GROWTH_FACTOR: f32 = 1.015;
    pub const ARENA_RADIUS_STEP: f32 = 1.0;
    /// Random kick added to each velocity component on a wall hit (±)
    pub const ARENA_PERTURBATION: f32 = 1.0;

    // === Mode B: elimination battle ===
    /// Play field (portrait 9:16, half of 1080x1920)
    pub const FIELD_WIDTH: f32 = 540.0;
    pub const FIELD_HEIGHT: f32 = 960.0;
    pub const MIN_BODY_RADIUS: f32 = 15.0;
    pub const MAX_BODY_RADIUS: f32 = 35.0;
    /// Population at which bodies shrink to `MIN_BODY_RADIUS`
    pub const MAX_POPULATION: usize = 20;
    pub const MIN_POPULATION: usize = 2;
    /// Downward acceleration when gravity is enabled
    pub const BATTLE_GRAVITY: f32 = 0.2;
    /// Speeds closer than this fall back to the mass tiebreak
    pub const SPEED_TIE_EPSILON: f32 = 0.1;
    pub const MASS_MIN: f32 = 0.75;
    pub const MASS_MAX: f32 = 1.25;
    /// Speed at which the speed bar is full
    pub const SPEED_BAR_MAX: f32 = 10.0;
    /// Countdown length in seconds
    pub const COUNTDOWN_SECS: u32 = 3;

    // === Particles ===
    pub const EXPLOSION_LIFE: u32 = 25;
    pub const EXPLOSION_DAMPING: f32 = 0.98;
    pub const EXPLOSION_MIN_SPEED: f32 = 2.0;
    pub const EXPLOSION_MAX_SPEED: f32 = 6.0;
    pub const CONFETTI_COUNT: usize = 100;
    pub const CONFETTI_LIFE: u32 = 300;
    pub const CONFETTI_GRAVITY: f32 = 0.1;
    /// Flakes below `FIELD_HEIGHT + CONFETTI_FLOOR_MARGIN` are pruned
    pub const CONFETTI_FLOOR_MARGIN: f32 = 50.0;
    pub const CONFETTI_SPAWN_Y: f32 = -20.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}
