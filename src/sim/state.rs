//! Core simulation types
//!
//! Bodies, round phases and the events physics steps hand back to the caller.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::Color;
use crate::consts::SPEED_BAR_MAX;

/// Phase of a battle round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Settings screen, no roster yet
    Configuring,
    /// Roster built, waiting for the player to start
    PreRound,
    /// 3-2-1 before the battle
    Countdown,
    /// Battle physics active
    Running,
    /// One or zero bodies left; only effects animate
    Ended,
}

impl RoundPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundPhase::Configuring => "configuring",
            RoundPhase::PreRound => "pre-round",
            RoundPhase::Countdown => "countdown",
            RoundPhase::Running => "running",
            RoundPhase::Ended => "ended",
        }
    }
}

/// A simulated circle (arena ball or battle token)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Stable identity, binds avatar/color outside the core
    pub id: String,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Elimination tiebreaker, fixed at spawn
    pub mass: f32,
    pub color: Color,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// |vel|, refreshed every frame before comparisons
    pub speed: f32,
}

impl Body {
    pub fn new(id: impl Into<String>, pos: Vec2, vel: Vec2, radius: f32, mass: f32, color: Color) -> Self {
        Self {
            id: id.into(),
            pos,
            vel,
            radius,
            mass,
            color,
            avatar_url: None,
            speed: vel.length(),
        }
    }

    #[inline]
    pub fn refresh_speed(&mut self) {
        self.speed = self.vel.length();
    }

    /// Fill fraction of the speed bar drawn above the body
    pub fn speed_ratio(&self) -> f32 {
        (self.speed / SPEED_BAR_MAX).min(1.0)
    }
}

/// Emitted by the arena (Mode A) step
#[derive(Debug, Clone, PartialEq)]
pub enum ArenaEvent {
    /// Ball hit the arena wall
    Bounce { count: u32, radius: f32 },
    /// Ball reached its maximum size; the round is over
    Filled { bounces: u32 },
}

/// Emitted by the battle (Mode B) step
#[derive(Debug, Clone, PartialEq)]
pub enum BattleEvent {
    /// Body bounced off a field wall
    WallBounce { id: String },
    /// Two bodies overlapped; `eliminated` loses
    Collision { survivor: String, eliminated: String },
    /// Body removed from the roster (explosion source)
    Eliminated { id: String, pos: Vec2, color: Color },
    /// Exactly one body left
    Victory { id: String },
    /// Last bodies eliminated each other
    Draw,
}
