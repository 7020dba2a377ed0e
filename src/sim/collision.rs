//! Collision detection and response
//!
//! Circle-in-circle contact for the arena, axis-aligned wall bounces for the
//! battle field, circle overlap tests and the elimination policy.

use glam::Vec2;

use super::state::Body;
use crate::consts::*;
use crate::{cartesian_to_polar, polar_to_cartesian};

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point on the boundary (if hit)
    pub point: Vec2,
    /// Unit normal at the contact, pointing out of the arena
    pub normal: Vec2,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
        }
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Check a ball against the inside of a circular arena wall
///
/// Contact when `distance + radius >= arena_radius`. A ball centered exactly
/// on the arena center has no defined normal and never reports a hit.
pub fn arena_boundary_contact(
    ball_pos: Vec2,
    ball_radius: f32,
    center: Vec2,
    arena_radius: f32,
) -> CollisionResult {
    let (dist, theta) = cartesian_to_polar(ball_pos - center);

    if dist == 0.0 || dist + ball_radius < arena_radius {
        return CollisionResult::miss();
    }

    let normal = (ball_pos - center) / dist;
    CollisionResult {
        hit: true,
        point: center + polar_to_cartesian(arena_radius, theta),
        normal,
    }
}

/// Which axes of the field a body bounced on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHit {
    pub x: bool,
    pub y: bool,
}

impl WallHit {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Bounce a body off the walls of a `width` x `height` field
///
/// Each axis is handled independently: if an edge crossed a wall the velocity
/// component is turned back into the field and the position clamped inside.
pub fn contain_in_field(body: &mut Body, width: f32, height: f32) -> WallHit {
    let r = body.radius;
    let mut hit = WallHit::default();

    if body.pos.x - r < 0.0 {
        body.vel.x = body.vel.x.abs();
        hit.x = true;
    } else if body.pos.x + r > width {
        body.vel.x = -body.vel.x.abs();
        hit.x = true;
    }
    if body.pos.y - r < 0.0 {
        body.vel.y = body.vel.y.abs();
        hit.y = true;
    } else if body.pos.y + r > height {
        body.vel.y = -body.vel.y.abs();
        hit.y = true;
    }

    if hit.any() {
        clamp_to_field(body, width, height);
    }
    hit
}

/// Clamp a body's position so its bounding box lies inside the field
pub fn clamp_to_field(body: &mut Body, width: f32, height: f32) {
    let r = body.radius;
    body.pos.x = body.pos.x.max(r).min(width - r);
    body.pos.y = body.pos.y.max(r).min(height - r);
}

/// Strict circle overlap (touching circles do not collide)
#[inline]
pub fn circles_overlap(a: &Body, b: &Body) -> bool {
    a.pos.distance(b.pos) < a.radius + b.radius
}

/// Which side of a colliding pair is eliminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loser {
    First,
    Second,
}

/// Elimination policy: the slower body loses; when speeds are within
/// `SPEED_TIE_EPSILON` the lighter body loses. Exact ties go against `a`.
pub fn choose_loser(a: &Body, b: &Body) -> Loser {
    if (a.speed - b.speed).abs() < SPEED_TIE_EPSILON {
        if a.mass <= b.mass { Loser::First } else { Loser::Second }
    } else if a.speed <= b.speed {
        Loser::First
    } else {
        Loser::Second
    }
}

/// Shared body radius for a live population
///
/// Shrinks toward `MIN_BODY_RADIUS` as the population approaches
/// `MAX_POPULATION`, grows toward `MAX_BODY_RADIUS` as it thins.
pub fn radius_for_population(population: usize) -> f32 {
    let ratio = 1.0 - population as f32 / MAX_POPULATION as f32;
    let radius = MIN_BODY_RADIUS + (MAX_BODY_RADIUS - MIN_BODY_RADIUS) * ratio;
    radius.clamp(MIN_BODY_RADIUS, MAX_BODY_RADIUS)
}
