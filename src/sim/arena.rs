//! Growing ball arena
//!
//! One ball bounces inside a circle. Every wall hit reflects it, kicks it
//! slightly off course, speeds it up and grows it by one unit until it fills
//! the arena.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{arena_boundary_contact, reflect_velocity};
use super::rng::{ARENA_PALETTE, pick_color, signed_unit};
use super::state::{ArenaEvent, Body};
use crate::consts::*;

/// Circular arena holding a single ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BounceArena {
    pub center: Vec2,
    pub radius: f32,
    pub ball: Body,
    /// Largest radius the ball may reach (arena radius minus margin)
    pub max_ball_radius: f32,
    /// Wall hits so far
    pub bounces: u32,
    /// Set once the ball is fully grown; stepping is a no-op afterwards
    pub ended: bool,
}

impl BounceArena {
    /// Start a round with the default arena and a random launch direction/color
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Self::with_geometry(
            rng,
            ARENA_CENTER,
            ARENA_RADIUS,
            ARENA_MARGIN,
            ARENA_START_RADIUS,
        )
    }

    /// Start a round in a custom arena
    pub fn with_geometry<R: Rng>(
        rng: &mut R,
        center: Vec2,
        radius: f32,
        margin: f32,
        start_radius: f32,
    ) -> Self {
        let sx = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let sy = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let vel = Vec2::new(sx, sy) * ARENA_START_SPEED;
        let color = pick_color(rng, &ARENA_PALETTE);

        Self {
            center,
            radius,
            ball: Body::new("ball", center, vel, start_radius, 1.0, color),
            max_ball_radius: radius - margin,
            bounces: 0,
            ended: false,
        }
    }

    /// Throw the current ball away and start over
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        let margin = self.radius - self.max_ball_radius;
        *self = Self::with_geometry(rng, self.center, self.radius, margin, ARENA_START_RADIUS);
        log::info!("Arena reset");
    }

    /// Advance one frame
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> Vec<ArenaEvent> {
        let mut events = Vec::new();
        if self.ended {
            return events;
        }

        let ball = &mut self.ball;
        ball.pos += ball.vel;

        let contact = arena_boundary_contact(ball.pos, ball.radius, self.center, self.radius);
        if contact.hit {
            let n = contact.normal;

            ball.vel = reflect_velocity(ball.vel, n);
            ball.vel.x += signed_unit(rng) * ARENA_PERTURBATION;
            ball.vel.y += signed_unit(rng) * ARENA_PERTURBATION;
            ball.vel *= ARENA_GROWTH_FACTOR;

            if ball.radius < self.max_ball_radius {
                ball.radius = (ball.radius + ARENA_RADIUS_STEP).min(self.max_ball_radius);
                ball.color = pick_color(rng, &ARENA_PALETTE);
            }

            // Sit exactly on the ring so the ball can never tunnel out
            ball.pos = contact.point - n * ball.radius;

            self.bounces += 1;
            log::debug!("Arena bounce {} (radius {})", self.bounces, ball.radius);
            events.push(ArenaEvent::Bounce {
                count: self.bounces,
                radius: ball.radius,
            });
        }
        ball.refresh_speed();

        if ball.radius >= self.max_ball_radius {
            self.ended = true;
            log::info!("Arena filled after {} bounces", self.bounces);
            events.push(ArenaEvent::Filled {
                bounces: self.bounces,
            });
        }

        events
    }

    /// Distance from the ball's far edge to the arena wall (negative = outside)
    pub fn clearance(&self) -> f32 {
        self.radius - (self.ball.pos.distance(self.center) + self.ball.radius)
    }
}
