//! Visual particle effects
//!
//! Explosions burst from eliminated bodies; confetti rains on a victory.
//! Neither feeds back into physics.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::rng::{CONFETTI_PALETTE, Color, pick_color};
use crate::consts::*;
use crate::polar_to_cartesian;

/// A single explosion spark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames left
    pub life: u32,
    pub max_life: u32,
    pub color: Color,
}

impl Particle {
    /// Fade ratio for rendering (1 = fresh, 0 = gone)
    pub fn alpha(&self) -> f32 {
        self.life as f32 / self.max_life as f32
    }
}

/// Sparks spawned by one elimination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub origin: Vec2,
    pub particles: Vec<Particle>,
}

impl Explosion {
    /// Burst `count` sparks at equal angular spacing around `origin`
    pub fn spawn<R: Rng>(rng: &mut R, origin: Vec2, color: Color, count: usize) -> Self {
        let particles = (0..count)
            .map(|i| {
                let angle = i as f32 / count as f32 * TAU;
                let speed = rng.random_range(EXPLOSION_MIN_SPEED..EXPLOSION_MAX_SPEED);
                Particle {
                    pos: origin,
                    vel: polar_to_cartesian(speed, angle),
                    life: EXPLOSION_LIFE,
                    max_life: EXPLOSION_LIFE,
                    color,
                }
            })
            .collect();
        Self { origin, particles }
    }

    /// Advance one frame, pruning dead sparks
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.vel *= EXPLOSION_DAMPING;
            p.life = p.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);
    }

    pub fn is_finished(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Step every explosion and drop the empty ones
pub fn update_explosions(explosions: &mut Vec<Explosion>) {
    for explosion in explosions.iter_mut() {
        explosion.update();
    }
    explosions.retain(|e| !e.is_finished());
}

/// A falling confetti flake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfettiFlake {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Degrees
    pub rotation: f32,
    /// Degrees per frame
    pub rotation_speed: f32,
    pub size: f32,
    pub color: Color,
    pub life: u32,
    pub max_life: u32,
}

impl ConfettiFlake {
    pub fn alpha(&self) -> f32 {
        self.life as f32 / self.max_life as f32
    }
}

/// Victory confetti; stays around (possibly empty) until the round resets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Confetti {
    pub flakes: Vec<ConfettiFlake>,
}

impl Confetti {
    /// Drop a fresh batch of `count` flakes across the top of a field
    pub fn burst<R: Rng>(&mut self, rng: &mut R, count: usize, field_width: f32) {
        self.flakes = (0..count)
            .map(|_| ConfettiFlake {
                pos: Vec2::new(rng.random_range(0.0..field_width), CONFETTI_SPAWN_Y),
                vel: Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(2.0..5.0)),
                rotation: rng.random_range(0.0..360.0),
                rotation_speed: rng.random_range(-5.0..5.0),
                size: rng.random_range(4.0..12.0),
                color: pick_color(rng, &CONFETTI_PALETTE),
                life: CONFETTI_LIFE,
                max_life: CONFETTI_LIFE,
            })
            .collect();
    }

    /// Advance one frame; flakes die on expiry or below `floor_y`
    pub fn update(&mut self, floor_y: f32) {
        for flake in &mut self.flakes {
            flake.pos += flake.vel;
            flake.vel.y += CONFETTI_GRAVITY;
            flake.rotation += flake.rotation_speed;
            flake.life = flake.life.saturating_sub(1);
        }
        self.flakes.retain(|f| f.life > 0 && f.pos.y < floor_y);
    }

    pub fn is_empty(&self) -> bool {
        self.flakes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::seeded;

    #[test]
    fn test_explosion_spacing() {
        let mut rng = seeded(1);
        let e = Explosion::spawn(&mut rng, Vec2::new(50.0, 50.0), 0xff0000, 8);
        assert_eq!(e.particles.len(), 8);
        // First spark heads along +x, the fifth along -x
        assert!(e.particles[0].vel.y.abs() < 1e-4 && e.particles[0].vel.x > 0.0);
        assert!(e.particles[4].vel.y.abs() < 1e-4 && e.particles[4].vel.x < 0.0);
        for p in &e.particles {
            let s = p.vel.length();
            assert!(s > EXPLOSION_MIN_SPEED - 1e-4 && s < EXPLOSION_MAX_SPEED + 1e-4);
        }
    }

    #[test]
    fn test_explosion_lifecycle() {
        let mut rng = seeded(2);
        let mut explosions = vec![Explosion::spawn(&mut rng, Vec2::ZERO, 0xffffff, 8)];

        for step in 1..EXPLOSION_LIFE {
            update_explosions(&mut explosions);
            assert_eq!(explosions.len(), 1, "pruned early at step {step}");
            assert_eq!(explosions[0].particles.len(), 8);
        }
        update_explosions(&mut explosions);
        assert!(explosions.is_empty());

        // Nothing comes back
        update_explosions(&mut explosions);
        assert!(explosions.is_empty());
    }

    #[test]
    fn test_explosion_damping_slows_sparks() {
        let mut rng = seeded(3);
        let mut e = Explosion::spawn(&mut rng, Vec2::ZERO, 0, 8);
        let before = e.particles[0].vel.length();
        e.update();
        assert!(e.particles[0].vel.length() < before);
        assert!((e.particles[0].alpha() - 24.0 / 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_confetti_falls_and_expires() {
        let mut rng = seeded(4);
        let mut confetti = Confetti::default();
        confetti.burst(&mut rng, CONFETTI_COUNT, FIELD_WIDTH);
        assert_eq!(confetti.flakes.len(), CONFETTI_COUNT);

        let vy = confetti.flakes[0].vel.y;
        confetti.update(FIELD_HEIGHT + CONFETTI_FLOOR_MARGIN);
        assert!((confetti.flakes[0].vel.y - (vy + CONFETTI_GRAVITY)).abs() < 1e-5);

        for _ in 0..CONFETTI_LIFE {
            confetti.update(FIELD_HEIGHT + CONFETTI_FLOOR_MARGIN);
        }
        assert!(confetti.is_empty());
    }

    #[test]
    fn test_confetti_pruned_below_floor() {
        let mut confetti = Confetti {
            flakes: vec![ConfettiFlake {
                pos: Vec2::new(10.0, 99.0),
                vel: Vec2::new(0.0, 5.0),
                rotation: 0.0,
                rotation_speed: 1.0,
                size: 4.0,
                color: 0,
                life: CONFETTI_LIFE,
                max_life: CONFETTI_LIFE,
            }],
        };
        confetti.update(100.0);
        assert!(confetti.is_empty());
    }
}
