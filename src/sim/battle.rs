//! Elimination battle physics
//!
//! Every live body bounces around a rectangular field. Overlapping pairs
//! resolve to exactly one elimination each; survivors then resize to the
//! radius for the new population.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::collision::{
    Loser, choose_loser, circles_overlap, clamp_to_field, contain_in_field, radius_for_population,
};
use super::rng::{BODY_PALETTE, indexed_color};
use super::state::{BattleEvent, Body};
use crate::consts::*;
use crate::participants::Participant;
use crate::polar_to_cartesian;
use crate::settings::BattleConfig;

/// Spawn re-draws allowed before an overlapping position is accepted
const SPAWN_ATTEMPTS: usize = 32;

/// Rectangular play field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BattleField {
    pub width: f32,
    pub height: f32,
    pub gravity_enabled: bool,
}

impl Default for BattleField {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            gravity_enabled: false,
        }
    }
}

impl BattleField {
    pub fn from_config(config: &BattleConfig) -> Self {
        Self {
            gravity_enabled: config.gravity_enabled,
            ..Default::default()
        }
    }

    /// True if the body's bounding box lies inside the field (± `eps`)
    pub fn contains(&self, body: &Body, eps: f32) -> bool {
        body.pos.x - body.radius >= -eps
            && body.pos.x + body.radius <= self.width + eps
            && body.pos.y - body.radius >= -eps
            && body.pos.y + body.radius <= self.height + eps
    }
}

/// Live bodies of a battle, in spawn order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    pub bodies: Vec<Body>,
}

impl Roster {
    /// Build a roster from participants, one body each
    ///
    /// Launch speeds come from the difficulty preset and are scaled by the
    /// speed multiplier; they are never re-applied mid-round.
    pub fn spawn<R: Rng>(
        rng: &mut R,
        participants: &[Participant],
        config: &BattleConfig,
        field: &BattleField,
    ) -> Self {
        let radius = radius_for_population(participants.len());
        let base = config.difficulty.base_speed();
        let variation = config.difficulty.speed_variation();

        let mut bodies: Vec<Body> = Vec::with_capacity(participants.len());
        for (index, participant) in participants.iter().enumerate() {
            let pos = spawn_position(rng, &bodies, radius, field);

            let heading = rng.random_range(0.0..TAU);
            let speed = (base + rng.random_range(-variation..variation)).max(1.0)
                * config.speed_multiplier;
            let vel = polar_to_cartesian(speed, heading);
            let mass = rng.random_range(MASS_MIN..MASS_MAX);

            let mut body = Body::new(
                participant.id.clone(),
                pos,
                vel,
                radius,
                mass,
                indexed_color(&BODY_PALETTE, index),
            );
            body.avatar_url = participant.avatar_url.clone();
            bodies.push(body);
        }

        Self { bodies }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    /// Give every body the radius for the current population, keeping them in bounds
    pub fn resize_for_population(&mut self, field: &BattleField) {
        let radius = radius_for_population(self.bodies.len());
        for body in &mut self.bodies {
            body.radius = radius;
            clamp_to_field(body, field.width, field.height);
        }
    }
}

/// Uniform position inside the field, re-drawn a few times to avoid overlap
fn spawn_position<R: Rng>(rng: &mut R, placed: &[Body], radius: f32, field: &BattleField) -> Vec2 {
    let mut pos = Vec2::ZERO;
    for _ in 0..SPAWN_ATTEMPTS {
        pos = Vec2::new(
            rng.random_range(radius..field.width - radius),
            rng.random_range(radius..field.height - radius),
        );
        if placed
            .iter()
            .all(|b| b.pos.distance(pos) >= b.radius + radius)
        {
            break;
        }
    }
    pos
}

/// Advance the battle by one frame
///
/// Integration and wall bounces run for the whole roster before any pair is
/// tested, so every collision sees the same frame.
pub fn step(roster: &mut Roster, field: &BattleField) -> Vec<BattleEvent> {
    let mut events = Vec::new();

    integrate(roster, field, &mut events);
    let eliminated = resolve_collisions(roster, field, &mut events);

    if eliminated > 0 {
        match roster.bodies.as_slice() {
            [winner] => events.push(BattleEvent::Victory {
                id: winner.id.clone(),
            }),
            [] => events.push(BattleEvent::Draw),
            _ => {}
        }
    }

    events
}

/// Move every body, bounce it off the walls and refresh its speed
pub fn integrate(roster: &mut Roster, field: &BattleField, events: &mut Vec<BattleEvent>) {
    for body in &mut roster.bodies {
        if field.gravity_enabled {
            body.vel.y += BATTLE_GRAVITY;
        }
        body.pos += body.vel;

        if contain_in_field(body, field.width, field.height).any() {
            events.push(BattleEvent::WallBounce {
                id: body.id.clone(),
            });
        }
        body.refresh_speed();
    }
}

/// Find overlapping pairs, mark one loser per pair and remove the losers
///
/// A body marked this frame takes no further part in pair tests, so it can
/// only be eliminated once. Returns the number of bodies removed.
pub fn resolve_collisions(
    roster: &mut Roster,
    field: &BattleField,
    events: &mut Vec<BattleEvent>,
) -> usize {
    let bodies = &roster.bodies;
    let n = bodies.len();
    let mut removed = vec![false; n];

    for i in 0..n {
        for j in (i + 1)..n {
            if removed[i] {
                break;
            }
            if removed[j] || !circles_overlap(&bodies[i], &bodies[j]) {
                continue;
            }

            let (loser, survivor) = match choose_loser(&bodies[i], &bodies[j]) {
                Loser::First => (i, j),
                Loser::Second => (j, i),
            };
            removed[loser] = true;

            let lost = &bodies[loser];
            log::debug!(
                "{} eliminated by {} (speed {:.2} vs {:.2})",
                lost.id,
                bodies[survivor].id,
                lost.speed,
                bodies[survivor].speed
            );
            events.push(BattleEvent::Collision {
                survivor: bodies[survivor].id.clone(),
                eliminated: lost.id.clone(),
            });
            events.push(BattleEvent::Eliminated {
                id: lost.id.clone(),
                pos: lost.pos,
                color: lost.color,
            });
        }
    }

    let marked: Vec<usize> = (0..n).filter(|&i| removed[i]).collect();
    if marked.is_empty() {
        return 0;
    }

    for &index in marked.iter().rev() {
        roster.bodies.remove(index);
    }
    roster.resize_for_population(field);

    marked.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participants::fallback_participants;
    use crate::sim::rng::seeded;

    fn body(id: &str, pos: Vec2, vel: Vec2, mass: f32) -> Body {
        Body::new(id, pos, vel, 20.0, mass, 0xffffff)
    }

    fn roster(bodies: Vec<Body>) -> Roster {
        Roster { bodies }
    }

    #[test]
    fn test_spawn_roster() {
        let mut rng = seeded(11);
        let config = BattleConfig::default();
        let field = BattleField::from_config(&config);
        let people = &fallback_participants()[..8];

        let r = Roster::spawn(&mut rng, people, &config, &field);
        assert_eq!(r.len(), 8);
        let radius = radius_for_population(8);
        for (b, p) in r.bodies.iter().zip(people) {
            assert_eq!(b.id, p.id);
            assert_eq!(b.radius, radius);
            assert!((MASS_MIN..MASS_MAX).contains(&b.mass));
            assert!(b.speed >= 1.0 - 1e-4);
            assert!(field.contains(b, 1e-3));
        }
        assert_eq!(r.bodies[0].color, BODY_PALETTE[0]);
    }

    #[test]
    fn test_speed_multiplier_scales_launch() {
        let field = BattleField::default();
        let people = &fallback_participants()[..4];
        let slow = BattleConfig::default();
        let fast = BattleConfig {
            speed_multiplier: 2.0,
            ..Default::default()
        };
        let a = Roster::spawn(&mut seeded(9), people, &slow, &field);
        let b = Roster::spawn(&mut seeded(9), people, &fast, &field);
        for (x, y) in a.bodies.iter().zip(&b.bodies) {
            assert!((y.speed - 2.0 * x.speed).abs() < 1e-3);
        }
    }

    #[test]
    fn test_gravity_pulls_down() {
        let field = BattleField {
            gravity_enabled: true,
            ..Default::default()
        };
        let mut r = roster(vec![body("a", Vec2::new(200.0, 200.0), Vec2::ZERO, 1.0)]);
        step(&mut r, &field);
        assert!((r.bodies[0].vel.y - BATTLE_GRAVITY).abs() < 1e-6);
        assert!((r.bodies[0].pos.y - (200.0 + BATTLE_GRAVITY)).abs() < 1e-4);
    }

    #[test]
    fn test_wall_bounce_event() {
        let field = BattleField::default();
        let mut r = roster(vec![body("a", Vec2::new(25.0, 300.0), Vec2::new(-10.0, 0.0), 1.0)]);
        let events = step(&mut r, &field);
        assert_eq!(events, vec![BattleEvent::WallBounce { id: "a".into() }]);
        assert_eq!(r.bodies[0].pos.x, 20.0);
        assert_eq!(r.bodies[0].vel.x, 10.0);
    }

    #[test]
    fn test_slower_body_eliminated() {
        let field = BattleField::default();
        let mut r = roster(vec![
            body("fast", Vec2::new(200.0, 300.0), Vec2::new(5.0, 0.0), 0.8),
            body("slow", Vec2::new(230.0, 300.0), Vec2::new(3.0, 0.0), 1.2),
            body("far", Vec2::new(400.0, 800.0), Vec2::new(0.0, 1.0), 1.0),
        ]);
        let events = step(&mut r, &field);

        assert_eq!(r.len(), 2);
        assert!(r.get("slow").is_none());
        assert!(events.contains(&BattleEvent::Collision {
            survivor: "fast".into(),
            eliminated: "slow".into(),
        }));
        let radius = radius_for_population(2);
        assert!(r.bodies.iter().all(|b| b.radius == radius));
    }

    #[test]
    fn test_equal_speed_lighter_eliminated() {
        let field = BattleField::default();
        let mut r = roster(vec![
            body("heavy", Vec2::new(200.0, 300.0), Vec2::new(4.0, 0.0), 1.1),
            body("light", Vec2::new(230.0, 300.0), Vec2::new(0.0, 4.0), 0.8),
        ]);
        let events = step(&mut r, &field);

        assert_eq!(r.len(), 1);
        assert_eq!(r.bodies[0].id, "heavy");
        assert_eq!(
            events.last(),
            Some(&BattleEvent::Victory { id: "heavy".into() })
        );
    }

    #[test]
    fn test_body_eliminated_at_most_once() {
        // A overlaps both B and C and is the slowest of the three
        let field = BattleField::default();
        let mut r = roster(vec![
            body("a", Vec2::new(200.0, 300.0), Vec2::new(1.0, 0.0), 1.0),
            body("b", Vec2::new(230.0, 300.0), Vec2::new(6.0, 0.0), 1.0),
            body("c", Vec2::new(170.0, 300.0), Vec2::new(-8.0, 0.0), 1.0),
            body("d", Vec2::new(400.0, 800.0), Vec2::new(0.0, 1.0), 1.0),
        ]);
        let events = step(&mut r, &field);

        let removals: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                BattleEvent::Eliminated { id, .. } => Some(id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(removals, vec!["a"]);
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn test_last_pair_leaves_winner() {
        // Every elimination has an unmarked survivor, so the roster never empties
        let field = BattleField::default();
        let mut r = roster(vec![
            body("a", Vec2::new(200.0, 300.0), Vec2::new(1.0, 0.0), 1.0),
            body("b", Vec2::new(230.0, 300.0), Vec2::new(6.0, 0.0), 1.0),
            body("c", Vec2::new(250.0, 320.0), Vec2::new(0.0, 3.0), 1.0),
        ]);
        let events = step(&mut r, &field);
        assert_eq!(r.len(), 1);
        assert!(events.contains(&BattleEvent::Victory { id: "b".into() }));
        assert!(!events.contains(&BattleEvent::Draw));
    }

    #[test]
    fn test_resize_keeps_survivors_in_field() {
        // Survivor hugging the wall grows after the elimination
        let field = BattleField::default();
        let mut r = roster(vec![
            body("wall", Vec2::new(21.0, 500.0), Vec2::new(0.0, 6.0), 1.0),
            body("a", Vec2::new(300.0, 300.0), Vec2::new(1.0, 0.0), 1.0),
            body("b", Vec2::new(330.0, 300.0), Vec2::new(6.0, 0.0), 1.0),
        ]);
        step(&mut r, &field);
        assert_eq!(r.len(), 2);
        for b in &r.bodies {
            assert!(field.contains(b, 1e-3));
        }
    }
}
