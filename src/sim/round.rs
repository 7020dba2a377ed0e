//! Battle round state machine
//!
//! Configuring → PreRound → Countdown → Running → Ended, with resets back to
//! PreRound (same settings) or Configuring. One roster and one set of effects
//! live per round; both are rebuilt on reset.

use rand_pcg::Pcg32;
use serde::Serialize;
use thiserror::Error;

use super::battle::{self, BattleField, Roster};
use super::particles::{Confetti, Explosion, update_explosions};
use super::rng::seeded;
use super::state::{BattleEvent, Body, RoundPhase};
use crate::consts::*;
use crate::participants::{Participant, select_participants};
use crate::settings::{BattleConfig, ConfigError};

/// Errors from driving a round
#[derive(Debug, Error)]
pub enum RoundError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot {action} while {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },
}

/// Cancelable 3-2-1 timer, advanced by elapsed wall-clock seconds
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining: u32,
    elapsed: f32,
}

impl Countdown {
    pub fn new(secs: u32) -> Self {
        Self {
            remaining: secs,
            elapsed: 0.0,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Consume elapsed time, one decrement per whole second; true once it hits 0
    pub fn advance(&mut self, dt_secs: f32) -> bool {
        self.elapsed += dt_secs.max(0.0);
        while self.elapsed >= 1.0 && self.remaining > 0 {
            self.elapsed -= 1.0;
            self.remaining -= 1;
        }
        self.remaining == 0
    }
}

/// Observable round outputs for the UI shell
#[derive(Debug, Clone, Serialize)]
pub struct RoundStats {
    pub phase: RoundPhase,
    pub population: usize,
    pub eliminated: usize,
    pub winner: Option<String>,
    pub used_fallback: bool,
    pub countdown: Option<u32>,
}

/// One battle round: settings, roster, effects and phase
#[derive(Debug, Clone)]
pub struct Round {
    phase: RoundPhase,
    config: BattleConfig,
    field: BattleField,
    /// Externally supplied participants, kept for resets
    source: Option<Vec<Participant>>,
    roster: Roster,
    explosions: Vec<Explosion>,
    confetti: Confetti,
    countdown: Option<Countdown>,
    eliminated: usize,
    winner: Option<Body>,
    used_fallback: bool,
    frame: u64,
    rng: Pcg32,
}

impl Round {
    /// New round on the settings screen
    pub fn new(seed: u64) -> Self {
        Self {
            phase: RoundPhase::Configuring,
            config: BattleConfig::default(),
            field: BattleField::default(),
            source: None,
            roster: Roster::default(),
            explosions: Vec::new(),
            confetti: Confetti::default(),
            countdown: None,
            eliminated: 0,
            winner: None,
            used_fallback: false,
            frame: 0,
            rng: seeded(seed),
        }
    }

    /// Confirm settings and build the roster (Configuring/Ended → PreRound)
    ///
    /// Invalid settings leave the round untouched.
    pub fn start(
        &mut self,
        config: BattleConfig,
        participants: Option<Vec<Participant>>,
    ) -> Result<(), RoundError> {
        self.require(&[RoundPhase::Configuring, RoundPhase::Ended], "start a round")?;
        config.validate()?;

        self.config = config;
        self.source = participants;
        self.rebuild();
        Ok(())
    }

    /// Replay with the same settings and participants (Ended → PreRound)
    pub fn reset(&mut self) -> Result<(), RoundError> {
        self.require(&[RoundPhase::Ended], "reset")?;
        self.rebuild();
        Ok(())
    }

    /// Back to the settings screen from anywhere, dropping the roster
    pub fn back_to_settings(&mut self) {
        self.clear();
        self.set_phase(RoundPhase::Configuring);
    }

    /// PreRound → Countdown
    pub fn begin_countdown(&mut self) -> Result<(), RoundError> {
        self.require(&[RoundPhase::PreRound], "begin the countdown")?;
        self.set_phase(RoundPhase::Countdown);
        self.countdown = Some(Countdown::new(COUNTDOWN_SECS));
        Ok(())
    }

    /// Feed elapsed seconds to the countdown; switches to Running at zero
    ///
    /// Returns the seconds left, or `None` when no countdown is active.
    pub fn advance_countdown(&mut self, dt_secs: f32) -> Option<u32> {
        let countdown = self.countdown.as_mut()?;
        let done = countdown.advance(dt_secs);
        let remaining = countdown.remaining();
        if done {
            self.set_phase(RoundPhase::Running);
        }
        Some(remaining)
    }

    /// Advance one frame
    ///
    /// Running: physics and eliminations, then effects already on screen,
    /// then the effects spawned by this frame's events. Ended: effects only.
    /// Any other phase is a no-op.
    pub fn step(&mut self) -> Vec<BattleEvent> {
        let mut events = Vec::new();
        match self.phase {
            RoundPhase::Running => {
                if self.roster.len() > 1 {
                    events = battle::step(&mut self.roster, &self.field);
                }
                self.update_effects();
                self.apply_events(&events);
                if self.roster.len() <= 1 {
                    self.finish();
                }
            }
            RoundPhase::Ended => self.update_effects(),
            _ => return events,
        }

        self.frame += 1;
        events
    }

    /// One frame of every live explosion and confetti flake
    fn update_effects(&mut self) {
        update_explosions(&mut self.explosions);
        self.confetti
            .update(self.field.height + CONFETTI_FLOOR_MARGIN);
    }

    fn apply_events(&mut self, events: &[BattleEvent]) {
        for event in events {
            match event {
                BattleEvent::Eliminated { pos, color, .. } => {
                    self.eliminated += 1;
                    let count = self.config.difficulty.explosion_particles();
                    self.explosions
                        .push(Explosion::spawn(&mut self.rng, *pos, *color, count));
                }
                BattleEvent::Victory { .. } | BattleEvent::Draw => self.finish(),
                BattleEvent::WallBounce { .. } | BattleEvent::Collision { .. } => {}
            }
        }
    }

    /// Population ≤ 1: crown the survivor (if any) and stop physics
    fn finish(&mut self) {
        if self.phase == RoundPhase::Ended {
            return;
        }
        self.winner = self.roster.bodies.first().cloned();
        match &self.winner {
            Some(winner) => {
                log::info!(
                    "{} wins after {} eliminations ({} frames)",
                    winner.id,
                    self.eliminated,
                    self.frame
                );
                self.confetti
                    .burst(&mut self.rng, CONFETTI_COUNT, self.field.width);
            }
            None => log::info!("Round ended with no survivor"),
        }
        self.set_phase(RoundPhase::Ended);
    }

    fn rebuild(&mut self) {
        self.clear();
        let (participants, used_fallback) =
            select_participants(self.source.as_deref(), self.config.ball_count);
        self.used_fallback = used_fallback;
        self.field = BattleField::from_config(&self.config);
        self.roster = Roster::spawn(&mut self.rng, &participants, &self.config, &self.field);
        log::info!(
            "Round ready: {} balls, {} difficulty, x{} speed, gravity {}",
            self.roster.len(),
            self.config.difficulty.as_str(),
            self.config.speed_multiplier,
            self.config.gravity_enabled
        );
        self.set_phase(RoundPhase::PreRound);
    }

    fn clear(&mut self) {
        self.roster = Roster::default();
        self.explosions.clear();
        self.confetti = Confetti::default();
        self.eliminated = 0;
        self.winner = None;
        self.used_fallback = false;
        self.frame = 0;
    }

    /// Every phase change goes through here so a live countdown is always dropped
    fn set_phase(&mut self, phase: RoundPhase) {
        if phase != RoundPhase::Countdown {
            self.countdown = None;
        }
        if phase != self.phase {
            log::info!("Round phase: {} -> {}", self.phase.as_str(), phase.as_str());
            self.phase = phase;
        }
    }

    fn require(&self, allowed: &[RoundPhase], action: &'static str) -> Result<(), RoundError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(RoundError::InvalidTransition {
                from: self.phase.as_str(),
                action,
            })
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn field(&self) -> &BattleField {
        &self.field
    }

    pub fn bodies(&self) -> &[Body] {
        &self.roster.bodies
    }

    pub fn population(&self) -> usize {
        self.roster.len()
    }

    pub fn eliminated(&self) -> usize {
        self.eliminated
    }

    pub fn winner(&self) -> Option<&Body> {
        self.winner.as_ref()
    }

    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    pub fn countdown_remaining(&self) -> Option<u32> {
        self.countdown.as_ref().map(Countdown::remaining)
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn confetti(&self) -> &Confetti {
        &self.confetti
    }

    /// Frames stepped since the round was built
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn stats(&self) -> RoundStats {
        RoundStats {
            phase: self.phase,
            population: self.population(),
            eliminated: self.eliminated,
            winner: self.winner.as_ref().map(|w| w.id.clone()),
            used_fallback: self.used_fallback,
            countdown: self.countdown_remaining(),
        }
    }

    /// Replace the roster (scripted scenarios and tests)
    pub fn set_bodies(&mut self, bodies: Vec<Body>) {
        self.roster = Roster { bodies };
    }
}
