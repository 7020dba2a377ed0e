//! Simulation module
//!
//! All gameplay logic lives here. Steps are frame-relative and single-threaded:
//! - One call advances exactly one frame
//! - Randomness only through an injected, seedable RNG
//! - Stable roster order (spawn order)
//! - No rendering or platform dependencies

pub mod arena;
pub mod battle;
pub mod collision;
pub mod particles;
pub mod rng;
pub mod round;
pub mod state;

pub use arena::BounceArena;
pub use battle::{BattleField, Roster};
pub use collision::{Loser, choose_loser, radius_for_population, reflect_velocity};
pub use particles::{Confetti, ConfettiFlake, Explosion, Particle};
pub use rng::Color;
pub use round::{Countdown, Round, RoundError, RoundStats};
pub use state::{ArenaEvent, BattleEvent, Body, RoundPhase};
