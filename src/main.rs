//! Bounce Battle entry point
//!
//! Headless frame driver: runs a round to completion at a simulated 60 Hz
//! refresh and reports the outcome.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::{Parser, Subcommand};

    use bounce_battle::participants::load_participants;
    use bounce_battle::sim::rng::seeded;
    use bounce_battle::sim::{BattleEvent, BounceArena, Round, RoundPhase};
    use bounce_battle::{BattleConfig, Difficulty};

    /// Simulated display refresh
    const FRAME_SECS: f32 = 1.0 / 60.0;

    #[derive(Parser, Debug)]
    #[command(author, version, about = "Run bounce/battle simulations headlessly", long_about = None)]
    struct Cli {
        #[command(subcommand)]
        command: Command,
    }

    #[derive(Subcommand, Debug)]
    enum Command {
        /// Elimination battle until one ball is left
        Battle(BattleArgs),
        /// Growing ball arena until the ball fills it
        Bounce {
            #[arg(long, default_value_t = 1)]
            seed: u64,
            #[arg(long, default_value_t = 1_000_000)]
            max_steps: u64,
        },
    }

    #[derive(clap::Args, Debug)]
    struct BattleArgs {
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// JSON config file (flags below override it)
        #[arg(long)]
        config: Option<PathBuf>,
        /// JSON follower list
        #[arg(long)]
        participants: Option<PathBuf>,
        #[arg(long)]
        balls: Option<usize>,
        #[arg(long)]
        speed: Option<f32>,
        #[arg(long)]
        difficulty: Option<String>,
        #[arg(long)]
        gravity: bool,
        #[arg(long, default_value_t = 100_000)]
        max_steps: u64,
        /// Print final stats as JSON
        #[arg(long)]
        json: bool,
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        match Cli::parse().command {
            Command::Battle(args) => run_battle(args),
            Command::Bounce { seed, max_steps } => run_bounce(seed, max_steps),
        }
    }

    fn run_battle(args: BattleArgs) -> Result<()> {
        let mut config = match &args.config {
            Some(path) => BattleConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => BattleConfig::default(),
        };
        if let Some(balls) = args.balls {
            config.ball_count = balls;
        }
        if let Some(speed) = args.speed {
            config.speed_multiplier = speed;
        }
        if let Some(name) = &args.difficulty {
            config.difficulty = Difficulty::from_str(name)
                .with_context(|| format!("unknown difficulty {name:?}"))?;
        }
        config.gravity_enabled |= args.gravity;

        let participants = match &args.participants {
            Some(path) => Some(
                load_participants(path)
                    .with_context(|| format!("loading participants {}", path.display()))?,
            ),
            None => None,
        };

        let mut round = Round::new(args.seed);
        round.start(config, participants)?;
        round.begin_countdown()?;
        while round.phase() == RoundPhase::Countdown {
            round.advance_countdown(FRAME_SECS);
        }

        let mut steps = 0;
        while round.phase() == RoundPhase::Running && steps < args.max_steps {
            for event in round.step() {
                if let BattleEvent::Collision {
                    survivor,
                    eliminated,
                } = event
                {
                    log::info!("{survivor} knocks out {eliminated}");
                }
            }
            steps += 1;
        }
        // Let the last explosions and confetti play out
        while round.phase() == RoundPhase::Ended
            && (!round.explosions().is_empty() || !round.confetti().is_empty())
        {
            round.step();
        }

        if args.json {
            println!("{}", serde_json::to_string_pretty(&round.stats())?);
        } else {
            match round.winner() {
                Some(winner) => println!(
                    "Winner: {} ({} eliminated, {} frames)",
                    winner.id,
                    round.eliminated(),
                    round.frame()
                ),
                None if round.phase() == RoundPhase::Ended => println!("No survivor"),
                None => println!(
                    "Stopped after {} steps with {} balls left",
                    steps,
                    round.population()
                ),
            }
        }
        Ok(())
    }

    fn run_bounce(seed: u64, max_steps: u64) -> Result<()> {
        let mut rng = seeded(seed);
        let mut arena = BounceArena::new(&mut rng);
        let mut steps = 0;
        while !arena.ended && steps < max_steps {
            arena.step(&mut rng);
            steps += 1;
        }
        println!(
            "{} bounces in {} frames, radius {}",
            arena.bounces, steps, arena.ball.radius
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser builds drive `Round::step` from requestAnimationFrame
}
