//! Headless match runner
//!
//! Plays a full match with an automatic referee and prints the result.
//! Log output follows `RUST_LOG` (e.g. `RUST_LOG=ref_core=info`).

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use ref_core::engine::RoundPhase;
use ref_core::{AdvantageCall, FoulCall, Session, ShotOutcome, ShotOverride, SimConfig, SimEvent};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    /// Always answer with the ground truth
    Oracle,
    /// Coin flips
    Random,
    /// Whistle every contact and stop play
    AlwaysFoul,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Forced {
    Random,
    Goal,
    Save,
}

#[derive(Parser)]
#[command(name = "ref_cli")]
#[command(about = "Run a headless referee trainer match", long_about = None)]
struct Cli {
    /// Config preset (realistic, arcade, training)
    #[arg(long, default_value = "realistic")]
    profile: String,

    /// JSON config file; overrides --profile
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1)]
    seed: u64,

    #[arg(long, value_enum, default_value_t = Policy::Oracle)]
    policy: Policy,

    /// Force every shot's outcome
    #[arg(long, value_enum, default_value_t = Forced::Random)]
    force: Forced,

    /// Safety cap on simulated ticks
    #[arg(long, default_value_t = 60_000)]
    max_ticks: u64,

    /// Print every event as JSON
    #[arg(long)]
    events: bool,
}

#[derive(Default)]
struct Tally {
    incidents: u32,
    shots: u32,
    goals: u32,
    holds: u32,
    parries: u32,
    feints: u32,
    yellows: u32,
    reds: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let mut session = Session::new(config, cli.seed)?;
    session.debug_force_outcome(match cli.force {
        Forced::Random => ShotOverride::Random,
        Forced::Goal => ShotOverride::Goal,
        Forced::Save => ShotOverride::Save,
    });
    session.start_match();

    let mut policy_rng = StdRng::seed_from_u64(cli.seed ^ 0x5EED);
    let mut tally = Tally::default();
    let mut ticks = 0u64;
    while session.round().phase != RoundPhase::FullTime {
        if ticks >= cli.max_ticks {
            bail!("match did not finish within {} ticks", cli.max_ticks);
        }
        session.tick();
        ticks += 1;
        referee(&mut session, cli.policy, &mut policy_rng)?;
        for event in session.drain_events() {
            if cli.events {
                println!("{}", serde_json::to_string(&event)?);
            }
            tally.count(&event);
        }
    }

    info!(ticks, "match finished");
    print_summary(&session, &tally, ticks);
    Ok(())
}

fn load_config(cli: &Cli) -> Result<SimConfig> {
    if let Some(path) = &cli.config {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        return SimConfig::from_json_str(&json)
            .with_context(|| format!("parsing {}", path.display()));
    }
    SimConfig::from_profile(&cli.profile)
        .with_context(|| format!("unknown profile '{}'", cli.profile))
}

/// Answer the pending incident, if any.
fn referee(session: &mut Session, policy: Policy, rng: &mut impl Rng) -> Result<()> {
    let Some(truth) = session.round().decision.incident().map(|i| i.truth) else {
        return Ok(());
    };
    let (foul, advantage) = match policy {
        Policy::Oracle => (truth.foul_call, truth.advantage.unwrap_or(AdvantageCall::Stop)),
        Policy::Random => (
            if rng.gen_bool(0.5) { FoulCall::Foul } else { FoulCall::NoFoul },
            if rng.gen_bool(0.5) { AdvantageCall::Advantage } else { AdvantageCall::Stop },
        ),
        Policy::AlwaysFoul => (FoulCall::Foul, AdvantageCall::Stop),
    };
    session.submit_foul_call(foul)?;
    if foul == FoulCall::Foul {
        session.submit_advantage_or_stop(advantage)?;
    }
    Ok(())
}

impl Tally {
    fn count(&mut self, event: &SimEvent) {
        match event {
            SimEvent::IncidentDetected(_) => self.incidents += 1,
            SimEvent::ShotTaken(_) => self.shots += 1,
            SimEvent::Feint { .. } => self.feints += 1,
            SimEvent::ShotOutcome { outcome, .. } => match outcome {
                ShotOutcome::Goal => self.goals += 1,
                ShotOutcome::Hold => self.holds += 1,
                ShotOutcome::Parry => self.parries += 1,
            },
            SimEvent::CardIssued { card, .. } => match card {
                ref_core::engine::CardType::Yellow => self.yellows += 1,
                ref_core::engine::CardType::Red => self.reds += 1,
            },
            _ => {}
        }
    }
}

fn print_summary(session: &Session, tally: &Tally, ticks: u64) {
    let score = session.score();
    println!("\n=== FULL TIME ===");
    if let Some(m) = session.match_state() {
        println!("   Red {} - {} Blue", m.red_goals, m.blue_goals);
        println!("   Positions:  {}/{}", m.positions_played, m.max_positions);
    }
    println!("   Ticks:      {} ({:.1} s)", ticks, session.now_ms() as f64 / 1000.0);
    println!(
        "   Shots:      {} (goals {}, holds {}, parries {}, feints {})",
        tally.shots,
        tally.goals,
        tally.holds,
        tally.parries,
        tally.feints
    );
    println!("   Incidents:  {}", tally.incidents);
    println!("   Cards:      {} yellow, {} red", tally.yellows, tally.reds);
    println!("\n=== REFEREE ===");
    println!("   Points:     {}", score.total);
    println!(
        "   Calls:      {} right, {} wrong ({:.0}%)",
        score.correct_calls,
        score.wrong_calls,
        score.accuracy() * 100.0
    );
    println!("   Best streak: {}", score.best_streak);
}
