//! Events emitted by a session, drained by the presentation layer.

use serde::{Deserialize, Serialize};

use super::actor::{AttackDirection, GoalSide, Possession, Team};
use super::card_system::CardType;
use super::decision::DecisionOutcome;
use super::incident::Incident;
use super::movement::Lane;
use super::shot::{Shot, ShotOutcome};

/// Why a round stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEndReason {
    PlayOn,
    FoulStop,
    FoulAdvantage,
    Goal,
    KeeperHolds,
    ParrySave,
    HalfTime,
    FullTime,
}

impl RoundEndReason {
    pub fn label(self) -> &'static str {
        match self {
            RoundEndReason::PlayOn => "Play on",
            RoundEndReason::FoulStop => "Foul: stop",
            RoundEndReason::FoulAdvantage => "Foul: advantage",
            RoundEndReason::Goal => "Goal",
            RoundEndReason::KeeperHolds => "Keeper holds",
            RoundEndReason::ParrySave => "Parry save",
            RoundEndReason::HalfTime => "HALF TIME",
            RoundEndReason::FullTime => "FULL TIME",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    RoundStarted {
        number: u32,
        attacking: Team,
        direction: AttackDirection,
        lane: Lane,
    },
    /// Play is live after the start delay
    RoundRunning { number: u32 },
    IncidentDetected(Incident),
    DecisionResolved(DecisionOutcome),
    CardIssued { team: Team, card: CardType },
    PossessionChanged { possession: Possession },
    Feint { at_ms: u64 },
    ShotTaken(Shot),
    ShotOutcome {
        outcome: ShotOutcome,
        side: GoalSide,
        /// Keeper touched the ball before the line
        touched: bool,
    },
    GoalScored { team: Team, red: u32, blue: u32 },
    RoundEnded { number: u32, reason: RoundEndReason },
    ReplayStarted { frames: usize },
    ReplayFinished,
    HalfTime,
    FullTime { red: u32, blue: u32 },
}
