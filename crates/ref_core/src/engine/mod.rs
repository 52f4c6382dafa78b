//! Micro-match engine
//!
//! | Layer | Modules |
//! |-------|---------|
//! | Math, RNG, time | `math`, `rng`, `timestep`, `physics_constants` |
//! | Ball and dribble | `ball`, `dribble` |
//! | Actors | `actor`, `steering`, `movement`, `keeper`, `referee` |
//! | Referee calls | `incident`, `decision`, `card_system` |
//! | Shots | `shot` |
//! | Lifecycle | `round`, `session`, `replay`, `events`, `snapshot` |

pub mod actor;
pub mod ball;
pub mod card_system;
pub mod config;
pub mod debug_flags;
pub mod decision;
pub mod dribble;
pub mod events;
pub mod incident;
pub mod keeper;
pub mod math;
pub mod movement;
pub mod physics_constants;
pub mod referee;
pub mod replay;
pub mod rng;
pub mod round;
pub mod session;
pub mod shot;
pub mod snapshot;
pub mod steering;
pub mod timestep;

#[cfg(test)]
mod scenario_tests;

pub use actor::{Actor, AttackDirection, DribbleState, GoalSide, Possession, Team};
pub use ball::{Ball, BallMode};
pub use card_system::{CardRecord, CardSystem, CardType};
pub use config::SimConfig;
pub use decision::{DecisionOutcome, DecisionStage, RefereeScore, UserDecision};
pub use dribble::DribbleController;
pub use events::{RoundEndReason, SimEvent};
pub use incident::{AdvantageCall, FoulCall, GroundTruth, HintBand, Incident};
pub use keeper::{Keeper, KeeperMotion};
pub use math::Vec2;
pub use round::{MatchState, RoundPhase, RoundState};
pub use session::Session;
pub use shot::{Shot, ShotOutcome, ShotOverride};
pub use snapshot::SessionSnapshot;
pub use timestep::{TICK_DT, TICK_MS};
