//! # ref_core - Referee Trainer Micro-Match Core
//!
//! Deterministic simulation of one attacker against one defender on a
//! portrait pitch, with keepers at both ends and a referee avatar trailing
//! play. The human referee judges each contact (foul / no foul, then
//! advantage / stop) and is scored against a hidden ground truth.
//!
//! ## Features
//! - Same seed, same match
//! - Spring-damper dribbling, three-mode ball state machine
//! - Logistic foul model with card escalation
//! - Keeper dives with reaction delay, misreads and fatigue
//! - Event stream and serializable snapshots for a presentation layer

// Game engine APIs often require many parameters for physics, state, etc.
#![allow(clippy::too_many_arguments)]
// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]

pub mod engine;
pub mod error;

pub use engine::{
    AdvantageCall, FoulCall, Session, SessionSnapshot, ShotOutcome, ShotOverride, SimConfig, SimEvent,
};
pub use error::{ConfigError, Result, SimError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
