//! Render snapshot of a session
//!
//! A flat, serializable view of everything a presentation layer draws in one
//! frame. Taking a snapshot never mutates the session.

use serde::{Deserialize, Serialize};

use super::actor::{GoalSide, Possession, Team};
use super::ball::BallMode;
use super::decision::{DecisionStage, RefereeScore};
use super::incident::HintBand;
use super::keeper::KeeperMotion;
use super::math::Vec2;
use super::replay::ReplayFrame;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorView {
    pub team: Team,
    pub pos: Vec2,
    pub vel: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeeperView {
    pub side: GoalSide,
    pub pos: Vec2,
    pub motion: KeeperMotion,
    pub fatigue: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub pos: Vec2,
    pub velocity: Vec2,
    pub mode: BallMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingIncidentView {
    pub id: u64,
    pub stage: DecisionStage,
    pub hint: HintBand,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub now_ms: u64,
    pub paused: bool,
    pub phase: String,
    pub round: u32,
    pub minute: u32,
    pub possession: Possession,
    pub attacker: ActorView,
    pub defender: ActorView,
    pub referee: Vec2,
    pub keepers: [KeeperView; 2],
    pub ball: BallView,
    pub incident: Option<PendingIncidentView>,
    pub score: RefereeScore,
    pub red_goals: u32,
    pub blue_goals: u32,
    /// Frame on screen while a replay plays
    pub replay: Option<ReplayFrame>,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
