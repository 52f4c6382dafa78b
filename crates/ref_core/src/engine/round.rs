//! Round ("position") and match state
//!
//! A match is a sequence of short rounds separated by breaks. Everything in
//! [`RoundState`] is rebuilt when a round starts; [`MatchState`] lives for the
//! whole match.
//!
//! ```text
//! Starting ─▶ Running ─┬─▶ Decision ───────────────▶ Break ─▶ (next round)
//!                      ├─▶ Settling (parry) ─▶ Replay ─▶ Break
//!                      └─▶ Replay (goal/hold) ─▶ Break
//! HalfTime is a break; FullTime is terminal.
//! ```

use serde::{Deserialize, Serialize};

use super::actor::{AttackDirection, Possession, Team};
use super::config::{FlowConfig, PitchConfig, RulesConfig};
use super::decision::DecisionMachine;
use super::events::RoundEndReason;
use super::incident::IncidentGenerator;
use super::math::Vec2;
use super::movement::{Lane, PlayerSteering, Tempo};
use super::rng::SimRng;
use super::shot::Shot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeatBand {
    Clean,
    Normal,
    Spicy,
}

impl HeatBand {
    /// Draw a band and its heat multiplier.
    pub fn roll(flow: &FlowConfig, rng: &mut SimRng) -> (Self, f32) {
        if rng.unit() < flow.clean_scene_chance {
            (HeatBand::Clean, rng.range(0.78, 0.92))
        } else if rng.unit() < flow.normal_scene_chance {
            (HeatBand::Normal, rng.range(0.92, 1.08))
        } else {
            (HeatBand::Spicy, rng.range(1.05, 1.25))
        }
    }
}

/// Per-round flavour rolled at round start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneParams {
    pub attacking: Team,
    pub direction: AttackDirection,
    pub heat_band: HeatBand,
    pub heat: f32,
    pub tempo: Tempo,
    pub lane: Lane,
}

impl SceneParams {
    pub fn roll(attacking: Team, flow: &FlowConfig, rng: &mut SimRng) -> Self {
        let direction = if rng.chance(0.5) { AttackDirection::Up } else { AttackDirection::Down };
        let (heat_band, heat) = HeatBand::roll(flow, rng);
        let tempo = Tempo::roll(rng);
        let lane = *rng.choose(&Lane::ALL).unwrap_or(&Lane::Center);
        Self { attacking, direction, heat_band, heat, tempo, lane }
    }

    pub fn defending(&self) -> Team {
        self.attacking.opponent()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No match started yet
    Idle,
    Starting { run_at_ms: u64 },
    Running,
    /// Waiting for the referee's call
    Decision,
    /// Parried ball rolling loose
    Settling { expires_ms: u64 },
    /// Replay is playing; the break follows
    Replay { reason: RoundEndReason, delay_ms: u64 },
    Break { next_round_ms: u64 },
    HalfTime { next_round_ms: u64 },
    FullTime,
}

impl RoundPhase {
    pub fn is_running(self) -> bool {
        matches!(self, RoundPhase::Running)
    }

    /// Ball and players keep moving in these phases.
    pub fn is_live(self) -> bool {
        matches!(self, RoundPhase::Running | RoundPhase::Settling { .. })
    }

    pub fn label(self) -> &'static str {
        match self {
            RoundPhase::Idle => "IDLE",
            RoundPhase::Starting { .. } => "STARTING",
            RoundPhase::Running => "PLAYING",
            RoundPhase::Decision => "DECISION",
            RoundPhase::Settling { .. } => "SETTLING",
            RoundPhase::Replay { .. } => "REPLAY",
            RoundPhase::Break { .. } => "BREAK",
            RoundPhase::HalfTime { .. } => "HALF TIME",
            RoundPhase::FullTime => "FULL TIME",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub number: u32,
    pub phase: RoundPhase,
    pub possession: Possession,
    pub scene: SceneParams,
    pub incidents: IncidentGenerator,
    pub decision: DecisionMachine,
    pub shot: Option<Shot>,
    pub steering: PlayerSteering,
    pub running_since_ms: Option<u64>,
    pub last_shot_ms: Option<u64>,
    /// Early-turnover regain time while the defender carries
    pub turnover_at_ms: Option<u64>,
    pub hit_stop_until_ms: u64,
    pub slow_mo_until_ms: u64,
}

impl RoundState {
    pub fn idle(rules: &RulesConfig) -> Self {
        Self {
            number: 0,
            phase: RoundPhase::Idle,
            possession: Possession::Attacker,
            scene: SceneParams {
                attacking: Team::Red,
                direction: AttackDirection::Up,
                heat_band: HeatBand::Normal,
                heat: 1.0,
                tempo: Tempo::default(),
                lane: Lane::Center,
            },
            incidents: IncidentGenerator::new(rules),
            decision: DecisionMachine::default(),
            shot: None,
            steering: PlayerSteering::default(),
            running_since_ms: None,
            last_shot_ms: None,
            turnover_at_ms: None,
            hit_stop_until_ms: 0,
            slow_mo_until_ms: 0,
        }
    }

    /// Fresh round state; cards and scores live elsewhere.
    pub fn begin(number: u32, scene: SceneParams, run_at_ms: u64, rules: &RulesConfig) -> Self {
        Self {
            number,
            phase: RoundPhase::Starting { run_at_ms },
            scene,
            ..Self::idle(rules)
        }
    }

    /// Tempo multiplier at `now_ms`.
    pub fn tempo(&self, now_ms: u64) -> f32 {
        let elapsed = self.running_since_ms.map_or(0, |t| now_ms.saturating_sub(t));
        self.scene.tempo.at(elapsed as f32)
    }
}

/// Attacker and defender spawn points: attacker in its own half, defender
/// ahead of it, at least `min_spawn_separation` apart when the re-rolls allow.
pub fn spawn_positions(dir: AttackDirection, pitch: &PitchConfig, flow: &FlowConfig, rng: &mut SimRng) -> (Vec2, Vec2) {
    const SPAWN_TRIES: usize = 12;
    let cx = pitch.width / 2.0;
    let cy = pitch.height / 2.0;
    let (ay, dy) = match dir {
        AttackDirection::Up => (
            rng.range(cy + 60.0, pitch.max_y - 120.0),
            rng.range(pitch.min_y + 120.0, cy - 20.0),
        ),
        AttackDirection::Down => (
            rng.range(pitch.min_y + 120.0, cy - 60.0),
            rng.range(cy + 20.0, pitch.max_y - 120.0),
        ),
    };
    let attacker = Vec2::new(cx + rng.range(-70.0, 70.0), ay);
    let mut defender = Vec2::new(cx + rng.range(-70.0, 70.0), dy);
    for _ in 0..SPAWN_TRIES {
        if attacker.distance(defender) >= flow.min_spawn_separation {
            break;
        }
        defender.x = cx + rng.range(-90.0, 90.0);
    }
    (attacker, defender)
}

/// Match clock, positions and score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub started_ms: u64,
    pub duration_ms: u64,
    pub positions_played: u32,
    pub max_positions: u32,
    pub half_time_shown: bool,
    pub full_time: bool,
    pub red_goals: u32,
    pub blue_goals: u32,
}

impl MatchState {
    pub fn new(started_ms: u64, flow: &FlowConfig) -> Self {
        Self {
            started_ms,
            duration_ms: flow.match_duration_ms,
            positions_played: 0,
            max_positions: flow.max_positions,
            half_time_shown: false,
            full_time: false,
            red_goals: 0,
            blue_goals: 0,
        }
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_ms)
    }

    pub fn end_ms(&self) -> u64 {
        self.started_ms + self.duration_ms
    }

    /// Displayed minute: the real-time clock mapped onto 90'.
    pub fn minute(&self, now_ms: u64) -> u32 {
        if self.duration_ms == 0 {
            return 90;
        }
        let t = self.elapsed_ms(now_ms).min(self.duration_ms);
        (t * 90 / self.duration_ms) as u32
    }

    pub fn positions_left(&self) -> u32 {
        self.max_positions.saturating_sub(self.positions_played)
    }

    pub fn add_goal(&mut self, team: Team) {
        match team {
            Team::Red => self.red_goals += 1,
            Team::Blue => self.blue_goals += 1,
        }
    }

    pub fn goals(&self, team: Team) -> u32 {
        match team {
            Team::Red => self.red_goals,
            Team::Blue => self.blue_goals,
        }
    }
}
