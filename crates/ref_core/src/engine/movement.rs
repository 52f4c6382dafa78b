//! Field player movement: attack lanes, tempo and per-tick steering
//!
//! The attacker drifts toward a lane target that is re-rolled every few
//! hundred ms; the defender pursues the attacker with a small random offset.
//! A per-round tempo multiplier scales both top speeds and the re-roll rate.

use serde::{Deserialize, Serialize};

use super::actor::{Actor, AttackDirection};
use super::config::{PitchConfig, SteeringConfig};
use super::math::{clamp, lerp, Vec2};
use super::rng::SimRng;
use super::steering::{pursuit, seek, separation, smooth_velocity};

/// Inset of lane targets from the pitch bounds (x, y).
const TARGET_INSET_X: f32 = 12.0;
const TARGET_INSET_Y: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lane {
    Center,
    Left,
    Right,
    Diagonal,
}

impl Lane {
    pub const ALL: [Lane; 4] = [Lane::Center, Lane::Left, Lane::Right, Lane::Diagonal];

    pub fn label(self) -> &'static str {
        match self {
            Lane::Center => "CENTER",
            Lane::Left => "LEFT",
            Lane::Right => "RIGHT",
            Lane::Diagonal => "DIAGONAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TempoKind {
    /// Slow start ramping up
    Build,
    Steady,
    Burst,
}

/// Speed multiplier over the running part of a round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tempo {
    pub kind: TempoKind,
    pub start: f32,
    pub end: f32,
    pub ramp_ms: f32,
}

impl Tempo {
    pub fn roll(rng: &mut SimRng) -> Self {
        let kind = *rng.choose(&[TempoKind::Build, TempoKind::Steady, TempoKind::Burst]).unwrap_or(&TempoKind::Steady);
        match kind {
            TempoKind::Build => Self {
                kind,
                start: rng.range(0.72, 0.86),
                end: rng.range(1.02, 1.14),
                ramp_ms: rng.range(2400.0, 3800.0),
            },
            TempoKind::Steady => {
                let v = rng.range(0.92, 1.05);
                Self { kind, start: v, end: v, ramp_ms: 0.0 }
            }
            TempoKind::Burst => {
                let v = rng.range(1.05, 1.15);
                Self { kind, start: v, end: v, ramp_ms: 0.0 }
            }
        }
    }

    /// Multiplier `elapsed_ms` after the round started running.
    pub fn at(&self, elapsed_ms: f32) -> f32 {
        if self.ramp_ms <= 0.0 {
            return self.start;
        }
        lerp(self.start, self.end, clamp(elapsed_ms / self.ramp_ms, 0.0, 1.0))
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self { kind: TempoKind::Steady, start: 1.0, end: 1.0, ramp_ms: 0.0 }
    }
}

/// Fresh attacker target for `lane`.
pub fn lane_target(
    lane: Lane,
    dir: AttackDirection,
    pitch: &PitchConfig,
    cfg: &SteeringConfig,
    rng: &mut SimRng,
) -> Vec2 {
    let center_x = pitch.width / 2.0;
    let width = pitch.max_x - pitch.min_x;
    let x = match lane {
        Lane::Left => center_x - width * cfg.lane_width_share + rng.range(-18.0, 18.0),
        Lane::Right => center_x + width * cfg.lane_width_share + rng.range(-18.0, 18.0),
        Lane::Center => center_x + rng.range(-28.0, 28.0),
        Lane::Diagonal => center_x + dir.sign() * rng.range(35.0, 95.0) + rng.range(-20.0, 20.0),
    };
    let goal_y = pitch.goal_line_y(dir.target_goal()) - dir.sign() * cfg.target_goal_inset;
    let jitter = match lane {
        Lane::Diagonal => rng.range(-70.0, 40.0),
        _ => rng.range(-30.0, 30.0),
    };
    Vec2::new(
        clamp(x, pitch.min_x + TARGET_INSET_X, pitch.max_x - TARGET_INSET_X),
        clamp(goal_y + jitter, pitch.min_y + TARGET_INSET_Y, pitch.max_y - TARGET_INSET_Y),
    )
}

/// Attacker target memory for one round.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerSteering {
    target: Option<Vec2>,
    target_until_ms: u64,
}

impl PlayerSteering {
    pub fn target(&self) -> Option<Vec2> {
        self.target
    }

    /// One steering tick for both field players: lane seek, pursuit,
    /// separation, speed clamp, integration and bounds clamp.
    #[allow(clippy::too_many_arguments)]
    pub fn step(
        &mut self,
        attacker: &mut Actor,
        defender: &mut Actor,
        lane: Lane,
        dir: AttackDirection,
        tempo: f32,
        now_ms: u64,
        dt: f32,
        pitch: &PitchConfig,
        cfg: &SteeringConfig,
        rng: &mut SimRng,
    ) {
        let target = match self.target {
            Some(t) if now_ms <= self.target_until_ms => t,
            _ => {
                let refresh = rng.range(cfg.target_refresh_min_ms, cfg.target_refresh_max_ms) / clamp(tempo, 0.65, 1.25);
                self.target_until_ms = now_ms + refresh as u64;
                let t = lane_target(lane, dir, pitch, cfg, rng);
                self.target = Some(t);
                t
            }
        };

        let desired_a = seek(attacker.pos, target, attacker.max_speed * tempo);
        attacker.vel = smooth_velocity(attacker.vel, desired_a, cfg.attacker_vel_lerp);

        let offset = Vec2::new(
            rng.range(-cfg.defender_offset, cfg.defender_offset),
            rng.range(-cfg.defender_offset, cfg.defender_offset),
        );
        let desired_d = pursuit(defender.pos, attacker.pos, offset, defender.max_speed * tempo);
        defender.vel = smooth_velocity(defender.vel, desired_d, cfg.defender_vel_lerp);

        let push = separation(attacker.pos, defender.pos, cfg.separation_dist, cfg.separation_push);
        attacker.vel += push;
        defender.vel += push * -cfg.defender_push_share;

        attacker.integrate(dt);
        defender.integrate(dt);
        attacker.pos = pitch.clamp_inside(attacker.pos, 0.0);
        defender.pos = pitch.clamp_inside(defender.pos, 0.0);
    }

    pub fn reset(&mut self) {
        self.target = None;
        self.target_until_ms = 0;
    }
}
