//! Shot initiation and outcome helpers
//!
//! The keeper's answer to a shot is rolled once, right after the keeper
//! commits, and stored on the [`Shot`]. Resolution later only reads it.
//!
//! | Roll | At keeper contact | At the goal line |
//! |------|-------------------|------------------|
//! | `Hold` | caught | caught on the line |
//! | `Parry` | pushed out, rebound | pushed out, rebound |
//! | `Miss` | contact ignored | goal |

use serde::{Deserialize, Serialize};

use super::actor::{GoalSide, Possession};
use super::ball::BallMode;
use super::config::{KeeperConfig, PitchConfig, ShotConfig};
use super::math::{clamp, clamp01, Vec2};
use super::rng::SimRng;

/// Debug override of the next shots' outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotOverride {
    #[default]
    Random,
    Goal,
    Save,
}

/// Keeper's answer rolled at initiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveAttempt {
    Hold,
    Parry,
    Miss,
}

impl SaveAttempt {
    /// Outcome when the ball reaches the keeper; a miss flies through.
    pub fn at_keeper(self) -> Option<ShotOutcome> {
        match self {
            SaveAttempt::Hold => Some(ShotOutcome::Hold),
            SaveAttempt::Parry => Some(ShotOutcome::Parry),
            SaveAttempt::Miss => None,
        }
    }

    /// Outcome when the ball crosses the goal line. Wide of the mouth the
    /// keeper gathers it.
    pub fn at_goal_line(self, in_mouth: bool) -> ShotOutcome {
        match (self, in_mouth) {
            (_, false) => ShotOutcome::Hold,
            (SaveAttempt::Hold, true) => ShotOutcome::Hold,
            (SaveAttempt::Parry, true) => ShotOutcome::Parry,
            (SaveAttempt::Miss, true) => ShotOutcome::Goal,
        }
    }
}

/// How a shot ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotOutcome {
    Goal,
    Hold,
    Parry,
}

impl ShotOutcome {
    pub fn label(self) -> &'static str {
        match self {
            ShotOutcome::Goal => "GOAL",
            ShotOutcome::Hold => "HOLD",
            ShotOutcome::Parry => "PARRY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    /// Aim point on the goal line
    pub target: Vec2,
    pub side: GoalSide,
    pub speed: f32,
    /// 0 at the goal center, 1 at the post
    pub edge_n: f32,
    pub speed_n: f32,
    pub started_ms: u64,
    pub save_probability: f32,
    pub outcome: SaveAttempt,
}

/// Result of the per-tick stochastic gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotGate {
    Pass,
    Shoot,
    Feint,
}

/// Why a shot cannot start now.
pub fn shot_blocker(
    ball_mode: BallMode,
    possession: Possession,
    now_ms: u64,
    last_shot_ms: Option<u64>,
    attacker_y: f32,
    goal_y: f32,
    cfg: &ShotConfig,
) -> Option<&'static str> {
    if ball_mode != BallMode::Carried {
        return Some("ball is not carried");
    }
    if possession != Possession::Attacker {
        return Some("attacker does not have the ball");
    }
    if last_shot_ms.is_some_and(|t| now_ms.saturating_sub(t) < cfg.cooldown_ms) {
        return Some("shot cooldown");
    }
    if (attacker_y - goal_y).abs() > cfg.zone_px {
        return Some("out of shooting range");
    }
    None
}

/// Shoot with `shot_chance`; a would-be shot becomes a feint with `feint_chance`.
pub fn roll_gate(cfg: &ShotConfig, rng: &mut SimRng) -> ShotGate {
    if !rng.chance(cfg.shot_chance) {
        return ShotGate::Pass;
    }
    if rng.chance(cfg.feint_chance) {
        ShotGate::Feint
    } else {
        ShotGate::Shoot
    }
}

/// Aim point: goal center plus a lateral spread, kept inside the posts.
pub fn pick_target(side: GoalSide, pitch: &PitchConfig, cfg: &ShotConfig, rng: &mut SimRng) -> Vec2 {
    let cx = pitch.goal_center_x();
    let x = clamp(
        cx + rng.range(-cfg.lateral_spread, cfg.lateral_spread),
        pitch.goal_x_min + cfg.post_inset,
        pitch.goal_x_max - cfg.post_inset,
    );
    Vec2::new(x, pitch.goal_line_y(side))
}

pub fn edge_norm(x: f32, pitch: &PitchConfig) -> f32 {
    let half = pitch.goal_x_max - pitch.goal_center_x();
    if half <= 0.0 {
        return 0.0;
    }
    clamp01((x - pitch.goal_center_x()).abs() / half)
}

pub fn speed_norm(speed: f32, cfg: &ShotConfig) -> f32 {
    clamp01(speed / cfg.speed_norm)
}

/// Roll the keeper's answer.
///
/// A forced goal never saves; a forced save never misses and splits
/// hold/parry by `hold_share`.
pub fn draw_attempt(save_p: f32, forced: ShotOverride, keeper: &KeeperConfig, rng: &mut SimRng) -> SaveAttempt {
    let r = rng.unit();
    match forced {
        ShotOverride::Goal => SaveAttempt::Miss,
        ShotOverride::Save => {
            if r < keeper.hold_share {
                SaveAttempt::Hold
            } else {
                SaveAttempt::Parry
            }
        }
        ShotOverride::Random => {
            if r < save_p * keeper.hold_share {
                SaveAttempt::Hold
            } else if r < save_p {
                SaveAttempt::Parry
            } else {
                SaveAttempt::Miss
            }
        }
    }
}

/// Keep a saved ball at least `radius` away from the keeper's centre.
pub fn push_clear_of_keeper(ball: Vec2, keeper: Vec2, radius: f32) -> Vec2 {
    let away = ball - keeper;
    if away.length() >= radius {
        return ball;
    }
    let dir = away.normalize_or_zero();
    // Ball dead centre on the keeper: push straight back into the pitch
    let dir = if dir == Vec2::ZERO { Vec2::new(0.0, 1.0) } else { dir };
    keeper + dir * radius
}

/// Deflection velocity of a parried ball.
pub fn parry_velocity(keeper: Vec2, ball: Vec2, side: GoalSide, cfg: &ShotConfig, rng: &mut SimRng) -> Vec2 {
    let vx = (keeper.x - ball.x) * cfg.parry_keeper_bias
        + rng.range(-cfg.parry_lateral_jitter, cfg.parry_lateral_jitter);
    let vy = side.away_sign() * rng.range(cfg.parry_away_min, cfg.parry_away_max);
    Vec2::new(vx, vy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_maps_to_outcome() {
        assert_eq!(SaveAttempt::Miss.at_keeper(), None);
        assert_eq!(SaveAttempt::Parry.at_keeper(), Some(ShotOutcome::Parry));
        assert_eq!(SaveAttempt::Miss.at_goal_line(true), ShotOutcome::Goal);
        assert_eq!(SaveAttempt::Hold.at_goal_line(true), ShotOutcome::Hold);
        assert_eq!(SaveAttempt::Miss.at_goal_line(false), ShotOutcome::Hold);
    }

    #[test]
    fn test_blockers() {
        let cfg = ShotConfig::default();
        let ok = shot_blocker(BallMode::Carried, Possession::Attacker, 5000, None, 150.0, 64.0, &cfg);
        assert_eq!(ok, None);
        assert!(shot_blocker(BallMode::Shot, Possession::Attacker, 5000, None, 150.0, 64.0, &cfg).is_some());
        assert!(shot_blocker(BallMode::Carried, Possession::Defender, 5000, None, 150.0, 64.0, &cfg).is_some());
        assert!(shot_blocker(BallMode::Carried, Possession::Attacker, 5000, Some(4000), 150.0, 64.0, &cfg).is_some());
        assert!(shot_blocker(BallMode::Carried, Possession::Attacker, 5000, Some(3000), 150.0, 64.0, &cfg).is_none());
        assert!(shot_blocker(BallMode::Carried, Possession::Attacker, 5000, None, 200.0, 64.0, &cfg).is_some());
    }

    #[test]
    fn test_target_stays_inside_posts() {
        let pitch = PitchConfig::default();
        let cfg = ShotConfig { lateral_spread: 200.0, ..ShotConfig::default() };
        let mut rng = SimRng::new(11);
        for _ in 0..200 {
            let t = pick_target(GoalSide::Bottom, &pitch, &cfg, &mut rng);
            assert!(t.x >= pitch.goal_x_min + 4.0 && t.x <= pitch.goal_x_max - 4.0);
            assert_eq!(t.y, pitch.goal_bottom_y);
            assert!((0.0..=1.0).contains(&edge_norm(t.x, &pitch)));
        }
    }

    #[test]
    fn test_forced_outcomes() {
        let keeper = KeeperConfig::default();
        let mut rng = SimRng::new(5);
        for _ in 0..200 {
            assert_eq!(draw_attempt(0.95, ShotOverride::Goal, &keeper, &mut rng), SaveAttempt::Miss);
            assert_ne!(draw_attempt(0.05, ShotOverride::Save, &keeper, &mut rng), SaveAttempt::Miss);
        }
    }

    #[test]
    fn test_gate_never_shoots_at_zero_chance() {
        let cfg = ShotConfig { shot_chance: 0.0, ..ShotConfig::default() };
        let mut rng = SimRng::new(1);
        assert!((0..100).all(|_| roll_gate(&cfg, &mut rng) == ShotGate::Pass));
    }

    #[test]
    fn test_gate_turns_every_shot_into_feint_at_full_chance() {
        let cfg = ShotConfig { shot_chance: 1.0, feint_chance: 1.0, ..ShotConfig::default() };
        let mut rng = SimRng::new(2);
        assert!((0..100).all(|_| roll_gate(&cfg, &mut rng) == ShotGate::Feint));
    }

    #[test]
    fn test_push_clear_of_keeper() {
        let k = Vec2::new(180.0, 78.0);
        let pushed = push_clear_of_keeper(Vec2::new(185.0, 78.0), k, 20.0);
        assert!((pushed.distance(k) - 20.0).abs() < 1e-3);
        let far = Vec2::new(180.0, 150.0);
        assert_eq!(push_clear_of_keeper(far, k, 20.0), far);
        let centred = push_clear_of_keeper(k, k, 20.0);
        assert!(centred.y > k.y);
    }

    #[test]
    fn test_parry_flies_back_into_pitch() {
        let cfg = ShotConfig::default();
        let mut rng = SimRng::new(9);
        for _ in 0..50 {
            let v = parry_velocity(Vec2::new(180.0, 78.0), Vec2::new(170.0, 90.0), GoalSide::Top, &cfg, &mut rng);
            assert!(v.y >= 140.0 && v.y <= 220.0);
            let v = parry_velocity(Vec2::new(180.0, 562.0), Vec2::new(170.0, 550.0), GoalSide::Bottom, &cfg, &mut rng);
            assert!(v.y <= -140.0);
        }
    }
}
