//! Goalkeepers
//!
//! A keeper guesses a corner the moment a shot starts and then plays out a
//! short motion sequence:
//!
//! ```text
//! Idle ──commit──▶ Telegraph (reaction delay) ──▶ Diving (ease-out) ──▶ Down
//!                                                                         │
//!                               Idle ◀── Recover (back-ease home) ◀── timer
//! ```
//!
//! Committing again from any state cancels the running sequence. While not
//! committed the keeper tracks the ball laterally and bobs on its line.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::actor::GoalSide;
use super::config::{KeeperConfig, PitchConfig};
use super::debug_flags::keeper_debug_enabled;
use super::math::{clamp, clamp01, ease_out_back, ease_out_cubic, ease_out_sine, lerp, Vec2};
use super::rng::SimRng;

/// Bob amplitude (px) and period divisor (ms).
const BOB_PX: f32 = 0.8;
const BOB_PERIOD_MS: f32 = 260.0;

/// Lateral clearance kept from the pitch bounds while tracking.
const TRACK_EDGE_INSET: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiveCommit {
    pub target_x: f32,
    pub target_y: f32,
    pub start: Vec2,
    pub misread: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum KeeperMotion {
    Idle,
    /// Set position before the dive
    Telegraph { elapsed_ms: f32 },
    Diving { elapsed_ms: f32 },
    /// Dive finished; `recover_in_ms` counts down to `Recover` when armed
    Down { recover_in_ms: Option<f32> },
    Recover { elapsed_ms: f32, from: Vec2 },
}

/// Inputs of the commit error model.
#[derive(Debug, Clone, Copy)]
pub struct ShotRead {
    pub target_x: f32,
    pub edge_n: f32,
    pub speed_n: f32,
    /// Dive the wrong way regardless of the misread roll
    pub force_miss: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keeper {
    pub side: GoalSide,
    pub pos: Vec2,
    pub home: Vec2,
    pub fatigue: f32,
    /// Reaction delay of the most recent commit (ms)
    pub reaction_ms: f32,
    pub commit: Option<DiveCommit>,
    pub motion: KeeperMotion,
}

impl Keeper {
    pub fn new(side: GoalSide, pitch: &PitchConfig) -> Self {
        let home = pitch.keeper_home(side);
        Self {
            side,
            pos: home,
            home,
            fatigue: 0.0,
            reaction_ms: 0.0,
            commit: None,
            motion: KeeperMotion::Idle,
        }
    }

    pub fn is_committed(&self) -> bool {
        !matches!(self.motion, KeeperMotion::Idle)
    }

    pub fn is_diving(&self) -> bool {
        matches!(self.motion, KeeperMotion::Diving { .. })
    }

    /// Guess the shot and start the dive sequence.
    pub fn commit(&mut self, read: ShotRead, cfg: &KeeperConfig, pitch: &PitchConfig, rng: &mut SimRng) -> DiveCommit {
        self.fatigue = clamp(self.fatigue + cfg.fatigue_per_dive, 0.0, cfg.fatigue_cap);

        let max_err = (cfg.error_px_base + cfg.error_px_by_edge * read.edge_n + cfg.error_px_by_speed * read.speed_n
            - cfg.skill * cfg.error_px_by_skill
            + self.fatigue * cfg.error_px_by_fatigue)
            .max(cfg.error_px_min);
        let error = rng.range(-max_err, max_err);

        let misread = read.force_miss || rng.chance(misread_probability(cfg));
        let cx = pitch.goal_center_x();
        let raw_x = if misread {
            let mirrored = cx - (read.target_x - cx);
            let jitter = rng.range(-cfg.misread_jitter_px, cfg.misread_jitter_px);
            // Jitter must not carry the dive back over the center
            if (mirrored - cx).abs() > f32::EPSILON && (mirrored + jitter - cx).signum() != (mirrored - cx).signum() {
                mirrored - jitter
            } else {
                mirrored + jitter
            }
        } else {
            read.target_x + error
        };
        let target_x = clamp(raw_x, pitch.goal_x_min + cfg.post_inset, pitch.goal_x_max - cfg.post_inset);

        let forward = ((target_x - self.pos.x).abs() * 0.3).min(cfg.dive_forward_max);
        let commit = DiveCommit {
            target_x,
            target_y: self.pos.y + self.side.away_sign() * forward,
            start: self.pos,
            misread,
        };

        self.reaction_ms = rng.range(cfg.reaction_ms_min, cfg.reaction_ms_max);
        self.commit = Some(commit);
        self.motion = KeeperMotion::Telegraph { elapsed_ms: 0.0 };

        if keeper_debug_enabled() {
            debug!(
                side = ?self.side,
                target_x,
                shot_x = read.target_x,
                misread,
                reaction_ms = self.reaction_ms,
                fatigue = self.fatigue,
                "keeper commit"
            );
        }
        commit
    }

    /// Advance the motion sequence by `dt_ms`.
    pub fn advance(&mut self, dt_ms: f32, cfg: &KeeperConfig) {
        self.motion = match self.motion {
            KeeperMotion::Idle => KeeperMotion::Idle,
            KeeperMotion::Telegraph { elapsed_ms } => {
                let elapsed_ms = elapsed_ms + dt_ms;
                if elapsed_ms >= self.reaction_ms {
                    KeeperMotion::Diving { elapsed_ms: elapsed_ms - self.reaction_ms }
                } else {
                    KeeperMotion::Telegraph { elapsed_ms }
                }
            }
            KeeperMotion::Diving { elapsed_ms } => {
                let elapsed_ms = elapsed_ms + dt_ms;
                let t = if cfg.dive_ms > 0.0 { clamp01(elapsed_ms / cfg.dive_ms) } else { 1.0 };
                if let Some(c) = self.commit {
                    self.pos.x = lerp(c.start.x, c.target_x, ease_out_cubic(t));
                    self.pos.y = lerp(c.start.y, c.target_y, ease_out_sine(t));
                }
                if t >= 1.0 {
                    KeeperMotion::Down { recover_in_ms: None }
                } else {
                    KeeperMotion::Diving { elapsed_ms }
                }
            }
            KeeperMotion::Down { recover_in_ms: Some(left) } => {
                let left = left - dt_ms;
                if left <= 0.0 {
                    KeeperMotion::Recover { elapsed_ms: 0.0, from: self.pos }
                } else {
                    KeeperMotion::Down { recover_in_ms: Some(left) }
                }
            }
            down @ KeeperMotion::Down { recover_in_ms: None } => down,
            KeeperMotion::Recover { elapsed_ms, from } => {
                let elapsed_ms = elapsed_ms + dt_ms;
                let t = if cfg.recover_ms > 0.0 { clamp01(elapsed_ms / cfg.recover_ms) } else { 1.0 };
                self.pos = from.lerp(self.home, ease_out_back(t));
                if t >= 1.0 {
                    self.pos = self.home;
                    self.commit = None;
                    KeeperMotion::Idle
                } else {
                    KeeperMotion::Recover { elapsed_ms, from }
                }
            }
        };
    }

    /// Stop where the keeper is and walk home after `delay_ms`.
    pub fn recover_after(&mut self, delay_ms: f32) {
        self.motion = KeeperMotion::Down { recover_in_ms: Some(delay_ms.max(0.0)) };
    }

    /// Cancel everything and stand at home.
    pub fn reset_instant(&mut self) {
        self.pos = self.home;
        self.commit = None;
        self.motion = KeeperMotion::Idle;
    }

    /// Lateral tracking and idle bob; no-op while committed.
    pub fn track(&mut self, ball_x: f32, now_ms: u64, cfg: &KeeperConfig, pitch: &PitchConfig) {
        if self.is_committed() {
            return;
        }
        let bob = (now_ms as f32 / BOB_PERIOD_MS).sin() * BOB_PX;
        self.pos.y = self.home.y + match self.side {
            GoalSide::Top => bob,
            GoalSide::Bottom => -bob,
        };
        let tx = clamp(ball_x, pitch.goal_x_min + TRACK_EDGE_INSET, pitch.goal_x_max - TRACK_EDGE_INSET);
        let aim = lerp(self.home.x, tx, cfg.tracking_share);
        self.pos.x = clamp(
            lerp(self.pos.x, aim, cfg.positioning_k),
            pitch.min_x + TRACK_EDGE_INSET,
            pitch.max_x - TRACK_EDGE_INSET,
        );
    }

    pub fn decay_fatigue(&mut self, dt: f32, cfg: &KeeperConfig) {
        if !self.is_diving() {
            self.fatigue = (self.fatigue - cfg.fatigue_recover_per_sec * dt).max(0.0);
        }
    }

    pub fn save_probability(&self, edge_n: f32, speed_n: f32, cfg: &KeeperConfig) -> f32 {
        save_probability(edge_n, speed_n, self.reaction_ms, self.fatigue, cfg)
    }
}

/// Chance of diving the wrong way; better keepers misread less.
pub fn misread_probability(cfg: &KeeperConfig) -> f32 {
    clamp01(cfg.misread_chance * (1.0 - cfg.skill * (1.0 - cfg.misread_chance)))
}

pub fn save_probability(edge_n: f32, speed_n: f32, reaction_ms: f32, fatigue: f32, cfg: &KeeperConfig) -> f32 {
    let reaction = if cfg.reaction_ms_max > 0.0 { clamp01(reaction_ms / cfg.reaction_ms_max) } else { 0.0 };
    let tired = if cfg.fatigue_cap > 0.0 { clamp01(fatigue / cfg.fatigue_cap) } else { 0.0 };
    let p = cfg.base_save + cfg.skill * cfg.skill_save_weight
        - clamp01(edge_n) * cfg.edge_save_penalty
        - clamp01(speed_n) * cfg.speed_save_penalty
        - reaction * cfg.reaction_penalty_max
        - tired * cfg.fatigue_penalty_max;
    clamp(p, cfg.save_prob_min, cfg.save_prob_max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(x: f32) -> ShotRead {
        ShotRead { target_x: x, edge_n: 0.5, speed_n: 0.77, force_miss: false }
    }

    fn run(k: &mut Keeper, cfg: &KeeperConfig, ms: f32) {
        let mut t = 0.0;
        while t < ms {
            k.advance(16.0, cfg);
            t += 16.0;
        }
    }

    #[test]
    fn test_commit_sequence_reaches_target_then_stays_down() {
        let pitch = PitchConfig::default();
        let cfg = KeeperConfig { misread_chance: 0.0, ..KeeperConfig::default() };
        let mut rng = SimRng::new(4);
        let mut k = Keeper::new(GoalSide::Top, &pitch);
        let c = k.commit(read(200.0), &cfg, &pitch, &mut rng);
        assert!(matches!(k.motion, KeeperMotion::Telegraph { .. }));
        assert!(!c.misread);
        assert!(c.target_y >= c.start.y);

        run(&mut k, &cfg, 600.0);
        assert_eq!(k.motion, KeeperMotion::Down { recover_in_ms: None });
        assert!((k.pos.x - c.target_x).abs() < 1e-3);
        assert!((k.pos.y - c.target_y).abs() < 1e-3);
    }

    #[test]
    fn test_recover_returns_home_and_goes_idle() {
        let pitch = PitchConfig::default();
        let cfg = KeeperConfig::default();
        let mut rng = SimRng::new(4);
        let mut k = Keeper::new(GoalSide::Bottom, &pitch);
        k.commit(read(150.0), &cfg, &pitch, &mut rng);
        run(&mut k, &cfg, 100.0);
        k.recover_after(cfg.hold_recover_delay_ms);
        run(&mut k, &cfg, 200.0);
        assert!(matches!(k.motion, KeeperMotion::Down { .. }));
        run(&mut k, &cfg, 500.0);
        assert_eq!(k.motion, KeeperMotion::Idle);
        assert_eq!(k.pos, k.home);
        assert!(k.commit.is_none());
    }

    #[test]
    fn test_forced_miss_mirrors_the_dive() {
        let pitch = PitchConfig::default();
        let cfg = KeeperConfig::default();
        let mut rng = SimRng::new(8);
        let cx = pitch.goal_center_x();
        for _ in 0..100 {
            let mut k = Keeper::new(GoalSide::Top, &pitch);
            let c = k.commit(ShotRead { force_miss: true, ..read(cx + 20.0) }, &cfg, &pitch, &mut rng);
            assert!(c.misread);
            assert!(c.target_x < cx);
        }
    }

    #[test]
    fn test_certain_misread_mirrors_the_dive() {
        let pitch = PitchConfig::default();
        let cfg = KeeperConfig { misread_chance: 1.0, ..KeeperConfig::default() };
        assert_eq!(misread_probability(&cfg), 1.0);
        let mut rng = SimRng::new(2);
        let cx = pitch.goal_center_x();
        for _ in 0..100 {
            let mut k = Keeper::new(GoalSide::Bottom, &pitch);
            let c = k.commit(read(cx - 25.0), &cfg, &pitch, &mut rng);
            assert!(c.misread);
            assert!(c.target_x > cx);
        }
    }

    #[test]
    fn test_dive_target_kept_inside_posts() {
        let pitch = PitchConfig::default();
        let cfg = KeeperConfig { error_px_base: 200.0, misread_chance: 0.0, ..KeeperConfig::default() };
        let mut rng = SimRng::new(13);
        for _ in 0..100 {
            let mut k = Keeper::new(GoalSide::Top, &pitch);
            let c = k.commit(read(pitch.goal_x_max - 4.0), &cfg, &pitch, &mut rng);
            assert!(c.target_x >= pitch.goal_x_min + 6.0 && c.target_x <= pitch.goal_x_max - 6.0);
        }
    }

    #[test]
    fn test_recommit_cancels_running_motion() {
        let pitch = PitchConfig::default();
        let cfg = KeeperConfig::default();
        let mut rng = SimRng::new(3);
        let mut k = Keeper::new(GoalSide::Top, &pitch);
        k.commit(read(150.0), &cfg, &pitch, &mut rng);
        run(&mut k, &cfg, 200.0);
        k.commit(read(210.0), &cfg, &pitch, &mut rng);
        assert_eq!(k.motion, KeeperMotion::Telegraph { elapsed_ms: 0.0 });
    }

    #[test]
    fn test_fatigue_accumulates_and_caps() {
        let pitch = PitchConfig::default();
        let cfg = KeeperConfig::default();
        let mut rng = SimRng::new(1);
        let mut k = Keeper::new(GoalSide::Top, &pitch);
        for _ in 0..10 {
            k.commit(read(180.0), &cfg, &pitch, &mut rng);
        }
        assert!((k.fatigue - cfg.fatigue_cap).abs() < 1e-6);
        k.reset_instant();
        k.decay_fatigue(1.0, &cfg);
        assert!((k.fatigue - 0.7).abs() < 1e-5);
    }

    #[test]
    fn test_tracking_follows_ball_and_skips_when_committed() {
        let pitch = PitchConfig::default();
        let cfg = KeeperConfig::default();
        let mut k = Keeper::new(GoalSide::Top, &pitch);
        for t in 0..200 {
            k.track(300.0, t * 16, &cfg, &pitch);
        }
        assert!(k.pos.x > k.home.x + 10.0);
        assert!((k.pos.y - k.home.y).abs() <= 0.8 + 1e-4);

        let mut rng = SimRng::new(6);
        k.commit(read(150.0), &cfg, &pitch, &mut rng);
        let before = k.pos;
        k.track(20.0, 5000, &cfg, &pitch);
        assert_eq!(k.pos, before);
    }

    #[test]
    fn test_save_probability_bounds_and_baseline() {
        let cfg = KeeperConfig::default();
        let p = save_probability(0.0, 0.0, 0.0, 0.0, &cfg);
        assert!((p - 0.805).abs() < 1e-4);
        assert_eq!(save_probability(1.0, 1.0, 1000.0, 5.0, &cfg), cfg.save_prob_min);
        let easy = KeeperConfig { skill: 5.0, ..KeeperConfig::default() };
        assert_eq!(save_probability(0.0, 0.0, 0.0, 0.0, &easy), easy.save_prob_max);
    }
}
