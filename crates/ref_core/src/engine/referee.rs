//! Referee avatar
//!
//! The referee trails the duel on a ring around the attacker/defender
//! midpoint, keeps clear of both players and of the HUD strip at the bottom,
//! and freezes while a decision is open (after a short micro-step).

use serde::{Deserialize, Serialize};

use super::config::{PitchConfig, RefereeConfig};
use super::math::{clamp, Vec2};
use super::rng::SimRng;
use super::steering::{arrive, repulsion, smooth_velocity};

/// Edge clearance kept from the pitch bounds.
const EDGE_INSET: f32 = 10.0;

/// Per-round motion style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefereeStyle {
    pub desired_dist: f32,
    pub max_speed: f32,
    pub smooth: f32,
}

impl RefereeStyle {
    pub fn roll(cfg: &RefereeConfig, rng: &mut SimRng) -> Self {
        Self {
            desired_dist: rng.range(cfg.desired_dist_min, cfg.desired_dist_max),
            max_speed: rng.range(cfg.max_speed_min, cfg.max_speed_max),
            smooth: rng.range(cfg.smooth_min, cfg.smooth_max),
        }
    }
}

impl Default for RefereeStyle {
    fn default() -> Self {
        Self { desired_dist: 125.0, max_speed: 75.0, smooth: 0.09 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Referee {
    pub pos: Vec2,
    pub vel: Vec2,
    pub style: RefereeStyle,
    /// End of the decision micro-step (0 = locked or not in a decision)
    micro_step_until_ms: u64,
}

impl Referee {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, vel: Vec2::ZERO, style: RefereeStyle::default(), micro_step_until_ms: 0 }
    }

    /// Round-start placement near the midpoint of the two spawns.
    pub fn spawn_position(attacker: Vec2, defender: Vec2, pitch: &PitchConfig, rng: &mut SimRng) -> Vec2 {
        let cy = pitch.height / 2.0;
        let mid_y = (attacker.y + defender.y) / 2.0;
        Vec2::new(
            clamp(pitch.width / 2.0 + rng.range(-40.0, 40.0), pitch.min_x + 20.0, pitch.max_x - 20.0),
            clamp(mid_y + rng.range(-40.0, 40.0), cy - 40.0, cy + 90.0),
        )
    }

    pub fn reset(&mut self, pos: Vec2, style: RefereeStyle) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.style = style;
        self.micro_step_until_ms = 0;
    }

    /// Open the decision micro-step window.
    pub fn begin_decision(&mut self, now_ms: u64, cfg: &RefereeConfig, rng: &mut SimRng) {
        let len = rng.range(cfg.micro_step_min_ms as f32, cfg.micro_step_max_ms as f32);
        self.micro_step_until_ms = now_ms + len as u64;
    }

    pub fn is_locked(&self) -> bool {
        self.micro_step_until_ms == 0
    }

    /// Ideal spot on the trailing ring, pushed off players and clamped.
    pub fn ideal_position(&self, attacker: Vec2, defender: Vec2, pitch: &PitchConfig, cfg: &RefereeConfig) -> Vec2 {
        let focus = (attacker + defender) * 0.5;
        let mut dir = (self.pos - focus).normalize_or_zero();
        if dir == Vec2::ZERO {
            dir = Vec2::DOWN;
        }
        let mut ideal = focus + dir * self.style.desired_dist;
        ideal += repulsion(self.pos, attacker, cfg.avoid_dist, cfg.avoid_push);
        ideal += repulsion(self.pos, defender, cfg.avoid_dist, cfg.avoid_push);
        self.clamp_to_view(ideal, pitch, cfg)
    }

    /// One motion tick. `in_decision` switches to micro-step-then-lock.
    #[allow(clippy::too_many_arguments)]
    pub fn step(
        &mut self,
        attacker: Vec2,
        defender: Vec2,
        in_decision: bool,
        now_ms: u64,
        dt: f32,
        pitch: &PitchConfig,
        cfg: &RefereeConfig,
    ) {
        let mut ideal = self.ideal_position(attacker, defender, pitch, cfg);
        if in_decision {
            if self.micro_step_until_ms > 0 && now_ms < self.micro_step_until_ms {
                let focus = (attacker + defender) * 0.5;
                let away = self.pos - focus;
                if away.length() < cfg.min_focus_dist {
                    let dir = if away.length() < 0.001 { Vec2::DOWN } else { away.normalize_or_zero() };
                    ideal = focus + dir * cfg.min_focus_dist;
                }
                self.move_towards(ideal, dt, cfg.arrive_k, cfg.micro_step_speed);
            } else {
                self.micro_step_until_ms = 0;
                self.vel = Vec2::ZERO;
            }
        } else {
            self.move_towards(ideal, dt, cfg.arrive_k, self.style.max_speed);
        }
        self.pos = self.clamp_to_view(self.pos, pitch, cfg);
    }

    fn move_towards(&mut self, target: Vec2, dt: f32, arrive_k: f32, max_speed: f32) {
        let desired = arrive(self.pos, target, arrive_k, max_speed);
        self.vel = smooth_velocity(self.vel, desired, self.style.smooth);
        if self.pos.distance(target) >= 0.001 {
            self.pos += self.vel * dt;
        }
    }

    fn clamp_to_view(&self, p: Vec2, pitch: &PitchConfig, cfg: &RefereeConfig) -> Vec2 {
        Vec2::new(
            clamp(p.x, pitch.min_x + EDGE_INSET, pitch.max_x - EDGE_INSET),
            clamp(p.y, pitch.min_y + EDGE_INSET, pitch.max_y - cfg.hud_clear),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::timestep::{TICK_DT, TICK_MS};

    #[test]
    fn test_referee_settles_on_trailing_ring() {
        let pitch = PitchConfig::default();
        let cfg = RefereeConfig::default();
        let mut r = Referee::new(Vec2::new(180.0, 330.0));
        let a = Vec2::new(170.0, 220.0);
        let d = Vec2::new(190.0, 200.0);
        for i in 0..600u64 {
            r.step(a, d, false, i * TICK_MS, TICK_DT, &pitch, &cfg);
        }
        let focus = (a + d) * 0.5;
        let dist = r.pos.distance(focus);
        assert!(dist > 100.0 && dist < 200.0, "ring distance {dist}");
    }

    #[test]
    fn test_referee_respects_hud_clearance() {
        let pitch = PitchConfig::default();
        let cfg = RefereeConfig::default();
        let mut r = Referee::new(Vec2::new(180.0, 560.0));
        let a = Vec2::new(180.0, 500.0);
        for i in 0..300u64 {
            r.step(a, a, false, i * TICK_MS, TICK_DT, &pitch, &cfg);
            assert!(r.pos.y <= pitch.max_y - cfg.hud_clear + 1e-3);
        }
    }

    #[test]
    fn test_decision_micro_step_then_lock() {
        let pitch = PitchConfig::default();
        let cfg = RefereeConfig::default();
        let mut rng = SimRng::new(3);
        let mut r = Referee::new(Vec2::new(180.0, 400.0));
        r.vel = Vec2::new(10.0, 10.0);
        let a = Vec2::new(180.0, 200.0);
        r.begin_decision(1000, &cfg, &mut rng);
        assert!(!r.is_locked());
        let mut now = 1000;
        while now < 1300 {
            r.step(a, a, true, now, TICK_DT, &pitch, &cfg);
            now += TICK_MS;
        }
        assert!(r.is_locked());
        assert_eq!(r.vel, Vec2::ZERO);
        let frozen = r.pos;
        r.step(a, a, true, now, TICK_DT, &pitch, &cfg);
        assert_eq!(r.pos, frozen);
    }

    #[test]
    fn test_spawn_stays_near_center() {
        let pitch = PitchConfig::default();
        let mut rng = SimRng::new(17);
        for _ in 0..100 {
            let p = Referee::spawn_position(Vec2::new(150.0, 450.0), Vec2::new(200.0, 200.0), &pitch, &mut rng);
            assert!(p.y >= 280.0 && p.y <= 410.0);
            assert!(p.x >= 140.0 && p.x <= 220.0);
        }
    }
}
