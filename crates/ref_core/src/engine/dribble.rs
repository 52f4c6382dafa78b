//! Dribble Controller
//!
//! Keeps a carried ball orbiting the carrier's feet with inertia instead of
//! gluing it to the body. A stride phase opens a periodic "touch window"
//! during which the spring stiffens; a composure value (`control`) drops on
//! sharp turns and high speed and recovers while the ball stays close.
//!
//! ## Per-step pipeline
//! 1. clamp dt
//! 2. travel direction (falls back to the previous one when standing)
//! 3. turn angle, stride phase, touch window
//! 4. control loss / regain
//! 5. desired offset = forward lead + stride + lateral sway + foot bias
//! 6. blended spring-damper + leash, semi-implicit Euler, speed clamp

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::actor::DribbleState;
use super::config::DribbleConfig;
use super::math::{clamp01, lerp, sign_or_one, signed_angle_between, smoothstep, wrap_pi, Vec2};

/// Touch window half-width in radians of stride phase.
const TOUCH_WINDOW: f32 = 0.55;

/// Extra forward lead at zero control (px).
const LOOSE_LEAD_PX: f32 = 6.0;

/// Working values of the last step.
///
/// Owned by one controller and overwritten every step; not reentrant.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DribbleScratch {
    pub dir: Vec2,
    pub right: Vec2,
    pub desired: Vec2,
    pub accel: Vec2,
    pub touch: f32,
    pub turn: f32,
}

#[derive(Debug, Clone)]
pub struct DribbleController {
    config: DribbleConfig,
    scratch: DribbleScratch,
}

impl DribbleController {
    pub fn new(config: DribbleConfig) -> Self {
        Self { config, scratch: DribbleScratch::default() }
    }

    pub fn config(&self) -> &DribbleConfig {
        &self.config
    }

    /// Values computed by the most recent `step`.
    pub fn scratch(&self) -> &DribbleScratch {
        &self.scratch
    }

    /// Advance the carried ball by one step.
    pub fn step(
        &mut self,
        carrier_pos: Vec2,
        carrier_vel: Vec2,
        state: &mut DribbleState,
        ball_pos: &mut Vec2,
        ball_vel: &mut Vec2,
        dt: f32,
    ) {
        let p = &self.config;
        let s = &mut self.scratch;
        let dt = if dt.is_finite() { dt.clamp(0.0, p.max_dt) } else { 0.0 };

        // Direction from velocity; keep the previous one when nearly stopped
        let speed = carrier_vel.length();
        s.dir = if speed > 1e-3 { carrier_vel * (1.0 / speed) } else { state.prev_dir };

        s.turn = wrap_pi(signed_angle_between(state.prev_dir, s.dir));
        state.prev_dir = s.dir;

        let phase_hz = p.phase_base_hz + p.phase_speed_hz * speed;
        state.phase = (state.phase + TAU * phase_hz * dt) % TAU;

        let ph = wrap_pi(state.phase);
        s.touch = 1.0 - smoothstep(TOUCH_WINDOW * 0.55, TOUCH_WINDOW, ph.abs());

        // Composure
        let dist_to_carrier = carrier_pos.distance(*ball_pos);
        let lose = (s.turn.abs() * p.lose_turn_rate + speed * p.lose_speed_rate) * dt;
        let mut control = clamp01(state.control - lose);
        let near = 1.0 - smoothstep(p.close_dist * 0.7, p.close_dist, dist_to_carrier);
        control = clamp01(control + p.regain_rate * near * dt);
        state.control = control;

        // Desired ball spot
        let s_n = clamp01(speed / p.full_speed);
        let loose = 1.0 - control;
        let fwd = lerp(p.forward_min, p.forward_max, s_n) + loose * LOOSE_LEAD_PX;
        let turning = if s.turn != 0.0 { 1.0 } else { 0.0 };
        let side = (p.side_base + p.side_turn_boost * turning)
            * sign_or_one(state.phase.sin())
            * lerp(1.0, 0.55, loose);
        let stride = p.stride_amp * (state.phase * 2.0).sin() * lerp(1.0, 0.4, loose);

        s.right = s.dir.right();
        s.desired = carrier_pos + s.dir * (fwd + stride) + s.right * side;
        let foot_bias = lerp(p.foot_bias_min, p.foot_bias_max, s_n);
        s.desired.y += foot_bias * s.dir.y * clamp01(s.dir.y.abs());

        // Spring blend between free and touch regimes
        let k = lerp(p.k_free, p.k_touch, s.touch);
        let zeta = lerp(p.zeta_free, p.zeta_touch, s.touch);
        let c = 2.0 * zeta * k.sqrt();

        let offset = s.desired - *ball_pos;
        s.accel = offset * k - *ball_vel * c;

        let dist = offset.length();
        if dist > p.max_leash {
            let over = dist - p.max_leash;
            s.accel += offset * (p.leash_k * over / dist);
        }

        // Semi-implicit Euler
        *ball_vel += s.accel * dt;
        *ball_vel = ball_vel.clamp_length(p.max_ball_speed);
        *ball_pos += *ball_vel * dt;
    }
}

impl Default for DribbleController {
    fn default() -> Self {
        Self::new(DribbleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::timestep::TICK_DT;
    use proptest::prelude::*;

    fn run(controller: &mut DribbleController, carrier_vel: Vec2, ticks: usize) -> (Vec2, Vec2, DribbleState) {
        let mut state = DribbleState::default();
        let mut carrier = Vec2::new(180.0, 320.0);
        let mut ball = carrier + Vec2::new(0.0, 12.0);
        let mut vel = Vec2::ZERO;
        for _ in 0..ticks {
            carrier += carrier_vel * TICK_DT;
            controller.step(carrier, carrier_vel, &mut state, &mut ball, &mut vel, TICK_DT);
        }
        (carrier, ball, state)
    }

    #[test]
    fn test_ball_stays_near_running_carrier() {
        let mut c = DribbleController::default();
        let (carrier, ball, state) = run(&mut c, Vec2::new(0.0, -85.0), 300);
        let d = carrier.distance(ball);
        assert!(d < 45.0, "ball drifted {d}px from carrier");
        assert!(state.control > 0.5);
    }

    #[test]
    fn test_standing_carrier_keeps_previous_direction() {
        let mut c = DribbleController::default();
        let mut state = DribbleState { prev_dir: Vec2::new(1.0, 0.0), ..DribbleState::default() };
        let mut ball = Vec2::new(100.0, 100.0);
        let mut vel = Vec2::ZERO;
        c.step(Vec2::new(100.0, 100.0), Vec2::ZERO, &mut state, &mut ball, &mut vel, TICK_DT);
        assert_eq!(state.prev_dir, Vec2::new(1.0, 0.0));
        assert_eq!(c.scratch().turn, 0.0);
    }

    #[test]
    fn test_sharp_turn_costs_control() {
        let mut c = DribbleController::default();
        let mut state = DribbleState { prev_dir: Vec2::new(0.0, 1.0), ..DribbleState::default() };
        // Ball far away so no regain masks the loss
        let mut ball = Vec2::new(0.0, 0.0);
        let mut vel = Vec2::ZERO;
        c.step(Vec2::new(200.0, 200.0), Vec2::new(0.0, -90.0), &mut state, &mut ball, &mut vel, TICK_DT);
        assert!(state.control < 1.0);
        assert!(c.scratch().turn.abs() > 3.0);
    }

    #[test]
    fn test_hitch_dt_is_clamped() {
        let mut a = DribbleController::default();
        let mut b = DribbleController::default();
        let (mut sa, mut sb) = (DribbleState::default(), DribbleState::default());
        let (mut pa, mut pb) = (Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0));
        let (mut va, mut vb) = (Vec2::ZERO, Vec2::ZERO);
        let carrier = Vec2::new(30.0, 0.0);
        a.step(carrier, Vec2::ZERO, &mut sa, &mut pa, &mut va, 5.0);
        b.step(carrier, Vec2::ZERO, &mut sb, &mut pb, &mut vb, 1.0 / 30.0);
        assert_eq!(pa, pb);
        assert_eq!(va, vb);
    }

    proptest! {
        #[test]
        fn prop_ball_speed_never_exceeds_cap(
            cx in 20.0f32..340.0, cy in 70.0f32..570.0,
            vx in -120.0f32..120.0, vy in -120.0f32..120.0,
            bx in -400.0f32..400.0, by in -400.0f32..400.0,
            bvx in -2000.0f32..2000.0, bvy in -2000.0f32..2000.0,
            phase in 0.0f32..6.28, dt in 0.0f32..0.5,
        ) {
            let mut c = DribbleController::default();
            let mut state = DribbleState { phase, ..DribbleState::default() };
            let mut ball = Vec2::new(cx + bx, cy + by);
            let mut vel = Vec2::new(bvx, bvy);
            c.step(Vec2::new(cx, cy), Vec2::new(vx, vy), &mut state, &mut ball, &mut vel, dt);
            prop_assert!(vel.length() <= c.config().max_ball_speed + 1e-2);
            prop_assert!((0.0..=1.0).contains(&state.control));
        }
    }
}
