//! Ball State Machine
//!
//! One ball, three modes:
//!
//! | Mode | Position source | Public velocity |
//! |------|-----------------|-----------------|
//! | `Carried` | dribble spring around the carrier | always zero |
//! | `Shot` | linear flight toward the goal target | constant |
//! | `Rebound` | free flight with friction and bounce | decaying |
//!
//! Transitions are explicit methods (`carry`, `launch_shot`, `deflect`,
//! `hold`); the session decides when to call them.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::actor::{Actor, Possession};
use super::config::PitchConfig;
use super::debug_flags::ball_debug_enabled;
use super::dribble::DribbleController;
use super::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallMode {
    Carried,
    Shot,
    Rebound,
}

/// What a shot-flight step ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotContact {
    None,
    Keeper,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pos: Vec2,
    velocity: Vec2,
    mode: BallMode,
    /// Spring velocity used by the dribble model while carried
    #[serde(skip)]
    carry_velocity: Vec2,
}

impl Ball {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, velocity: Vec2::ZERO, mode: BallMode::Carried, carry_velocity: Vec2::ZERO }
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn mode(&self) -> BallMode {
        self.mode
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Any mode → Carried: snap just above the carrier and drop all motion.
    pub fn carry(&mut self, carrier_pos: Vec2, snap_offset: f32) {
        self.mode = BallMode::Carried;
        self.pos = Vec2::new(carrier_pos.x, carrier_pos.y - snap_offset);
        self.velocity = Vec2::ZERO;
        self.carry_velocity = Vec2::ZERO;
    }

    /// Carried → Shot. Returns `false` (and changes nothing) when the target
    /// gives no direction.
    pub fn launch_shot(&mut self, target: Vec2, speed: f32) -> bool {
        let dir = (target - self.pos).normalize_or_zero();
        if dir == Vec2::ZERO || speed <= 0.0 {
            return false;
        }
        self.mode = BallMode::Shot;
        self.velocity = dir * speed;
        self.carry_velocity = Vec2::ZERO;
        true
    }

    /// Shot → Rebound with a deflection velocity.
    pub fn deflect(&mut self, at: Vec2, velocity: Vec2) {
        self.mode = BallMode::Rebound;
        self.pos = at;
        self.velocity = velocity;
    }

    /// Shot → Carried at the keeper's hands (no carrier drives it).
    pub fn hold(&mut self, at: Vec2) {
        self.mode = BallMode::Carried;
        self.pos = at;
        self.velocity = Vec2::ZERO;
        self.carry_velocity = Vec2::ZERO;
    }

    /// Goal: the ball stops where it crossed and is conceptually carried again.
    pub fn settle_in_goal(&mut self) {
        self.mode = BallMode::Carried;
        self.velocity = Vec2::ZERO;
        self.carry_velocity = Vec2::ZERO;
    }

    /// Small displacement without a mode change (feints).
    pub fn nudge(&mut self, offset: Vec2) {
        self.pos += offset;
    }

    // ========================================================================
    // Per-mode steps
    // ========================================================================

    /// Carried tick: the dribble spring moves the ball; public velocity stays zero.
    pub fn step_carried(&mut self, dribble: &mut DribbleController, carrier: &mut Actor, dt: f32) {
        debug_assert_eq!(self.mode, BallMode::Carried);
        dribble.step(
            carrier.pos,
            carrier.vel,
            &mut carrier.dribble,
            &mut self.pos,
            &mut self.carry_velocity,
            dt,
        );
        self.velocity = Vec2::ZERO;
        if ball_debug_enabled() {
            trace!(
                x = self.pos.x,
                y = self.pos.y,
                spring_speed = self.carry_velocity.length(),
                control = carrier.dribble.control,
                "carried ball"
            );
        }
    }

    /// Shot tick: linear flight, then the keeper proximity test.
    ///
    /// `keeper` is `None` when contact must not be checked (a pre-decided
    /// miss flies through to the line).
    pub fn step_shot(&mut self, dt: f32, keeper: Option<Vec2>, contact_radius: f32) -> ShotContact {
        debug_assert_eq!(self.mode, BallMode::Shot);
        self.pos += self.velocity * dt;
        match keeper {
            Some(k) if self.pos.distance(k) < contact_radius => ShotContact::Keeper,
            _ => ShotContact::None,
        }
    }

    /// Rebound tick: integrate, per-tick friction, inelastic bounce at the bounds.
    pub fn step_rebound(&mut self, dt: f32, friction: f32, restitution: f32, pitch: &PitchConfig) {
        debug_assert_eq!(self.mode, BallMode::Rebound);
        self.pos += self.velocity * dt;
        self.velocity *= friction;

        if self.pos.x < pitch.min_x || self.pos.x > pitch.max_x {
            self.velocity.x *= -restitution;
            self.pos.x = self.pos.x.clamp(pitch.min_x, pitch.max_x);
        }
        if self.pos.y < pitch.min_y || self.pos.y > pitch.max_y {
            self.velocity.y *= -restitution;
            self.pos.y = self.pos.y.clamp(pitch.min_y, pitch.max_y);
        }
    }

    /// First player close enough and slow enough relative to the ball.
    pub fn pickup_candidate(
        &self,
        players: [(Possession, &Actor); 2],
        max_dist: f32,
        max_rel_speed: f32,
    ) -> Option<Possession> {
        players.into_iter().find_map(|(who, actor)| {
            let close = self.pos.distance(actor.pos) <= max_dist;
            let slow = (self.velocity - actor.vel).length() <= max_rel_speed;
            (close && slow).then_some(who)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::actor::Team;
    use crate::engine::timestep::TICK_DT;
    use proptest::prelude::*;

    #[test]
    fn test_carried_tick_keeps_public_velocity_zero() {
        let mut ball = Ball::new(Vec2::new(180.0, 330.0));
        let mut dribble = DribbleController::default();
        let mut carrier = Actor::new(Team::Red, 90.0);
        carrier.place(Vec2::new(180.0, 320.0));
        carrier.vel = Vec2::new(20.0, -80.0);
        for _ in 0..30 {
            ball.step_carried(&mut dribble, &mut carrier, TICK_DT);
            assert_eq!(ball.velocity(), Vec2::ZERO);
            assert_eq!(ball.mode(), BallMode::Carried);
        }
        // The ball still moved under the spring
        assert_ne!(ball.pos(), Vec2::new(180.0, 330.0));
    }

    #[test]
    fn test_launch_shot_aims_at_target() {
        let mut ball = Ball::new(Vec2::new(180.0, 160.0));
        assert!(ball.launch_shot(Vec2::new(180.0, 64.0), 185.0));
        assert_eq!(ball.mode(), BallMode::Shot);
        assert!((ball.velocity().y + 185.0).abs() < 1e-3);
        assert!(ball.velocity().x.abs() < 1e-3);
    }

    #[test]
    fn test_launch_shot_rejects_degenerate_target() {
        let mut ball = Ball::new(Vec2::new(180.0, 64.0));
        assert!(!ball.launch_shot(Vec2::new(180.0, 64.0), 185.0));
        assert_eq!(ball.mode(), BallMode::Carried);
    }

    #[test]
    fn test_shot_reports_keeper_contact() {
        let mut ball = Ball::new(Vec2::new(180.0, 100.0));
        ball.launch_shot(Vec2::new(180.0, 64.0), 185.0);
        let keeper = Vec2::new(180.0, 80.0);
        let mut hit = false;
        for _ in 0..20 {
            if ball.step_shot(TICK_DT, Some(keeper), 15.0) == ShotContact::Keeper {
                hit = true;
                break;
            }
        }
        assert!(hit);
    }

    #[test]
    fn test_shot_without_keeper_flies_through() {
        let mut ball = Ball::new(Vec2::new(180.0, 100.0));
        ball.launch_shot(Vec2::new(180.0, 64.0), 185.0);
        for _ in 0..20 {
            assert_eq!(ball.step_shot(TICK_DT, None, 15.0), ShotContact::None);
        }
        assert!(ball.pos().y < 64.0);
    }

    #[test]
    fn test_rebound_bounces_off_bounds() {
        let pitch = PitchConfig::default();
        let mut ball = Ball::new(Vec2::new(pitch.min_x + 1.0, 300.0));
        ball.deflect(ball.pos(), Vec2::new(-200.0, 0.0));
        ball.step_rebound(TICK_DT, 0.985, 0.5, &pitch);
        assert_eq!(ball.pos().x, pitch.min_x);
        assert!(ball.velocity().x > 0.0);
        assert!((ball.velocity().x - 200.0 * 0.985 * 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_pickup_prefers_listed_order_and_checks_rel_speed() {
        let mut ball = Ball::new(Vec2::new(100.0, 100.0));
        ball.deflect(ball.pos(), Vec2::new(30.0, 0.0));
        let mut att = Actor::new(Team::Red, 90.0);
        att.place(Vec2::new(110.0, 100.0));
        let mut def = Actor::new(Team::Blue, 90.0);
        def.place(Vec2::new(95.0, 100.0));
        let who = ball.pickup_candidate([(Possession::Attacker, &att), (Possession::Defender, &def)], 18.0, 80.0);
        assert_eq!(who, Some(Possession::Attacker));

        att.vel = Vec2::new(-120.0, 0.0);
        let who = ball.pickup_candidate([(Possession::Attacker, &att), (Possession::Defender, &def)], 18.0, 80.0);
        assert_eq!(who, Some(Possession::Defender));
    }

    proptest! {
        #[test]
        fn prop_rebound_never_gains_speed(
            x in 0.0f32..360.0, y in 40.0f32..600.0,
            vx in -400.0f32..400.0, vy in -400.0f32..400.0,
        ) {
            let pitch = PitchConfig::default();
            let mut ball = Ball::new(Vec2::new(x, y));
            ball.deflect(Vec2::new(x, y), Vec2::new(vx, vy));
            let before = ball.speed();
            ball.step_rebound(TICK_DT, 0.985, 0.5, &pitch);
            prop_assert!(ball.speed() <= before + 1e-4);
            prop_assert_eq!(ball.mode(), BallMode::Rebound);
        }
    }
}
