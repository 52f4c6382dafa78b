//! Match session
//!
//! `Session` owns every piece of mutable match state and advances it one
//! fixed tick at a time. The presentation layer calls [`Session::tick`] once
//! per frame, reads state through the accessors or [`Session::snapshot`], and
//! drains [`SimEvent`]s.
//!
//! ## Tick order
//!
//! ```text
//! clock ─▶ referee ─▶ replay record ─▶ ball ─▶ keepers ─▶ players ─▶ incident ─▶ shot
//! ```
//!
//! While a decision is pending the round is paused: the ball and players
//! freeze, the referee finishes its micro-step and the match clock keeps
//! running (half/full time wait for the call).

use std::mem;

use tracing::{debug, info, warn};

use super::actor::{Actor, DribbleState, GoalSide, Possession, Team};
use super::ball::{Ball, BallMode, ShotContact};
use super::card_system::CardSystem;
use super::config::SimConfig;
use super::decision::{score_decision, DecisionOutcome, DecisionStage, DecisionStep, RefereeScore, UserDecision};
use super::dribble::DribbleController;
use super::events::{RoundEndReason, SimEvent};
use super::incident::{AdvantageCall, FoulCall, Incident};
use super::keeper::{Keeper, ShotRead};
use super::math::Vec2;
use super::referee::{Referee, RefereeStyle};
use super::replay::{ReplayBuffer, ReplayFrame, ReplayStep};
use super::rng::SimRng;
use super::round::{spawn_positions, MatchState, RoundPhase, RoundState, SceneParams};
use super::shot::{
    draw_attempt, edge_norm, parry_velocity, pick_target, push_clear_of_keeper, roll_gate, shot_blocker,
    speed_norm, Shot, ShotGate, ShotOutcome, ShotOverride,
};
use super::snapshot::{ActorView, BallView, KeeperView, PendingIncidentView, SessionSnapshot};
use super::timestep::{SLOW_MO_FACTOR, TICK_DT, TICK_MS};
use crate::error::{Result, SimError};

/// Default per-actor max speed before the first round rolls one.
const IDLE_MAX_SPEED: f32 = 85.0;

pub struct Session {
    config: SimConfig,
    rng: SimRng,
    now_ms: u64,
    paused: bool,

    red: Actor,
    blue: Actor,
    ball: Ball,
    dribble: DribbleController,
    /// Indexed by [`keeper_index`]
    keepers: [Keeper; 2],
    referee: Referee,

    round: RoundState,
    match_state: Option<MatchState>,
    cards: CardSystem,
    score: RefereeScore,

    replay: ReplayBuffer,
    replay_view: Option<ReplayFrame>,

    shot_override: ShotOverride,
    next_incident_id: u64,
    events: Vec<SimEvent>,
}

impl Session {
    pub fn new(config: SimConfig, seed: u64) -> Result<Self> {
        config.validate()?;

        let center = config.pitch.center();
        let keepers = [Keeper::new(GoalSide::Top, &config.pitch), Keeper::new(GoalSide::Bottom, &config.pitch)];
        let replay = ReplayBuffer::new(config.flow.replay_frames, config.flow.replay_ticks_per_frame);
        let round = RoundState::idle(&config.rules);
        let dribble = DribbleController::new(config.dribble.clone());

        let mut red = Actor::new(Team::Red, IDLE_MAX_SPEED);
        let mut blue = Actor::new(Team::Blue, IDLE_MAX_SPEED);
        red.place(center + Vec2::new(0.0, 60.0));
        blue.place(center - Vec2::new(0.0, 60.0));

        Ok(Self {
            rng: SimRng::new(seed),
            now_ms: 0,
            paused: false,
            red,
            blue,
            ball: Ball::new(center),
            dribble,
            keepers,
            referee: Referee::new(center + Vec2::new(0.0, 120.0)),
            round,
            match_state: None,
            cards: CardSystem::new(),
            score: RefereeScore::default(),
            replay,
            replay_view: None,
            shot_override: ShotOverride::Random,
            next_incident_id: 1,
            events: Vec::new(),
            config,
        })
    }

    /// Start (or restart) a match at the current time and open round 1.
    pub fn start_match(&mut self) {
        self.match_state = Some(MatchState::new(self.now_ms, &self.config.flow));
        self.cards.reset();
        self.score = RefereeScore::default();
        for keeper in &mut self.keepers {
            keeper.fatigue = 0.0;
        }
        info!(
            seed = self.rng.seed(),
            duration_ms = self.config.flow.match_duration_ms,
            positions = self.config.flow.max_positions,
            "match started"
        );
        self.start_round();
    }

    // ========================================================================
    // Tick
    // ========================================================================

    pub fn tick(&mut self) {
        if self.paused || self.round.phase == RoundPhase::Idle {
            return;
        }
        self.now_ms += TICK_MS;
        let now = self.now_ms;

        if let RoundPhase::Replay { delay_ms, .. } = self.round.phase {
            self.step_replay(delay_ms);
            return;
        }
        if self.check_match_clock(now) {
            return;
        }

        match self.round.phase {
            RoundPhase::Break { next_round_ms } | RoundPhase::HalfTime { next_round_ms } => {
                self.advance_keepers(now, TICK_DT, false);
                if now >= next_round_ms {
                    self.start_round();
                }
                return;
            }
            RoundPhase::FullTime | RoundPhase::Idle => return,
            RoundPhase::Starting { run_at_ms } if now >= run_at_ms => {
                self.round.phase = RoundPhase::Running;
                self.round.running_since_ms = Some(now);
                self.events.push(SimEvent::RoundRunning { number: self.round.number });
                debug!(round = self.round.number, "round running");
            }
            _ => {}
        }

        let dt = if now < self.round.slow_mo_until_ms { TICK_DT * SLOW_MO_FACTOR } else { TICK_DT };
        let phase = self.round.phase;

        {
            let (att, def) = roles(self.round.scene.attacking, &self.red, &self.blue);
            self.referee.step(
                att.pos,
                def.pos,
                phase == RoundPhase::Decision,
                now,
                dt,
                &self.config.pitch,
                &self.config.referee,
            );
        }

        if phase.is_live() {
            let frame = self.frame();
            self.replay.record(frame);
            if now >= self.round.hit_stop_until_ms {
                self.step_ball(now, dt);
                self.check_ball_contract();
            }
        }

        let live = self.round.phase.is_live();
        self.advance_keepers(now, dt, live);
        if live {
            self.step_players(now, dt);
        }

        if self.round.phase.is_running() {
            self.check_incident(now);
        }
        if self.round.phase.is_running() {
            self.check_shot(now);
        }
    }

    fn frame(&self) -> ReplayFrame {
        let (att, def) = roles(self.round.scene.attacking, &self.red, &self.blue);
        ReplayFrame { attacker: att.pos, defender: def.pos, ball: self.ball.pos() }
    }

    /// A carried ball never reports velocity.
    fn check_ball_contract(&self) {
        if self.ball.mode() != BallMode::Carried || self.ball.velocity() == Vec2::ZERO {
            return;
        }
        #[cfg(feature = "strict_contracts")]
        panic!("STRICT: carried ball reports velocity {:?}", self.ball.velocity());
        #[cfg(not(feature = "strict_contracts"))]
        warn!(velocity = ?self.ball.velocity(), "carried ball reports velocity");
    }

    fn step_replay(&mut self, delay_ms: u64) {
        match self.replay.advance() {
            ReplayStep::Frame(frame) => self.replay_view = Some(frame),
            ReplayStep::Finished => {
                self.replay_view = None;
                self.events.push(SimEvent::ReplayFinished);
                self.enter_break(delay_ms);
            }
        }
    }

    /// Half/full time. Returns `true` when this tick entered either.
    fn check_match_clock(&mut self, now: u64) -> bool {
        let Some((elapsed, duration_ms, half_time_shown, full_time)) =
            self.match_state.as_ref().map(|m| (m.elapsed_ms(now), m.duration_ms, m.half_time_shown, m.full_time))
        else {
            return false;
        };
        if full_time || self.round.decision.is_pending() {
            return false;
        }
        if elapsed >= duration_ms {
            self.enter_full_time();
            return true;
        }
        if !half_time_shown && elapsed >= self.config.flow.half_time_ms() {
            self.enter_half_time(now);
            return true;
        }
        false
    }

    // ========================================================================
    // Ball
    // ========================================================================

    fn step_ball(&mut self, now: u64, dt: f32) {
        match self.ball.mode() {
            BallMode::Carried => self.step_carried(now, dt),
            BallMode::Shot => self.step_shot_flight(now, dt),
            BallMode::Rebound => self.step_rebound(now, dt),
        }
    }

    fn step_carried(&mut self, now: u64, dt: f32) {
        if self.round.possession == Possession::Defender && self.round.turnover_at_ms.is_some_and(|t| now >= t) {
            self.round.turnover_at_ms = None;
            let (att, _) = roles(self.round.scene.attacking, &self.red, &self.blue);
            self.ball.carry(att.pos, self.config.ball.carry_snap_offset);
            self.set_possession(Possession::Attacker);
            debug!(round = self.round.number, "attacker regains the ball");
        }

        let (att, def) = roles_mut(self.round.scene.attacking, &mut self.red, &mut self.blue);
        let carrier = match self.round.possession {
            Possession::Attacker => att,
            Possession::Defender => def,
            Possession::Loose => {
                debug!("carried ball without a carrier; step skipped");
                return;
            }
        };
        self.ball.step_carried(&mut self.dribble, carrier, dt);
    }

    fn step_shot_flight(&mut self, now: u64, dt: f32) {
        let Some((side, attempt)) = self.round.shot.as_ref().map(|s| (s.side, s.outcome)) else {
            debug!("ball in flight without a shot record; step skipped");
            return;
        };
        let keeper = attempt.at_keeper().map(|_| self.keepers[keeper_index(side)].pos);
        if self.ball.step_shot(dt, keeper, self.config.shot.early_save_radius) == ShotContact::Keeper {
            if let Some(outcome) = attempt.at_keeper() {
                self.resolve_shot(now, outcome, true);
            }
        }
    }

    fn step_rebound(&mut self, now: u64, dt: f32) {
        let ball_cfg = &self.config.ball;
        self.ball
            .step_rebound(dt, ball_cfg.friction_rebound, ball_cfg.bounce_restitution, &self.config.pitch);

        let (att, def) = roles(self.round.scene.attacking, &self.red, &self.blue);
        let picked = self.ball.pickup_candidate(
            [(Possession::Attacker, att), (Possession::Defender, def)],
            ball_cfg.pickup_dist,
            ball_cfg.pickup_rel_speed,
        );
        match (picked, self.round.phase) {
            (Some(who), _) => self.finish_settle(who),
            (None, RoundPhase::Settling { expires_ms }) if now >= expires_ms => {
                self.finish_settle(Possession::Attacker)
            }
            _ => {}
        }
    }

    /// Loose ball gathered (or timed out): carry it and end the round.
    fn finish_settle(&mut self, who: Possession) {
        let (att, def) = roles(self.round.scene.attacking, &self.red, &self.blue);
        let carrier = if who == Possession::Defender { def.pos } else { att.pos };
        self.ball.carry(carrier, self.config.ball.carry_snap_offset);
        self.set_possession(who);
        self.end_round_with_replay(RoundEndReason::ParrySave, self.config.flow.save_exit_delay_ms);
    }

    fn set_possession(&mut self, possession: Possession) {
        if self.round.possession != possession {
            self.round.possession = possession;
            self.events.push(SimEvent::PossessionChanged { possession });
        }
    }

    // ========================================================================
    // Actors
    // ========================================================================

    fn advance_keepers(&mut self, now: u64, dt: f32, live: bool) {
        let ball_x = self.ball.pos().x;
        for keeper in &mut self.keepers {
            keeper.advance(dt * 1000.0, &self.config.keeper);
            if live {
                keeper.track(ball_x, now, &self.config.keeper, &self.config.pitch);
                keeper.decay_fatigue(dt, &self.config.keeper);
            }
        }
    }

    fn step_players(&mut self, now: u64, dt: f32) {
        let tempo = self.round.tempo(now);
        let scene = self.round.scene;
        let (att, def) = roles_mut(scene.attacking, &mut self.red, &mut self.blue);
        self.round.steering.step(
            att,
            def,
            scene.lane,
            scene.direction,
            tempo,
            now,
            dt,
            &self.config.pitch,
            &self.config.flow.steering,
            &mut self.rng,
        );
    }

    // ========================================================================
    // Incidents and decisions
    // ========================================================================

    fn check_incident(&mut self, now: u64) {
        if self.round.shot.is_some() || self.round.decision.is_pending() {
            return;
        }
        let scene = self.round.scene;
        let (att, def) = roles(scene.attacking, &self.red, &self.blue);
        let generated = self.round.incidents.try_generate(
            self.next_incident_id,
            now,
            att,
            def,
            scene.direction,
            scene.heat,
            &self.config.rules,
            &mut self.rng,
        );
        let Some(incident) = generated else {
            self.round.incidents.relax_when_idle(now, &self.config.rules);
            return;
        };
        self.next_incident_id += 1;
        if let Err(err) = self.round.decision.open(incident.clone()) {
            warn!(%err, id = incident.id, "incident dropped");
            return;
        }
        self.round.phase = RoundPhase::Decision;
        self.referee.begin_decision(now, &self.config.referee, &mut self.rng);
        info!(
            id = incident.id,
            severity = incident.severity,
            hint = incident.hint.label(),
            reason = %incident.reason,
            "incident detected"
        );
        self.events.push(SimEvent::IncidentDetected(incident));
    }

    pub fn submit_foul_call(&mut self, call: FoulCall) -> Result<DecisionOutcome> {
        match self.round.decision.submit_foul_call(call) {
            Ok(step) => Ok(self.apply_decision_step(step)),
            Err(err) => {
                warn!(%err, ?call, "foul call rejected");
                Err(err)
            }
        }
    }

    pub fn submit_advantage_or_stop(&mut self, call: AdvantageCall) -> Result<DecisionOutcome> {
        match self.round.decision.submit_advantage_or_stop(call) {
            Ok(step) => Ok(self.apply_decision_step(step)),
            Err(err) => {
                warn!(%err, ?call, "advantage call rejected");
                Err(err)
            }
        }
    }

    fn apply_decision_step(&mut self, step: DecisionStep) -> DecisionOutcome {
        match step {
            DecisionStep::AwaitAdvantage { incident_id } => DecisionOutcome {
                incident_id,
                stage_after: DecisionStage::AdvantageOrStop,
                points: 0,
                streak_bonus: 0,
                correct: None,
                card: None,
            },
            DecisionStep::Resolved { incident, decision } => self.resolve_decision(incident, decision),
        }
    }

    fn resolve_decision(&mut self, incident: Incident, decision: UserDecision) -> DecisionOutcome {
        let rules = &self.config.rules;
        let points = score_decision(&decision, &incident.truth, incident.severity, rules);
        let streak_bonus = self.score.record(points, rules);

        let offender = self.round.scene.defending();
        let card = match decision.advantage {
            Some(AdvantageCall::Stop) => self.cards.record_stop_foul(offender, incident.severity, rules),
            _ => None,
        };
        if let Some(card) = card {
            info!(team = offender.label(), ?card, "card issued");
            self.events.push(SimEvent::CardIssued { team: offender, card });
        }

        let outcome = DecisionOutcome {
            incident_id: incident.id,
            stage_after: DecisionStage::None,
            points,
            streak_bonus,
            correct: Some(points >= 0),
            card,
        };
        info!(
            id = incident.id,
            ?decision,
            truth = ?incident.truth.foul_call,
            points,
            total = self.score.total,
            "decision resolved"
        );
        self.events.push(SimEvent::DecisionResolved(outcome.clone()));

        let flow = &self.config.flow;
        let (reason, delay) = match (decision.foul, decision.advantage) {
            (FoulCall::NoFoul, _) => (RoundEndReason::PlayOn, 0),
            (FoulCall::Foul, Some(AdvantageCall::Advantage)) => {
                (RoundEndReason::FoulAdvantage, flow.decision_exit_delay_ms)
            }
            (FoulCall::Foul, _) => (RoundEndReason::FoulStop, flow.decision_exit_delay_ms),
        };
        self.round.shot = None;
        self.events.push(SimEvent::RoundEnded { number: self.round.number, reason });
        self.enter_break(delay);
        outcome
    }

    // ========================================================================
    // Shots
    // ========================================================================

    /// Why a shot cannot start right now, if anything.
    fn shot_unavailable(&self, now: u64) -> Option<&'static str> {
        if !self.round.phase.is_running() {
            return Some("play is not running");
        }
        if self.round.shot.is_some() {
            return Some("a shot is already in flight");
        }
        let (att, _) = roles(self.round.scene.attacking, &self.red, &self.blue);
        let goal_y = self.config.pitch.goal_line_y(self.round.scene.direction.target_goal());
        shot_blocker(
            self.ball.mode(),
            self.round.possession,
            now,
            self.round.last_shot_ms,
            att.pos.y,
            goal_y,
            &self.config.shot,
        )
    }

    fn check_shot(&mut self, now: u64) {
        if self.round.shot.is_some() {
            self.check_goal_line(now);
            return;
        }
        if self.shot_unavailable(now).is_some() {
            return;
        }
        match roll_gate(&self.config.shot, &mut self.rng) {
            ShotGate::Pass => {}
            ShotGate::Feint => self.feint(now),
            ShotGate::Shoot => {
                self.launch_shot(now);
            }
        }
    }

    fn feint(&mut self, now: u64) {
        let scene = self.round.scene;
        let (att, _) = roles(scene.attacking, &self.red, &self.blue);
        let mut dir = att.vel.normalize_or_zero();
        if dir == Vec2::ZERO {
            dir = Vec2::new(0.0, scene.direction.sign());
        }
        self.ball.nudge(dir * self.config.shot.feint_nudge_px);
        self.events.push(SimEvent::Feint { at_ms: now });
        debug!(round = self.round.number, "feint");
    }

    /// Fire at the attacked goal: the keeper commits and the outcome is
    /// rolled now, then held until resolution.
    fn launch_shot(&mut self, now: u64) -> bool {
        let side = self.round.scene.direction.target_goal();
        let target = pick_target(side, &self.config.pitch, &self.config.shot, &mut self.rng);
        let speed = self.config.shot.speed;
        if !self.ball.launch_shot(target, speed) {
            debug!(?target, "degenerate shot target; shot skipped");
            return false;
        }

        let edge_n = edge_norm(target.x, &self.config.pitch);
        let speed_n = speed_norm(speed, &self.config.shot);
        let forced = self.shot_override;
        let keeper = &mut self.keepers[keeper_index(side)];
        let read = ShotRead { target_x: target.x, edge_n, speed_n, force_miss: forced == ShotOverride::Goal };
        keeper.commit(read, &self.config.keeper, &self.config.pitch, &mut self.rng);
        let save_probability = keeper.save_probability(edge_n, speed_n, &self.config.keeper);
        let outcome = draw_attempt(save_probability, forced, &self.config.keeper, &mut self.rng);

        let shot = Shot { target, side, speed, edge_n, speed_n, started_ms: now, save_probability, outcome };
        info!(
            round = self.round.number,
            target_x = target.x,
            save_probability,
            ?outcome,
            ?forced,
            "shot taken"
        );
        self.round.last_shot_ms = Some(now);
        self.events.push(SimEvent::ShotTaken(shot.clone()));
        self.round.shot = Some(shot);
        true
    }

    fn check_goal_line(&mut self, now: u64) {
        if self.ball.mode() != BallMode::Shot {
            return;
        }
        let Some((side, attempt)) = self.round.shot.as_ref().map(|s| (s.side, s.outcome)) else {
            return;
        };
        let pos = self.ball.pos();
        if !self.config.pitch.crossed_goal_line(side, pos.y) {
            return;
        }
        let in_mouth = self.config.pitch.in_goal_mouth(pos.x);
        if !in_mouth {
            debug!(x = pos.x, "shot crossed wide of the mouth");
        }
        self.resolve_shot(now, attempt.at_goal_line(in_mouth), false);
    }

    /// End the shot. Runs at most once per shot.
    fn resolve_shot(&mut self, now: u64, outcome: ShotOutcome, touched: bool) {
        let Some(shot) = self.round.shot.take() else {
            return;
        };
        let idx = keeper_index(shot.side);
        let attacking = self.round.scene.attacking;
        info!(round = self.round.number, outcome = outcome.label(), touched, "shot resolved");
        self.events.push(SimEvent::ShotOutcome { outcome, side: shot.side, touched });

        match outcome {
            ShotOutcome::Goal => {
                self.ball.settle_in_goal();
                self.set_possession(Possession::Attacker);
                self.keepers[idx].reset_instant();
                let (red, blue) = match self.match_state.as_mut() {
                    Some(m) => {
                        m.add_goal(attacking);
                        (m.red_goals, m.blue_goals)
                    }
                    None => (0, 0),
                };
                self.events.push(SimEvent::GoalScored { team: attacking, red, blue });
                self.end_round_with_replay(RoundEndReason::Goal, self.config.flow.goal_exit_delay_ms);
            }
            ShotOutcome::Hold => {
                let at = push_clear_of_keeper(self.ball.pos(), self.keepers[idx].pos, self.config.shot.save_push_radius);
                if touched {
                    self.save_impact(now);
                }
                self.ball.hold(at);
                self.set_possession(Possession::Loose);
                self.keepers[idx].recover_after(self.config.keeper.hold_recover_delay_ms);
                self.end_round_with_replay(RoundEndReason::KeeperHolds, self.config.flow.save_exit_delay_ms);
            }
            ShotOutcome::Parry => {
                let keeper = self.keepers[idx].pos;
                let at = push_clear_of_keeper(self.ball.pos(), keeper, self.config.shot.save_push_radius);
                if touched {
                    self.save_impact(now);
                }
                let velocity = parry_velocity(keeper, at, shot.side, &self.config.shot, &mut self.rng);
                self.ball.deflect(at, velocity);
                self.set_possession(Possession::Loose);
                self.keepers[idx].recover_after(self.config.keeper.parry_recover_delay_ms);
                self.round.phase = RoundPhase::Settling { expires_ms: now + self.config.ball.rebound_ms };
            }
        }
    }

    /// Hit-stop then slow motion after the keeper touched the ball.
    fn save_impact(&mut self, now: u64) {
        self.round.hit_stop_until_ms = now + self.config.ball.hit_stop_ms;
        self.round.slow_mo_until_ms = now + self.config.ball.slow_mo_ms;
    }

    // ========================================================================
    // Round lifecycle
    // ========================================================================

    fn end_round_with_replay(&mut self, reason: RoundEndReason, delay_ms: u64) {
        info!(round = self.round.number, reason = reason.label(), "round ended");
        self.events.push(SimEvent::RoundEnded { number: self.round.number, reason });
        if self.replay.start() {
            self.events.push(SimEvent::ReplayStarted { frames: self.replay.len() });
            self.round.phase = RoundPhase::Replay { reason, delay_ms };
        } else {
            self.enter_break(delay_ms);
        }
    }

    /// Between-rounds break, capped at the end of the match. No positions
    /// left means the match is over.
    fn enter_break(&mut self, delay_ms: u64) {
        let now = self.now_ms;
        let flow = &self.config.flow;
        let pause = self.rng.range(flow.break_min_ms as f32, flow.break_max_ms as f32) as u64;
        let (positions_left, end_ms) = self
            .match_state
            .as_ref()
            .map_or((1, u64::MAX), |m| (m.positions_left(), m.end_ms()));
        if positions_left == 0 {
            self.enter_full_time();
            return;
        }
        let next_round_ms = (now + delay_ms + pause).min(end_ms);
        self.round.phase = RoundPhase::Break { next_round_ms };
        debug!(next_round_ms, "break");
    }

    fn interrupt_round(&mut self, reason: RoundEndReason) {
        let phase = self.round.phase;
        if matches!(phase, RoundPhase::Starting { .. } | RoundPhase::Running | RoundPhase::Settling { .. }) {
            self.events.push(SimEvent::RoundEnded { number: self.round.number, reason });
        }
        self.round.shot = None;
        self.round.decision.clear();
        self.replay.clear();
        self.replay_view = None;
    }

    fn enter_half_time(&mut self, now: u64) {
        self.interrupt_round(RoundEndReason::HalfTime);
        let flow = &self.config.flow;
        let pause = self.rng.range(flow.break_min_ms as f32, flow.break_max_ms as f32) as u64;
        let Some(m) = self.match_state.as_mut() else {
            return;
        };
        m.half_time_shown = true;
        let next_round_ms = (now + pause).min(m.end_ms());
        self.round.phase = RoundPhase::HalfTime { next_round_ms };
        info!(red = m.red_goals, blue = m.blue_goals, "half time");
        self.events.push(SimEvent::HalfTime);
    }

    fn enter_full_time(&mut self) {
        self.interrupt_round(RoundEndReason::FullTime);
        let Some(m) = self.match_state.as_mut() else {
            return;
        };
        m.full_time = true;
        self.round.phase = RoundPhase::FullTime;
        info!(
            red = m.red_goals,
            blue = m.blue_goals,
            positions = m.positions_played,
            referee_total = self.score.total,
            "full time"
        );
        self.events.push(SimEvent::FullTime { red: m.red_goals, blue: m.blue_goals });
    }

    /// Reset everything round-scoped and schedule kick-off. Cards, score
    /// and keeper fatigue carry over.
    fn start_round(&mut self) {
        let now = self.now_ms;
        let number = match self.match_state.as_mut() {
            Some(m) if m.positions_left() > 0 => {
                m.positions_played += 1;
                m.positions_played
            }
            Some(_) => {
                self.enter_full_time();
                return;
            }
            None => return,
        };

        let flow = &self.config.flow;
        let attacking = if self.rng.chance(0.5) { Team::Red } else { Team::Blue };
        let scene = SceneParams::roll(attacking, flow, &mut self.rng);
        let (att_spawn, def_spawn) = spawn_positions(scene.direction, &self.config.pitch, flow, &mut self.rng);
        let att_speed = self.rng.range(flow.attacker_speed_min, flow.attacker_speed_max);
        let def_speed = self.rng.range(flow.defender_speed_min, flow.defender_speed_max);
        {
            let (att, def) = roles_mut(attacking, &mut self.red, &mut self.blue);
            att.max_speed = att_speed;
            att.place(att_spawn);
            att.dribble = DribbleState::fresh(&mut self.rng);
            def.max_speed = def_speed;
            def.place(def_spawn);
            def.dribble = DribbleState::fresh(&mut self.rng);
        }

        let ref_pos = Referee::spawn_position(att_spawn, def_spawn, &self.config.pitch, &mut self.rng);
        let style = RefereeStyle::roll(&self.config.referee, &mut self.rng);
        self.referee.reset(ref_pos, style);
        for keeper in &mut self.keepers {
            keeper.reset_instant();
        }
        self.replay.clear();
        self.replay_view = None;

        let run_at_ms = now + flow.round_start_delay_ms;
        self.round = RoundState::begin(number, scene, run_at_ms, &self.config.rules);
        let early_turnover = self.rng.chance(flow.early_turnover_chance);
        let carrier = if early_turnover {
            let regain = self.rng.range(flow.turnover_regain_min_ms as f32, flow.turnover_regain_max_ms as f32);
            self.round.turnover_at_ms = Some(run_at_ms + regain as u64);
            self.round.possession = Possession::Defender;
            def_spawn
        } else {
            att_spawn
        };
        self.ball.carry(carrier, self.config.ball.carry_snap_offset);

        info!(
            round = number,
            attacking = attacking.label(),
            direction = scene.direction.label(),
            lane = scene.lane.label(),
            heat = scene.heat,
            early_turnover,
            "round started"
        );
        self.events.push(SimEvent::RoundStarted {
            number,
            attacking,
            direction: scene.direction,
            lane: scene.lane,
        });
        self.events.push(SimEvent::PossessionChanged { possession: self.round.possession });
    }

    // ========================================================================
    // Hooks and tunables
    // ========================================================================

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        mem::take(&mut self.events)
    }

    /// Force the outcome of the following shots.
    pub fn debug_force_outcome(&mut self, forced: ShotOverride) {
        info!(?forced, "shot outcome override");
        self.shot_override = forced;
    }

    /// Shoot now, skipping the random gates. Range and cooldown still apply.
    pub fn debug_trigger_shot(&mut self) -> Result<()> {
        if let Some(reason) = self.shot_unavailable(self.now_ms) {
            warn!(reason, "debug shot refused");
            return Err(SimError::ShotUnavailable(reason));
        }
        if !self.launch_shot(self.now_ms) {
            return Err(SimError::ShotUnavailable("no direction to the target"));
        }
        Ok(())
    }

    pub fn set_keeper_skill(&mut self, skill: f32) -> Result<()> {
        self.config.keeper.skill = unit_tunable("keeper.skill", skill)?;
        Ok(())
    }

    pub fn set_shot_speed(&mut self, speed: f32) -> Result<()> {
        if !speed.is_finite() || speed <= 0.0 {
            warn!(speed, "rejected shot speed");
            return Err(SimError::InvalidTunable { name: "shot.speed", value: speed });
        }
        self.config.shot.speed = speed;
        Ok(())
    }

    pub fn set_feint_chance(&mut self, chance: f32) -> Result<()> {
        self.config.shot.feint_chance = unit_tunable("shot.feint_chance", chance)?;
        Ok(())
    }

    pub fn set_misread_chance(&mut self, chance: f32) -> Result<()> {
        self.config.keeper.misread_chance = unit_tunable("keeper.misread_chance", chance)?;
        Ok(())
    }

    // ========================================================================
    // Read access
    // ========================================================================

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn attacker(&self) -> &Actor {
        roles(self.round.scene.attacking, &self.red, &self.blue).0
    }

    pub fn defender(&self) -> &Actor {
        roles(self.round.scene.attacking, &self.red, &self.blue).1
    }

    pub fn player(&self, team: Team) -> &Actor {
        match team {
            Team::Red => &self.red,
            Team::Blue => &self.blue,
        }
    }

    pub fn keeper(&self, side: GoalSide) -> &Keeper {
        &self.keepers[keeper_index(side)]
    }

    pub fn referee(&self) -> &Referee {
        &self.referee
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn match_state(&self) -> Option<&MatchState> {
        self.match_state.as_ref()
    }

    pub fn cards(&self) -> &CardSystem {
        &self.cards
    }

    pub fn score(&self) -> &RefereeScore {
        &self.score
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let actor = |a: &Actor| ActorView { team: a.team, pos: a.pos, vel: a.vel };
        let keeper = |k: &Keeper| KeeperView { side: k.side, pos: k.pos, motion: k.motion, fatigue: k.fatigue };
        let incident = self.round.decision.incident().map(|i| PendingIncidentView {
            id: i.id,
            stage: self.round.decision.stage(),
            hint: i.hint,
            reason: i.reason.clone(),
        });
        let (red_goals, blue_goals) = self.match_state.as_ref().map_or((0, 0), |m| (m.red_goals, m.blue_goals));
        SessionSnapshot {
            now_ms: self.now_ms,
            paused: self.paused,
            phase: self.round.phase.label().to_string(),
            round: self.round.number,
            minute: self.match_state.as_ref().map_or(0, |m| m.minute(self.now_ms)),
            possession: self.round.possession,
            attacker: actor(self.attacker()),
            defender: actor(self.defender()),
            referee: self.referee.pos,
            keepers: [keeper(&self.keepers[0]), keeper(&self.keepers[1])],
            ball: BallView { pos: self.ball.pos(), velocity: self.ball.velocity(), mode: self.ball.mode() },
            incident,
            score: self.score.clone(),
            red_goals,
            blue_goals,
            replay: self.replay_view,
        }
    }

    // ========================================================================
    // Test staging
    // ========================================================================

    /// Run until play is live.
    #[cfg(test)]
    pub(crate) fn tick_until_running(&mut self, max_ticks: usize) -> bool {
        for _ in 0..max_ticks {
            if self.round.phase.is_running() {
                return true;
            }
            self.tick();
        }
        self.round.phase.is_running()
    }

    /// Attacker on the ball inside shooting range, defender out of reach.
    #[cfg(test)]
    pub(crate) fn stage_attack_near_goal(&mut self) {
        let scene = self.round.scene;
        let side = scene.direction.target_goal();
        let goal_y = self.config.pitch.goal_line_y(side);
        let cx = self.config.pitch.goal_center_x();
        let att_pos = Vec2::new(cx, goal_y + side.away_sign() * 90.0);
        let def_pos = Vec2::new(cx, goal_y + side.away_sign() * 300.0);
        let (att, def) = roles_mut(scene.attacking, &mut self.red, &mut self.blue);
        att.place(att_pos);
        def.place(def_pos);
        self.round.turnover_at_ms = None;
        self.round.possession = Possession::Attacker;
        self.round.last_shot_ms = None;
        self.ball.carry(att_pos, self.config.ball.carry_snap_offset);
    }

}

fn keeper_index(side: GoalSide) -> usize {
    match side {
        GoalSide::Top => 0,
        GoalSide::Bottom => 1,
    }
}

/// (attacker, defender) for the attacking team.
fn roles<'a>(attacking: Team, red: &'a Actor, blue: &'a Actor) -> (&'a Actor, &'a Actor) {
    match attacking {
        Team::Red => (red, blue),
        Team::Blue => (blue, red),
    }
}

fn roles_mut<'a>(attacking: Team, red: &'a mut Actor, blue: &'a mut Actor) -> (&'a mut Actor, &'a mut Actor) {
    match attacking {
        Team::Red => (red, blue),
        Team::Blue => (blue, red),
    }
}

fn unit_tunable(name: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        warn!(name, value, "rejected tunable");
        Err(SimError::InvalidTunable { name, value })
    }
}
