//! End-to-end scenarios across the engine modules.
//!
//! Statistical checks use fixed seeds and generous tolerances.

use super::actor::{GoalSide, Possession};
use super::ball::BallMode;
use super::card_system::{CardSystem, CardType};
use super::config::{KeeperConfig, PitchConfig, RulesConfig, SimConfig};
use super::decision::{clarity_scale, score_decision, UserDecision};
use super::events::{RoundEndReason, SimEvent};
use super::incident::{foul_probability, ground_truth, nominal_severity, AdvantageCall, FoulCall, HintBand};
use super::keeper::{save_probability, Keeper, ShotRead};
use super::math::Vec2;
use super::rng::SimRng;
use super::round::RoundPhase;
use super::session::Session;
use super::shot::{draw_attempt, SaveAttempt, ShotOutcome, ShotOverride};

/// Answer every pending incident with its ground truth.
fn oracle(session: &mut Session) {
    let Some(truth) = session.round().decision.incident().map(|i| i.truth) else {
        return;
    };
    session.submit_foul_call(truth.foul_call).unwrap();
    if let Some(call) = truth.advantage {
        session.submit_advantage_or_stop(call).unwrap();
    }
}

/// Stage a shot and tick until it resolves.
fn forced_shot(seed: u64, forced: ShotOverride) -> (ShotOutcome, Session) {
    let mut s = Session::new(SimConfig::default(), seed).unwrap();
    s.start_match();
    assert!(s.tick_until_running(200));
    s.debug_force_outcome(forced);
    s.stage_attack_near_goal();
    s.debug_trigger_shot().unwrap();
    s.drain_events();
    for _ in 0..200 {
        s.tick();
        let resolved = s.drain_events().into_iter().find_map(|e| match e {
            SimEvent::ShotOutcome { outcome, .. } => Some(outcome),
            _ => None,
        });
        if let Some(outcome) = resolved {
            return (outcome, s);
        }
    }
    panic!("shot never resolved (seed {seed})");
}

#[test]
fn test_save_distribution_matches_baseline_keeper() {
    let cfg = KeeperConfig::default();
    let p = save_probability(0.0, 0.0, 0.0, 0.0, &cfg);
    assert!((p - 0.805).abs() < 1e-4);

    let mut rng = SimRng::new(2024);
    let trials = 20_000;
    let mut counts = [0usize; 3];
    for _ in 0..trials {
        match draw_attempt(p, ShotOverride::Random, &cfg, &mut rng) {
            SaveAttempt::Hold => counts[0] += 1,
            SaveAttempt::Parry => counts[1] += 1,
            SaveAttempt::Miss => counts[2] += 1,
        }
    }
    let share = |n: usize| n as f32 / trials as f32;
    assert!((share(counts[0]) - 0.362).abs() < 0.015, "hold {}", share(counts[0]));
    assert!((share(counts[1]) - 0.443).abs() < 0.015, "parry {}", share(counts[1]));
    assert!((share(counts[2]) - 0.195).abs() < 0.015, "miss {}", share(counts[2]));
}

#[test]
fn test_forced_goal_always_scores() {
    for seed in 1..=6 {
        let (outcome, s) = forced_shot(seed, ShotOverride::Goal);
        assert_eq!(outcome, ShotOutcome::Goal, "seed {seed}");
        let m = s.match_state().unwrap();
        assert_eq!(m.red_goals + m.blue_goals, 1);
        assert_eq!(s.ball().mode(), BallMode::Carried);
        assert_eq!(s.round().possession, Possession::Attacker);
        assert!(s.round().shot.is_none());
    }
}

#[test]
fn test_forced_save_never_concedes() {
    for seed in 1..=8 {
        let (outcome, s) = forced_shot(seed, ShotOverride::Save);
        assert_ne!(outcome, ShotOutcome::Goal, "seed {seed}");
        let m = s.match_state().unwrap();
        assert_eq!(m.red_goals + m.blue_goals, 0);
        if outcome == ShotOutcome::Parry {
            assert!(matches!(s.round().phase, RoundPhase::Settling { .. } | RoundPhase::Replay { .. }));
        }
    }
}

#[test]
fn test_parry_settles_then_replays() {
    let mut seen_parry = false;
    for seed in 1..=20 {
        let (outcome, mut s) = forced_shot(seed, ShotOverride::Save);
        if outcome != ShotOutcome::Parry {
            continue;
        }
        seen_parry = true;
        let mut ended = None;
        for _ in 0..120 {
            s.tick();
            for e in s.drain_events() {
                if let SimEvent::RoundEnded { reason, .. } = e {
                    ended = Some(reason);
                }
            }
            if ended.is_some() {
                break;
            }
        }
        assert_eq!(ended, Some(RoundEndReason::ParrySave));
        assert_eq!(s.ball().mode(), BallMode::Carried);
        assert_ne!(s.round().possession, Possession::Loose);
    }
    assert!(seen_parry);
}

#[test]
fn test_full_misread_mirrors_the_dive() {
    let pitch = PitchConfig::default();
    let cfg = KeeperConfig { misread_chance: 1.0, ..KeeperConfig::default() };
    let cx = pitch.goal_center_x();
    let mut rng = SimRng::new(9);
    for offset in [-30.0, -12.0, 8.0, 25.0, 40.0] {
        let mut keeper = Keeper::new(GoalSide::Top, &pitch);
        let read = ShotRead { target_x: cx + offset, edge_n: 0.4, speed_n: 0.7, force_miss: false };
        let commit = keeper.commit(read, &cfg, &pitch, &mut rng);
        assert!(commit.misread);
        assert!((commit.target_x - cx) * offset < 0.0, "offset {offset} dove to {}", commit.target_x);
    }
}

#[test]
fn test_second_yellow_becomes_red() {
    let rules = RulesConfig::default();
    let mut cards = CardSystem::new();
    let severity = 0.75;
    assert_eq!(cards.record_stop_foul(super::actor::Team::Blue, severity, &rules), Some(CardType::Yellow));
    assert_eq!(cards.record_stop_foul(super::actor::Team::Blue, severity, &rules), Some(CardType::Red));
    assert!(cards.is_sent_off(super::actor::Team::Blue));
    assert!(!cards.is_sent_off(super::actor::Team::Red));
}

#[test]
fn test_score_at_threshold_weighs_most() {
    let rules = RulesConfig::default();
    let s = rules.foul_threshold;
    assert!((clarity_scale(s, &rules) - 1.5).abs() < 1e-6);

    let truth = ground_truth(foul_probability(s, &rules), false, Possession::Attacker);
    assert_eq!(truth.foul_call, FoulCall::Foul);
    let right = UserDecision { foul: FoulCall::Foul, advantage: Some(AdvantageCall::Stop) };
    let wrong = UserDecision { foul: FoulCall::NoFoul, advantage: None };
    assert_eq!(score_decision(&right, &truth, s, &rules), 24);
    assert_eq!(score_decision(&wrong, &truth, s, &rules), -18);
}

#[test]
fn test_close_fast_contact_is_high_band() {
    let rules = RulesConfig::default();
    let severity = nominal_severity(5.0, 140.0, 1.0, &rules);
    assert!((severity - 0.797).abs() < 0.01, "severity {severity}");
    let p = foul_probability(severity, &rules);
    assert!(p > 0.8, "p {p}");
    assert_eq!(HintBand::from_probability(p), HintBand::High);
}

#[test]
fn test_carried_ball_never_reports_velocity() {
    let mut s = Session::new(SimConfig::default(), 31).unwrap();
    s.start_match();
    for _ in 0..3000 {
        s.tick();
        oracle(&mut s);
        if s.ball().mode() == BallMode::Carried {
            assert_eq!(s.ball().velocity(), Vec2::ZERO);
        }
    }
}

#[test]
fn test_oracle_match_reaches_full_time() {
    for seed in [3, 17, 4242] {
        let mut s = Session::new(SimConfig::default(), seed).unwrap();
        s.start_match();
        let mut goals = 0;
        let mut half_time = 0;
        let mut full_time = None;
        for _ in 0..20_000 {
            s.tick();
            oracle(&mut s);
            for e in s.drain_events() {
                match e {
                    SimEvent::GoalScored { .. } => goals += 1,
                    SimEvent::HalfTime => half_time += 1,
                    SimEvent::FullTime { red, blue } => full_time = Some(red + blue),
                    _ => {}
                }
            }
            if s.round().phase == RoundPhase::FullTime {
                break;
            }
        }
        assert_eq!(s.round().phase, RoundPhase::FullTime, "seed {seed}");
        assert_eq!(full_time, Some(goals));
        assert!(half_time <= 1);
        let m = s.match_state().unwrap();
        assert!(m.positions_played <= m.max_positions);
        assert!(s.score().wrong_calls == 0);
    }
}

#[test]
fn test_pending_decision_holds_the_clock() {
    let mut s = Session::new(SimConfig::default(), 12).unwrap();
    s.start_match();
    let mut pending = false;
    for _ in 0..20_000 {
        s.tick();
        if s.round().decision.is_pending() {
            pending = true;
            break;
        }
    }
    assert!(pending, "no incident in the whole match");
    let end = s.match_state().unwrap().end_ms();
    while s.now_ms() < end + 1000 {
        s.tick();
    }
    assert_eq!(s.round().phase, RoundPhase::Decision);
    oracle(&mut s);
    for _ in 0..5 {
        s.tick();
    }
    assert_eq!(s.round().phase, RoundPhase::FullTime);
}
