//! Referee decision state machine and scoring
//!
//! ```text
//! None ──incident──▶ FoulCall ──NO_FOUL──▶ resolved
//!                       │
//!                      FOUL
//!                       ▼
//!                 AdvantageOrStop ──ADVANTAGE|STOP──▶ resolved
//! ```
//!
//! Only one incident is live at a time. Calls made in the wrong stage are
//! rejected and leave the machine untouched.

use serde::{Deserialize, Serialize};

use super::card_system::CardType;
use super::config::RulesConfig;
use super::incident::{AdvantageCall, FoulCall, GroundTruth, Incident};
use super::math::clamp01;
use crate::error::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionStage {
    None,
    FoulCall,
    AdvantageOrStop,
}

/// The referee's full answer to one incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDecision {
    pub foul: FoulCall,
    /// Only meaningful when `foul == Foul`
    pub advantage: Option<AdvantageCall>,
}

/// Result handed back to the caller of a submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub incident_id: u64,
    /// Stage after the call (`AdvantageOrStop` while the decision is still open)
    pub stage_after: DecisionStage,
    pub points: i32,
    pub streak_bonus: i32,
    /// `None` until the decision is complete
    pub correct: Option<bool>,
    pub card: Option<CardType>,
}

// ============================================================================
// Scoring
// ============================================================================

/// Weight of a call: 1.5 at the ambiguity threshold, falling to 1.0 once the
/// severity is a quarter away from it.
pub fn clarity_scale(severity: f32, rules: &RulesConfig) -> f32 {
    1.0 + 0.5 * clamp01(1.0 - 2.0 * (severity - rules.foul_threshold).abs())
}

/// Points for a complete decision against the ground truth.
pub fn score_decision(
    decision: &UserDecision,
    truth: &GroundTruth,
    severity: f32,
    rules: &RulesConfig,
) -> i32 {
    let mut pts = if decision.foul == truth.foul_call {
        rules.points_correct_call
    } else {
        rules.points_wrong_call
    };
    if decision.foul == FoulCall::Foul {
        pts += if decision.advantage.is_some() && decision.advantage == truth.advantage {
            rules.points_correct_advantage
        } else {
            rules.points_wrong_advantage
        };
    }
    (pts as f32 * clarity_scale(severity, rules)).round() as i32
}

/// Session-long referee score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefereeScore {
    pub total: i32,
    pub correct_calls: u32,
    pub wrong_calls: u32,
    pub correct_streak: u32,
    pub wrong_streak: u32,
    pub best_streak: u32,
}

impl RefereeScore {
    /// Book a resolved decision. Returns the streak bonus awarded (0 if none).
    pub fn record(&mut self, points: i32, rules: &RulesConfig) -> i32 {
        self.total += points;
        if points >= 0 {
            self.correct_calls += 1;
            self.correct_streak += 1;
            self.wrong_streak = 0;
            self.best_streak = self.best_streak.max(self.correct_streak);
            if self.correct_streak == rules.streak_bonus_at {
                self.total += rules.streak_bonus;
                return rules.streak_bonus;
            }
        } else {
            self.wrong_calls += 1;
            self.wrong_streak += 1;
            self.correct_streak = 0;
        }
        0
    }

    pub fn accuracy(&self) -> f32 {
        let n = self.correct_calls + self.wrong_calls;
        if n == 0 {
            0.0
        } else {
            self.correct_calls as f32 / n as f32
        }
    }
}

// ============================================================================
// State machine
// ============================================================================

/// What a submit did to the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionStep {
    /// FOUL called; waiting for advantage/stop
    AwaitAdvantage { incident_id: u64 },
    /// Decision complete; the incident is handed back for scoring
    Resolved { incident: Incident, decision: UserDecision },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionMachine {
    incident: Option<Incident>,
    foul_called: bool,
}

impl DecisionMachine {
    pub fn stage(&self) -> DecisionStage {
        match (&self.incident, self.foul_called) {
            (None, _) => DecisionStage::None,
            (Some(_), false) => DecisionStage::FoulCall,
            (Some(_), true) => DecisionStage::AdvantageOrStop,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.incident.is_some()
    }

    pub fn incident(&self) -> Option<&Incident> {
        self.incident.as_ref()
    }

    /// Make `incident` the live one. Refused while another is pending.
    pub fn open(&mut self, incident: Incident) -> Result<()> {
        if let Some(found) = self.incident.as_ref().map(|_| self.stage()) {
            return Err(SimError::WrongDecisionStage { expected: DecisionStage::None, found });
        }
        self.incident = Some(incident);
        self.foul_called = false;
        Ok(())
    }

    pub fn submit_foul_call(&mut self, call: FoulCall) -> Result<DecisionStep> {
        match self.stage() {
            DecisionStage::None => Err(SimError::NoPendingIncident),
            DecisionStage::AdvantageOrStop => Err(SimError::WrongDecisionStage {
                expected: DecisionStage::FoulCall,
                found: DecisionStage::AdvantageOrStop,
            }),
            DecisionStage::FoulCall => match call {
                FoulCall::Foul => {
                    self.foul_called = true;
                    let incident_id = self.incident.as_ref().map_or(0, |i| i.id);
                    Ok(DecisionStep::AwaitAdvantage { incident_id })
                }
                FoulCall::NoFoul => self.resolve(UserDecision { foul: FoulCall::NoFoul, advantage: None }),
            },
        }
    }

    pub fn submit_advantage_or_stop(&mut self, call: AdvantageCall) -> Result<DecisionStep> {
        match self.stage() {
            DecisionStage::None => Err(SimError::NoPendingIncident),
            DecisionStage::FoulCall => Err(SimError::WrongDecisionStage {
                expected: DecisionStage::AdvantageOrStop,
                found: DecisionStage::FoulCall,
            }),
            DecisionStage::AdvantageOrStop => {
                self.resolve(UserDecision { foul: FoulCall::Foul, advantage: Some(call) })
            }
        }
    }

    /// Drop the live incident without scoring (round reset).
    pub fn clear(&mut self) {
        self.incident = None;
        self.foul_called = false;
    }

    fn resolve(&mut self, decision: UserDecision) -> Result<DecisionStep> {
        let incident = self.incident.take().ok_or(SimError::NoPendingIncident)?;
        self.foul_called = false;
        Ok(DecisionStep::Resolved { incident, decision })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::actor::Possession;
    use crate::engine::incident::{HintBand, IncidentFeatures};

    fn truth(foul: bool, advantage: Option<AdvantageCall>) -> GroundTruth {
        GroundTruth {
            foul_call: if foul { FoulCall::Foul } else { FoulCall::NoFoul },
            advantage,
            attack_promising: true,
            possession_after: Possession::Attacker,
        }
    }

    fn incident(id: u64) -> Incident {
        Incident {
            id,
            time_ms: 0,
            severity: 0.7,
            foul_probability: 0.73,
            features: IncidentFeatures { rel_speed: 90.0, distance: 10.0, speed_n: 0.72, close_n: 0.55, heat: 1.0 },
            truth: truth(true, Some(AdvantageCall::Stop)),
            hint: HintBand::Med,
            reason: String::new(),
        }
    }

    #[test]
    fn test_borderline_calls_weigh_most() {
        let rules = RulesConfig::default();
        let gt = truth(true, Some(AdvantageCall::Stop));
        let right = UserDecision { foul: FoulCall::Foul, advantage: Some(AdvantageCall::Stop) };
        assert_eq!(score_decision(&right, &gt, rules.foul_threshold, &rules), 24);
        let wrong = UserDecision { foul: FoulCall::NoFoul, advantage: None };
        assert_eq!(score_decision(&wrong, &gt, rules.foul_threshold, &rules), -18);
        let gt = truth(false, None);
        let miss = UserDecision { foul: FoulCall::Foul, advantage: Some(AdvantageCall::Stop) };
        assert_eq!(score_decision(&miss, &gt, rules.foul_threshold, &rules), -27);
        assert!((clarity_scale(rules.foul_threshold, &rules) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_clear_cut_calls_are_unweighted() {
        let rules = RulesConfig::default();
        let gt = truth(false, None);
        let d = UserDecision { foul: FoulCall::NoFoul, advantage: None };
        assert_eq!(score_decision(&d, &gt, 0.0, &rules), 10);
        assert_eq!(score_decision(&d, &gt, 0.38, &rules), 13);
        assert_eq!(score_decision(&d, &gt, 0.9, &rules), 12);
    }

    #[test]
    fn test_scale_tracks_distance_from_threshold() {
        let rules = RulesConfig::default();
        for s in [0.0, 0.2, 0.45, 0.58, 0.7, 0.83, 0.9, 1.0] {
            let expected = 1.0 + 0.5 * clamp01(1.0 - 2.0 * (s - rules.foul_threshold).abs());
            assert!((clarity_scale(s, &rules) - expected).abs() < 1e-6, "severity {s}");
        }
        assert!(clarity_scale(0.58, &rules) > clarity_scale(0.7, &rules));
        assert_eq!(clarity_scale(0.0, &rules), 1.0);
    }

    #[test]
    fn test_streak_bonus_on_third_correct_call() {
        let rules = RulesConfig::default();
        let mut score = RefereeScore::default();
        assert_eq!(score.record(10, &rules), 0);
        assert_eq!(score.record(12, &rules), 0);
        assert_eq!(score.record(10, &rules), 4);
        assert_eq!(score.total, 36);
        assert_eq!(score.record(10, &rules), 0);
        score.record(-12, &rules);
        assert_eq!(score.correct_streak, 0);
        assert_eq!(score.wrong_streak, 1);
        assert_eq!(score.best_streak, 4);
    }

    #[test]
    fn test_no_foul_resolves_immediately() {
        let mut m = DecisionMachine::default();
        m.open(incident(1)).unwrap();
        assert_eq!(m.stage(), DecisionStage::FoulCall);
        let step = m.submit_foul_call(FoulCall::NoFoul).unwrap();
        assert!(matches!(step, DecisionStep::Resolved { decision: UserDecision { foul: FoulCall::NoFoul, .. }, .. }));
        assert_eq!(m.stage(), DecisionStage::None);
    }

    #[test]
    fn test_foul_then_stop() {
        let mut m = DecisionMachine::default();
        m.open(incident(2)).unwrap();
        assert_eq!(m.submit_foul_call(FoulCall::Foul).unwrap(), DecisionStep::AwaitAdvantage { incident_id: 2 });
        assert_eq!(m.stage(), DecisionStage::AdvantageOrStop);
        match m.submit_advantage_or_stop(AdvantageCall::Stop).unwrap() {
            DecisionStep::Resolved { incident, decision } => {
                assert_eq!(incident.id, 2);
                assert_eq!(decision.advantage, Some(AdvantageCall::Stop));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_wrong_stage_calls_are_rejected_without_side_effects() {
        let mut m = DecisionMachine::default();
        assert_eq!(m.submit_foul_call(FoulCall::Foul), Err(SimError::NoPendingIncident));
        assert_eq!(m.submit_advantage_or_stop(AdvantageCall::Stop), Err(SimError::NoPendingIncident));

        m.open(incident(3)).unwrap();
        assert!(matches!(
            m.submit_advantage_or_stop(AdvantageCall::Advantage),
            Err(SimError::WrongDecisionStage { expected: DecisionStage::AdvantageOrStop, .. })
        ));
        assert_eq!(m.stage(), DecisionStage::FoulCall);

        m.submit_foul_call(FoulCall::Foul).unwrap();
        assert!(m.submit_foul_call(FoulCall::NoFoul).is_err());
        assert_eq!(m.stage(), DecisionStage::AdvantageOrStop);

        assert!(m.open(incident(4)).is_err());
        assert_eq!(m.incident().map(|i| i.id), Some(3));
    }
}
