//! Incident Generator & Foul Model
//!
//! A contact between attacker and defender becomes an [`Incident`]: a
//! severity in [0, 1], a logistic foul probability and a hidden ground truth
//! the referee's call is scored against.
//!
//! ## Severity
//! `clamp((0.18 + 0.36·close + 0.34·speed_n + noise)·heat, 0, 1)` with
//! `noise ~ U(-0.14, 0.20)`, so the same geometry does not always give the
//! same answer.
//!
//! ## Foul probability
//! `sigmoid(k·(severity − threshold))`. Ground truth is FOUL iff `p ≥ 0.5`.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::actor::{Actor, AttackDirection, Possession};
use super::config::RulesConfig;
use super::debug_flags::incident_debug_enabled;
use super::math::{clamp01, sigmoid};
use super::rng::SimRng;

// ============================================================================
// Severity model constants
// ============================================================================

const SEVERITY_BASE: f32 = 0.18;
const SEVERITY_CLOSE_WEIGHT: f32 = 0.36;
const SEVERITY_SPEED_WEIGHT: f32 = 0.34;
pub const SEVERITY_NOISE_MIN: f32 = -0.14;
pub const SEVERITY_NOISE_MAX: f32 = 0.20;

// Hint bands over the foul probability
const HINT_HIGH: f32 = 0.82;
const HINT_MED: f32 = 0.55;

// Post-contact possession draw
const LOOSE_SEVERITY: f32 = 0.72;
const LOOSE_CHANCE: f32 = 0.55;
const DEFENDER_SEVERITY: f32 = 0.58;
const DEFENDER_CHANCE: f32 = 0.35;

// Adaptive cooldown
const TOO_FREQUENT_MS: u64 = 900;
const TOO_RARE_MS: u64 = 2800;
const COOLDOWN_RAISE_MS: u64 = 140;
const COOLDOWN_LOWER_MS: u64 = 120;
const IDLE_AFTER_MS: u64 = 5200;
const IDLE_TUNE_EVERY_MS: u64 = 900;
const IDLE_LOWER_MS: u64 = 90;

// ============================================================================
// Calls
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoulCall {
    Foul,
    NoFoul,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvantageCall {
    Advantage,
    Stop,
}

impl fmt::Display for FoulCall {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FoulCall::Foul => write!(f, "FOUL"),
            FoulCall::NoFoul => write!(f, "NO_FOUL"),
        }
    }
}

impl fmt::Display for AdvantageCall {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AdvantageCall::Advantage => write!(f, "ADVANTAGE"),
            AdvantageCall::Stop => write!(f, "STOP"),
        }
    }
}

/// UI-facing likelihood band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintBand {
    Low,
    Med,
    High,
}

impl HintBand {
    pub fn from_probability(p: f32) -> Self {
        if p >= HINT_HIGH {
            HintBand::High
        } else if p >= HINT_MED {
            HintBand::Med
        } else {
            HintBand::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HintBand::Low => "LOW",
            HintBand::Med => "MED",
            HintBand::High => "HIGH",
        }
    }
}

// ============================================================================
// Incident record
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncidentFeatures {
    pub rel_speed: f32,
    pub distance: f32,
    pub speed_n: f32,
    pub close_n: f32,
    pub heat: f32,
}

impl IncidentFeatures {
    pub fn measure(distance: f32, rel_speed: f32, heat: f32, rules: &RulesConfig) -> Self {
        Self {
            rel_speed,
            distance,
            speed_n: clamp01(rel_speed / rules.incident_speed_norm),
            close_n: 1.0 - clamp01(distance / rules.incident_distance),
            heat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundTruth {
    pub foul_call: FoulCall,
    /// Only set when the truth is FOUL
    pub advantage: Option<AdvantageCall>,
    pub attack_promising: bool,
    pub possession_after: Possession,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: u64,
    pub time_ms: u64,
    pub severity: f32,
    pub foul_probability: f32,
    pub features: IncidentFeatures,
    pub truth: GroundTruth,
    pub hint: HintBand,
    pub reason: String,
}

// ============================================================================
// Pure model functions
// ============================================================================

pub fn severity(features: &IncidentFeatures, noise: f32) -> f32 {
    let raw = SEVERITY_BASE
        + SEVERITY_CLOSE_WEIGHT * features.close_n
        + SEVERITY_SPEED_WEIGHT * features.speed_n
        + noise;
    clamp01(raw * features.heat)
}

pub fn foul_probability(severity: f32, rules: &RulesConfig) -> f32 {
    sigmoid(rules.sigmoid_k * (severity - rules.foul_threshold))
}

/// Short HUD string, e.g. `"high speed + very tight · v140 d5"`.
pub fn reason_from_features(f: &IncidentFeatures) -> String {
    let speed = if f.speed_n >= 0.72 {
        "high speed"
    } else if f.speed_n >= 0.45 {
        "speed"
    } else {
        "low speed"
    };
    let space = if f.close_n >= 0.72 {
        "very tight"
    } else if f.close_n >= 0.45 {
        "tight"
    } else {
        "space"
    };
    format!(
        "{speed} + {space} · v{} d{}",
        f.rel_speed.round() as i32,
        f.distance.round() as i32
    )
}

/// Who ends up with the ball; harder contacts free it more often.
pub fn possession_after_contact(severity: f32, r: f32) -> Possession {
    if severity > LOOSE_SEVERITY && r < LOOSE_CHANCE {
        Possession::Loose
    } else if severity > DEFENDER_SEVERITY && r < DEFENDER_CHANCE {
        Possession::Defender
    } else {
        Possession::Attacker
    }
}

pub fn ground_truth(
    p: f32,
    attack_promising: bool,
    possession_after: Possession,
) -> GroundTruth {
    let foul_call = if p >= 0.5 { FoulCall::Foul } else { FoulCall::NoFoul };
    let advantage = match foul_call {
        FoulCall::Foul if possession_after == Possession::Attacker && attack_promising => {
            Some(AdvantageCall::Advantage)
        }
        FoulCall::Foul => Some(AdvantageCall::Stop),
        FoulCall::NoFoul => None,
    };
    GroundTruth { foul_call, advantage, attack_promising, possession_after }
}

// ============================================================================
// Generator
// ============================================================================

/// Per-round contact detector with an adaptive cooldown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentGenerator {
    cooldown_ms: u64,
    cooldown_until: u64,
    last_incident_at: Option<u64>,
    idle_tune_at: u64,
}

impl IncidentGenerator {
    pub fn new(rules: &RulesConfig) -> Self {
        Self {
            cooldown_ms: rules.incident_cooldown_ms,
            cooldown_until: 0,
            last_incident_at: None,
            idle_tune_at: 0,
        }
    }

    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }

    pub fn ready(&self, now: u64) -> bool {
        now >= self.cooldown_until
    }

    /// Detect a contact and build its incident. `None` when out of range or
    /// still cooling down.
    pub fn try_generate(
        &mut self,
        id: u64,
        now: u64,
        attacker: &Actor,
        defender: &Actor,
        attack_dir: AttackDirection,
        heat: f32,
        rules: &RulesConfig,
        rng: &mut SimRng,
    ) -> Option<Incident> {
        if !self.ready(now) {
            return None;
        }
        let distance = attacker.pos.distance(defender.pos);
        if distance > rules.incident_distance {
            return None;
        }

        let rel_speed = (attacker.vel - defender.vel).length();
        let features = IncidentFeatures::measure(distance, rel_speed, heat, rules);
        let noise = rng.range(SEVERITY_NOISE_MIN, SEVERITY_NOISE_MAX);
        let severity = severity(&features, noise);

        let attack_promising = attacker.vel.y * attack_dir.sign() > rules.attack_promising_speed;
        let possession_after = possession_after_contact(severity, rng.unit());

        let p = foul_probability(severity, rules);
        let truth = ground_truth(p, attack_promising, possession_after);

        self.register(now, rules);

        let incident = Incident {
            id,
            time_ms: now,
            severity,
            foul_probability: p,
            features,
            truth,
            hint: HintBand::from_probability(p),
            reason: reason_from_features(&features),
        };
        if incident_debug_enabled() {
            debug!(?incident, noise, "incident generated");
        }
        Some(incident)
    }

    /// Adapt the cooldown to the spacing of incidents and arm it.
    fn register(&mut self, now: u64, rules: &RulesConfig) {
        if let Some(last) = self.last_incident_at {
            let gap = now.saturating_sub(last);
            if gap < TOO_FREQUENT_MS {
                self.cooldown_ms += COOLDOWN_RAISE_MS;
            } else if gap > TOO_RARE_MS {
                self.cooldown_ms = self.cooldown_ms.saturating_sub(COOLDOWN_LOWER_MS);
            }
            self.clamp_cooldown(rules);
        }
        self.last_incident_at = Some(now);
        self.cooldown_until = now + self.cooldown_ms;
    }

    /// Gently shorten the cooldown after a long quiet stretch.
    pub fn relax_when_idle(&mut self, now: u64, rules: &RulesConfig) {
        let Some(last) = self.last_incident_at else {
            return;
        };
        if now.saturating_sub(last) > IDLE_AFTER_MS && now > self.idle_tune_at {
            self.idle_tune_at = now + IDLE_TUNE_EVERY_MS;
            self.cooldown_ms = self.cooldown_ms.saturating_sub(IDLE_LOWER_MS);
            self.clamp_cooldown(rules);
        }
    }

    fn clamp_cooldown(&mut self, rules: &RulesConfig) {
        self.cooldown_ms = self
            .cooldown_ms
            .clamp(rules.incident_cooldown_min_ms, rules.incident_cooldown_max_ms);
    }
}

/// Severity of a contact without the random term.
pub fn nominal_severity(distance: f32, rel_speed: f32, heat: f32, rules: &RulesConfig) -> f32 {
    severity(&IncidentFeatures::measure(distance, rel_speed, heat, rules), 0.0)
}
