//! Incident, foul and card thresholds
//!
//! | Group | Values |
//! |-------|--------|
//! | Foul model | logistic threshold + steepness |
//! | Incident detection | contact distance, adaptive cooldown |
//! | Cards | yellow/red severity, repeat-foul yellow |
//! | Scoring | base points per call |

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Severity at which a foul is a coin flip
    pub foul_threshold: f32,
    /// Logistic steepness
    pub sigmoid_k: f32,
    /// Attacker–defender distance that counts as contact (px)
    pub incident_distance: f32,
    /// Relative speed that normalizes to 1.0 (px/s)
    pub incident_speed_norm: f32,
    /// Initial incident cooldown per round (ms)
    pub incident_cooldown_ms: u64,
    pub incident_cooldown_min_ms: u64,
    pub incident_cooldown_max_ms: u64,
    /// Attacker speed toward goal that makes an attack "promising" (px/s)
    pub attack_promising_speed: f32,
    /// Severity >= this ⇒ yellow candidate
    pub yellow_card_threshold: f32,
    /// Severity >= this ⇒ red candidate
    pub red_card_threshold: f32,
    /// Foul count at which a repeat offender is booked
    pub repeat_foul_yellow_after: u32,
    pub points_correct_call: i32,
    pub points_wrong_call: i32,
    pub points_correct_advantage: i32,
    pub points_wrong_advantage: i32,
    /// Bonus awarded at the third correct call in a row
    pub streak_bonus: i32,
    pub streak_bonus_at: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            foul_threshold: 0.58,
            sigmoid_k: 8.5,
            incident_distance: 22.0,
            incident_speed_norm: 125.0,
            incident_cooldown_ms: 1400,
            incident_cooldown_min_ms: 850,
            incident_cooldown_max_ms: 2600,
            attack_promising_speed: 12.0,
            yellow_card_threshold: 0.72,
            red_card_threshold: 0.88,
            repeat_foul_yellow_after: 2,
            points_correct_call: 10,
            points_wrong_call: -12,
            points_correct_advantage: 6,
            points_wrong_advantage: -6,
            streak_bonus: 4,
            streak_bonus_at: 3,
        }
    }
}

impl RulesConfig {
    /// More contacts, earlier cards
    pub fn arcade() -> Self {
        Self {
            incident_distance: 26.0,
            incident_cooldown_ms: 1100,
            yellow_card_threshold: 0.66,
            red_card_threshold: 0.84,
            ..Self::default()
        }
    }

    /// Fewer, cleaner contacts for learning the call
    pub fn training() -> Self {
        Self {
            incident_cooldown_ms: 1800,
            yellow_card_threshold: 0.76,
            red_card_threshold: 0.92,
            ..Self::default()
        }
    }
}
