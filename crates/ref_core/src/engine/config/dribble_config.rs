//! Dribble spring-damper tuning

use serde::{Deserialize, Serialize};

/// Ball-at-feet attachment parameters (pixels, seconds).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DribbleConfig {
    /// Forward lead at standstill (px)
    pub forward_min: f32,
    /// Forward lead at full carrier speed (px)
    pub forward_max: f32,
    /// Lateral sway amplitude (px)
    pub side_base: f32,
    /// Extra sway while turning (px)
    pub side_turn_boost: f32,
    /// Stride wobble amplitude (px)
    pub stride_amp: f32,
    /// Stride phase frequency at standstill (Hz)
    pub phase_base_hz: f32,
    /// Additional phase frequency per px/s of carrier speed
    pub phase_speed_hz: f32,
    /// Foot bias along travel y at standstill / full speed (px)
    pub foot_bias_min: f32,
    pub foot_bias_max: f32,
    /// Spring stiffness outside / inside the touch window
    pub k_free: f32,
    pub k_touch: f32,
    /// Damping ratio outside / inside the touch window
    pub zeta_free: f32,
    pub zeta_touch: f32,
    /// Hard cap on ball speed while carried (px/s)
    pub max_ball_speed: f32,
    /// Control regained per second when the ball is close
    pub regain_rate: f32,
    /// Control lost per radian of turn
    pub lose_turn_rate: f32,
    /// Control lost per px/s of carrier speed
    pub lose_speed_rate: f32,
    /// Capture radius for control recovery (px)
    pub close_dist: f32,
    /// Desired-to-actual distance where the leash engages (px)
    pub max_leash: f32,
    /// Leash stiffness
    pub leash_k: f32,
    /// Carrier speed that counts as "full speed" for offsets (px/s)
    pub full_speed: f32,
    /// Largest integration step (s)
    pub max_dt: f32,
}

impl Default for DribbleConfig {
    fn default() -> Self {
        Self {
            forward_min: 10.0,
            forward_max: 18.0,
            side_base: 5.5,
            side_turn_boost: 3.0,
            stride_amp: 2.2,
            phase_base_hz: 1.8,
            phase_speed_hz: 0.010,
            foot_bias_min: 4.0,
            foot_bias_max: 10.0,
            k_free: 65.0,
            k_touch: 220.0,
            zeta_free: 1.25,
            zeta_touch: 1.05,
            max_ball_speed: 520.0,
            regain_rate: 1.8,
            lose_turn_rate: 1.4,
            lose_speed_rate: 0.0012,
            close_dist: 20.0,
            max_leash: 42.0,
            leash_k: 140.0,
            full_speed: 140.0,
            max_dt: 1.0 / 30.0,
        }
    }
}

impl DribbleConfig {
    /// Tighter attachment: stiffer springs, shorter leash.
    pub fn tight() -> Self {
        Self { k_free: 90.0, zeta_free: 1.10, max_leash: 34.0, ..Self::default() }
    }
}
