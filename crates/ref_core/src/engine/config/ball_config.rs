//! Loose-ball and shot parameters

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    /// Auto-pickup radius (px)
    pub pickup_dist: f32,
    /// Max ball-vs-player relative speed for a pickup (px/s)
    pub pickup_rel_speed: f32,
    /// Per-tick velocity retention while rebounding
    pub friction_rebound: f32,
    /// Velocity retained (and reversed) when a rebound leaves the bounds
    pub bounce_restitution: f32,
    /// Rebound window before the attacker is handed the ball (ms)
    pub rebound_ms: u64,
    /// Snap offset above the carrier on possession change (px)
    pub carry_snap_offset: f32,
    /// Ball freeze after a keeper touch (ms)
    pub hit_stop_ms: u64,
    /// Half-speed window after a keeper touch (ms)
    pub slow_mo_ms: u64,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            pickup_dist: 18.0,
            pickup_rel_speed: 80.0,
            friction_rebound: 0.985,
            bounce_restitution: 0.5,
            rebound_ms: 520,
            carry_snap_offset: 4.0,
            hit_stop_ms: 120,
            slow_mo_ms: 220,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotConfig {
    /// Distance to the target goal line that allows a shot (px)
    pub zone_px: f32,
    pub cooldown_ms: u64,
    /// Shot speed (px/s)
    pub speed: f32,
    /// Speed that normalizes to 1.0 (px/s)
    pub speed_norm: f32,
    /// Chance that an eligible tick becomes a shot
    pub shot_chance: f32,
    /// Chance that a non-shot eligible tick becomes a feint
    pub feint_chance: f32,
    /// Feint nudge distance (px)
    pub feint_nudge_px: f32,
    /// Lateral randomness around the goal center (px)
    pub lateral_spread: f32,
    /// Target inset from the posts (px)
    pub post_inset: f32,
    /// Ball–keeper distance that resolves a shot early (px)
    pub early_save_radius: f32,
    /// Ball is pushed this far out of the keeper on a save (px)
    pub save_push_radius: f32,
    /// Parry deflection: bias toward the keeper and lateral/away speeds
    pub parry_keeper_bias: f32,
    pub parry_lateral_jitter: f32,
    pub parry_away_min: f32,
    pub parry_away_max: f32,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self {
            zone_px: 110.0,
            cooldown_ms: 1800,
            speed: 185.0,
            speed_norm: 240.0,
            shot_chance: 0.14,
            feint_chance: 0.08,
            feint_nudge_px: 6.0,
            lateral_spread: 28.0,
            post_inset: 4.0,
            early_save_radius: 15.0,
            save_push_radius: 20.0,
            parry_keeper_bias: 0.6,
            parry_lateral_jitter: 60.0,
            parry_away_min: 140.0,
            parry_away_max: 220.0,
        }
    }
}
