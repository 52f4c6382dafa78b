//! Keeper commit, error and fatigue model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeeperConfig {
    /// 0..1, higher = better
    pub skill: f32,
    pub reaction_ms_min: f32,
    pub reaction_ms_max: f32,
    /// Dive tween duration (ms)
    pub dive_ms: f32,
    /// Return-to-home tween duration (ms)
    pub recover_ms: f32,
    /// Delay before recovering from a hold (ms)
    pub hold_recover_delay_ms: f32,
    /// Delay before recovering from a parry (ms)
    pub parry_recover_delay_ms: f32,
    /// Pre-shot lateral tracking gain per tick
    pub positioning_k: f32,
    /// How far toward the ball the keeper shades from home (0..1)
    pub tracking_share: f32,
    pub error_px_base: f32,
    pub error_px_by_edge: f32,
    pub error_px_by_speed: f32,
    /// Error removed per unit of skill (px)
    pub error_px_by_skill: f32,
    /// Error added per unit of fatigue (px)
    pub error_px_by_fatigue: f32,
    /// Error floor (px)
    pub error_px_min: f32,
    /// Jitter around the mirrored spot on a misread (px)
    pub misread_jitter_px: f32,
    pub fatigue_per_dive: f32,
    pub fatigue_recover_per_sec: f32,
    pub fatigue_cap: f32,
    pub misread_chance: f32,
    /// Dive target inset from the posts (px)
    pub post_inset: f32,
    /// Max forward leap while diving (px)
    pub dive_forward_max: f32,
    pub base_save: f32,
    pub skill_save_weight: f32,
    pub edge_save_penalty: f32,
    pub speed_save_penalty: f32,
    pub reaction_penalty_max: f32,
    pub fatigue_penalty_max: f32,
    /// Share of the save probability that is a clean hold
    pub hold_share: f32,
    pub save_prob_min: f32,
    pub save_prob_max: f32,
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            skill: 0.62,
            reaction_ms_min: 90.0,
            reaction_ms_max: 160.0,
            dive_ms: 240.0,
            recover_ms: 360.0,
            hold_recover_delay_ms: 220.0,
            parry_recover_delay_ms: 200.0,
            positioning_k: 0.08,
            tracking_share: 0.55,
            error_px_base: 4.0,
            error_px_by_edge: 14.0,
            error_px_by_speed: 10.0,
            error_px_by_skill: 6.0,
            error_px_by_fatigue: 10.0,
            error_px_min: 2.0,
            misread_jitter_px: 6.0,
            fatigue_per_dive: 0.12,
            fatigue_recover_per_sec: 0.10,
            fatigue_cap: 0.8,
            misread_chance: 0.18,
            post_inset: 6.0,
            dive_forward_max: 12.0,
            base_save: 0.65,
            skill_save_weight: 0.25,
            edge_save_penalty: 0.35,
            speed_save_penalty: 0.25,
            reaction_penalty_max: 0.15,
            fatigue_penalty_max: 0.25,
            hold_share: 0.45,
            save_prob_min: 0.05,
            save_prob_max: 0.95,
        }
    }
}
