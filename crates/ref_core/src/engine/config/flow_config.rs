//! Match flow, scene variety, player steering and referee motion

use serde::{Deserialize, Serialize};

/// Match clock, round lifecycle and scene randomization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Real-time match length (ms); shown as 90'
    pub match_duration_ms: u64,
    pub max_positions: u32,
    /// Delay between round reset and kick-off (ms)
    pub round_start_delay_ms: u64,
    /// Between-rounds break (ms)
    pub break_min_ms: u64,
    pub break_max_ms: u64,
    /// Extra wait after a stop/advantage call before the break (ms)
    pub decision_exit_delay_ms: u64,
    /// Extra wait after a goal before the break (ms)
    pub goal_exit_delay_ms: u64,
    /// Extra wait after a save before the break (ms)
    pub save_exit_delay_ms: u64,
    /// Minimum attacker–defender spawn distance (px)
    pub min_spawn_separation: f32,
    pub early_turnover_chance: f32,
    pub turnover_regain_min_ms: u64,
    pub turnover_regain_max_ms: u64,
    pub attacker_speed_min: f32,
    pub attacker_speed_max: f32,
    pub defender_speed_min: f32,
    pub defender_speed_max: f32,
    /// Probability of a "clean" scene, then of "normal" among the rest
    pub clean_scene_chance: f32,
    pub normal_scene_chance: f32,
    /// Frames kept for the instant replay
    pub replay_frames: usize,
    /// Ticks each replay frame is shown for (2 = half speed)
    pub replay_ticks_per_frame: u32,
    pub steering: SteeringConfig,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            match_duration_ms: 120_000,
            max_positions: 7,
            round_start_delay_ms: 520,
            break_min_ms: 3000,
            break_max_ms: 6000,
            decision_exit_delay_ms: 500,
            goal_exit_delay_ms: 700,
            save_exit_delay_ms: 500,
            min_spawn_separation: 70.0,
            early_turnover_chance: 0.30,
            turnover_regain_min_ms: 900,
            turnover_regain_max_ms: 1500,
            attacker_speed_min: 82.0,
            attacker_speed_max: 94.0,
            defender_speed_min: 76.0,
            defender_speed_max: 90.0,
            clean_scene_chance: 0.25,
            normal_scene_chance: 0.55,
            replay_frames: 90,
            replay_ticks_per_frame: 2,
            steering: SteeringConfig::default(),
        }
    }
}

impl FlowConfig {
    pub fn half_time_ms(&self) -> u64 {
        self.match_duration_ms / 2
    }
}

/// Field player movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    pub target_refresh_min_ms: f32,
    pub target_refresh_max_ms: f32,
    /// Lane anchor offset as a share of the playable width
    pub lane_width_share: f32,
    /// Goal-line inset of the attacker's run target (px)
    pub target_goal_inset: f32,
    pub attacker_vel_lerp: f32,
    pub defender_vel_lerp: f32,
    /// Random offset added to the defender's pursuit point (px)
    pub defender_offset: f32,
    pub separation_dist: f32,
    pub separation_push: f32,
    /// Share of the separation push applied (reversed) to the defender
    pub defender_push_share: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            target_refresh_min_ms: 420.0,
            target_refresh_max_ms: 820.0,
            lane_width_share: 0.28,
            target_goal_inset: 24.0,
            attacker_vel_lerp: 0.045,
            defender_vel_lerp: 0.055,
            defender_offset: 10.0,
            separation_dist: 10.0,
            separation_push: 4.2,
            defender_push_share: 0.7,
        }
    }
}

/// Referee avatar motion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefereeConfig {
    pub desired_dist_min: f32,
    pub desired_dist_max: f32,
    pub max_speed_min: f32,
    pub max_speed_max: f32,
    pub smooth_min: f32,
    pub smooth_max: f32,
    pub arrive_k: f32,
    /// Players closer than this push the referee's ideal spot away (px)
    pub avoid_dist: f32,
    pub avoid_push: f32,
    /// Bottom HUD clearance (px)
    pub hud_clear: f32,
    /// Micro-step window after a contact (ms)
    pub micro_step_min_ms: u64,
    pub micro_step_max_ms: u64,
    /// Speed cap during the micro-step (px/s)
    pub micro_step_speed: f32,
    /// Closest the referee may step toward the contact (px)
    pub min_focus_dist: f32,
}

impl Default for RefereeConfig {
    fn default() -> Self {
        Self {
            desired_dist_min: 100.0,
            desired_dist_max: 150.0,
            max_speed_min: 60.0,
            max_speed_max: 85.0,
            smooth_min: 0.06,
            smooth_max: 0.12,
            arrive_k: 0.9,
            avoid_dist: 100.0,
            avoid_push: 80.0,
            hud_clear: crate::engine::physics_constants::hud::CLEAR_PX,
            micro_step_min_ms: 180,
            micro_step_max_ms: 260,
            micro_step_speed: 110.0,
            min_focus_dist: 100.0,
        }
    }
}
