//! # Simulation Configuration
//!
//! Every tuning constant of the micro-match lives here, grouped by concern.
//!
//! ## Presets
//! - `realistic()` - default feel
//! - `arcade()` - more contacts, earlier cards, faster shots
//! - `training()` - calmer scenes, slower shots, weaker keepers
//!
//! ## Usage
//! ```rust
//! use ref_core::engine::config::SimConfig;
//!
//! let config = SimConfig::default();
//! let arcade = SimConfig::arcade();
//! let from_env = SimConfig::from_env_or_default();
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Environment Variables
//!
//! - `RF_SIM_PROFILE`: Select preset (realistic, arcade, training)

mod ball_config;
mod dribble_config;
mod flow_config;
mod keeper_config;
mod pitch_config;
mod rules_config;

pub use ball_config::{BallConfig, ShotConfig};
pub use dribble_config::DribbleConfig;
pub use flow_config::{FlowConfig, RefereeConfig, SteeringConfig};
pub use keeper_config::KeeperConfig;
pub use pitch_config::PitchConfig;
pub use rules_config::RulesConfig;

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::ConfigError;

/// Full session configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SimConfig {
    #[serde(default)]
    pub pitch: PitchConfig,
    #[serde(default)]
    pub dribble: DribbleConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub keeper: KeeperConfig,
    #[serde(default)]
    pub ball: BallConfig,
    #[serde(default)]
    pub shot: ShotConfig,
    #[serde(default)]
    pub flow: FlowConfig,
    #[serde(default)]
    pub referee: RefereeConfig,
}

impl SimConfig {
    pub fn realistic() -> Self {
        Self::default()
    }

    /// Busier scenes: more contacts, earlier cards, harder shots
    pub fn arcade() -> Self {
        let mut cfg = Self::default();
        cfg.rules = RulesConfig::arcade();
        cfg.shot.speed = 215.0;
        cfg.shot.shot_chance = 0.18;
        cfg.keeper.misread_chance = 0.22;
        cfg.flow.attacker_speed_max = 100.0;
        cfg
    }

    /// Calm scenes for learning the call
    pub fn training() -> Self {
        let mut cfg = Self::default();
        cfg.rules = RulesConfig::training();
        cfg.dribble = DribbleConfig::tight();
        cfg.shot.speed = 165.0;
        cfg.keeper.skill = 0.5;
        cfg.keeper.misread_chance = 0.12;
        cfg.flow.break_min_ms = 2000;
        cfg.flow.break_max_ms = 3500;
        cfg
    }

    pub fn from_profile(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "" | "default" | "realistic" => Some(Self::realistic()),
            "arcade" => Some(Self::arcade()),
            "training" => Some(Self::training()),
            _ => None,
        }
    }

    /// Load from environment variable RF_SIM_PROFILE or use default
    pub fn from_env_or_default() -> Self {
        let profile = env::var("RF_SIM_PROFILE").unwrap_or_default();
        Self::from_profile(&profile).unwrap_or_default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break the tick loop or the probability model.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.pitch;
        if p.min_x >= p.max_x || p.min_y >= p.max_y {
            return Err(ConfigError::invalid("pitch.bounds", "min must be below max"));
        }
        if p.goal_x_min >= p.goal_x_max {
            return Err(ConfigError::invalid("pitch.goal_x", "goal mouth is empty"));
        }
        unit_range("keeper.skill", self.keeper.skill)?;
        unit_range("keeper.misread_chance", self.keeper.misread_chance)?;
        unit_range("keeper.hold_share", self.keeper.hold_share)?;
        unit_range("shot.feint_chance", self.shot.feint_chance)?;
        unit_range("shot.shot_chance", self.shot.shot_chance)?;
        unit_range("rules.foul_threshold", self.rules.foul_threshold)?;
        unit_range("flow.early_turnover_chance", self.flow.early_turnover_chance)?;
        if self.keeper.save_prob_min > self.keeper.save_prob_max {
            return Err(ConfigError::invalid("keeper.save_prob", "min above max"));
        }
        if self.keeper.reaction_ms_min > self.keeper.reaction_ms_max
            || self.keeper.reaction_ms_max <= 0.0
        {
            return Err(ConfigError::invalid("keeper.reaction_ms", "empty or inverted range"));
        }
        if self.rules.yellow_card_threshold > self.rules.red_card_threshold {
            return Err(ConfigError::invalid("rules.card_thresholds", "yellow above red"));
        }
        if self.rules.incident_cooldown_min_ms > self.rules.incident_cooldown_max_ms {
            return Err(ConfigError::invalid("rules.incident_cooldown", "min above max"));
        }
        if self.shot.speed <= 0.0 || self.shot.speed_norm <= 0.0 {
            return Err(ConfigError::invalid("shot.speed", "must be positive"));
        }
        if self.dribble.max_dt <= 0.0 || self.dribble.max_ball_speed <= 0.0 {
            return Err(ConfigError::invalid("dribble", "max_dt and max_ball_speed must be positive"));
        }
        if !(0.0..=1.0).contains(&self.ball.friction_rebound) {
            return Err(ConfigError::invalid("ball.friction_rebound", "must be in [0, 1]"));
        }
        if self.flow.break_min_ms > self.flow.break_max_ms {
            return Err(ConfigError::invalid("flow.break", "min above max"));
        }
        if self.flow.replay_frames == 0 || self.flow.replay_ticks_per_frame == 0 {
            return Err(ConfigError::invalid("flow.replay", "must be non-zero"));
        }
        Ok(())
    }
}

fn unit_range(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { name, value })
    }
}

// ========== Tests ==========
