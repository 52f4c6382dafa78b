use thiserror::Error;

use crate::engine::decision::DecisionStage;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("No incident is waiting for a decision")]
    NoPendingIncident,

    #[error("Wrong decision stage: expected {expected:?}, found {found:?}")]
    WrongDecisionStage {
        expected: DecisionStage,
        found: DecisionStage,
    },

    #[error("Shot unavailable: {0}")]
    ShotUnavailable(&'static str),

    #[error("Invalid tunable {name}: {value}")]
    InvalidTunable { name: &'static str, value: f32 },

    #[error("Config error: {0}")]
    Config(String),
}

impl SimError {
    /// Invalid calls leave the session untouched; the caller may simply retry later.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimError::NoPendingIncident => true,
            SimError::WrongDecisionStage { .. } => true,
            SimError::ShotUnavailable(_) => true,
            SimError::InvalidTunable { .. } => true,
            SimError::Config(_) => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Value out of range for {name}: {value}")]
    OutOfRange { name: &'static str, value: f32 },

    #[error("Invalid {name}: {reason}")]
    Invalid {
        name: &'static str,
        reason: &'static str,
    },
}

impl ConfigError {
    pub fn invalid(name: &'static str, reason: &'static str) -> Self {
        ConfigError::Invalid { name, reason }
    }
}

impl From<ConfigError> for SimError {
    fn from(err: ConfigError) -> Self {
        SimError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_convert_into_sim_errors() {
        let err: SimError = ConfigError::invalid("flow.break", "min above max").into();
        assert!(matches!(err, SimError::Config(ref msg) if msg.contains("flow.break")));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn stage_error_names_both_stages() {
        let err = SimError::WrongDecisionStage {
            expected: DecisionStage::AdvantageOrStop,
            found: DecisionStage::FoulCall,
        };
        let text = err.to_string();
        assert!(text.contains("AdvantageOrStop"));
        assert!(text.contains("FoulCall"));
    }
}
