//! Card tracking per team (yellow, second yellow, straight red).
//!
//! Each side has a single defender, so records are keyed by team colour.
//! Records persist across rounds for the whole session.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::actor::Team;
use super::config::RulesConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardType {
    Yellow,
    Red,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Stopped fouls committed while defending
    pub fouls: u32,
    pub yellow: bool,
    pub red: bool,
}

/// Card for a stopped foul given the offender's record.
///
/// `fouls` already includes the foul being judged.
pub fn determine_card(severity: f32, fouls: u32, record: &CardRecord, rules: &RulesConfig) -> Option<CardType> {
    if record.red {
        return None;
    }
    if severity >= rules.red_card_threshold {
        return Some(CardType::Red);
    }
    if !record.yellow {
        if severity >= rules.yellow_card_threshold || fouls >= rules.repeat_foul_yellow_after {
            return Some(CardType::Yellow);
        }
        return None;
    }
    // Booked player
    (severity >= rules.yellow_card_threshold).then_some(CardType::Red)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardSystem {
    records: HashMap<Team, CardRecord>,
}

impl CardSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, team: Team) -> CardRecord {
        self.records.get(&team).copied().unwrap_or_default()
    }

    /// Book a stopped foul by `offender` and issue the resulting card, if any.
    pub fn record_stop_foul(&mut self, offender: Team, severity: f32, rules: &RulesConfig) -> Option<CardType> {
        let entry = self.records.entry(offender).or_default();
        entry.fouls = entry.fouls.saturating_add(1);
        let card = determine_card(severity, entry.fouls, entry, rules)?;
        match card {
            CardType::Yellow => entry.yellow = true,
            CardType::Red => entry.red = true,
        }
        Some(card)
    }

    pub fn is_sent_off(&self, team: Team) -> bool {
        self.record(team).red
    }

    pub fn reset(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_foul_below_thresholds_is_clean() {
        let rules = RulesConfig::default();
        let mut cards = CardSystem::new();
        assert_eq!(cards.record_stop_foul(Team::Blue, 0.6, &rules), None);
        assert_eq!(cards.record(Team::Blue).fouls, 1);
    }

    #[test]
    fn test_repeat_offender_is_booked() {
        let rules = RulesConfig::default();
        let mut cards = CardSystem::new();
        cards.record_stop_foul(Team::Blue, 0.6, &rules);
        assert_eq!(cards.record_stop_foul(Team::Blue, 0.6, &rules), Some(CardType::Yellow));
        // Further mild fouls do not escalate
        assert_eq!(cards.record_stop_foul(Team::Blue, 0.6, &rules), None);
    }

    #[test]
    fn test_second_yellow_becomes_red() {
        let rules = RulesConfig::default();
        let mut cards = CardSystem::new();
        assert_eq!(cards.record_stop_foul(Team::Red, 0.75, &rules), Some(CardType::Yellow));
        assert_eq!(cards.record_stop_foul(Team::Red, 0.75, &rules), Some(CardType::Red));
        assert!(cards.is_sent_off(Team::Red));
        assert!(!cards.is_sent_off(Team::Blue));
    }

    #[test]
    fn test_straight_red_and_nothing_after() {
        let rules = RulesConfig::default();
        let mut cards = CardSystem::new();
        assert_eq!(cards.record_stop_foul(Team::Blue, 0.9, &rules), Some(CardType::Red));
        assert_eq!(cards.record_stop_foul(Team::Blue, 0.95, &rules), None);
        assert_eq!(cards.record(Team::Blue).fouls, 2);
    }

    #[test]
    fn test_reset_clears() {
        let rules = RulesConfig::default();
        let mut cards = CardSystem::new();
        cards.record_stop_foul(Team::Red, 0.9, &rules);
        cards.reset();
        assert_eq!(cards.record(Team::Red), CardRecord::default());
    }
}
