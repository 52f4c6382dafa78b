//! Field actors and the small enums shared across the engine

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::math::Vec2;
use super::rng::SimRng;

/// Team colour. Players keep their colour for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Team::Red => "RED",
            Team::Blue => "BLUE",
        }
    }
}

/// Who has the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Possession {
    Attacker,
    Defender,
    Loose,
}

/// Which goal (screen top or bottom).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalSide {
    Top,
    Bottom,
}

impl GoalSide {
    /// y direction pointing from this goal back into the pitch
    pub fn away_sign(self) -> f32 {
        match self {
            GoalSide::Top => 1.0,
            GoalSide::Bottom => -1.0,
        }
    }

    pub fn opposite(self) -> GoalSide {
        match self {
            GoalSide::Top => GoalSide::Bottom,
            GoalSide::Bottom => GoalSide::Top,
        }
    }
}

/// Attack direction of the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackDirection {
    /// Toward the TOP goal (decreasing y)
    Up,
    /// Toward the BOTTOM goal (increasing y)
    Down,
}

impl AttackDirection {
    pub fn target_goal(self) -> GoalSide {
        match self {
            AttackDirection::Up => GoalSide::Top,
            AttackDirection::Down => GoalSide::Bottom,
        }
    }

    /// -1 for Up, +1 for Down
    pub fn sign(self) -> f32 {
        match self {
            AttackDirection::Up => -1.0,
            AttackDirection::Down => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AttackDirection::Up => "UP",
            AttackDirection::Down => "DOWN",
        }
    }
}

/// Per-player dribble memory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DribbleState {
    /// Stride phase in [0, 2π)
    pub phase: f32,
    /// Composure in [0, 1]
    pub control: f32,
    /// Last non-degenerate travel direction (unit)
    pub prev_dir: Vec2,
}

impl Default for DribbleState {
    fn default() -> Self {
        Self { phase: 0.0, control: 1.0, prev_dir: Vec2::DOWN }
    }
}

impl DribbleState {
    /// Fresh state with a random stride phase.
    pub fn fresh(rng: &mut SimRng) -> Self {
        Self { phase: rng.range(0.0, TAU), ..Self::default() }
    }
}

/// Attacker or defender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub team: Team,
    pub pos: Vec2,
    pub vel: Vec2,
    pub max_speed: f32,
    pub dribble: DribbleState,
}

impl Actor {
    pub fn new(team: Team, max_speed: f32) -> Self {
        Self {
            team,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            max_speed,
            dribble: DribbleState::default(),
        }
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Place at `pos` standing still.
    pub fn place(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
    }

    /// Integrate position and cap the speed.
    pub fn integrate(&mut self, dt: f32) {
        self.vel = self.vel.clamp_length(self.max_speed);
        self.pos += self.vel * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_direction_maps_to_goal() {
        assert_eq!(AttackDirection::Up.target_goal(), GoalSide::Top);
        assert_eq!(AttackDirection::Down.target_goal(), GoalSide::Bottom);
        assert_eq!(GoalSide::Top.away_sign(), 1.0);
    }

    #[test]
    fn integrate_caps_speed() {
        let mut a = Actor::new(Team::Red, 90.0);
        a.vel = Vec2::new(300.0, 0.0);
        a.integrate(0.1);
        assert!((a.speed() - 90.0).abs() < 1e-3);
        assert!((a.pos.x - 9.0).abs() < 1e-3);
    }

    #[test]
    fn fresh_dribble_state_has_full_control() {
        let mut rng = SimRng::new(3);
        let s = DribbleState::fresh(&mut rng);
        assert_eq!(s.control, 1.0);
        assert_eq!(s.prev_dir, Vec2::DOWN);
        assert!((0.0..TAU).contains(&s.phase));
    }
}
