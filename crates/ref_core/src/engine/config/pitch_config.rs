//! Pitch bounds and goal mouths

use serde::{Deserialize, Serialize};

use crate::engine::actor::GoalSide;
use crate::engine::math::{clamp, Vec2};
use crate::engine::physics_constants::{bounds, field, goal};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchConfig {
    pub width: f32,
    pub height: f32,
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub goal_top_y: f32,
    pub goal_bottom_y: f32,
    pub goal_x_min: f32,
    pub goal_x_max: f32,
    pub keeper_top_y: f32,
    pub keeper_bottom_y: f32,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            width: field::WIDTH,
            height: field::HEIGHT,
            min_x: bounds::MIN_X,
            max_x: bounds::MAX_X,
            min_y: bounds::MIN_Y,
            max_y: bounds::MAX_Y,
            goal_top_y: goal::TOP_Y,
            goal_bottom_y: goal::BOTTOM_Y,
            goal_x_min: goal::X_MIN,
            goal_x_max: goal::X_MAX,
            keeper_top_y: goal::KEEPER_TOP_Y,
            keeper_bottom_y: goal::KEEPER_BOTTOM_Y,
        }
    }
}

impl PitchConfig {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Goal mouth center x (also the keeper's home x)
    pub fn goal_center_x(&self) -> f32 {
        (self.goal_x_min + self.goal_x_max) / 2.0
    }

    /// Half the goal mouth width
    pub fn goal_half_width(&self) -> f32 {
        (self.goal_x_max - self.goal_x_min) / 2.0
    }

    pub fn goal_line_y(&self, side: GoalSide) -> f32 {
        match side {
            GoalSide::Top => self.goal_top_y,
            GoalSide::Bottom => self.goal_bottom_y,
        }
    }

    pub fn keeper_home(&self, side: GoalSide) -> Vec2 {
        let y = match side {
            GoalSide::Top => self.keeper_top_y,
            GoalSide::Bottom => self.keeper_bottom_y,
        };
        Vec2::new(self.goal_center_x(), y)
    }

    pub fn in_goal_mouth(&self, x: f32) -> bool {
        x >= self.goal_x_min && x <= self.goal_x_max
    }

    /// True once `y` is on or past the goal line of `side`
    pub fn crossed_goal_line(&self, side: GoalSide, y: f32) -> bool {
        match side {
            GoalSide::Top => y <= self.goal_top_y,
            GoalSide::Bottom => y >= self.goal_bottom_y,
        }
    }

    /// Clamp a point into the playable rectangle shrunk by `inset`.
    pub fn clamp_inside(&self, p: Vec2, inset: f32) -> Vec2 {
        Vec2::new(
            clamp(p.x, self.min_x + inset, self.max_x - inset),
            clamp(p.y, self.min_y + inset, self.max_y - inset),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_line_crossing_is_side_aware() {
        let p = PitchConfig::default();
        assert!(p.crossed_goal_line(GoalSide::Top, 60.0));
        assert!(!p.crossed_goal_line(GoalSide::Top, 70.0));
        assert!(p.crossed_goal_line(GoalSide::Bottom, 580.0));
        assert!(!p.crossed_goal_line(GoalSide::Bottom, 570.0));
    }

    #[test]
    fn keeper_homes_sit_in_front_of_their_goal() {
        let p = PitchConfig::default();
        assert_eq!(p.keeper_home(GoalSide::Top), Vec2::new(180.0, 78.0));
        assert_eq!(p.keeper_home(GoalSide::Bottom), Vec2::new(180.0, 562.0));
        assert!(p.in_goal_mouth(180.0));
        assert!(!p.in_goal_mouth(100.0));
    }
}
