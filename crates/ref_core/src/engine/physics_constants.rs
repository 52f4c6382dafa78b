//! Pitch geometry for the portrait micro-pitch
//!
//! Screen-space pixels, y grows downward. The TOP goal line sits at small y.

// ============================================================
// Field
// ============================================================
pub mod field {
    /// Pitch width (px)
    pub const WIDTH: f32 = 360.0;
    /// Pitch height (px)
    pub const HEIGHT: f32 = 640.0;
    /// Center x
    pub const CENTER_X: f32 = WIDTH / 2.0;
    /// Center y
    pub const CENTER_Y: f32 = HEIGHT / 2.0;
}

// ============================================================
// Playable bounds (players and rebounding ball are clamped here)
// ============================================================
pub mod bounds {
    pub const MIN_X: f32 = 18.0;
    pub const MAX_X: f32 = 342.0;
    pub const MIN_Y: f32 = 66.0;
    pub const MAX_Y: f32 = 574.0;
}

// ============================================================
// Goals
// ============================================================
pub mod goal {
    use super::field;

    /// TOP goal line y
    pub const TOP_Y: f32 = 64.0;
    /// BOTTOM goal line y
    pub const BOTTOM_Y: f32 = 576.0;
    /// Goal mouth left post x
    pub const X_MIN: f32 = 134.0;
    /// Goal mouth right post x
    pub const X_MAX: f32 = 226.0;
    /// Goal mouth center x
    pub const CENTER_X: f32 = (X_MIN + X_MAX) / 2.0;
    /// Keeper home y for the TOP goal
    pub const KEEPER_TOP_Y: f32 = 78.0;
    /// Keeper home y for the BOTTOM goal
    pub const KEEPER_BOTTOM_Y: f32 = field::HEIGHT - 78.0;
}

// ============================================================
// HUD
// ============================================================
pub mod hud {
    /// Height of the top overlay the referee avatar keeps clear of (px)
    pub const CLEAR_PX: f32 = 90.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_mouth_is_centered() {
        assert!((goal::CENTER_X - field::CENTER_X).abs() < 1e-3);
    }

    #[test]
    fn goal_lines_lie_just_outside_bounds() {
        assert!(goal::TOP_Y < bounds::MIN_Y);
        assert!(goal::BOTTOM_Y > bounds::MAX_Y);
        assert!(goal::KEEPER_TOP_Y > goal::TOP_Y);
        assert!(goal::KEEPER_BOTTOM_Y < goal::BOTTOM_Y);
    }
}
