//! Steering helpers (minimal set)
//!
//! These return desired velocities; callers blend them into the current
//! velocity (lerp) rather than teleporting positions.

use super::math::Vec2;

/// Seek: move toward a target at the given speed.
pub fn seek(current: Vec2, target: Vec2, speed: f32) -> Vec2 {
    if speed <= 0.0 {
        return Vec2::ZERO;
    }
    (target - current).normalize_or_zero() * speed
}

/// Arrive: speed proportional to the remaining distance, capped at `max_speed`.
pub fn arrive(current: Vec2, target: Vec2, arrive_k: f32, max_speed: f32) -> Vec2 {
    let to_target = target - current;
    let distance = to_target.length();
    if distance < 0.001 || max_speed <= 0.0 {
        return Vec2::ZERO;
    }
    let speed = (distance * arrive_k).clamp(0.0, max_speed);
    to_target * (speed / distance)
}

/// Pursuit with a fixed aim offset (no prediction).
pub fn pursuit(current: Vec2, target_pos: Vec2, offset: Vec2, speed: f32) -> Vec2 {
    seek(current, target_pos + offset, speed)
}

/// Separation impulse pushing `current` away from `other` when closer than
/// `radius`; linear in the overlap.
pub fn separation(current: Vec2, other: Vec2, radius: f32, strength: f32) -> Vec2 {
    if radius <= 0.0 || strength <= 0.0 {
        return Vec2::ZERO;
    }
    let away = current - other;
    let distance = away.length();
    if distance > 0.001 && distance < radius {
        away * ((radius - distance) * strength / distance)
    } else {
        Vec2::ZERO
    }
}

/// Repulsion that fades to zero at `radius` (`strength` px at contact).
pub fn repulsion(current: Vec2, other: Vec2, radius: f32, strength: f32) -> Vec2 {
    let away = current - other;
    let distance = away.length();
    if distance < 0.001 || distance >= radius {
        return Vec2::ZERO;
    }
    away * (strength * (radius - distance) / radius / distance)
}

/// Blend `vel` toward `desired` by `factor` per call.
pub fn smooth_velocity(vel: Vec2, desired: Vec2, factor: f32) -> Vec2 {
    vel.lerp(desired, factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seek_direction() {
        let vel = seek(Vec2::ZERO, Vec2::new(10.0, 0.0), 5.0);
        assert!((vel.x - 5.0).abs() < 1e-5);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_arrive_slows_down_near_target() {
        let vel = arrive(Vec2::ZERO, Vec2::new(10.0, 0.0), 0.9, 75.0);
        assert!((vel.x - 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_arrive_caps_far() {
        let vel = arrive(Vec2::ZERO, Vec2::new(0.0, 500.0), 0.9, 75.0);
        assert!((vel.y - 75.0).abs() < 1e-3);
    }

    #[test]
    fn test_pursuit_aims_at_offset_point() {
        let vel = pursuit(Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0), 1.0);
        assert!(vel.x > 0.0 && vel.y > 0.0);
    }

    #[test]
    fn test_separation_pushes_away() {
        let push = separation(Vec2::ZERO, Vec2::new(4.0, 0.0), 10.0, 4.2);
        assert!((push.x + 6.0 * 4.2).abs() < 1e-4);
        assert_eq!(separation(Vec2::ZERO, Vec2::new(40.0, 0.0), 10.0, 4.2), Vec2::ZERO);
    }

    #[test]
    fn test_repulsion_fades_with_distance() {
        let near = repulsion(Vec2::ZERO, Vec2::new(10.0, 0.0), 100.0, 80.0);
        let far = repulsion(Vec2::ZERO, Vec2::new(90.0, 0.0), 100.0, 80.0);
        assert!(near.x < far.x && far.x < 0.0);
        assert_eq!(repulsion(Vec2::ZERO, Vec2::new(120.0, 0.0), 100.0, 80.0), Vec2::ZERO);
    }
}
