//! 2D vector math
//!
//! `glam::Vec2` is the value type for every position, velocity and force.
//! It is `Copy`, so there is no aliasing between entities: every read is a
//! copy and every write is explicit. `VecExt` adds the handful of operations
//! the simulation relies on with guarded edge cases (zero divisor, zero
//! length) that glam leaves to the caller.

use glam::Vec2;

/// Guarded vector operations used throughout the simulation
pub trait VecExt: Sized {
    /// Construct from a heading (radians) and magnitude
    fn from_heading(angle: f32, magnitude: f32) -> Self;
    /// Divide by a scalar; a zero divisor leaves the vector unchanged
    fn div_or_self(self, divisor: f32) -> Self;
    /// Unit vector in the same direction; the zero vector stays zero
    fn normalized_or_self(self) -> Self;
    /// Limit the magnitude to `max_len`, preserving direction
    fn clamped_length(self, max_len: f32) -> Self;
    /// Heading of the vector in radians, measured from +x
    fn heading(self) -> f32;
    /// Rotate counter-clockwise by `angle` radians
    fn rotated_by(self, angle: f32) -> Self;
    /// 2D cross product (z component of the 3D cross)
    fn cross(self, other: Self) -> f32;
}

impl VecExt for Vec2 {
    #[inline]
    fn from_heading(angle: f32, magnitude: f32) -> Self {
        Vec2::new(angle.cos(), angle.sin()) * magnitude
    }

    #[inline]
    fn div_or_self(self, divisor: f32) -> Self {
        if divisor == 0.0 { self } else { self / divisor }
    }

    #[inline]
    fn normalized_or_self(self) -> Self {
        let len = self.length();
        if len == 0.0 { self } else { self / len }
    }

    #[inline]
    fn clamped_length(self, max_len: f32) -> Self {
        let len_sq = self.length_squared();
        if len_sq > max_len * max_len && len_sq > 0.0 {
            self * (max_len / len_sq.sqrt())
        } else {
            self
        }
    }

    #[inline]
    fn heading(self) -> f32 {
        self.y.atan2(self.x)
    }

    #[inline]
    fn rotated_by(self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    #[inline]
    fn cross(self, other: Self) -> f32 {
        self.x * other.y - self.y * other.x
    }
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Signed shortest rotation taking `from` to `to`, in [-π, π)
#[inline]
pub fn angle_delta(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Linear interpolation between two scalars
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_divide_by_zero_is_noop() {
        let v = Vec2::new(3.0, -4.0);
        assert_eq!(v.div_or_self(0.0), v);
        assert_eq!(v.div_or_self(2.0), Vec2::new(1.5, -2.0));
    }

    #[test]
    fn test_normalize_zero_is_noop() {
        assert_eq!(Vec2::ZERO.normalized_or_self(), Vec2::ZERO);
        let n = Vec2::new(0.0, 5.0).normalized_or_self();
        assert!((n - Vec2::Y).length() < 1e-6);
    }

    #[test]
    fn test_clamped_length() {
        let v = Vec2::new(30.0, 40.0).clamped_length(10.0);
        assert!((v.length() - 10.0).abs() < 1e-4);
        assert!((v.heading() - Vec2::new(3.0, 4.0).heading()).abs() < 1e-6);
        // Short vectors pass through untouched
        assert_eq!(Vec2::new(1.0, 1.0).clamped_length(10.0), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = Vec2::X.rotated_by(FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_heading() {
        let v = Vec2::from_heading(PI, 2.0);
        assert!((v.x + 2.0).abs() < 1e-5);
        assert!(v.y.abs() < 1e-5);
    }

    #[test]
    fn test_cross_sign() {
        assert_eq!(Vec2::X.cross(Vec2::Y), 1.0);
        assert_eq!(Vec2::Y.cross(Vec2::X), -1.0);
    }

    #[test]
    fn test_angle_delta_wraps() {
        let d = angle_delta(PI - 0.1, -PI + 0.1);
        assert!((d - 0.2).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_rotation_preserves_length(x in -1000.0f32..1000.0, y in -1000.0f32..1000.0, a in -10.0f32..10.0) {
            let v = Vec2::new(x, y);
            let r = v.rotated_by(a);
            prop_assert!((r.length() - v.length()).abs() <= 1e-3 * (1.0 + v.length()));
        }

        #[test]
        fn prop_clamped_never_exceeds(x in -1000.0f32..1000.0, y in -1000.0f32..1000.0, m in 0.0f32..500.0) {
            let v = Vec2::new(x, y).clamped_length(m);
            prop_assert!(v.length() <= m + 1e-3);
        }

        #[test]
        fn prop_normalize_is_unit_or_zero(x in -1000.0f32..1000.0, y in -1000.0f32..1000.0) {
            let v = Vec2::new(x, y).normalized_or_self();
            let len = v.length();
            prop_assert!(len == 0.0 || (len - 1.0).abs() < 1e-4);
        }
    }
}
