use ultraviolet::Vec2;

/// Extra 2D operations on top of `ultraviolet::Vec2`.
///
/// Velocity is always stored as raw `(x, y)`; speed and heading are derived
/// through these accessors and never cached.
pub trait Vec2Ext {
    /// Builds a vector from a magnitude and an angle in radians.
    fn from_polar(magnitude: f32, angle: f32) -> Self;
    /// Heading in radians, `atan2(y, x)`. The zero vector has angle 0.
    fn angle(&self) -> f32;
    /// Scalar 2D cross product (z component of the 3D cross product).
    fn cross(&self, other: Self) -> f32;
    /// Same direction, new magnitude. The zero vector stays zero.
    fn with_mag(&self, magnitude: f32) -> Self;
}

impl Vec2Ext for Vec2 {
    fn from_polar(magnitude: f32, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Vec2::new(cos, sin) * magnitude
    }

    fn angle(&self) -> f32 {
        if self.x == 0.0 && self.y == 0.0 {
            return 0.0;
        }
        self.y.atan2(self.x)
    }

    fn cross(&self, other: Self) -> f32 {
        self.x * other.y - self.y * other.x
    }

    fn with_mag(&self, magnitude: f32) -> Self {
        let mag = self.mag();
        if mag == 0.0 {
            return *self;
        }
        *self * (magnitude / mag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPS: f32 = 1e-5;

    #[test]
    fn polar_round_trip() {
        let v = Vec2::from_polar(5.0, FRAC_PI_2);
        assert!(v.x.abs() < EPS);
        assert!((v.y - 5.0).abs() < EPS);
        assert!((v.mag() - 5.0).abs() < EPS);
        assert!((v.angle() - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn zero_vector_has_zero_angle() {
        assert_eq!(Vec2::zero().angle(), 0.0);
        assert_eq!(Vec2::zero().mag(), 0.0);
    }

    #[test]
    fn angle_covers_negative_x_axis() {
        assert!((Vec2::new(-1.0, 0.0).angle() - PI).abs() < EPS);
    }

    #[test]
    fn cross_product_sign() {
        let x = Vec2::new(1.0, 0.0);
        let y = Vec2::new(0.0, 1.0);
        assert_eq!(x.cross(y), 1.0);
        assert_eq!(y.cross(x), -1.0);
        assert_eq!(x.cross(x), 0.0);
    }

    #[test]
    fn with_mag_rescales() {
        let v = Vec2::new(3.0, 4.0).with_mag(10.0);
        assert!((v.x - 6.0).abs() < EPS);
        assert!((v.y - 8.0).abs() < EPS);
        assert_eq!(Vec2::zero().with_mag(3.0), Vec2::zero());
    }

    #[test]
    fn dot_and_arithmetic_from_ultraviolet() {
        let a = Vec2::new(2.0, 3.0);
        let b = Vec2::new(4.0, 5.0);
        assert_eq!(a.dot(b), 23.0);
        assert_eq!(a + b, Vec2::new(6.0, 8.0));
        assert_eq!(b - a, Vec2::new(2.0, 2.0));
        assert_eq!(a * 2.0, Vec2::new(4.0, 6.0));
    }
}
