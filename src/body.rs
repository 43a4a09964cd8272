use std::f32::consts::PI;

use ultraviolet::Vec2;

use crate::vector::Vec2Ext;

/// A circular, non-rotating particle.
///
/// `mass` is derived from `radius` (disk area) when the body is built and is
/// not meant to be set independently.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    /// Center position.
    pub pos: Vec2,
    /// Velocity in world units per second.
    pub vel: Vec2,
    /// Radius of the disk.
    pub radius: f32,
    /// `π·radius²`.
    pub mass: f32,
}

impl Default for Body {
    fn default() -> Self {
        Self::new(Vec2::zero(), Vec2::zero(), 1.0)
    }
}

impl Body {
    /// Creates a new body; mass follows from the radius.
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            mass: PI * radius * radius,
        }
    }

    pub fn speed(&self) -> f32 {
        self.vel.mag()
    }

    /// Heading of the velocity in radians.
    pub fn heading(&self) -> f32 {
        self.vel.angle()
    }

    pub fn momentum(&self) -> Vec2 {
        self.vel * self.mass
    }

    /// `½·m·|v|²`.
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.vel.mag_sq()
    }

    /// Advances the body by `dt` seconds and bounces it off the world walls.
    /// Semi-implicit Euler: gravity goes into the velocity before the position moves.
    pub fn integrate(&mut self, dt: f32, gravity: Option<f32>, world: Vec2) {
        if let Some(g) = gravity {
            self.vel.y += g * dt;
        }
        self.pos += self.vel * dt;
        self.confine(world);
    }

    /// Clamps the body into `[radius, extent - radius]` on both axes.
    ///
    /// The velocity component on a clamped axis is forced to point inward
    /// rather than negated, so a body held against a wall by an overlap
    /// correction cannot get stuck oscillating through it.
    /// Returns true if any axis was clamped.
    pub fn confine(&mut self, world: Vec2) -> bool {
        let mut hit = false;

        if self.pos.x < self.radius {
            self.pos.x = self.radius;
            self.vel.x = self.vel.x.abs();
            hit = true;
        } else if self.pos.x > world.x - self.radius {
            self.pos.x = world.x - self.radius;
            self.vel.x = -self.vel.x.abs();
            hit = true;
        }

        if self.pos.y < self.radius {
            self.pos.y = self.radius;
            self.vel.y = self.vel.y.abs();
            hit = true;
        } else if self.pos.y > world.y - self.radius {
            self.pos.y = world.y - self.radius;
            self.vel.y = -self.vel.y.abs();
            hit = true;
        }

        hit
    }

    /// True when the disks touch or overlap.
    pub fn touches(&self, other: &Body) -> bool {
        let r = self.radius + other.radius;
        (self.pos - other.pos).mag_sq() <= r * r
    }

    /// Resolves an elastic collision with `other`, if the two disks touch.
    ///
    /// Velocities are exchanged along the contact normal with the
    /// vector-projection form of the elastic law, then any interpenetration is
    /// removed by pushing both bodies apart, the heavier one moving less.
    /// Coincident centers have no normal and are skipped.
    ///
    /// Returns whether a collision was resolved.
    pub fn resolve_collision(&mut self, other: &mut Body) -> bool {
        let n = self.pos - other.pos;
        let d_sq = n.mag_sq();
        let r = self.radius + other.radius;

        if d_sq > r * r || d_sq == 0.0 {
            return false;
        }

        let m1 = self.mass;
        let m2 = other.mass;
        let total = m1 + m2;

        // Projection of the relative velocity onto the (unnormalized) normal.
        let k = (self.vel - other.vel).dot(n) / d_sq;
        self.vel -= n * (2.0 * m2 / total * k);
        other.vel += n * (2.0 * m1 / total * k);

        let d = d_sq.sqrt();
        let overlap = r - d;
        if overlap > 0.0 {
            let normal = n / d;
            self.pos += normal * (overlap * m2 / total);
            other.pos -= normal * (overlap * m1 / total);
        }

        true
    }
}

/// Returns mutable references to two distinct bodies of a slice.
pub fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    debug_assert_ne!(i, j);
    if i < j {
        let (lo, hi) = bodies.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = bodies.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).mag() < EPS
    }

    #[test]
    fn mass_follows_disk_area() {
        let b = Body::new(Vec2::zero(), Vec2::zero(), 2.0);
        assert!((b.mass - 4.0 * PI).abs() < 1e-6);
    }

    #[test]
    fn equal_masses_head_on_swap_velocities() {
        let mut a = Body::new(Vec2::new(200.0, 200.0), Vec2::zero(), 20.0);
        let mut b = Body::new(Vec2::new(240.0, 200.0), Vec2::new(-10.0, 0.0), 20.0);

        assert!(a.resolve_collision(&mut b));
        assert!(approx(a.vel, Vec2::new(-10.0, 0.0)));
        assert!(approx(b.vel, Vec2::zero()));
        // Tangent contact: nothing to push apart.
        assert_eq!(a.pos, Vec2::new(200.0, 200.0));
        assert_eq!(b.pos, Vec2::new(240.0, 200.0));
    }

    #[test]
    fn unequal_masses_follow_one_dimensional_law() {
        let mut a = Body::new(Vec2::new(100.0, 100.0), Vec2::new(10.0, 0.0), 10.0);
        let mut b = Body::new(Vec2::new(130.0, 100.0), Vec2::zero(), 20.0);
        let before = a.momentum() + b.momentum();

        assert!(a.resolve_collision(&mut b));

        // m1:m2 = 1:4, so v1' = -6 and v2' = 4.
        assert!(approx(a.vel, Vec2::new(-6.0, 0.0)));
        assert!(approx(b.vel, Vec2::new(4.0, 0.0)));
        assert!(b.speed() < 10.0);

        let after = a.momentum() + b.momentum();
        assert!((before - after).mag() / before.mag() < 1e-5);
    }

    #[test]
    fn oblique_collision_keeps_tangential_components() {
        // Contact normal along x; the y components must survive untouched.
        let mut a = Body::new(Vec2::new(0.0, 0.0), Vec2::new(3.0, 2.0), 5.0);
        let mut b = Body::new(Vec2::new(10.0, 0.0), Vec2::new(-1.0, -4.0), 5.0);

        assert!(a.resolve_collision(&mut b));
        assert!(approx(a.vel, Vec2::new(-1.0, 2.0)));
        assert!(approx(b.vel, Vec2::new(3.0, -4.0)));
    }

    #[test]
    fn overlap_is_split_by_inverse_mass() {
        let mut a = Body::new(Vec2::new(100.0, 100.0), Vec2::zero(), 10.0);
        let mut b = Body::new(Vec2::new(125.0, 100.0), Vec2::zero(), 20.0);
        let energy = a.kinetic_energy() + b.kinetic_energy();

        assert!(a.resolve_collision(&mut b));

        // 5 units of overlap, light body takes 4/5 of it.
        assert!(approx(a.pos, Vec2::new(96.0, 100.0)));
        assert!(approx(b.pos, Vec2::new(126.0, 100.0)));
        assert!(((b.pos - a.pos).mag() - 30.0).abs() < EPS);
        assert_eq!(a.kinetic_energy() + b.kinetic_energy(), energy);
    }

    #[test]
    fn energy_is_conserved_by_the_impulse() {
        let mut a = Body::new(Vec2::new(50.0, 50.0), Vec2::new(7.0, -3.0), 6.0);
        let mut b = Body::new(Vec2::new(58.0, 55.0), Vec2::new(-2.0, -1.0), 9.0);
        let before = a.kinetic_energy() + b.kinetic_energy();

        assert!(a.resolve_collision(&mut b));

        let after = a.kinetic_energy() + b.kinetic_energy();
        assert!((before - after).abs() / before < 1e-4);
    }

    #[test]
    fn separated_bodies_do_not_collide() {
        let mut a = Body::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), 5.0);
        let mut b = Body::new(Vec2::new(10.1, 0.0), Vec2::new(-1.0, 0.0), 5.0);
        let (a0, b0) = (a, b);

        assert!(!a.resolve_collision(&mut b));
        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn coincident_centers_are_skipped() {
        let mut a = Body::new(Vec2::new(5.0, 5.0), Vec2::new(1.0, 0.0), 5.0);
        let mut b = Body::new(Vec2::new(5.0, 5.0), Vec2::new(0.0, 1.0), 5.0);

        assert!(!a.resolve_collision(&mut b));
        assert!(a.vel.x.is_finite() && b.vel.y.is_finite());
        assert_eq!(a.pos, b.pos);
    }

    #[test]
    fn wall_bounce_points_velocity_inward() {
        let world = Vec2::new(600.0, 400.0);
        let mut b = Body::new(Vec2::new(5.0, 100.0), Vec2::new(-50.0, 0.0), 10.0);

        b.integrate(1.0, None, world);

        assert_eq!(b.pos.x, 10.0);
        assert_eq!(b.vel.x, 50.0);
        assert_eq!(b.pos.y, 100.0);
    }

    #[test]
    fn wall_bounce_keeps_inward_velocity_inward() {
        // Already pushed past the wall while moving inward: clamp, keep direction.
        let world = Vec2::new(600.0, 400.0);
        let mut b = Body::new(Vec2::new(595.0, 100.0), Vec2::new(-1.0, 0.0), 10.0);

        assert!(b.confine(world));
        assert_eq!(b.pos.x, 590.0);
        assert_eq!(b.vel.x, -1.0);
    }

    #[test]
    fn gravity_accumulates_before_motion() {
        let world = Vec2::new(600.0, 400.0);
        let mut b = Body::new(Vec2::new(100.0, 100.0), Vec2::zero(), 10.0);

        b.integrate(0.5, Some(10.0), world);

        assert_eq!(b.vel, Vec2::new(0.0, 5.0));
        assert_eq!(b.pos, Vec2::new(100.0, 102.5));
    }

    #[test]
    fn floor_bounce_under_gravity() {
        let world = Vec2::new(100.0, 100.0);
        let mut b = Body::new(Vec2::new(50.0, 89.0), Vec2::new(0.0, 20.0), 10.0);

        b.integrate(0.1, Some(100.0), world);

        assert_eq!(b.pos.y, 90.0);
        assert!(b.vel.y < 0.0);
    }

    #[test]
    fn pair_mut_returns_requested_order() {
        let mut bodies = vec![
            Body::new(Vec2::new(0.0, 0.0), Vec2::zero(), 1.0),
            Body::new(Vec2::new(1.0, 0.0), Vec2::zero(), 2.0),
            Body::new(Vec2::new(2.0, 0.0), Vec2::zero(), 3.0),
        ];
        let (a, b) = pair_mut(&mut bodies, 2, 0);
        assert_eq!(a.radius, 3.0);
        assert_eq!(b.radius, 1.0);
        let (a, b) = pair_mut(&mut bodies, 0, 1);
        assert_eq!(a.radius, 1.0);
        assert_eq!(b.radius, 2.0);
    }
}
