use crate::config::BodySpec;
use crate::vector::Vec2Ext;
use ultraviolet::Vec2;

/// Places `across × down` resting balls of `radius` on a regular lattice that
/// spans the world, starting one radius in from the top-left corner.
pub fn lattice(width: f32, height: f32, across: u32, down: u32, radius: f32) -> Vec<BodySpec> {
    let span_x = width - radius * 2.0;
    let span_y = height - radius * 2.0;

    let mut bodies = Vec::with_capacity((across * down) as usize);
    for i in 0..across {
        for j in 0..down {
            let x = span_x * i as f32 / across as f32 + radius;
            let y = span_y * j as f32 / down as f32 + radius;
            bodies.push(BodySpec::new(x, y, 0.0, 0.0, radius));
        }
    }
    bodies
}

/// Generates `n` bodies scattered uniformly over the world, with radii in
/// `min_radius..max_radius` and speeds up to `max_speed` in random directions.
/// The same `seed` always yields the same bodies.
pub fn random_gas(
    n: usize,
    width: f32,
    height: f32,
    min_radius: f32,
    max_radius: f32,
    max_speed: f32,
    seed: u64,
) -> Vec<BodySpec> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut bodies = Vec::with_capacity(n);

    while bodies.len() < n {
        let radius = min_radius + rng.f32() * (max_radius - min_radius);
        // Keep the whole disk inside the world.
        let x = (radius + rng.f32() * (width - 2.0 * radius)).min(width - radius);
        let y = (radius + rng.f32() * (height - 2.0 * radius)).min(height - radius);

        let angle = rng.f32() * std::f32::consts::TAU;
        let vel = Vec2::from_polar(rng.f32() * max_speed, angle);

        bodies.push(BodySpec::new(x, y, vel.x, vel.y, radius));
    }

    bodies
}
