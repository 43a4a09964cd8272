use std::time::{Duration, Instant};

use ultraviolet::Vec2;

use crate::body::Body;

/// Work done by one call to `Simulation::step`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Candidate pairs taken from cell neighborhoods and distance-tested.
    pub pair_checks: usize,
    /// Pairs that actually touched and were resolved.
    pub collisions: usize,
}

/// Aggregate state of a simulation at one tick.
#[derive(Clone, Copy, Debug)]
pub struct Diagnostics {
    pub tick: usize,
    pub bodies: usize,
    /// `Σ ½·m·|v|²`.
    pub kinetic_energy: f32,
    /// `Σ m·v`.
    pub momentum: Vec2,
    pub last_step: StepStats,
}

/// `Σ ½·m·|v|²` over all bodies.
pub fn kinetic_energy(bodies: &[Body]) -> f32 {
    bodies.iter().map(Body::kinetic_energy).sum()
}

/// `Σ m·v` over all bodies.
pub fn momentum(bodies: &[Body]) -> Vec2 {
    bodies
        .iter()
        .fold(Vec2::zero(), |acc, b| acc + b.momentum())
}

/// Wall-clock throughput of the tick loop.
#[derive(Clone, Debug)]
pub struct Throughput {
    started: Instant,
    ticks: u64,
    body_updates: u64,
}

impl Default for Throughput {
    fn default() -> Self {
        Self::new()
    }
}

impl Throughput {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            ticks: 0,
            body_updates: 0,
        }
    }

    /// Records one tick over `bodies` bodies.
    pub fn record(&mut self, bodies: usize) {
        self.ticks += 1;
        self.body_updates += bodies as u64;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn ticks_per_second(&self) -> f64 {
        Self::rate(self.ticks, self.elapsed())
    }

    pub fn body_updates_per_second(&self) -> f64 {
        Self::rate(self.body_updates, self.elapsed())
    }

    /// Starts a new measurement window.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn rate(count: u64, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs > 0.0 { count as f64 / secs } else { 0.0 }
    }
}
