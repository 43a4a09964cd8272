use crate::{
    body::{self, Body},
    config::{ConfigError, SimulationConfig},
    diagnostics::{self, Diagnostics, StepStats},
    grid::Grid,
    spatial::{Partition, SpatialIndex},
};

use rayon::prelude::*;
use ultraviolet::Vec2;

/// What the renderer needs to draw one body.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySnapshot {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// Owns the bodies and the spatial index and advances them tick by tick.
pub struct Simulation {
    /// Current tick count.
    pub frame: usize,
    /// Authoritative body collection. The index refers into it by position.
    pub bodies: Vec<Body>,
    /// World extent; bodies live in `[0, world.x] × [0, world.y]`.
    pub world: Vec2,
    pub gravity: Option<f32>,
    /// Cell → bodies mapping, rebuilt every step.
    index: Box<dyn SpatialIndex>,
    /// How many cells out the collision sweep looks.
    reach: u32,
    /// Whether integration runs on the rayon pool.
    parallel: bool,
    /// Neighborhood scratch buffer, reused across cells and ticks.
    scratch: Vec<usize>,
    last_step: StepStats,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("frame", &self.frame)
            .field("bodies", &self.bodies.len())
            .field("world", &self.world)
            .field("gravity", &self.gravity)
            .field("grid", self.index.grid())
            .field("reach", &self.reach)
            .field("parallel", &self.parallel)
            .finish()
    }
}

impl Simulation {
    /// Validates `config` and builds the initial state.
    pub fn setup(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let world = Vec2::new(config.world_width, config.world_height);
        let grid = Grid::new(world, config.grid_columns, config.grid_rows);

        let bodies: Vec<Body> = config
            .bodies
            .iter()
            .map(|s| Body::new(Vec2::new(s.x, s.y), Vec2::new(s.vx, s.vy), s.radius))
            .collect();

        let max_diameter = 2.0 * config.max_radius();
        let reach = grid.reach_for(max_diameter);
        if reach > 1 {
            log::warn!(
                "grid cell {}x{} is smaller than the largest body diameter {}; \
                 collision sweep widened to {} cells",
                grid.cell_size.x,
                grid.cell_size.y,
                max_diameter,
                reach
            );
        }

        log::info!(
            "simulation setup: {} bodies, world {}x{}, grid {}x{}, {:?} index, gravity {:?}",
            bodies.len(),
            world.x,
            world.y,
            grid.columns,
            grid.rows,
            config.partition,
            config.gravity
        );

        let mut index = config.partition.build(grid);
        index.rebuild(&bodies);

        Ok(Self {
            frame: 0,
            bodies,
            world,
            gravity: config.gravity,
            index,
            reach,
            parallel: config.parallel,
            scratch: Vec::new(),
            last_step: StepStats::default(),
        })
    }

    /// Sets whether to integrate bodies in parallel with rayon.
    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    /// Swaps the spatial index layout; the new index is built immediately.
    pub fn set_partition(&mut self, partition: Partition) {
        let mut index = partition.build(*self.index.grid());
        index.rebuild(&self.bodies);
        self.index = index;
    }

    pub fn grid(&self) -> &Grid {
        self.index.grid()
    }

    /// Cell partition matching the body positions left by the last
    /// `integrate`, `collide` or `step`.
    pub fn index(&self) -> &dyn SpatialIndex {
        self.index.as_ref()
    }

    pub fn reach(&self) -> u32 {
        self.reach
    }

    /// Advances the simulation by one tick of `dt` seconds.
    /// Integrates and re-partitions every body, then resolves every touching pair.
    pub fn step(&mut self, dt: f32) -> StepStats {
        self.integrate(dt);
        let stats = self.collide();

        self.frame += 1;
        self.last_step = stats;
        log::trace!(
            "tick {}: {} pair checks, {} collisions",
            self.frame,
            stats.pair_checks,
            stats.collisions
        );
        stats
    }

    /// Moves all bodies, bounces them off the walls and re-files them in the index.
    pub fn integrate(&mut self, dt: f32) {
        let (gravity, world) = (self.gravity, self.world);
        if self.parallel {
            self.bodies.par_iter_mut().for_each(|body| {
                body.integrate(dt, gravity, world);
            });
        } else {
            self.bodies
                .iter_mut()
                .for_each(|body| body.integrate(dt, gravity, world));
        }
        self.index.rebuild(&self.bodies);
    }

    /// Detects and resolves collisions using the current cell partition.
    ///
    /// Every body of an occupied cell is tested against the bodies of the
    /// surrounding block. A pair is only considered from its lower body index,
    /// so each unordered pair is resolved at most once per tick. Cell
    /// membership is frozen during the sweep; bodies pushed into another cell
    /// by an overlap correction are re-filed once it is done.
    pub fn collide(&mut self) -> StepStats {
        let mut stats = StepStats::default();
        let mut neighbors = std::mem::take(&mut self.scratch);

        let cells: Vec<_> = self.index.occupied().collect();
        for cell in cells {
            self.index.neighborhood_range(cell, self.reach, &mut neighbors);

            for &i in self.index.query(cell) {
                for &j in &neighbors {
                    if j <= i {
                        continue;
                    }
                    stats.pair_checks += 1;
                    let (a, b) = body::pair_mut(&mut self.bodies, i, j);
                    if a.resolve_collision(b) {
                        stats.collisions += 1;
                    }
                }
            }
        }

        // Corrections can push a body through a wall; put it back.
        for body in &mut self.bodies {
            body.confine(self.world);
        }

        self.index.rebuild(&self.bodies);
        self.scratch = neighbors;
        stats
    }

    /// Read-only snapshot of the bodies for drawing.
    pub fn positions(&self) -> Vec<BodySnapshot> {
        self.bodies
            .iter()
            .map(|b| BodySnapshot {
                x: b.pos.x,
                y: b.pos.y,
                radius: b.radius,
            })
            .collect()
    }

    /// `Σ ½·m·|v|²`.
    pub fn total_kinetic_energy(&self) -> f32 {
        diagnostics::kinetic_energy(&self.bodies)
    }

    pub fn total_momentum(&self) -> Vec2 {
        diagnostics::momentum(&self.bodies)
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            tick: self.frame,
            bodies: self.bodies.len(),
            kinetic_energy: self.total_kinetic_energy(),
            momentum: self.total_momentum(),
            last_step: self.last_step,
        }
    }
}
