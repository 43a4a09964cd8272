//! Setup-time description of a simulation.
//!
//! A configuration is plain data that can be written by hand or loaded from
//! JSON:
//!
//! ```json
//! {
//!   "world_width": 600.0,
//!   "world_height": 300.0,
//!   "grid_columns": 12,
//!   "grid_rows": 6,
//!   "gravity": 98.0,
//!   "partition": "sorted",
//!   "bodies": [
//!     { "x": 100.0, "y": 100.0, "vx": 40.0, "vy": 0.0, "radius": 10.0 },
//!     { "x": 200.0, "y": 100.0, "vx": -40.0, "vy": 0.0, "radius": 20.0 }
//!   ]
//! }
//! ```
//!
//! Everything is checked once by [`SimulationConfig::validate`] so the tick
//! loop never has to deal with malformed input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spatial::Partition;
use crate::utils;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("simulation needs at least one body")]
    NoBodies,
    #[error("world size must be positive and finite, got {width} x {height}")]
    InvalidWorld { width: f32, height: f32 },
    #[error("grid must have between 1 and {max} cells, got {columns} x {rows}", max = SimulationConfig::MAX_GRID_CELLS)]
    InvalidGrid { columns: u32, rows: u32 },
    #[error("gravity must be finite, got {0}")]
    InvalidGravity(f32),
    #[error("body {index}: radius must be positive and finite, got {radius}")]
    InvalidRadius { index: usize, radius: f32 },
    #[error("body {index}: position and velocity must be finite")]
    NonFinite { index: usize },
    #[error("body {index} at ({x}, {y}) with radius {radius} is not inside the world")]
    OutOfBounds {
        index: usize,
        x: f32,
        y: f32,
        radius: f32,
    },
    #[error("invalid configuration json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Initial state of one body.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub vx: f32,
    #[serde(default)]
    pub vy: f32,
    pub radius: f32,
}

impl BodySpec {
    pub fn new(x: f32, y: f32, vx: f32, vy: f32, radius: f32) -> Self {
        Self { x, y, vx, vy, radius }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub world_width: f32,
    pub world_height: f32,
    pub grid_columns: u32,
    pub grid_rows: u32,
    /// Downward acceleration in world units per second squared. `None` disables gravity.
    #[serde(default)]
    pub gravity: Option<f32>,
    /// Layout of the spatial index.
    #[serde(default)]
    pub partition: Partition,
    /// Integrate bodies on the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,
    pub bodies: Vec<BodySpec>,
}

impl SimulationConfig {
    pub const DEMO_WORLD: (f32, f32) = (1200.0, 600.0);
    pub const DEMO_GRID: (u32, u32) = (48, 24);
    pub const DEMO_LATTICE: (u32, u32) = (16, 12);
    pub const DEMO_RADIUS: f32 = 6.0;
    /// Upper bound on `grid_columns * grid_rows`; the index keeps per-cell storage.
    pub const MAX_GRID_CELLS: u64 = 1 << 24;

    /// An empty configuration over the given world and grid.
    pub fn new(world_width: f32, world_height: f32, grid_columns: u32, grid_rows: u32) -> Self {
        Self {
            world_width,
            world_height,
            grid_columns,
            grid_rows,
            gravity: None,
            partition: Partition::default(),
            parallel: false,
            bodies: Vec::new(),
        }
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = Some(gravity);
        self
    }

    pub fn with_partition(mut self, partition: Partition) -> Self {
        self.partition = partition;
        self
    }

    pub fn with_bodies(mut self, bodies: Vec<BodySpec>) -> Self {
        self.bodies = bodies;
        self
    }

    /// A lattice of resting balls struck by one large, fast body.
    pub fn lattice_demo() -> Self {
        let (width, height) = Self::DEMO_WORLD;
        let (columns, rows) = Self::DEMO_GRID;
        let (across, down) = Self::DEMO_LATTICE;

        let mut bodies = utils::lattice(width, height, across, down, Self::DEMO_RADIUS);
        bodies.push(BodySpec::new(1120.0, 500.0, -800.0, 400.0, 40.0));

        Self::new(width, height, columns, rows).with_bodies(bodies)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = (self.world_width, self.world_height);
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidWorld { width, height });
        }
        let cells = u64::from(self.grid_columns) * u64::from(self.grid_rows);
        if cells == 0 || cells > Self::MAX_GRID_CELLS {
            return Err(ConfigError::InvalidGrid {
                columns: self.grid_columns,
                rows: self.grid_rows,
            });
        }
        if let Some(g) = self.gravity {
            if !g.is_finite() {
                return Err(ConfigError::InvalidGravity(g));
            }
        }
        if self.bodies.is_empty() {
            return Err(ConfigError::NoBodies);
        }

        for (index, b) in self.bodies.iter().enumerate() {
            if !(b.radius.is_finite() && b.radius > 0.0) {
                return Err(ConfigError::InvalidRadius {
                    index,
                    radius: b.radius,
                });
            }
            if ![b.x, b.y, b.vx, b.vy].iter().all(|v| v.is_finite()) {
                return Err(ConfigError::NonFinite { index });
            }
            let inside = b.x >= b.radius
                && b.x <= width - b.radius
                && b.y >= b.radius
                && b.y <= height - b.radius;
            if !inside {
                return Err(ConfigError::OutOfBounds {
                    index,
                    x: b.x,
                    y: b.y,
                    radius: b.radius,
                });
            }
        }

        Ok(())
    }

    pub fn max_radius(&self) -> f32 {
        self.bodies.iter().map(|b| b.radius).fold(0.0, f32::max)
    }
}
