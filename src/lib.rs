pub mod body;
pub mod c_api;
pub mod config;
pub mod diagnostics;
pub mod grid;
pub mod simulation;
pub mod spatial;
pub mod utils;
pub mod vector;

pub use body::Body;
pub use config::{BodySpec, ConfigError, SimulationConfig};
pub use diagnostics::{Diagnostics, StepStats, Throughput};
pub use grid::{Cell, Grid};
pub use simulation::{BodySnapshot, Simulation};
pub use spatial::{BucketIndex, Partition, SortedIndex, SpatialIndex};
pub use vector::Vec2Ext;
