//! Agent-based farming simulation core: a fixed cell grid, plants growing
//! through discrete stages, and two kinds of drones (seeders and harvesters)
//! cycling between field work and their home stations.
//!
//! The crate is presentation-free. An external loop drives it through
//! [`World::advance`] with real elapsed seconds and reads
//! [`World::snapshot`] / [`World::stats`] to render.

pub mod agent;
pub mod config;
pub mod grid;
pub mod plant;
pub mod world;

pub use agent::{ArriveEffect, Drone, DroneRole};
pub use config::{SimConfig, SimConfigError};
pub use grid::{Cell, Grid, GridPos, TileKind};
pub use plant::{Plant, PlantSpecies};
pub use world::{FieldStats, RunError, RunSummary, World, WorldSnapshot};
