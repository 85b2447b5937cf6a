//! **gridstep-core**: grid model for stepwise pathfinding.
//!
//! This crate provides the value types a search walks over: [`Cell`]
//! coordinates, the fixed [`Direction`] enumeration order, the client-facing
//! [`GridConfig`] with its validation rules, and the [`GridModel`] that
//! answers traversal and move-cost queries, including the diagonal
//! [`CornerPolicy`].

pub mod geom;
pub mod grid;

pub use geom::{Cell, Direction};
pub use grid::{ConfigError, CornerPolicy, CostModel, GridConfig, GridModel, MAX_GRID_SIZE};
