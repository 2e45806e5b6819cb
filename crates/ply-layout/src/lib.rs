#![forbid(unsafe_code)]

//! Hierarchical custom-force layout for ply influence graphs.
//!
//! A [`LayoutStrategy`] turns a layout mode into a batch of base [`Primitives`] and custom
//! contributors (a [`ForceSet`]), installs them on an [`Integrator`] and restarts its cooling.
//! Contributors are pure: each tick they read positions and return [`ForceDelta`]s that one
//! reducer applies. [`Simulation`] is a small d3-force style integrator for headless use.

pub mod adaptive;
pub mod delta;
pub mod error;
pub mod forces;
pub mod geometry;
pub mod integrator;
pub mod options;
pub mod primitives;
pub mod rng;
pub mod sim;
pub mod strategy;

pub use adaptive::{AdaptiveController, DetailLevel, GraphScale, HARD_NODE_CEILING, LiveCounts, Tuning};
pub use delta::{ForceDelta, reduce};
pub use error::{Error, Result};
pub use forces::{Contributor, ForceKind, ForceSet, TickContext};
pub use geometry::{GroupGeometry, GroupLevel, Vec2};
pub use integrator::Integrator;
pub use options::{LayoutMode, LayoutOptions};
pub use primitives::Primitives;
pub use sim::{ALPHA_MIN, Simulation, alpha_decay_for};
pub use strategy::{Activation, ForceParams, LayoutStrategy, compute_layout, mode_kinds};
