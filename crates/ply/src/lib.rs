#![forbid(unsafe_code)]

//! `ply` lays out move-by-move chess influence graphs without a renderer.
//!
//! Entities (squares or pieces) are grouped into components and communities, groups are ordered
//! so connected ones sit together, and custom forces coerce a particle simulation into bubble,
//! radial or hybrid arrangements while the inactive population is pinned to the board edges.
//!
//! ```no_run
//! let states = ply::parse_states(r#"{"nodes":[{"id":"e4"}],"edges":[]}"#)?;
//! let mut session = ply::Session::new(ply::LayoutOptions::default())?;
//! session.load_nth(states, 0)?;
//! session.run(300);
//! let positions = session.positions();
//! # Ok::<(), ply::Error>(())
//! ```

pub mod document;
pub mod error;
pub mod session;

pub use ply_graph as graph;
pub use ply_layout as layout;

pub use document::parse_states;
pub use error::{Error, Result};
pub use ply_graph::{
    Entity, Game, GroupIndex, OrderOptimizer, PartitionOptions, Relation, Side, Snapshot, Status,
    assign_partition, sort_groups,
};
pub use ply_layout::{DetailLevel, LayoutMode, LayoutOptions, LayoutStrategy, Simulation, compute_layout};
pub use session::{LayoutReport, Placement, Session};
