#![forbid(unsafe_code)]

//! Entity/relation model, two-level grouping and group ordering for ply influence graphs.
//!
//! `ply-graph` owns everything that is decided once per snapshot: which component and community
//! each entity belongs to, the per-group statistics used for sorting, and the ring order of groups
//! that keeps connected groups adjacent. Per-tick work lives in `ply-layout`.

pub mod error;
pub mod group;
pub mod model;
pub mod order;
pub mod partition;
pub mod sort;
pub mod stats;

pub use error::{Error, Result};
pub use group::{Group, GroupIndex};
pub use model::{Entity, Game, GroupId, Relation, Side, Snapshot, Status, index_by_id};
pub use order::{ConnectionMatrix, MAX_EXACT_GROUPS, OrderOptimizer, circular_distance, stress};
pub use partition::{
    Partition, PartitionOptions, assign_partition, compute_partition, modularity,
};
pub use sort::{SortMetric, sort_groups};
pub use stats::{Degrees, GroupStats};
