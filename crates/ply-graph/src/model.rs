//! Per-move entity/relation model.
//!
//! Every move produces a full replacement snapshot. Nothing in this module is patched across
//! snapshots; consumers rebuild derived data (groups, order, geometry) from scratch.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Component / community identifier.
pub type GroupId = i64;

/// Smallest visual radius, reached at `centrality == 0`.
pub const MIN_ENTITY_SIZE: f64 = 4.0;
/// Largest visual radius, reached at `centrality == 1`.
pub const MAX_ENTITY_SIZE: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Takes part in the grouped layout.
    #[default]
    Active,
    /// Pinned to a screen edge by wall-affinity.
    Inactive,
}

/// Binary category used to pick the wall an inactive entity sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Bottom edge.
    #[default]
    White,
    /// Top edge.
    Black,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, alias = "component")]
    pub outer_group: GroupId,
    #[serde(default, alias = "community")]
    pub inner_group: GroupId,
    /// Normalized centrality in `[0, 1]`; drives [`Entity::size`].
    #[serde(default)]
    pub centrality: f64,
    #[serde(default, alias = "color", skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    /// Explicit horizontal slot for the inactive population. When absent the slot is derived from
    /// a hash of `id`.
    #[serde(default, alias = "hPosition", skip_serializing_if = "Option::is_none")]
    pub h_position: Option<u32>,
    /// Opaque display metadata (piece symbol, square name, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub vx: f64,
    #[serde(default)]
    pub vy: f64,
}

impl Entity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: Status::Active,
            outer_group: 0,
            inner_group: 0,
            centrality: 0.0,
            side: None,
            h_position: None,
            label: None,
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
        }
    }

    pub fn with_groups(mut self, outer: GroupId, inner: GroupId) -> Self {
        self.outer_group = outer;
        self.inner_group = inner;
        self
    }

    pub fn with_centrality(mut self, centrality: f64) -> Self {
        self.centrality = centrality;
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Marks the entity as part of the edge-pinned population on `side`.
    pub fn inactive(mut self, side: Side) -> Self {
        self.status = Status::Inactive;
        self.side = Some(side);
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    /// Visual radius derived from centrality.
    pub fn size(&self) -> f64 {
        let c = if self.centrality.is_finite() {
            self.centrality.clamp(0.0, 1.0)
        } else {
            0.0
        };
        MIN_ENTITY_SIZE + (MAX_ENTITY_SIZE - MIN_ENTITY_SIZE) * c
    }

    pub fn side_or_default(&self) -> Side {
        self.side.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub source: String,
    pub target: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Relation {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight.max(0.0);
        self
    }
}

/// Maps entity ids to their index. The first occurrence wins when ids repeat.
pub fn index_by_id(entities: &[Entity]) -> FxHashMap<&str, usize> {
    let mut out: FxHashMap<&str, usize> = FxHashMap::default();
    out.reserve(entities.len());
    for (idx, e) in entities.iter().enumerate() {
        out.entry(e.id.as_str()).or_insert(idx);
    }
    out
}

/// Full state of the board after one move.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, rename = "move", skip_serializing_if = "Option::is_none")]
    pub move_label: Option<String>,
    #[serde(default, alias = "nodes")]
    pub entities: Vec<Entity>,
    #[serde(default, alias = "edges")]
    pub relations: Vec<Relation>,
}

/// Ordered sequence of snapshots, one per move.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Game {
    #[serde(default)]
    pub states: Vec<Snapshot>,
}
