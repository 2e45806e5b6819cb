//! Size-driven tuning. Bigger graphs get fewer ticks, more damping, weaker custom forces and,
//! past a hard ceiling, lose the quadratic contributors altogether.

use crate::forces::{ForceKind, ForceSet};
use crate::sim::{VELOCITY_DECAY, alpha_decay_for};
use ply_graph::{Entity, Relation};
use serde::{Deserialize, Serialize};

/// Above this many nodes the quadratic and cosmetic contributors are switched off.
pub const HARD_NODE_CEILING: usize = 3000;

const NODE_BUCKETS: [usize; 3] = [150, 600, 1500];
const EDGE_BUCKETS: [usize; 3] = [600, 3000, 8000];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphScale {
    Small,
    Medium,
    Large,
    Huge,
}

impl GraphScale {
    /// The larger of the node and edge buckets.
    pub fn classify(nodes: usize, edges: usize) -> Self {
        Self::bucket(nodes, &NODE_BUCKETS).max(Self::bucket(edges, &EDGE_BUCKETS))
    }

    fn bucket(count: usize, limits: &[usize; 3]) -> Self {
        match limits.iter().position(|&limit| count <= limit) {
            Some(0) => Self::Small,
            Some(1) => Self::Medium,
            Some(_) => Self::Large,
            None => Self::Huge,
        }
    }

    /// Ticks from a full restart to cooled.
    pub fn iterations(&self) -> u32 {
        match self {
            Self::Small => 400,
            Self::Medium => 300,
            Self::Large => 200,
            Self::Huge => 120,
        }
    }

    pub fn velocity_decay(&self) -> f64 {
        match self {
            Self::Small | Self::Medium => 0.4,
            Self::Large => 0.5,
            Self::Huge => 0.6,
        }
    }

    pub fn strength_scale(&self) -> f64 {
        match self {
            Self::Small | Self::Medium => 1.0,
            Self::Large => 0.7,
            Self::Huge => 0.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Huge => "huge",
        }
    }
}

/// How much decoration a renderer should draw.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    #[default]
    Full,
    Reduced,
    Minimal,
}

impl DetailLevel {
    fn from_rank(rank: i32) -> Self {
        match rank {
            i32::MIN..=0 => Self::Full,
            1 => Self::Reduced,
            _ => Self::Minimal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveCounts {
    pub nodes: usize,
    pub edges: usize,
    pub zoom_level: f64,
}

impl LiveCounts {
    pub fn new(nodes: usize, edges: usize) -> Self {
        Self {
            nodes,
            edges,
            zoom_level: 1.0,
        }
    }

    pub fn of(entities: &[Entity], relations: &[Relation]) -> Self {
        Self::new(entities.len(), relations.len())
    }

    pub fn with_zoom(mut self, zoom_level: f64) -> Self {
        self.zoom_level = zoom_level;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    pub scale: GraphScale,
    pub alpha_decay: f64,
    pub velocity_decay: f64,
    pub strength_scale: f64,
    pub disabled: Vec<ForceKind>,
    pub detail: DetailLevel,
}

impl Tuning {
    /// Reference-integrator defaults; what a disabled controller produces.
    pub fn neutral() -> Self {
        Self {
            scale: GraphScale::Small,
            alpha_decay: alpha_decay_for(300),
            velocity_decay: VELOCITY_DECAY,
            strength_scale: 1.0,
            disabled: Vec::new(),
            detail: DetailLevel::Full,
        }
    }

    pub fn is_disabled(&self, kind: ForceKind) -> bool {
        self.disabled.contains(&kind)
    }

    /// Drops disabled contributors and rescales the remaining strengths.
    pub fn apply(&self, forces: &mut ForceSet) {
        for &kind in &self.disabled {
            forces.remove(kind);
        }
        if self.strength_scale != 1.0 {
            forces.scale_strengths(self.strength_scale);
        }
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::neutral()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptiveController {
    enabled: bool,
}

impl Default for AdaptiveController {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl AdaptiveController {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn classify(&self, counts: &LiveCounts) -> GraphScale {
        GraphScale::classify(counts.nodes, counts.edges)
    }

    pub fn tune(&self, counts: &LiveCounts) -> Tuning {
        if !self.enabled {
            return Tuning::neutral();
        }
        let scale = self.classify(counts);
        let disabled = if counts.nodes > HARD_NODE_CEILING {
            vec![
                ForceKind::Overlap,
                ForceKind::CommunityRepulsion,
                ForceKind::CrossPopulation,
                ForceKind::Jitter,
            ]
        } else {
            Vec::new()
        };

        let tuning = Tuning {
            scale,
            alpha_decay: alpha_decay_for(scale.iterations()),
            velocity_decay: scale.velocity_decay(),
            strength_scale: scale.strength_scale(),
            disabled,
            detail: detail_level(scale, counts.zoom_level),
        };
        tracing::debug!(
            nodes = counts.nodes,
            edges = counts.edges,
            scale = scale.as_str(),
            detail = ?tuning.detail,
            disabled = tuning.disabled.len(),
            "adaptive tuning"
        );
        tuning
    }
}

/// Zooming in buys one level of detail, zooming out costs one.
fn detail_level(scale: GraphScale, zoom_level: f64) -> DetailLevel {
    let base = match scale {
        GraphScale::Small | GraphScale::Medium => 0,
        GraphScale::Large => 1,
        GraphScale::Huge => 2,
    };
    let adjust = if zoom_level >= 2.0 {
        -1
    } else if zoom_level < 0.5 {
        1
    } else {
        0
    };
    DetailLevel::from_rank(base + adjust)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_follows_zoom() {
        assert_eq!(detail_level(GraphScale::Small, 1.0), DetailLevel::Full);
        assert_eq!(detail_level(GraphScale::Small, 0.25), DetailLevel::Reduced);
        assert_eq!(detail_level(GraphScale::Large, 2.0), DetailLevel::Full);
        assert_eq!(detail_level(GraphScale::Huge, 1.0), DetailLevel::Minimal);
        assert_eq!(detail_level(GraphScale::Huge, 0.1), DetailLevel::Minimal);
    }
}
