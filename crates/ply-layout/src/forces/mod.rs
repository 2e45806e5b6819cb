//! Custom force contributors and the registry that runs them.
//!
//! Every contributor is a pure function of the current entity state: it reads positions, the
//! group index and its own parameters and returns a [`ForceDelta`]. Nothing here mutates entities
//! directly; [`ForceSet::apply_tick`] reduces the deltas once all contributors have run.

mod cohesion;
mod containment;
mod jitter;
mod overlap;
mod radial;
mod repulsion;
mod separation;
mod wall;

pub use cohesion::{CohesionParams, cohesion};
pub use containment::{CLAMP_FACTOR, ContainmentParams, containment};
pub use jitter::{JitterParams, jitter};
pub use overlap::{OverlapParams, anti_overlap};
pub use radial::{RadialFrame, RadialParams, RadialPlacement, radial_placement};
pub use repulsion::{RepulsionParams, group_repulsion, pair_impulse};
pub use separation::{SeparationParams, cross_population};
pub use wall::{WallParams, explicit_columns, slot_of, wall_affinity};

use crate::delta::{ForceDelta, reduce};
use crate::geometry::{GroupGeometry, GroupLevel};
use indexmap::IndexMap;
use ply_graph::{Entity, GroupIndex};
use std::fmt;

/// Per-tick inputs shared by every contributor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub alpha: f64,
    pub tick: u64,
    pub seed: u64,
}

impl TickContext {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            tick: 0,
            seed: 1,
        }
    }

    pub fn at_tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// A non-positive (or NaN) alpha means the simulation has cooled and contributors do nothing.
    pub fn is_cold(&self) -> bool {
        self.alpha.is_nan() || self.alpha <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ForceKind {
    Cohesion,
    ComponentContainment,
    CommunityContainment,
    ComponentRepulsion,
    CommunityRepulsion,
    Overlap,
    Radial,
    WallAffinity,
    CrossPopulation,
    Jitter,
}

impl ForceKind {
    pub const ALL: [ForceKind; 10] = [
        Self::Cohesion,
        Self::ComponentContainment,
        Self::CommunityContainment,
        Self::ComponentRepulsion,
        Self::CommunityRepulsion,
        Self::Overlap,
        Self::Radial,
        Self::WallAffinity,
        Self::CrossPopulation,
        Self::Jitter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cohesion => "cohesion",
            Self::ComponentContainment => "component-containment",
            Self::CommunityContainment => "community-containment",
            Self::ComponentRepulsion => "component-repulsion",
            Self::CommunityRepulsion => "community-repulsion",
            Self::Overlap => "overlap",
            Self::Radial => "radial",
            Self::WallAffinity => "wall-affinity",
            Self::CrossPopulation => "cross-population",
            Self::Jitter => "jitter",
        }
    }

    /// Contributors that walk pairs of members; the first to go on large graphs.
    pub fn is_quadratic(&self) -> bool {
        matches!(self, Self::Overlap | Self::CrossPopulation)
    }
}

impl fmt::Display for ForceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Contributor {
    Cohesion(CohesionParams),
    Containment {
        level: GroupLevel,
        params: ContainmentParams,
    },
    Repulsion {
        level: GroupLevel,
        params: RepulsionParams,
    },
    Overlap(OverlapParams),
    Radial(RadialPlacement),
    WallAffinity(WallParams),
    CrossPopulation(SeparationParams),
    Jitter(JitterParams),
}

impl Contributor {
    pub fn kind(&self) -> ForceKind {
        match self {
            Self::Cohesion(_) => ForceKind::Cohesion,
            Self::Containment {
                level: GroupLevel::Outer,
                ..
            } => ForceKind::ComponentContainment,
            Self::Containment {
                level: GroupLevel::Inner,
                ..
            } => ForceKind::CommunityContainment,
            Self::Repulsion {
                level: GroupLevel::Outer,
                ..
            } => ForceKind::ComponentRepulsion,
            Self::Repulsion {
                level: GroupLevel::Inner,
                ..
            } => ForceKind::CommunityRepulsion,
            Self::Overlap(_) => ForceKind::Overlap,
            Self::Radial(_) => ForceKind::Radial,
            Self::WallAffinity(_) => ForceKind::WallAffinity,
            Self::CrossPopulation(_) => ForceKind::CrossPopulation,
            Self::Jitter(_) => ForceKind::Jitter,
        }
    }

    pub fn contribute(
        &self,
        ctx: TickContext,
        entities: &[Entity],
        geometry: &GroupGeometry<'_>,
    ) -> ForceDelta {
        match self {
            Self::Cohesion(p) => cohesion(ctx, entities, geometry, p),
            Self::Containment { level, params } => containment(ctx, entities, geometry, *level, params),
            Self::Repulsion { level, params } => group_repulsion(ctx, entities, geometry, *level, params),
            Self::Overlap(p) => anti_overlap(ctx, entities, geometry, p),
            Self::Radial(p) => radial_placement(ctx, entities, p),
            Self::WallAffinity(p) => wall_affinity(ctx, entities, p),
            Self::CrossPopulation(p) => cross_population(ctx, entities, p),
            Self::Jitter(p) => jitter(ctx, entities, p),
        }
    }

    /// Multiplies the contributor's primary strength by `k`.
    pub fn scale_strength(&mut self, k: f64) {
        match self {
            Self::Cohesion(p) => p.strength *= k,
            Self::Containment { params, .. } => params.strength *= k,
            Self::Repulsion { params, .. } => params.strength *= k,
            Self::Overlap(p) => p.strength *= k,
            Self::Radial(p) => p.params.strength *= k,
            Self::WallAffinity(p) => {
                p.strength_x *= k;
                p.strength_y *= k;
                p.lateral_strength *= k;
            }
            Self::CrossPopulation(p) => p.strength *= k,
            Self::Jitter(p) => p.amplitude *= k,
        }
    }
}

/// The contributors installed for the current mode, in execution order, plus the group index
/// they share.
#[derive(Debug, Clone, Default)]
pub struct ForceSet {
    index: GroupIndex,
    contributors: IndexMap<ForceKind, Contributor>,
}

impl ForceSet {
    pub fn new(index: GroupIndex) -> Self {
        Self {
            index,
            contributors: IndexMap::new(),
        }
    }

    pub fn index(&self) -> &GroupIndex {
        &self.index
    }

    /// Installs `contributor`, replacing (in place) one of the same kind.
    pub fn insert(&mut self, contributor: Contributor) -> Option<Contributor> {
        self.contributors.insert(contributor.kind(), contributor)
    }

    pub fn with(mut self, contributor: Contributor) -> Self {
        self.insert(contributor);
        self
    }

    pub fn remove(&mut self, kind: ForceKind) -> Option<Contributor> {
        self.contributors.shift_remove(&kind)
    }

    pub fn get(&self, kind: ForceKind) -> Option<&Contributor> {
        self.contributors.get(&kind)
    }

    pub fn contains(&self, kind: ForceKind) -> bool {
        self.contributors.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ForceKind> + '_ {
        self.contributors.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.contributors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributors.is_empty()
    }

    pub fn scale_strengths(&mut self, k: f64) {
        for c in self.contributors.values_mut() {
            c.scale_strength(k);
        }
    }

    /// Runs every contributor against the same state. Group geometry is measured once per call.
    pub fn contribute(&self, ctx: TickContext, entities: &[Entity]) -> Vec<ForceDelta> {
        if ctx.is_cold() || self.contributors.is_empty() {
            return Vec::new();
        }
        let geometry = GroupGeometry::measure(&self.index, entities);
        self.contributors
            .values()
            .map(|c| c.contribute(ctx, entities, &geometry))
            .collect()
    }

    pub fn apply_tick(&self, ctx: TickContext, entities: &mut [Entity]) {
        let deltas = self.contribute(ctx, entities);
        reduce(&deltas, entities);
    }
}
