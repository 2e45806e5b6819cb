use crate::delta::ForceDelta;
use crate::forces::TickContext;
use crate::geometry::{GroupGeometry, GroupShape, position};
use ply_graph::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CohesionParams {
    /// Pull toward the component center, in `[0, 1]`.
    pub component_attraction: f64,
    /// Pull toward the community center, in `[0, 1]`.
    pub community_attraction: f64,
    pub strength: f64,
}

impl Default for CohesionParams {
    fn default() -> Self {
        Self {
            component_attraction: 0.5,
            community_attraction: 0.5,
            strength: 0.1,
        }
    }
}

pub fn cohesion(
    ctx: TickContext,
    entities: &[Entity],
    geometry: &GroupGeometry<'_>,
    params: &CohesionParams,
) -> ForceDelta {
    if ctx.is_cold() || geometry.is_empty() {
        return ForceDelta::empty();
    }

    let outer = params.component_attraction.clamp(0.0, 1.0) * params.strength * ctx.alpha;
    let inner = params.community_attraction.clamp(0.0, 1.0) * params.strength * ctx.alpha;

    let mut delta = ForceDelta::new(entities.len());
    for component in &geometry.components {
        pull_to_center(&component.shape, outer, entities, &mut delta);
        for community in &component.communities {
            pull_to_center(community, inner, entities, &mut delta);
        }
    }
    delta
}

fn pull_to_center(shape: &GroupShape<'_>, k: f64, entities: &[Entity], delta: &mut ForceDelta) {
    if k == 0.0 {
        return;
    }
    for &m in shape.members {
        if let Some(e) = entities.get(m) {
            delta.add(m, (shape.center - position(e)) * k);
        }
    }
}
