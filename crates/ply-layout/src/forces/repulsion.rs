use crate::delta::ForceDelta;
use crate::forces::TickContext;
use crate::geometry::{GroupGeometry, GroupLevel, GroupShape, Vec2};
use ply_graph::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepulsionParams {
    pub strength: f64,
    /// Distances below this are treated as this value.
    pub min_distance: f64,
}

impl Default for RepulsionParams {
    fn default() -> Self {
        Self {
            strength: 60.0,
            min_distance: 10.0,
        }
    }
}

/// Rigid-body repulsion between group centers.
///
/// Components repel each other at [`GroupLevel::Outer`]; at [`GroupLevel::Inner`] only
/// communities of the same component interact. Every member of a group receives the same
/// impulse, and the two sides of a pair receive exact negations of each other.
pub fn group_repulsion(
    ctx: TickContext,
    entities: &[Entity],
    geometry: &GroupGeometry<'_>,
    level: GroupLevel,
    params: &RepulsionParams,
) -> ForceDelta {
    if ctx.is_cold() || geometry.is_empty() {
        return ForceDelta::empty();
    }

    let mut delta = ForceDelta::new(entities.len());
    match level {
        GroupLevel::Outer => {
            let shapes = geometry.components.iter().map(|c| &c.shape).collect::<Vec<_>>();
            repel_pairs(ctx.alpha, &shapes, params, &mut delta);
        }
        GroupLevel::Inner => {
            for component in &geometry.components {
                let shapes = component.communities.iter().collect::<Vec<_>>();
                repel_pairs(ctx.alpha, &shapes, params, &mut delta);
            }
        }
    }
    delta
}

/// Impulse on group `a` away from group `b`; `None` when the centers coincide.
pub fn pair_impulse(a: Vec2, b: Vec2, alpha: f64, params: &RepulsionParams) -> Option<Vec2> {
    let axis = a - b;
    let distance = axis.norm();
    if distance == 0.0 {
        return None;
    }
    let magnitude = params.strength * alpha / distance.max(params.min_distance);
    Some(axis * (magnitude / distance))
}

fn repel_pairs(alpha: f64, shapes: &[&GroupShape<'_>], params: &RepulsionParams, delta: &mut ForceDelta) {
    for (i, a) in shapes.iter().enumerate() {
        for b in &shapes[i + 1..] {
            let Some(impulse) = pair_impulse(a.center, b.center, alpha, params) else {
                continue;
            };
            for &m in a.members {
                delta.add(m, impulse);
            }
            for &m in b.members {
                delta.add(m, -impulse);
            }
        }
    }
}
