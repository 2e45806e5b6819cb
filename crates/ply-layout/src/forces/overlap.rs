use crate::delta::ForceDelta;
use crate::forces::TickContext;
use crate::geometry::{GroupGeometry, position};
use ply_graph::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlapParams {
    pub strength: f64,
    /// Extra gap kept between two member circles.
    pub margin: f64,
}

impl Default for OverlapParams {
    fn default() -> Self {
        Self {
            strength: 1.0,
            margin: 2.0,
        }
    }
}

/// Pushes apart overlapping members of the same community. Quadratic in community size.
pub fn anti_overlap(
    ctx: TickContext,
    entities: &[Entity],
    geometry: &GroupGeometry<'_>,
    params: &OverlapParams,
) -> ForceDelta {
    if ctx.is_cold() || geometry.is_empty() {
        return ForceDelta::empty();
    }

    let mut delta = ForceDelta::new(entities.len());
    for component in &geometry.components {
        for community in &component.communities {
            let members = community.members;
            for (i, &a) in members.iter().enumerate() {
                let Some(ea) = entities.get(a) else {
                    continue;
                };
                for &b in &members[i + 1..] {
                    let Some(eb) = entities.get(b) else {
                        continue;
                    };
                    let offset = position(ea) - position(eb);
                    let distance = offset.norm();
                    let min_distance = ea.size() + eb.size() + params.margin;
                    if distance == 0.0 || distance >= min_distance {
                        continue;
                    }
                    let push = params.strength * ctx.alpha * (1.0 - distance / min_distance);
                    let dir = offset / distance;
                    delta.add(a, dir * push);
                    delta.add(b, -dir * push);
                }
            }
        }
    }
    delta
}
