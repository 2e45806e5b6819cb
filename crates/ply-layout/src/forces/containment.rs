use crate::delta::ForceDelta;
use crate::forces::TickContext;
use crate::geometry::{GroupGeometry, GroupLevel, position};
use ply_graph::Entity;
use serde::{Deserialize, Serialize};

/// Members further than `radius * CLAMP_FACTOR` from their group center are snapped back onto
/// that circle.
pub const CLAMP_FACTOR: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainmentParams {
    pub strength: f64,
}

impl Default for ContainmentParams {
    fn default() -> Self {
        Self { strength: 0.1 }
    }
}

/// Keeps members of each group at `level` inside the group's bubble.
///
/// Inside the bubble the pull grows with `distance / radius`; outside it saturates and the member
/// is additionally clamped to `radius * CLAMP_FACTOR`.
pub fn containment(
    ctx: TickContext,
    entities: &[Entity],
    geometry: &GroupGeometry<'_>,
    level: GroupLevel,
    params: &ContainmentParams,
) -> ForceDelta {
    if ctx.is_cold() || geometry.is_empty() {
        return ForceDelta::empty();
    }

    let mut delta = ForceDelta::new(entities.len());
    for shape in geometry.shapes(level) {
        if shape.radius <= 0.0 {
            continue;
        }
        for &m in shape.members {
            let Some(e) = entities.get(m) else {
                continue;
            };
            let offset = position(e) - shape.center;
            let distance = offset.norm();
            if distance == 0.0 {
                continue;
            }

            let ratio = distance / shape.radius;
            delta.add(m, -offset * (params.strength * ctx.alpha * ratio.min(1.0)));

            if ratio > 1.0 {
                let limit = shape.radius * CLAMP_FACTOR;
                if distance > limit {
                    delta.clamp_to(m, shape.center + offset * (limit / distance));
                }
            }
        }
    }
    delta
}
