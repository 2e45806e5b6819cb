use crate::delta::ForceDelta;
use crate::forces::TickContext;
use crate::geometry::position;
use ply_graph::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeparationParams {
    pub radius: f64,
    pub strength: f64,
    /// Fraction of the push that the inactive side receives.
    pub inactive_share: f64,
}

impl Default for SeparationParams {
    fn default() -> Self {
        Self {
            radius: 60.0,
            strength: 2.0,
            inactive_share: 0.25,
        }
    }
}

/// Repels active from inactive entities within `radius`. The inactive side moves less so edge
/// pinning does not disturb the grouped layout.
pub fn cross_population(ctx: TickContext, entities: &[Entity], params: &SeparationParams) -> ForceDelta {
    if ctx.is_cold() || params.radius.is_nan() || params.radius <= 0.0 {
        return ForceDelta::empty();
    }
    let (active, inactive): (Vec<usize>, Vec<usize>) =
        (0..entities.len()).partition(|&i| entities[i].is_active());
    if active.is_empty() || inactive.is_empty() {
        return ForceDelta::empty();
    }

    let mut delta = ForceDelta::new(entities.len());
    for &a in &active {
        let pa = position(&entities[a]);
        for &b in &inactive {
            let offset = pa - position(&entities[b]);
            let distance = offset.norm();
            if distance == 0.0 || distance >= params.radius {
                continue;
            }
            let push = params.strength * ctx.alpha * (1.0 - distance / params.radius);
            let dir = offset / distance;
            delta.add(a, dir * push);
            delta.add(b, -dir * (push * params.inactive_share));
        }
    }
    delta
}
