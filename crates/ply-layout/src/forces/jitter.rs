use crate::delta::ForceDelta;
use crate::forces::TickContext;
use crate::geometry::Vec2;
use crate::rng::entity_noise;
use ply_graph::Entity;
use serde::{Deserialize, Serialize};

/// Keeps this stream independent of the wall-affinity noise for the same seed.
const JITTER_STREAM: u64 = 0x6A09E667F3BCC908;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JitterParams {
    pub amplitude: f64,
}

impl Default for JitterParams {
    fn default() -> Self {
        Self { amplitude: 0.1 }
    }
}

/// Seeded noise on the active population; separates coincident entities that the distance-based
/// contributors skip.
pub fn jitter(ctx: TickContext, entities: &[Entity], params: &JitterParams) -> ForceDelta {
    if ctx.is_cold() || params.amplitude == 0.0 {
        return ForceDelta::empty();
    }
    let mut delta = ForceDelta::new(entities.len());
    for (i, e) in entities.iter().enumerate() {
        if !e.is_active() {
            continue;
        }
        let (nx, ny) = entity_noise(ctx.seed ^ JITTER_STREAM, ctx.tick, i);
        delta.add(i, Vec2::new(nx, ny) * (params.amplitude * ctx.alpha));
    }
    delta
}
