use crate::geometry::Vec2;
use ply_graph::Entity;

/// Output of one contributor for one tick.
///
/// Contributors never write entities themselves; they describe velocity increments (and, for
/// containment, hard position clamps) that [`ForceDelta::apply`] writes back once per tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForceDelta {
    velocity: Vec<Vec2>,
    clamp: Vec<Option<Vec2>>,
}

impl ForceDelta {
    pub fn new(len: usize) -> Self {
        Self {
            velocity: vec![Vec2::zeros(); len],
            clamp: vec![None; len],
        }
    }

    /// A delta that changes nothing, regardless of entity count.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.velocity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.velocity.is_empty()
    }

    pub fn add(&mut self, index: usize, dv: Vec2) {
        if let Some(v) = self.velocity.get_mut(index) {
            *v += dv;
        }
    }

    pub fn clamp_to(&mut self, index: usize, position: Vec2) {
        if let Some(slot) = self.clamp.get_mut(index) {
            *slot = Some(position);
        }
    }

    pub fn velocity(&self, index: usize) -> Vec2 {
        self.velocity.get(index).copied().unwrap_or_else(Vec2::zeros)
    }

    pub fn clamped(&self, index: usize) -> Option<Vec2> {
        self.clamp.get(index).copied().flatten()
    }

    /// Writes the delta back. Non-finite increments are dropped so one bad tick cannot poison the
    /// whole simulation.
    pub fn apply(&self, entities: &mut [Entity]) {
        for (e, (dv, clamp)) in entities
            .iter_mut()
            .zip(self.velocity.iter().zip(self.clamp.iter()))
        {
            if dv.x.is_finite() && dv.y.is_finite() {
                e.vx += dv.x;
                e.vy += dv.y;
            }
            match clamp {
                Some(p) if p.x.is_finite() && p.y.is_finite() => {
                    e.x = p.x;
                    e.y = p.y;
                }
                _ => {}
            }
        }
    }
}

/// Applies every delta in order.
pub fn reduce(deltas: &[ForceDelta], entities: &mut [Entity]) {
    for d in deltas {
        d.apply(entities);
    }
}
