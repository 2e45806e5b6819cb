//! Edge pinning for the inactive population.

use crate::delta::ForceDelta;
use crate::forces::TickContext;
use crate::geometry::Vec2;
use crate::rng::{entity_noise, fnv1a};
use ply_graph::{Entity, Side};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallParams {
    pub width: f64,
    pub height: f64,
    /// Distance of the target line from its edge.
    pub wall_offset: f64,
    /// Horizontal inset of the first and last slot.
    pub margin: f64,
    /// Preferred horizontal distance between slots.
    pub slot_spacing: f64,
    pub strength_x: f64,
    pub strength_y: f64,
    /// Same-side entities closer than this push each other sideways.
    pub lateral_range: f64,
    pub lateral_strength: f64,
    pub jitter: f64,
}

impl Default for WallParams {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 640.0,
            wall_offset: 20.0,
            margin: 24.0,
            slot_spacing: 24.0,
            strength_x: 0.1,
            strength_y: 0.5,
            lateral_range: 14.0,
            lateral_strength: 0.5,
            jitter: 0.25,
        }
    }
}

impl WallParams {
    pub fn slot_count(&self) -> u32 {
        let usable = self.width - 2.0 * self.margin;
        if usable.is_nan() || usable <= 0.0 || self.slot_spacing.is_nan() || self.slot_spacing <= 0.0 {
            return 1;
        }
        ((usable / self.slot_spacing).floor() as u32).max(1)
    }

    /// Resting point of an inactive entity: `white` sits on the bottom edge, `black` on the top.
    ///
    /// An explicit `h_position` picks one of `columns` equal columns spanning the usable width;
    /// hashed ids, or any entity when `columns` is 0, take a `slot_spacing` slot.
    pub fn target(&self, e: &Entity, columns: u32) -> Vec2 {
        let y = match e.side_or_default() {
            Side::White => self.height - self.wall_offset,
            Side::Black => self.wall_offset,
        };

        let usable = self.width - 2.0 * self.margin;
        if usable.is_nan() || usable <= 0.0 {
            return Vec2::new(self.width / 2.0, y);
        }
        let (slot, slots) = match e.h_position {
            Some(h) if columns > 0 => (h.min(columns - 1), columns),
            _ => {
                let slots = self.slot_count();
                (slot_of(e) % slots, slots)
            }
        };
        let step = usable / f64::from(slots);
        Vec2::new(self.margin + (f64::from(slot) + 0.5) * step, y)
    }
}

/// Stable slot: the explicit `h_position`, else a hash of the id.
pub fn slot_of(e: &Entity) -> u32 {
    e.h_position.unwrap_or_else(|| fnv1a(e.id.as_bytes()))
}

/// Columns spanned by explicit positions: the largest `h_position` plus one, 0 when none is set.
pub fn explicit_columns(entities: &[Entity]) -> u32 {
    entities
        .iter()
        .filter_map(|e| e.h_position)
        .max()
        .map_or(0, |h| h.saturating_add(1))
}

pub fn wall_affinity(ctx: TickContext, entities: &[Entity], params: &WallParams) -> ForceDelta {
    if ctx.is_cold() {
        return ForceDelta::empty();
    }
    let inactive = (0..entities.len())
        .filter(|&i| !entities[i].is_active())
        .collect::<Vec<_>>();
    if inactive.is_empty() {
        return ForceDelta::empty();
    }

    let columns = explicit_columns(entities);
    let mut delta = ForceDelta::new(entities.len());
    for &i in &inactive {
        let e = &entities[i];
        let target = params.target(e, columns);
        let (nx, ny) = entity_noise(ctx.seed, ctx.tick, i);
        let dv = Vec2::new(
            (target.x - e.x) * params.strength_x,
            (target.y - e.y) * params.strength_y,
        ) + Vec2::new(nx, ny) * params.jitter;
        delta.add(i, dv * ctx.alpha);
    }

    if params.lateral_range > 0.0 {
        for (k, &a) in inactive.iter().enumerate() {
            let ea = &entities[a];
            for &b in &inactive[k + 1..] {
                let eb = &entities[b];
                if ea.side_or_default() != eb.side_or_default() {
                    continue;
                }
                let dx = ea.x - eb.x;
                if (ea.y - eb.y).abs() >= params.lateral_range || dx.abs() >= params.lateral_range
                {
                    continue;
                }
                // Stacked pairs split by index: the lower index moves left.
                let dir = if dx > 0.0 { 1.0 } else { -1.0 };
                let push =
                    params.lateral_strength * ctx.alpha * (1.0 - dx.abs() / params.lateral_range);
                delta.add(a, Vec2::new(dir * push, 0.0));
                delta.add(b, Vec2::new(-dir * push, 0.0));
            }
        }
    }
    delta
}
