//! Generic particle forces that every mode starts from: many-body charge, springs along relations,
//! collision and a weak pull toward the canvas center.
//!
//! They act on the active population only; inactive entities are owned by wall-affinity. All
//! four are naive O(n^2) or O(edges) loops, adequate for the reference integrator.

use crate::delta::ForceDelta;
use crate::forces::TickContext;
use crate::geometry::{Vec2, position, velocity};
use crate::options::{LayoutMode, LayoutOptions};
use ply_graph::{Entity, Relation, index_by_id};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargeParams {
    /// Negative values repel.
    pub strength: f64,
    /// Pairs further apart than this do not interact.
    pub distance_max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkParams {
    pub distance: f64,
    /// Multiplier on the default `1 / min(degree)` spring strength.
    pub strength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionParams {
    pub strength: f64,
    /// Added to each entity's size to get its collision radius.
    pub padding: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravityParams {
    pub strength: f64,
    pub center: [f64; 2],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Primitives {
    pub charge: Option<ChargeParams>,
    pub link: Option<LinkParams>,
    pub collision: Option<CollisionParams>,
    pub gravity: Option<GravityParams>,
}

impl Primitives {
    pub fn none() -> Self {
        Self::default()
    }

    /// Base primitives for `mode`. Grouped modes weaken the generic forces so the custom
    /// contributors dominate the arrangement.
    pub fn for_mode(mode: LayoutMode, options: &LayoutOptions) -> Self {
        let center = [options.width / 2.0, options.height / 2.0];
        let (charge, charge_range, link, gravity) = match mode {
            LayoutMode::Force => (1.0, f64::INFINITY, 1.0, 1.0),
            LayoutMode::Radial => (0.3, f64::INFINITY, 0.1, 0.0),
            LayoutMode::BubbleForce => (0.5, 120.0, 0.5, 0.5),
            LayoutMode::BubbleRadial => (0.2, 120.0, 0.05, 0.0),
        };

        Self {
            charge: Some(ChargeParams {
                strength: options.charge_strength * charge,
                distance_max: charge_range,
            }),
            link: Some(LinkParams {
                distance: options.link_distance,
                strength: link,
            }),
            collision: Some(CollisionParams {
                strength: options.collision_strength,
                padding: 1.0,
            }),
            gravity: (gravity > 0.0).then_some(GravityParams {
                strength: options.gravity * gravity,
                center,
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.charge.is_none() && self.link.is_none() && self.collision.is_none() && self.gravity.is_none()
    }

    pub fn contribute(&self, ctx: TickContext, entities: &[Entity], relations: &[Relation]) -> Vec<ForceDelta> {
        if ctx.is_cold() || self.is_empty() {
            return Vec::new();
        }
        let active = (0..entities.len())
            .filter(|&i| entities[i].is_active())
            .collect::<Vec<_>>();
        if active.is_empty() {
            return Vec::new();
        }

        let mut out = Vec::with_capacity(4);
        if let Some(p) = &self.charge {
            out.push(charge(ctx, entities, &active, p));
        }
        if let Some(p) = &self.link {
            out.push(link(ctx, entities, relations, p));
        }
        if let Some(p) = &self.collision {
            out.push(collision(entities, &active, p));
        }
        if let Some(p) = &self.gravity {
            out.push(gravity(ctx, entities, &active, p));
        }
        out
    }
}

fn charge(ctx: TickContext, entities: &[Entity], active: &[usize], p: &ChargeParams) -> ForceDelta {
    let mut delta = ForceDelta::new(entities.len());
    let max2 = p.distance_max * p.distance_max;
    for (k, &a) in active.iter().enumerate() {
        let pa = position(&entities[a]);
        for &b in &active[k + 1..] {
            let offset = position(&entities[b]) - pa;
            let l2 = offset.norm_squared();
            if l2 == 0.0 || l2 >= max2 {
                continue;
            }
            let w = p.strength * ctx.alpha / l2.max(1.0);
            delta.add(a, offset * w);
            delta.add(b, -offset * w);
        }
    }
    delta
}

fn link(ctx: TickContext, entities: &[Entity], relations: &[Relation], p: &LinkParams) -> ForceDelta {
    let by_id = index_by_id(entities);
    let springs = relations
        .iter()
        .filter_map(|r| {
            let s = *by_id.get(r.source.as_str())?;
            let t = *by_id.get(r.target.as_str())?;
            (s != t && entities[s].is_active() && entities[t].is_active()).then_some((s, t))
        })
        .collect::<Vec<_>>();
    if springs.is_empty() {
        return ForceDelta::empty();
    }

    let mut count = vec![0u32; entities.len()];
    for &(s, t) in &springs {
        count[s] += 1;
        count[t] += 1;
    }

    let mut delta = ForceDelta::new(entities.len());
    for &(s, t) in &springs {
        let (es, et) = (&entities[s], &entities[t]);
        let offset = (position(et) + velocity(et)) - (position(es) + velocity(es));
        let l = offset.norm();
        if l == 0.0 {
            continue;
        }
        let strength = p.strength / f64::from(count[s].min(count[t]));
        let pull = offset * ((l - p.distance) / l * ctx.alpha * strength);
        let bias = f64::from(count[s]) / f64::from(count[s] + count[t]);
        delta.add(t, -pull * bias);
        delta.add(s, pull * (1.0 - bias));
    }
    delta
}

fn collision(entities: &[Entity], active: &[usize], p: &CollisionParams) -> ForceDelta {
    let mut delta = ForceDelta::new(entities.len());
    for (k, &a) in active.iter().enumerate() {
        let ea = &entities[a];
        let ra = ea.size() + p.padding;
        for &b in &active[k + 1..] {
            let eb = &entities[b];
            let rb = eb.size() + p.padding;
            let offset = position(ea) - position(eb);
            let d = offset.norm();
            let r = ra + rb;
            if d == 0.0 || d >= r {
                continue;
            }
            let push = offset / d * ((r - d) * p.strength);
            let share = rb * rb / (ra * ra + rb * rb);
            delta.add(a, push * share);
            delta.add(b, -push * (1.0 - share));
        }
    }
    delta
}

fn gravity(ctx: TickContext, entities: &[Entity], active: &[usize], p: &GravityParams) -> ForceDelta {
    let center = Vec2::new(p.center[0], p.center[1]);
    let mut delta = ForceDelta::new(entities.len());
    for &i in active {
        delta.add(i, (center - position(&entities[i])) * (p.strength * ctx.alpha));
    }
    delta
}
