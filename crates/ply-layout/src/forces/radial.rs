//! Radial placement: components on a master circle, communities on a sub-circle around their
//! component's slot, members on a small ring around their community's slot.
//!
//! Targets are computed once when the contributor is built; each tick only pulls entities toward
//! them.

use crate::delta::ForceDelta;
use crate::forces::TickContext;
use crate::geometry::{Vec2, group_radius, position};
use ply_graph::{Entity, Group, GroupIndex, OrderOptimizer, Relation};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Gap between neighbouring members on a community ring.
const MEMBER_GAP: f64 = 2.0;
/// Community sub-circle radius relative to the component bubble.
const SUB_CIRCLE: f64 = 0.5;
/// Master circle radius relative to the shorter canvas side.
const MASTER_CIRCLE: f64 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialParams {
    pub strength: f64,
}

impl Default for RadialParams {
    fn default() -> Self {
        Self { strength: 0.15 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialFrame {
    pub center: Vec2,
    pub radius: f64,
}

impl RadialFrame {
    pub fn for_canvas(width: f64, height: f64) -> Self {
        Self {
            center: Vec2::new(width / 2.0, height / 2.0),
            radius: MASTER_CIRCLE * width.min(height).max(0.0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadialPlacement {
    targets: Vec<Option<Vec2>>,
    pub params: RadialParams,
}

impl RadialPlacement {
    /// Lays out targets for every grouped entity. With an optimizer, components (and the
    /// communities of each component) are ordered so that connected groups are ring neighbours;
    /// otherwise index order is kept.
    pub fn plan(
        index: &GroupIndex,
        entities: &[Entity],
        relations: &[Relation],
        optimizer: Option<&OrderOptimizer>,
        frame: RadialFrame,
        params: RadialParams,
    ) -> Self {
        let mut targets = vec![None; entities.len()];

        let components = ordered(&index.outer_groups().collect::<Vec<_>>(), entities, relations, optimizer);
        let radii = components
            .iter()
            .map(|g| bubble_radius(g, entities))
            .collect::<Vec<_>>();
        let master = if components.len() <= 1 {
            0.0
        } else {
            frame.radius.max(radii.iter().sum::<f64>() / PI)
        };

        for (k, component) in components.iter().enumerate() {
            let center = frame.center + ring_point(master, k, components.len());

            let communities = ordered(
                &index.inner_groups(component.id).collect::<Vec<_>>(),
                entities,
                relations,
                optimizer,
            );
            let sub = if communities.len() <= 1 {
                0.0
            } else {
                let spread = communities
                    .iter()
                    .map(|g| bubble_radius(g, entities))
                    .sum::<f64>()
                    / PI;
                (radii[k] * SUB_CIRCLE).max(spread)
            };

            for (j, community) in communities.iter().enumerate() {
                let slot = center + ring_point(sub, j, communities.len());
                let members = community
                    .members
                    .iter()
                    .copied()
                    .filter(|&m| m < entities.len())
                    .collect::<Vec<_>>();
                let ring = if members.len() <= 1 {
                    0.0
                } else {
                    let mean = members.iter().map(|&m| entities[m].size()).sum::<f64>()
                        / members.len() as f64;
                    members.len() as f64 * (2.0 * mean + MEMBER_GAP) / TAU
                };
                for (i, &m) in members.iter().enumerate() {
                    targets[m] = Some(slot + ring_point(ring, i, members.len()));
                }
            }
        }

        tracing::debug!(
            components = components.len(),
            master_radius = master,
            placed = targets.iter().filter(|t| t.is_some()).count(),
            "planned radial targets"
        );

        Self { targets, params }
    }

    pub fn target(&self, index: usize) -> Option<Vec2> {
        self.targets.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

pub fn radial_placement(ctx: TickContext, entities: &[Entity], placement: &RadialPlacement) -> ForceDelta {
    if ctx.is_cold() || placement.is_empty() {
        return ForceDelta::empty();
    }
    let k = placement.params.strength * ctx.alpha;
    let mut delta = ForceDelta::new(entities.len());
    for (i, e) in entities.iter().enumerate() {
        if let Some(target) = placement.target(i) {
            delta.add(i, (target - position(e)) * k);
        }
    }
    delta
}

/// Point `k` of `n` evenly spaced on a circle, starting at the top.
fn ring_point(radius: f64, k: usize, n: usize) -> Vec2 {
    if n == 0 || radius == 0.0 {
        return Vec2::zeros();
    }
    let angle = TAU * k as f64 / n as f64 - FRAC_PI_2;
    Vec2::new(radius * angle.cos(), radius * angle.sin())
}

fn bubble_radius(group: &Group, entities: &[Entity]) -> f64 {
    let sizes = group
        .members
        .iter()
        .filter_map(|&m| entities.get(m))
        .map(Entity::size)
        .collect::<Vec<_>>();
    if sizes.is_empty() {
        return 0.0;
    }
    group_radius(sizes.len(), sizes.iter().sum::<f64>() / sizes.len() as f64)
}

fn ordered<'g>(
    groups: &[&'g Group],
    entities: &[Entity],
    relations: &[Relation],
    optimizer: Option<&OrderOptimizer>,
) -> Vec<&'g Group> {
    let Some(optimizer) = optimizer else {
        return groups.to_vec();
    };
    optimizer
        .optimize_order(groups, entities, relations)
        .into_iter()
        .filter_map(|id| groups.iter().find(|g| g.id == id).copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_point_starts_at_the_top() {
        let p = ring_point(10.0, 0, 4);
        assert!(p.x.abs() < 1e-9);
        assert!((p.y + 10.0).abs() < 1e-9);
        assert_eq!(ring_point(0.0, 3, 4), Vec2::zeros());
        assert_eq!(ring_point(5.0, 0, 0), Vec2::zeros());
    }

    #[test]
    fn single_entity_targets_the_frame_center() {
        let entities = vec![Entity::new("a").with_groups(0, 0).at(5.0, 5.0)];
        let index = GroupIndex::build(&entities);
        let frame = RadialFrame::for_canvas(200.0, 100.0);
        let placement =
            RadialPlacement::plan(&index, &entities, &[], None, frame, RadialParams::default());
        assert_eq!(placement.target(0), Some(Vec2::new(100.0, 50.0)));
    }
}
