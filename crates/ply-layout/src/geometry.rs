//! Per-tick group geometry: where each group currently is and how large its bubble should be.

use nalgebra::Vector2;
use ply_graph::{Entity, GroupId, GroupIndex};

pub type Vec2 = Vector2<f64>;

/// Bubble radius growth per `sqrt(member count)`, in units of mean member size.
pub const PACKING: f64 = 1.6;
/// Constant bubble padding.
pub const PADDING: f64 = 6.0;

/// Bubble radius for `count` members of average radius `mean_size`.
pub fn group_radius(count: usize, mean_size: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    mean_size.max(0.0) * (count as f64).sqrt() * PACKING + PADDING
}

pub fn position(e: &Entity) -> Vec2 {
    Vec2::new(e.x, e.y)
}

pub fn velocity(e: &Entity) -> Vec2 {
    Vec2::new(e.vx, e.vy)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupLevel {
    /// Components.
    Outer,
    /// Communities.
    Inner,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupShape<'a> {
    pub id: GroupId,
    pub members: &'a [usize],
    pub center: Vec2,
    pub radius: f64,
}

impl<'a> GroupShape<'a> {
    /// `None` when no member index is valid for `entities`.
    fn measure(id: GroupId, members: &'a [usize], entities: &[Entity]) -> Option<Self> {
        let mut sum = Vec2::zeros();
        let mut size = 0.0;
        let mut count = 0usize;
        for &m in members {
            let Some(e) = entities.get(m) else {
                continue;
            };
            sum += position(e);
            size += e.size();
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let n = count as f64;
        Some(Self {
            id,
            members,
            center: sum / n,
            radius: group_radius(count, size / n),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentShape<'a> {
    pub shape: GroupShape<'a>,
    pub communities: Vec<GroupShape<'a>>,
}

/// Centers and radii of every component and community, measured from current positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupGeometry<'a> {
    pub components: Vec<ComponentShape<'a>>,
}

impl<'a> GroupGeometry<'a> {
    pub fn measure(index: &'a GroupIndex, entities: &[Entity]) -> Self {
        let components = index
            .outer_groups()
            .filter_map(|outer| {
                let shape = GroupShape::measure(outer.id, &outer.members, entities)?;
                let communities = index
                    .inner_groups(outer.id)
                    .filter_map(|inner| GroupShape::measure(inner.id, &inner.members, entities))
                    .collect();
                Some(ComponentShape { shape, communities })
            })
            .collect();
        Self { components }
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn shapes(&self, level: GroupLevel) -> Box<dyn Iterator<Item = &GroupShape<'a>> + '_> {
        match level {
            GroupLevel::Outer => Box::new(self.components.iter().map(|c| &c.shape)),
            GroupLevel::Inner => Box::new(self.components.iter().flat_map(|c| c.communities.iter())),
        }
    }
}
