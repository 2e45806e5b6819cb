//! Two-level grouping: component (outer) -> community (inner).

use crate::model::{Entity, GroupId, Relation};
use crate::stats::{GroupStats, stats_for};
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// A set of entities sharing a group id. `members` are indices into the entity slice the index was
/// built from, sorted by entity id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub members: Vec<usize>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Component/community partition of one snapshot.
///
/// Keys iterate in ascending id order and member lists are sorted by entity id, so both the
/// partition and its iteration order are independent of the entity array order.
#[derive(Debug, Clone, Default)]
pub struct GroupIndex {
    outer: IndexMap<GroupId, Group>,
    inner: IndexMap<GroupId, IndexMap<GroupId, Group>>,
}

impl GroupIndex {
    pub fn build(entities: &[Entity]) -> Self {
        Self::build_filtered(entities, |_| true)
    }

    /// Groups only the entities accepted by `keep`. Indices still refer to the full slice.
    pub fn build_filtered(entities: &[Entity], keep: impl Fn(&Entity) -> bool) -> Self {
        let mut outer: BTreeMap<GroupId, Vec<usize>> = BTreeMap::new();
        let mut inner: BTreeMap<GroupId, BTreeMap<GroupId, Vec<usize>>> = BTreeMap::new();

        for (idx, e) in entities.iter().enumerate() {
            if !keep(e) {
                continue;
            }
            outer.entry(e.outer_group).or_default().push(idx);
            inner
                .entry(e.outer_group)
                .or_default()
                .entry(e.inner_group)
                .or_default()
                .push(idx);
        }

        let by_id = |members: &mut Vec<usize>| {
            members.sort_by(|&a, &b| entities[a].id.cmp(&entities[b].id).then(a.cmp(&b)));
        };

        let outer = outer
            .into_iter()
            .map(|(id, mut members)| {
                by_id(&mut members);
                (id, Group { id, members })
            })
            .collect::<IndexMap<_, _>>();
        let inner = inner
            .into_iter()
            .map(|(outer_id, communities)| {
                let communities = communities
                    .into_iter()
                    .map(|(id, mut members)| {
                        by_id(&mut members);
                        (id, Group { id, members })
                    })
                    .collect::<IndexMap<_, _>>();
                (outer_id, communities)
            })
            .collect::<IndexMap<_, _>>();

        tracing::trace!(
            outer = outer.len(),
            inner = inner.values().map(|m| m.len()).sum::<usize>(),
            "built group index"
        );

        Self { outer, inner }
    }

    pub fn is_empty(&self) -> bool {
        self.outer.is_empty()
    }

    pub fn outer_len(&self) -> usize {
        self.outer.len()
    }

    pub fn outer(&self, id: GroupId) -> Option<&Group> {
        self.outer.get(&id)
    }

    pub fn outer_groups(&self) -> impl Iterator<Item = &Group> {
        self.outer.values()
    }

    pub fn inner(&self, outer: GroupId, inner: GroupId) -> Option<&Group> {
        self.inner.get(&outer)?.get(&inner)
    }

    /// Communities of one component; empty when the component is unknown.
    pub fn inner_groups(&self, outer: GroupId) -> impl Iterator<Item = &Group> {
        self.inner.get(&outer).into_iter().flat_map(|m| m.values())
    }

    pub fn inner_len(&self, outer: GroupId) -> usize {
        self.inner.get(&outer).map(|m| m.len()).unwrap_or(0)
    }

    /// Every community paired with its component id.
    pub fn innermost_groups(&self) -> impl Iterator<Item = (GroupId, &Group)> {
        self.inner
            .iter()
            .flat_map(|(outer, m)| m.values().map(move |g| (*outer, g)))
    }

    /// Membership as sorted id lists, `(outer, inner) -> ids`. Mostly useful for comparisons.
    pub fn partition<'a>(&self, entities: &'a [Entity]) -> BTreeMap<(GroupId, GroupId), Vec<&'a str>> {
        self.innermost_groups()
            .map(|(outer, g)| {
                let ids = g
                    .members
                    .iter()
                    .filter_map(|&i| entities.get(i).map(|e| e.id.as_str()))
                    .collect::<Vec<_>>();
                ((outer, g.id), ids)
            })
            .collect()
    }

    pub fn outer_stats(
        &self,
        entities: &[Entity],
        relations: &[Relation],
    ) -> IndexMap<GroupId, GroupStats> {
        let groups = self.outer.values().collect::<Vec<_>>();
        let stats = stats_for(&groups, entities, relations);
        groups.iter().map(|g| g.id).zip(stats).collect()
    }

    pub fn inner_stats(
        &self,
        outer: GroupId,
        entities: &[Entity],
        relations: &[Relation],
    ) -> IndexMap<GroupId, GroupStats> {
        let groups = self.inner_groups(outer).collect::<Vec<_>>();
        let stats = stats_for(&groups, entities, relations);
        groups.iter().map(|g| g.id).zip(stats).collect()
    }
}
