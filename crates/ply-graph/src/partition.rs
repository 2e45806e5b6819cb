//! Component/community assignment for snapshots that arrive without group ids.
//!
//! Components are the weakly connected components of the relation graph. Communities are found
//! inside each component with multi-level Louvain modularity optimization, run deterministically
//! (nodes are visited in id order and ties keep the current community).

use crate::model::{Entity, GroupId, Relation, index_by_id};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionOptions {
    /// Modularity resolution; values above 1 favor smaller communities.
    pub resolution: f64,
    /// Upper bound on local-moving sweeps per level.
    pub max_passes: usize,
    /// Also partition inactive entities.
    pub include_inactive: bool,
}

impl Default for PartitionOptions {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            max_passes: 32,
            include_inactive: false,
        }
    }
}

/// Per-entity ids; `None` for entities excluded from partitioning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub component: Vec<Option<GroupId>>,
    pub community: Vec<Option<GroupId>>,
}

impl Partition {
    pub fn component_count(&self) -> usize {
        let mut ids = self.component.iter().flatten().collect::<Vec<_>>();
        ids.sort();
        ids.dedup();
        ids.len()
    }
}

/// Computes components and communities and writes them to `outer_group` / `inner_group`.
pub fn assign_partition(entities: &mut [Entity], relations: &[Relation], opts: &PartitionOptions) {
    let partition = compute_partition(entities, relations, opts);
    for (e, (component, community)) in entities
        .iter_mut()
        .zip(partition.component.iter().zip(partition.community.iter()))
    {
        if let (Some(component), Some(community)) = (component, community) {
            e.outer_group = *component;
            e.inner_group = *community;
        }
    }
    tracing::debug!(
        entities = entities.len(),
        components = partition.component_count(),
        "assigned partition"
    );
}

pub fn compute_partition(
    entities: &[Entity],
    relations: &[Relation],
    opts: &PartitionOptions,
) -> Partition {
    let included = |e: &Entity| opts.include_inactive || e.is_active();
    let graph = UndirectedGraph::build(entities, relations, included);
    let n = graph.len();

    let components = graph.components();
    let mut component = vec![None; entities.len()];
    let mut community = vec![None; entities.len()];

    for (component_id, members) in components.iter().enumerate() {
        for &local in members {
            component[graph.entity[local]] = Some(component_id as GroupId);
        }

        let sub = graph.induced(members);
        let labels = louvain(&sub, opts.resolution, opts.max_passes);
        let ranked = rank_labels(&labels, sub.len());
        for (sub_idx, &local) in members.iter().enumerate() {
            community[graph.entity[local]] = Some(ranked[labels[sub_idx]] as GroupId);
        }
    }

    debug_assert_eq!(component.iter().flatten().count(), n);
    Partition {
        component,
        community,
    }
}

/// Newman modularity of `community` (one id per entity) over the undirected, weighted relation
/// graph. Zero for graphs without weight.
pub fn modularity(entities: &[Entity], relations: &[Relation], community: &[GroupId]) -> f64 {
    let graph = UndirectedGraph::build(entities, relations, |_| true);
    let labels = (0..graph.len())
        .map(|local| community.get(graph.entity[local]).copied().unwrap_or(0))
        .collect::<Vec<_>>();
    graph.modularity(&labels, 1.0)
}

/// Renumbers raw labels `0..` by descending community size, then by first member.
fn rank_labels(labels: &[usize], n: usize) -> Vec<usize> {
    let mut size = vec![0usize; n];
    let mut first = vec![usize::MAX; n];
    for (i, &l) in labels.iter().enumerate() {
        size[l] += 1;
        first[l] = first[l].min(i);
    }
    let mut used = (0..n).filter(|&l| size[l] > 0).collect::<Vec<_>>();
    used.sort_by(|&a, &b| size[b].cmp(&size[a]).then(first[a].cmp(&first[b])));
    let mut rank = vec![0usize; n];
    for (r, l) in used.into_iter().enumerate() {
        rank[l] = r;
    }
    rank
}

/// Weighted undirected graph over the included entities, numbered in ascending id order.
#[derive(Debug, Clone, Default)]
struct UndirectedGraph {
    /// Local node -> entity index.
    entity: Vec<usize>,
    adj: Vec<Vec<(usize, f64)>>,
    self_weight: Vec<f64>,
}

impl UndirectedGraph {
    fn build(entities: &[Entity], relations: &[Relation], keep: impl Fn(&Entity) -> bool) -> Self {
        let mut entity = (0..entities.len())
            .filter(|&i| keep(&entities[i]))
            .collect::<Vec<_>>();
        entity.sort_by(|&a, &b| entities[a].id.cmp(&entities[b].id).then(a.cmp(&b)));
        entity.dedup_by(|a, b| entities[*a].id == entities[*b].id);

        let by_id = index_by_id(entities);
        let mut local_of = vec![None; entities.len()];
        for (local, &idx) in entity.iter().enumerate() {
            local_of[idx] = Some(local);
        }

        let n = entity.len();
        let mut weights: std::collections::BTreeMap<(usize, usize), f64> = Default::default();
        let mut self_weight = vec![0.0; n];
        for r in relations {
            if !r.weight.is_finite() || r.weight < 0.0 {
                continue;
            }
            let (Some(&s), Some(&t)) = (by_id.get(r.source.as_str()), by_id.get(r.target.as_str()))
            else {
                continue;
            };
            let (Some(a), Some(b)) = (local_of[s], local_of[t]) else {
                continue;
            };
            if a == b {
                self_weight[a] += r.weight;
                continue;
            }
            *weights.entry((a.min(b), a.max(b))).or_insert(0.0) += r.weight;
        }

        let mut adj = vec![Vec::new(); n];
        for ((a, b), w) in weights {
            adj[a].push((b, w));
            adj[b].push((a, w));
        }
        for list in &mut adj {
            list.sort_by_key(|&(j, _)| j);
        }

        Self {
            entity,
            adj,
            self_weight,
        }
    }

    fn len(&self) -> usize {
        self.adj.len()
    }

    fn degree(&self, i: usize) -> f64 {
        self.adj[i].iter().map(|&(_, w)| w).sum::<f64>() + 2.0 * self.self_weight[i]
    }

    /// Connected components in ascending-size-descending order; ties by smallest local index.
    fn components(&self) -> Vec<Vec<usize>> {
        let n = self.len();
        let mut seen = vec![false; n];
        let mut out = Vec::new();
        for start in 0..n {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            let mut members = vec![start];
            let mut stack = vec![start];
            while let Some(v) = stack.pop() {
                for &(w, _) in &self.adj[v] {
                    if !seen[w] {
                        seen[w] = true;
                        members.push(w);
                        stack.push(w);
                    }
                }
            }
            members.sort_unstable();
            out.push(members);
        }
        out.sort_by(|a, b| b.len().cmp(&a.len()).then(a[0].cmp(&b[0])));
        out
    }

    /// Subgraph over `members` (sorted local ids), renumbered `0..members.len()`.
    fn induced(&self, members: &[usize]) -> Self {
        let mut pos = vec![None; self.len()];
        for (i, &m) in members.iter().enumerate() {
            pos[m] = Some(i);
        }
        let adj = members
            .iter()
            .map(|&m| {
                self.adj[m]
                    .iter()
                    .filter_map(|&(j, w)| pos[j].map(|pj| (pj, w)))
                    .collect::<Vec<_>>()
            })
            .collect();
        Self {
            entity: members.iter().map(|&m| self.entity[m]).collect(),
            adj,
            self_weight: members.iter().map(|&m| self.self_weight[m]).collect(),
        }
    }

    fn modularity(&self, labels: &[GroupId], resolution: f64) -> f64 {
        let m2 = (0..self.len()).map(|i| self.degree(i)).sum::<f64>();
        if m2 <= 0.0 {
            return 0.0;
        }
        let mut internal: std::collections::BTreeMap<GroupId, f64> = Default::default();
        let mut total: std::collections::BTreeMap<GroupId, f64> = Default::default();
        for i in 0..self.len() {
            *total.entry(labels[i]).or_insert(0.0) += self.degree(i);
            *internal.entry(labels[i]).or_insert(0.0) += 2.0 * self.self_weight[i];
            for &(j, w) in &self.adj[i] {
                if labels[i] == labels[j] {
                    *internal.entry(labels[i]).or_insert(0.0) += w;
                }
            }
        }
        total
            .iter()
            .map(|(c, tot)| {
                let inside = internal.get(c).copied().unwrap_or(0.0);
                inside / m2 - resolution * (tot / m2) * (tot / m2)
            })
            .sum()
    }

    /// Collapses each community into one node. Returns the graph and the node -> community map
    /// renumbered by first appearance.
    fn aggregate(&self, labels: &[usize]) -> (Self, Vec<usize>) {
        let mut renumber = vec![usize::MAX; self.len()];
        let mut next = 0usize;
        let mut mapped = Vec::with_capacity(self.len());
        for &l in labels {
            if renumber[l] == usize::MAX {
                renumber[l] = next;
                next += 1;
            }
            mapped.push(renumber[l]);
        }

        let mut weights: std::collections::BTreeMap<(usize, usize), f64> = Default::default();
        let mut self_weight = vec![0.0; next];
        for i in 0..self.len() {
            let ci = mapped[i];
            self_weight[ci] += self.self_weight[i];
            for &(j, w) in &self.adj[i] {
                if j <= i {
                    continue;
                }
                let cj = mapped[j];
                if ci == cj {
                    self_weight[ci] += w;
                } else {
                    *weights.entry((ci.min(cj), ci.max(cj))).or_insert(0.0) += w;
                }
            }
        }

        let mut adj = vec![Vec::new(); next];
        for ((a, b), w) in weights {
            adj[a].push((b, w));
            adj[b].push((a, w));
        }
        for list in &mut adj {
            list.sort_by_key(|&(j, _)| j);
        }

        (
            Self {
                entity: (0..next).collect(),
                adj,
                self_weight,
            },
            mapped,
        )
    }
}

/// Multi-level Louvain. Returns one raw community label per node of `graph`.
fn louvain(graph: &UndirectedGraph, resolution: f64, max_passes: usize) -> Vec<usize> {
    let n = graph.len();
    let mut assignment = (0..n).collect::<Vec<_>>();
    let mut level = graph.clone();

    loop {
        let (labels, moved) = local_moving(&level, resolution, max_passes);
        if !moved {
            break;
        }
        let (next, mapped) = level.aggregate(&labels);
        for a in &mut assignment {
            *a = mapped[*a];
        }
        if next.len() == level.len() {
            break;
        }
        level = next;
    }
    assignment
}

/// One Louvain level. Returns the label per node and whether any node changed community.
fn local_moving(graph: &UndirectedGraph, resolution: f64, max_passes: usize) -> (Vec<usize>, bool) {
    let n = graph.len();
    let mut label = (0..n).collect::<Vec<_>>();
    let degree = (0..n).map(|i| graph.degree(i)).collect::<Vec<_>>();
    let m2 = degree.iter().sum::<f64>();
    if m2 <= 0.0 || n < 2 {
        return (label, false);
    }

    let mut total = degree.clone();
    let mut link_to = vec![0.0f64; n];
    let mut touched: Vec<usize> = Vec::new();
    let mut any_moved = false;

    for _ in 0..max_passes.max(1) {
        let mut moved = false;
        for i in 0..n {
            let current = label[i];
            let k = degree[i];

            touched.clear();
            for &(j, w) in &graph.adj[i] {
                let c = label[j];
                if link_to[c] == 0.0 && !touched.contains(&c) {
                    touched.push(c);
                }
                link_to[c] += w;
            }

            total[current] -= k;
            let gain = |c: usize, link: f64| link - resolution * total[c] * k / m2;
            let mut best = current;
            let mut best_gain = gain(current, link_to[current]);
            for &c in &touched {
                let g = gain(c, link_to[c]);
                if g > best_gain + 1e-12 {
                    best = c;
                    best_gain = g;
                }
            }
            total[best] += k;

            for &c in &touched {
                link_to[c] = 0.0;
            }
            link_to[current] = 0.0;

            if best != current {
                label[i] = best;
                moved = true;
                any_moved = true;
            }
        }
        if !moved {
            break;
        }
    }
    (label, any_moved)
}
