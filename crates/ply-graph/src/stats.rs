use crate::group::Group;
use crate::model::{Entity, Relation, index_by_id};

/// Aggregate statistics for one group.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GroupStats {
    pub size: usize,
    pub mean_in_degree: f64,
    pub mean_out_degree: f64,
    /// Relations with both endpoints inside the group.
    pub internal_relations: usize,
    /// `internal_relations / (n * (n - 1))`, capped at 1; zero for groups smaller than two.
    pub density: f64,
}

/// Per-entity in/out degree over the relation list. Self-loops and relations with unknown
/// endpoints are skipped.
#[derive(Debug, Clone, Default)]
pub struct Degrees {
    pub in_degree: Vec<u32>,
    pub out_degree: Vec<u32>,
}

impl Degrees {
    pub fn compute(entities: &[Entity], relations: &[Relation]) -> Self {
        let by_id = index_by_id(entities);
        let mut in_degree = vec![0u32; entities.len()];
        let mut out_degree = vec![0u32; entities.len()];
        for r in relations {
            let (Some(&s), Some(&t)) = (by_id.get(r.source.as_str()), by_id.get(r.target.as_str()))
            else {
                continue;
            };
            if s == t {
                continue;
            }
            out_degree[s] += 1;
            in_degree[t] += 1;
        }
        Self {
            in_degree,
            out_degree,
        }
    }
}

pub(crate) fn stats_for(groups: &[&Group], entities: &[Entity], relations: &[Relation]) -> Vec<GroupStats> {
    let degrees = Degrees::compute(entities, relations);
    let by_id = index_by_id(entities);

    let mut group_of: Vec<Option<usize>> = vec![None; entities.len()];
    for (pos, g) in groups.iter().enumerate() {
        for &m in &g.members {
            if let Some(slot) = group_of.get_mut(m) {
                *slot = Some(pos);
            }
        }
    }

    let mut internal = vec![0usize; groups.len()];
    for r in relations {
        let (Some(&s), Some(&t)) = (by_id.get(r.source.as_str()), by_id.get(r.target.as_str()))
        else {
            continue;
        };
        if s == t {
            continue;
        }
        match (group_of[s], group_of[t]) {
            (Some(a), Some(b)) if a == b => internal[a] += 1,
            _ => {}
        }
    }

    groups
        .iter()
        .zip(internal)
        .map(|(g, internal_relations)| {
            let n = g.members.iter().filter(|&&m| m < entities.len()).count();
            if n == 0 {
                return GroupStats::default();
            }
            let (sum_in, sum_out) = g
                .members
                .iter()
                .filter(|&&m| m < entities.len())
                .fold((0u64, 0u64), |(i, o), &m| {
                    (
                        i + u64::from(degrees.in_degree[m]),
                        o + u64::from(degrees.out_degree[m]),
                    )
                });
            let density = if n < 2 {
                0.0
            } else {
                (internal_relations as f64 / (n * (n - 1)) as f64).min(1.0)
            };
            GroupStats {
                size: n,
                mean_in_degree: sum_in as f64 / n as f64,
                mean_out_degree: sum_out as f64 / n as f64,
                internal_relations,
                density,
            }
        })
        .collect()
}
