use crate::error::{Error, Result};
use crate::group::Group;
use crate::model::GroupId;
use crate::stats::GroupStats;
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortMetric {
    #[default]
    Size,
    /// Mean in-degree of the members.
    InCentrality,
    /// Mean out-degree of the members.
    OutCentrality,
    Density,
    Id,
}

impl SortMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::InCentrality => "in-centrality",
            Self::OutCentrality => "out-centrality",
            Self::Density => "density",
            Self::Id => "id",
        }
    }
}

impl FromStr for SortMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "size" => Ok(Self::Size),
            "in-centrality" | "in-degree" => Ok(Self::InCentrality),
            "out-centrality" | "out-degree" => Ok(Self::OutCentrality),
            "density" => Ok(Self::Density),
            "id" => Ok(Self::Id),
            _ => Err(Error::UnknownSortMetric {
                name: s.to_string(),
            }),
        }
    }
}

/// Sorts groups by `metric`. Ties (and groups without stats) fall back to ascending id, so the
/// result does not depend on the input order.
pub fn sort_groups<'a>(
    groups: &[&'a Group],
    metric: SortMetric,
    descending: bool,
    stats: &IndexMap<GroupId, GroupStats>,
) -> Vec<&'a Group> {
    let key = |g: &Group| -> f64 {
        let s = stats.get(&g.id);
        match metric {
            SortMetric::Size => s.map(|s| s.size).unwrap_or(g.len()) as f64,
            SortMetric::InCentrality => s.map(|s| s.mean_in_degree).unwrap_or(0.0),
            SortMetric::OutCentrality => s.map(|s| s.mean_out_degree).unwrap_or(0.0),
            SortMetric::Density => s.map(|s| s.density).unwrap_or(0.0),
            SortMetric::Id => g.id as f64,
        }
    };

    let mut out = groups.to_vec();
    out.sort_by(|a, b| {
        let primary = if metric == SortMetric::Id {
            a.id.cmp(&b.id)
        } else {
            key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal)
        };
        let primary = if descending {
            primary.reverse()
        } else {
            primary
        };
        primary.then(a.id.cmp(&b.id))
    });
    out
}
