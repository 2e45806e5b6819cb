use crate::group::Group;
use crate::model::{Entity, Relation, index_by_id};

/// Symmetric inter-group connection counts, indexed by group position.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionMatrix {
    n: usize,
    cells: Vec<f64>,
}

impl ConnectionMatrix {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            cells: vec![0.0; n * n],
        }
    }

    /// Counts every relation whose endpoints fall in two different groups. Endpoints outside all
    /// groups are ignored.
    pub fn from_groups(groups: &[&Group], entities: &[Entity], relations: &[Relation]) -> Self {
        let mut matrix = Self::new(groups.len());
        let by_id = index_by_id(entities);

        let mut group_of: Vec<Option<usize>> = vec![None; entities.len()];
        for (pos, g) in groups.iter().enumerate() {
            for &m in &g.members {
                if let Some(slot) = group_of.get_mut(m) {
                    *slot = Some(pos);
                }
            }
        }

        for r in relations {
            let (Some(&s), Some(&t)) = (by_id.get(r.source.as_str()), by_id.get(r.target.as_str()))
            else {
                continue;
            };
            let (Some(a), Some(b)) = (group_of[s], group_of[t]) else {
                continue;
            };
            if a != b {
                matrix.connect(a, b, 1.0);
            }
        }
        matrix
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, a: usize, b: usize) -> f64 {
        if a >= self.n || b >= self.n {
            return 0.0;
        }
        self.cells[a * self.n + b]
    }

    /// Adds `weight` to both `[a][b]` and `[b][a]`.
    pub fn connect(&mut self, a: usize, b: usize, weight: f64) {
        if a >= self.n || b >= self.n || a == b {
            return;
        }
        self.cells[a * self.n + b] += weight;
        self.cells[b * self.n + a] += weight;
    }

    /// Sum of all inter-group weights, each pair counted once.
    pub fn total_weight(&self) -> f64 {
        self.cells.iter().sum::<f64>() / 2.0
    }

    /// Total connection weight between `a` and every group in `others`.
    pub fn weight_to(&self, a: usize, others: &[usize]) -> f64 {
        others.iter().map(|&b| self.get(a, b)).sum()
    }
}

/// Ring distance between slots `i` and `j` of an `n`-slot ordering.
pub fn circular_distance(i: usize, j: usize, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let d = i.abs_diff(j) % n;
    d.min(n - d)
}

/// `sum over i < j of matrix[order[i]][order[j]] * circular_distance(i, j, n)`.
pub fn stress(order: &[usize], matrix: &ConnectionMatrix) -> f64 {
    let n = order.len();
    let mut total = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            let w = matrix.get(order[i], order[j]);
            if w != 0.0 {
                total += w * circular_distance(i, j, n) as f64;
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circular_distance_wraps_around() {
        assert_eq!(circular_distance(0, 1, 6), 1);
        assert_eq!(circular_distance(0, 5, 6), 1);
        assert_eq!(circular_distance(1, 4, 6), 3);
        assert_eq!(circular_distance(4, 1, 6), 3);
        assert_eq!(circular_distance(0, 0, 0), 0);
    }

    #[test]
    fn connect_is_symmetric_and_ignores_diagonal() {
        let mut m = ConnectionMatrix::new(3);
        m.connect(0, 2, 2.0);
        m.connect(1, 1, 5.0);
        assert_eq!(m.get(0, 2), 2.0);
        assert_eq!(m.get(2, 0), 2.0);
        assert_eq!(m.get(1, 1), 0.0);
        assert_eq!(m.get(7, 0), 0.0);
        assert_eq!(m.total_weight(), 2.0);
    }

    #[test]
    fn stress_weights_by_ring_distance() {
        let mut m = ConnectionMatrix::new(4);
        m.connect(0, 2, 3.0);
        // Slots 0 and 1 are adjacent.
        assert_eq!(stress(&[0, 2, 1, 3], &m), 3.0);
        // Slots 0 and 2 are opposite on a 4-ring.
        assert_eq!(stress(&[0, 1, 2, 3], &m), 6.0);
    }
}
