//! Group ordering around a ring.
//!
//! Groups are placed on a circle (or a row treated as one); the optimizer picks the ordering that
//! keeps heavily connected groups next to each other. Small group counts are searched
//! exhaustively, larger ones use greedy insertion.

mod exact;
mod greedy;
mod matrix;

pub use exact::best_permutation;
pub use greedy::greedy_order;
pub use matrix::{ConnectionMatrix, circular_distance, stress};

use crate::error::{Error, Result};
use crate::group::Group;
use crate::model::{Entity, GroupId, Relation};

/// Hard ceiling for the exhaustive search (7! = 5040 orderings).
pub const MAX_EXACT_GROUPS: usize = 7;
/// Group counts up to this value are searched exhaustively by default.
pub const DEFAULT_EXACT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderOptimizer {
    exact_limit: usize,
}

impl Default for OrderOptimizer {
    fn default() -> Self {
        Self {
            exact_limit: DEFAULT_EXACT_LIMIT,
        }
    }
}

impl OrderOptimizer {
    /// Fails when `exact_limit` exceeds [`MAX_EXACT_GROUPS`].
    pub fn new(exact_limit: usize) -> Result<Self> {
        if exact_limit > MAX_EXACT_GROUPS {
            return Err(Error::ExactLimitTooLarge { limit: exact_limit });
        }
        Ok(Self { exact_limit })
    }

    pub fn exact_limit(&self) -> usize {
        self.exact_limit
    }

    /// Orders `groups` so that connected groups sit close on the ring.
    ///
    /// The result is always a permutation of the input ids. With two groups or fewer, or when no
    /// relation crosses between two of the groups, the input order is returned unchanged.
    pub fn optimize_order(
        &self,
        groups: &[&Group],
        entities: &[Entity],
        relations: &[Relation],
    ) -> Vec<GroupId> {
        let ids = groups.iter().map(|g| g.id).collect::<Vec<_>>();
        if groups.len() <= 2 || relations.is_empty() {
            return ids;
        }

        let matrix = ConnectionMatrix::from_groups(groups, entities, relations);
        if matrix.total_weight() == 0.0 {
            return ids;
        }
        let sizes = groups.iter().map(|g| g.len()).collect::<Vec<_>>();
        let order = self.optimize_matrix(&sizes, &matrix);

        tracing::trace!(
            groups = groups.len(),
            stress = stress(&order, &matrix),
            "optimized group order"
        );

        order.into_iter().map(|pos| ids[pos]).collect()
    }

    /// Orders group positions `0..sizes.len()` against a precomputed connection matrix.
    pub fn optimize_matrix(&self, sizes: &[usize], matrix: &ConnectionMatrix) -> Vec<usize> {
        let n = sizes.len().min(matrix.len());
        let mut base = (0..n).collect::<Vec<_>>();
        base.sort_by(|&a, &b| sizes[b].cmp(&sizes[a]));

        if n <= 2 {
            return base;
        }
        if n <= self.exact_limit {
            best_permutation(&base, matrix)
        } else {
            greedy_order(&base, matrix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_exact_limit_above_ceiling() {
        assert!(OrderOptimizer::new(MAX_EXACT_GROUPS).is_ok());
        assert!(matches!(
            OrderOptimizer::new(MAX_EXACT_GROUPS + 1),
            Err(Error::ExactLimitTooLarge { limit: 8 })
        ));
    }

    #[test]
    fn optimize_matrix_defaults_to_size_order_without_connections() {
        let matrix = ConnectionMatrix::new(4);
        let order = OrderOptimizer::default().optimize_matrix(&[1, 5, 3, 5], &matrix);
        assert_eq!(order, vec![1, 3, 2, 0]);
    }
}
