use super::matrix::ConnectionMatrix;

/// Greedy insertion: start from `base[0]`, then repeatedly append the unplaced group with the
/// largest total connection weight to the groups already placed. Ties go to the earliest entry
/// of `base`.
pub fn greedy_order(base: &[usize], matrix: &ConnectionMatrix) -> Vec<usize> {
    let Some((&first, rest)) = base.split_first() else {
        return Vec::new();
    };

    let mut placed = Vec::with_capacity(base.len());
    placed.push(first);
    let mut remaining = rest.to_vec();

    // Running weight of each remaining group to the placed set.
    let mut affinity = remaining
        .iter()
        .map(|&g| matrix.get(g, first))
        .collect::<Vec<_>>();

    while !remaining.is_empty() {
        let mut best = 0usize;
        for i in 1..remaining.len() {
            if affinity[i] > affinity[best] {
                best = i;
            }
        }
        let chosen = remaining.remove(best);
        affinity.remove(best);
        placed.push(chosen);
        for (g, w) in remaining.iter().zip(affinity.iter_mut()) {
            *w += matrix.get(*g, chosen);
        }
    }

    placed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_strongest_connection_to_placed_set() {
        let mut m = ConnectionMatrix::new(4);
        m.connect(0, 3, 4.0);
        m.connect(3, 1, 2.0);
        m.connect(0, 2, 1.0);
        assert_eq!(greedy_order(&[0, 1, 2, 3], &m), vec![0, 3, 1, 2]);
    }

    #[test]
    fn ties_keep_base_order() {
        let m = ConnectionMatrix::new(3);
        assert_eq!(greedy_order(&[2, 0, 1], &m), vec![2, 0, 1]);
        assert!(greedy_order(&[], &m).is_empty());
    }
}
