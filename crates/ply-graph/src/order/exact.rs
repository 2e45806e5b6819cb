use super::MAX_EXACT_GROUPS;
use super::matrix::{ConnectionMatrix, stress};

/// Evaluates every permutation of `base` (lexicographically, starting from `base` itself) and
/// returns the first one with minimal stress.
///
/// Panics when `base` is longer than [`MAX_EXACT_GROUPS`]; callers route larger inputs to the
/// greedy path.
pub fn best_permutation(base: &[usize], matrix: &ConnectionMatrix) -> Vec<usize> {
    let n = base.len();
    assert!(
        n <= MAX_EXACT_GROUPS,
        "exhaustive ordering requested for {n} groups (ceiling is {MAX_EXACT_GROUPS})"
    );

    let mut perm = (0..n).collect::<Vec<_>>();
    let mut candidate = base.to_vec();
    let mut best = base.to_vec();
    let mut best_stress = stress(&best, matrix);

    while next_permutation(&mut perm) {
        for (slot, &k) in candidate.iter_mut().zip(perm.iter()) {
            *slot = base[k];
        }
        let s = stress(&candidate, matrix);
        if s < best_stress {
            best_stress = s;
            best.copy_from_slice(&candidate);
        }
    }
    best
}

/// Advances `perm` to the next lexicographic permutation. Returns `false` after the last one.
fn next_permutation(perm: &mut [usize]) -> bool {
    let n = perm.len();
    if n < 2 {
        return false;
    }
    let mut i = n - 1;
    while i > 0 && perm[i - 1] >= perm[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = n - 1;
    while perm[j] <= perm[i - 1] {
        j -= 1;
    }
    perm.swap(i - 1, j);
    perm[i..].reverse();
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_permutation_visits_all_orderings() {
        let mut perm = vec![0, 1, 2, 3];
        let mut count = 1;
        while next_permutation(&mut perm) {
            count += 1;
        }
        assert_eq!(count, 24);
        assert_eq!(perm, vec![3, 2, 1, 0]);
    }

    #[test]
    #[should_panic(expected = "exhaustive ordering")]
    fn refuses_inputs_above_ceiling() {
        let base = (0..MAX_EXACT_GROUPS + 1).collect::<Vec<_>>();
        let matrix = ConnectionMatrix::new(base.len());
        let _ = best_permutation(&base, &matrix);
    }
}
