//! Partitions an ordered manager list into fixed-size groups and repairs
//! pairings the evaluator has already seen.
//!
//! The repair pass is a best-effort local search, not a global optimizer: a
//! group whose conflicts cannot be fixed by a single swap with a neighbour is
//! left as-is.

use crate::tournaments::groups::history::PairHistory;

/// Slices `ordered` into consecutive groups of `group_size` (the final group
/// holds the remainder), then walks the groups in order trying to repair any
/// group with an internal pair the history forbids.
///
/// Repair of group `i` tries neighbour `i - 1`, then `i + 1`. Candidate
/// member pairs are enumerated in ascending index order within each group;
/// a swap is kept iff it leaves both groups fully valid, and the first kept
/// swap ends the repair of that group. The enumeration order is part of the
/// contract: identical inputs produce identical output.
pub fn make_groups(
    ordered: &[String],
    group_size: usize,
    history: &PairHistory,
) -> Vec<Vec<String>> {
    let mut groups: Vec<Vec<String>> = ordered
        .chunks(group_size)
        .map(|chunk| chunk.to_vec())
        .collect();

    for i in 0..groups.len() {
        if group_is_valid(&groups[i], history) {
            continue;
        }

        for j in [i.checked_sub(1), Some(i + 1)].into_iter().flatten() {
            if j >= groups.len() {
                continue;
            }
            if try_local_swap(&mut groups, i, j, history) {
                break;
            }
        }
    }

    groups
}

/// A group is valid when no internal pair has been grouped before.
pub fn group_is_valid(group: &[String], history: &PairHistory) -> bool {
    for (i, a) in group.iter().enumerate() {
        for b in &group[i + 1..] {
            if history.together(a, b) {
                return false;
            }
        }
    }
    true
}

/// Number of forbidden pairs across the whole partition.
pub fn count_violating_pairs(
    groups: &[Vec<String>],
    history: &PairHistory,
) -> usize {
    groups
        .iter()
        .map(|group| {
            group
                .iter()
                .enumerate()
                .map(|(i, a)| {
                    group[i + 1..]
                        .iter()
                        .filter(|b| history.together(a, b))
                        .count()
                })
                .sum::<usize>()
        })
        .sum()
}

fn try_local_swap(
    groups: &mut [Vec<String>],
    i: usize,
    j: usize,
    history: &PairHistory,
) -> bool {
    for ai in 0..groups[i].len() {
        for bj in 0..groups[j].len() {
            let a = groups[i][ai].clone();
            groups[i][ai] = groups[j][bj].clone();
            groups[j][bj] = a;

            if group_is_valid(&groups[i], history)
                && group_is_valid(&groups[j], history)
            {
                return true;
            }

            let a = groups[i][ai].clone();
            groups[i][ai] = groups[j][bj].clone();
            groups[j][bj] = a;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::{count_violating_pairs, make_groups};
    use crate::tournaments::groups::history::PairHistory;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn partitions_into_chunks_with_remainder() {
        let history = PairHistory::from_pairs([]);

        let groups = make_groups(&ids(&["a", "b", "c", "d", "e", "f", "g"]), 3, &history);
        assert_eq!(
            groups.iter().map(Vec::len).collect::<Vec<_>>(),
            vec![3, 3, 1]
        );

        let groups = make_groups(&ids(&["a", "b", "c", "d", "e", "f"]), 3, &history);
        assert_eq!(
            groups.iter().map(Vec::len).collect::<Vec<_>>(),
            vec![3, 3]
        );
    }

    #[test]
    fn covers_every_manager_exactly_once() {
        let input = ids(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        let history = PairHistory::from_pairs([("a", "b"), ("c", "d")]);

        let groups = make_groups(&input, 3, &history);

        let mut flattened: Vec<String> =
            groups.iter().flatten().cloned().collect();
        flattened.sort();
        let mut expected = input.clone();
        expected.sort();
        assert_eq!(flattened, expected);
    }

    #[test]
    fn repairs_a_single_conflict_deterministically() {
        let history = PairHistory::from_pairs([("a", "b")]);

        let groups =
            make_groups(&ids(&["a", "b", "c", "d", "e", "f"]), 3, &history);

        // The first candidate swap (a <-> d) already validates both groups,
        // so it must be the one taken.
        assert_eq!(
            groups,
            vec![ids(&["d", "b", "c"]), ids(&["a", "e", "f"])]
        );
        assert_eq!(count_violating_pairs(&groups, &history), 0);
    }

    #[test]
    fn identical_inputs_yield_identical_outputs() {
        let history =
            PairHistory::from_pairs([("a", "b"), ("d", "e"), ("c", "f")]);
        let input = ids(&["a", "b", "c", "d", "e", "f", "g", "h", "i"]);

        let first = make_groups(&input, 3, &history);
        let second = make_groups(&input, 3, &history);
        assert_eq!(first, second);
    }

    #[test]
    fn unfixable_conflicts_are_left_in_place() {
        // Both naive groups are internally conflicted beyond what one swap
        // can repair; the partition must come back unchanged rather than
        // degraded.
        let history = PairHistory::from_pairs([
            ("a", "b"),
            ("a", "c"),
            ("b", "c"),
            ("d", "e"),
            ("d", "f"),
            ("e", "f"),
        ]);
        let input = ids(&["a", "b", "c", "d", "e", "f"]);

        let naive_violations = 6;
        let groups = make_groups(&input, 3, &history);

        assert_eq!(groups, vec![ids(&["a", "b", "c"]), ids(&["d", "e", "f"])]);
        assert!(
            count_violating_pairs(&groups, &history) <= naive_violations
        );
    }

    #[test]
    fn repair_never_increases_violations() {
        let history = PairHistory::from_pairs([
            ("a", "b"),
            ("c", "d"),
            ("e", "f"),
            ("g", "h"),
        ]);
        let input = ids(&["a", "b", "c", "d", "e", "f", "g", "h"]);

        let naive: Vec<Vec<String>> =
            input.chunks(4).map(|chunk| chunk.to_vec()).collect();
        let repaired = make_groups(&input, 4, &history);

        assert!(
            count_violating_pairs(&repaired, &history)
                <= count_violating_pairs(&naive, &history)
        );
    }
}
