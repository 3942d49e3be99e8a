//! Converts one evaluator's decision for one group into per-manager deltas.
//!
//! The decision top1 > top2 > middle > bottom1 is read as a round-robin
//! within the group, with the middle members mutually undecided. For a group
//! of size N:
//!
//! | role    | points | wins | losses |
//! |---------|--------|------|--------|
//! | top1    | +2     | N-1  | 0      |
//! | top2    | +1     | N-2  | 1      |
//! | middle  | 0      | 1    | 2      |
//! | bottom1 | -1     | 0    | N-1    |
//!
//! Wins and losses balance across the group (closed round-robin accounting).

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PickDelta {
    pub points: i64,
    pub wins: i64,
    pub losses: i64,
    pub is_top1: bool,
    pub is_top2: bool,
    pub is_bottom1: bool,
}

/// One delta per group member, in `member_ids` order. The caller has already
/// checked that the three picks are distinct members of the group.
pub fn score_pick(
    top1: &str,
    top2: &str,
    bottom1: &str,
    member_ids: &[String],
) -> Vec<(String, PickDelta)> {
    let n = member_ids.len() as i64;

    member_ids
        .iter()
        .map(|id| {
            let delta = if id == top1 {
                PickDelta {
                    points: 2,
                    wins: n - 1,
                    losses: 0,
                    is_top1: true,
                    ..Default::default()
                }
            } else if id == top2 {
                PickDelta {
                    points: 1,
                    wins: n - 2,
                    losses: 1,
                    is_top2: true,
                    ..Default::default()
                }
            } else if id == bottom1 {
                PickDelta {
                    points: -1,
                    wins: 0,
                    losses: n - 1,
                    is_bottom1: true,
                    ..Default::default()
                }
            } else {
                // middle: beats bottom1, loses to top1 and top2
                PickDelta {
                    points: 0,
                    wins: 1,
                    losses: 2,
                    ..Default::default()
                }
            };

            (id.clone(), delta)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::score_pick;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn five_member_group_scores_match_the_outcome_table() {
        let members = ids(&["a", "b", "c", "d", "e"]);
        let deltas = score_pick("a", "b", "e", &members);

        let of = |id: &str| {
            deltas
                .iter()
                .find(|(member, _)| member == id)
                .map(|(_, delta)| *delta)
                .unwrap()
        };

        assert_eq!((of("a").points, of("a").wins, of("a").losses), (2, 4, 0));
        assert_eq!((of("b").points, of("b").wins, of("b").losses), (1, 3, 1));
        assert_eq!((of("c").points, of("c").wins, of("c").losses), (0, 1, 2));
        assert_eq!((of("d").points, of("d").wins, of("d").losses), (0, 1, 2));
        assert_eq!((of("e").points, of("e").wins, of("e").losses), (-1, 0, 4));

        assert!(of("a").is_top1);
        assert!(of("b").is_top2);
        assert!(of("e").is_bottom1);
        assert!(!of("c").is_top1 && !of("c").is_top2 && !of("c").is_bottom1);
    }

    #[test]
    fn wins_and_losses_balance_for_any_group_size() {
        for size in 3..=8 {
            let members: Vec<String> =
                (0..size).map(|i| format!("m{i}")).collect();
            let deltas =
                score_pick("m0", "m1", &format!("m{}", size - 1), &members);

            let wins: i64 = deltas.iter().map(|(_, d)| d.wins).sum();
            let losses: i64 = deltas.iter().map(|(_, d)| d.losses).sum();
            assert_eq!(wins, losses, "unbalanced at group size {size}");
        }
    }

    #[test]
    fn every_member_gets_exactly_one_delta() {
        let members = ids(&["a", "b", "c", "d"]);
        let deltas = score_pick("b", "c", "d", &members);

        assert_eq!(deltas.len(), members.len());
        assert_eq!(
            deltas.iter().map(|(id, _)| id.clone()).collect::<Vec<_>>(),
            members
        );
    }
}
