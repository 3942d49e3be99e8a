use std::collections::HashSet;

use diesel::{connection::LoadConnection, prelude::*, sqlite::Sqlite};
use itertools::Itertools;

use crate::schema::tournament_appearances;

/// The set of manager pairs one evaluator has already seen grouped together
/// in a tournament. Scoped to a single (tournament, evaluator) pair: the same
/// two managers may be re-grouped under a different evaluator.
pub struct PairHistory(HashSet<(String, String)>);

impl PairHistory {
    /// Builds the predicate from every appearance strictly before
    /// `before_round`. The round currently being scheduled contributes
    /// nothing to its own constraint.
    #[tracing::instrument(skip(conn))]
    pub fn fetch(
        tournament_id: &str,
        evaluator_id: &str,
        before_round: i64,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> Result<Self, diesel::result::Error> {
        let rows = tournament_appearances::table
            .filter(
                tournament_appearances::tournament_id
                    .eq(tournament_id)
                    .and(tournament_appearances::evaluator_id.eq(evaluator_id))
                    .and(
                        tournament_appearances::round_index.lt(before_round),
                    ),
            )
            .order((
                tournament_appearances::round_index.asc(),
                tournament_appearances::group_index.asc(),
                tournament_appearances::manager_id.asc(),
            ))
            .select((
                tournament_appearances::round_index,
                tournament_appearances::group_index,
                tournament_appearances::manager_id,
            ))
            .load::<(i64, i64, String)>(conn)?;

        let mut pairs = HashSet::new();
        for (_, members) in
            &rows.into_iter().chunk_by(|(round, group, _)| (*round, *group))
        {
            let members =
                members.map(|(_, _, manager)| manager).collect::<Vec<_>>();

            for (i, a) in members.iter().enumerate() {
                for b in &members[i + 1..] {
                    pairs.insert(Self::key(a, b));
                }
            }
        }

        Ok(PairHistory(pairs))
    }

    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        PairHistory(pairs.into_iter().map(|(a, b)| Self::key(a, b)).collect())
    }

    /// Symmetric: `together(a, b) == together(b, a)`.
    pub fn together(&self, a: &str, b: &str) -> bool {
        self.0.contains(&Self::key(a, b))
    }

    fn key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PairHistory;

    #[test]
    fn predicate_is_symmetric() {
        let history = PairHistory::from_pairs([("b", "a"), ("c", "d")]);

        for (x, y) in [("a", "b"), ("c", "d"), ("a", "c"), ("b", "d")] {
            assert_eq!(history.together(x, y), history.together(y, x));
        }
        assert!(history.together("a", "b"));
        assert!(!history.together("a", "c"));
    }
}
