//! The cross-evaluator tournament ranking.
//!
//! Each manager is reduced to one total-points figure per evaluator; the
//! final ranking uses the mean of those totals and their population standard
//! deviation ("stability" — low means the evaluators agree). Population
//! rather than sample deviation: it stays defined for a single evaluator and
//! never divides by zero.

use std::collections::HashMap;

use axum::{Json, extract::Path};
use diesel::{connection::LoadConnection, prelude::*, sqlite::Sqlite};
use serde::Serialize;

use crate::{
    schema::tournament_round_scores,
    state::Conn,
    tournaments::{Tournament, managers::Manager},
    util_resp::{ApiError, JsonResult},
};

/// Reserved tie-break block. Strength-of-schedule and head-to-head have no
/// defined computation anywhere in this system; they stay at zero.
#[derive(Serialize, Clone, Copy, Debug)]
pub struct TieBreak {
    pub sos: f64,
    pub h2h: f64,
    pub top1: i64,
    pub bottom1: i64,
}

#[derive(Serialize, Clone, Debug)]
pub struct AggregateEntry {
    pub manager_id: String,
    pub name: String,
    pub avg_points: f64,
    pub stability: f64,
    pub top1_total: i64,
    pub bottom1_total: i64,
    pub tiebreak: TieBreak,
}

pub struct Aggregate {
    pub entries: Vec<AggregateEntry>,
}

impl Aggregate {
    #[tracing::instrument(skip(conn))]
    pub fn fetch(
        tournament_id: &str,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> Result<Self, ApiError> {
        let rows = tournament_round_scores::table
            .filter(tournament_round_scores::tournament_id.eq(tournament_id))
            .select((
                tournament_round_scores::manager_id,
                tournament_round_scores::evaluator_id,
                tournament_round_scores::points,
                tournament_round_scores::top1_count,
                tournament_round_scores::bottom1_count,
            ))
            .load::<(String, String, i64, i64, i64)>(conn)?;

        let mut points_by_evaluator: HashMap<String, HashMap<String, i64>> =
            HashMap::new();
        let mut counts: HashMap<String, (i64, i64)> = HashMap::new();

        for (manager_id, evaluator_id, points, top1, bottom1) in rows {
            *points_by_evaluator
                .entry(manager_id.clone())
                .or_default()
                .entry(evaluator_id)
                .or_default() += points;

            let entry = counts.entry(manager_id).or_default();
            entry.0 += top1;
            entry.1 += bottom1;
        }

        let mut entries: Vec<AggregateEntry> = Manager::all(conn)?
            .into_iter()
            .map(|manager| {
                let totals: Vec<f64> = points_by_evaluator
                    .get(&manager.id)
                    .map(|per_evaluator| {
                        per_evaluator.values().map(|p| *p as f64).collect()
                    })
                    .unwrap_or_default();

                let (avg_points, stability) = mean_and_deviation(&totals);
                let (top1_total, bottom1_total) =
                    counts.get(&manager.id).copied().unwrap_or_default();

                AggregateEntry {
                    manager_id: manager.id,
                    name: manager.name,
                    avg_points,
                    stability,
                    top1_total,
                    bottom1_total,
                    tiebreak: TieBreak {
                        sos: 0.0,
                        h2h: 0.0,
                        top1: top1_total,
                        bottom1: bottom1_total,
                    },
                }
            })
            .collect();

        // avg desc, stability asc, top1 desc, bottom1 asc; manager id keeps
        // ties stable
        entries.sort_by(|a, b| {
            b.avg_points
                .total_cmp(&a.avg_points)
                .then(a.stability.total_cmp(&b.stability))
                .then(b.top1_total.cmp(&a.top1_total))
                .then(a.bottom1_total.cmp(&b.bottom1_total))
                .then(a.manager_id.cmp(&b.manager_id))
        });

        Ok(Aggregate { entries })
    }
}

/// Mean and population standard deviation; both zero for an empty slice, so a
/// manager no evaluator has scored yet ranks with (0, 0) rather than NaN.
fn mean_and_deviation(totals: &[f64]) -> (f64, f64) {
    if totals.is_empty() {
        return (0.0, 0.0);
    }

    let n = totals.len() as f64;
    let mean = totals.iter().sum::<f64>() / n;
    let variance =
        totals.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / n;

    (mean, variance.sqrt())
}

#[derive(Serialize)]
pub struct AggregateResponse {
    pub items: Vec<AggregateEntry>,
}

pub async fn tournament_aggregate(
    Path(tournament_id): Path<String>,
    mut conn: Conn,
) -> JsonResult<AggregateResponse> {
    let tournament = Tournament::fetch(&tournament_id, &mut *conn)?;
    let aggregate = Aggregate::fetch(&tournament.id, &mut *conn)?;

    Ok(Json(AggregateResponse {
        items: aggregate.entries,
    }))
}

#[cfg(test)]
mod tests {
    use super::mean_and_deviation;

    #[test]
    fn empty_totals_are_zero_not_nan() {
        assert_eq!(mean_and_deviation(&[]), (0.0, 0.0));
    }

    #[test]
    fn single_evaluator_has_zero_deviation() {
        assert_eq!(mean_and_deviation(&[7.0]), (7.0, 0.0));
    }

    #[test]
    fn population_deviation_divides_by_n() {
        // population convention: sqrt(((2-3)^2 + (4-3)^2) / 2) = 1
        let (mean, deviation) = mean_and_deviation(&[2.0, 4.0]);
        assert_eq!(mean, 3.0);
        assert_eq!(deviation, 1.0);
    }

    #[test]
    fn agreement_is_more_stable_than_polarization() {
        let (_, agreed) = mean_and_deviation(&[5.0, 5.0, 5.0]);
        let (_, split) = mean_and_deviation(&[9.0, 5.0, 1.0]);
        assert!(agreed < split);
    }
}
