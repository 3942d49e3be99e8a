use std::collections::HashMap;

use axum::{Json, extract::Path};
use diesel::{connection::LoadConnection, prelude::*, sqlite::Sqlite};
use serde::Serialize;

use crate::{
    schema::tournament_round_scores,
    state::Conn,
    tournaments::{
        Tournament,
        evaluators::Evaluator,
        managers::Manager,
        standings::aggregate::{Aggregate, AggregateEntry},
    },
    util_resp::{ApiError, JsonResult},
};

pub mod aggregate;

#[derive(Serialize, Clone, Debug)]
pub struct StandingsEntry {
    pub manager_id: String,
    pub name: String,
    pub points: i64,
    pub wins: i64,
    pub losses: i64,
    pub top1_count: i64,
    pub top2_count: i64,
    pub bottom1_count: i64,
}

/// One evaluator's running totals over a tournament, ranked. Every manager
/// appears, scored or not; this is also the ordering that seeds rounds after
/// the first.
pub struct Standings {
    pub entries: Vec<StandingsEntry>,
}

#[derive(Clone, Copy, Default)]
struct Totals {
    points: i64,
    wins: i64,
    losses: i64,
    top1: i64,
    top2: i64,
    bottom1: i64,
}

impl Standings {
    #[tracing::instrument(skip(conn))]
    pub fn fetch(
        tournament_id: &str,
        evaluator_id: &str,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> Result<Self, ApiError> {
        let rows = tournament_round_scores::table
            .filter(
                tournament_round_scores::tournament_id
                    .eq(tournament_id)
                    .and(
                        tournament_round_scores::evaluator_id.eq(evaluator_id),
                    ),
            )
            .select((
                tournament_round_scores::manager_id,
                tournament_round_scores::points,
                tournament_round_scores::wins,
                tournament_round_scores::losses,
                tournament_round_scores::top1_count,
                tournament_round_scores::top2_count,
                tournament_round_scores::bottom1_count,
            ))
            .load::<(String, i64, i64, i64, i64, i64, i64)>(conn)?;

        let mut totals: HashMap<String, Totals> = HashMap::new();
        for (manager_id, points, wins, losses, top1, top2, bottom1) in rows {
            let entry = totals.entry(manager_id).or_default();
            entry.points += points;
            entry.wins += wins;
            entry.losses += losses;
            entry.top1 += top1;
            entry.top2 += top2;
            entry.bottom1 += bottom1;
        }

        let mut entries: Vec<StandingsEntry> = Manager::all(conn)?
            .into_iter()
            .map(|manager| {
                let t = totals.get(&manager.id).copied().unwrap_or_default();
                StandingsEntry {
                    manager_id: manager.id,
                    name: manager.name,
                    points: t.points,
                    wins: t.wins,
                    losses: t.losses,
                    top1_count: t.top1,
                    top2_count: t.top2,
                    bottom1_count: t.bottom1,
                }
            })
            .collect();

        // points desc, wins desc, losses asc; manager id keeps ties stable
        entries.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then(b.wins.cmp(&a.wins))
                .then(a.losses.cmp(&b.losses))
                .then(a.manager_id.cmp(&b.manager_id))
        });

        Ok(Standings { entries })
    }
}

#[derive(Serialize)]
pub struct StandingsResponse {
    pub items: Vec<StandingsEntry>,
}

pub async fn evaluator_standings(
    Path((tournament_id, evaluator_id)): Path<(String, String)>,
    mut conn: Conn,
) -> JsonResult<StandingsResponse> {
    let tournament = Tournament::fetch(&tournament_id, &mut *conn)?;
    let evaluator = Evaluator::fetch(&evaluator_id, &mut *conn)?;

    let standings = Standings::fetch(&tournament.id, &evaluator.id, &mut *conn)?;

    Ok(Json(StandingsResponse {
        items: standings.entries,
    }))
}

#[derive(Serialize)]
pub struct EvaluatorScores {
    pub evaluator_id: String,
    pub evaluator_name: String,
    pub items: Vec<StandingsEntry>,
}

#[derive(Serialize)]
pub struct ScoresResponse {
    pub per_evaluator: Vec<EvaluatorScores>,
    pub aggregate: Vec<AggregateEntry>,
}

/// Every evaluator's standings side by side with the tournament aggregate,
/// for the results view.
pub async fn tournament_scores(
    Path(tournament_id): Path<String>,
    mut conn: Conn,
) -> JsonResult<ScoresResponse> {
    let tournament = Tournament::fetch(&tournament_id, &mut *conn)?;

    let mut per_evaluator = Vec::new();
    for evaluator in Evaluator::all(&mut *conn)? {
        let standings =
            Standings::fetch(&tournament.id, &evaluator.id, &mut *conn)?;
        per_evaluator.push(EvaluatorScores {
            evaluator_id: evaluator.id,
            evaluator_name: evaluator.name,
            items: standings.entries,
        });
    }

    let aggregate = Aggregate::fetch(&tournament.id, &mut *conn)?;

    Ok(Json(ScoresResponse {
        per_evaluator,
        aggregate: aggregate.entries,
    }))
}
