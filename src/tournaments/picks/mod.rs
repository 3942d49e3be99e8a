use axum::{Json, extract::Path};
use chrono::Utc;
use diesel::{
    Connection,
    connection::LoadConnection,
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
    sqlite::Sqlite,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    schema::{tournament_appearances, tournament_picks, tournament_round_scores},
    state::Conn,
    tournaments::{Tournament, evaluators::Evaluator, picks::scoring::score_pick},
    util_resp::{ApiError, JsonResult, bad_request, err_not_found},
};

pub mod scoring;

#[derive(Deserialize, Clone, Debug)]
pub struct PickForm {
    pub top1: String,
    pub top2: String,
    pub bottom1: String,
    /// How long the evaluator looked at the group before deciding.
    pub latency_ms: Option<i64>,
}

#[derive(Serialize)]
pub struct PickResponse {
    pub ok: bool,
}

pub async fn submit_pick(
    Path((tournament_id, evaluator_id, round_index, group_index)): Path<(
        String,
        String,
        i64,
        i64,
    )>,
    mut conn: Conn,
    Json(form): Json<PickForm>,
) -> JsonResult<PickResponse> {
    let tournament = Tournament::fetch(&tournament_id, &mut *conn)?;
    let evaluator = Evaluator::fetch(&evaluator_id, &mut *conn)?;
    if !tournament.has_round(round_index) {
        return Err(err_not_found());
    }

    record_pick(&tournament, &evaluator.id, round_index, group_index, &form, &mut *conn)?;

    Ok(Json(PickResponse { ok: true }))
}

/// Validates and persists one pick, then upserts the scored deltas for every
/// member of the group.
///
/// The pick insert and the score upserts share one transaction; the unique
/// constraint on pick rows is what rejects a duplicate submission, so two
/// concurrent submitters cannot both get their scores in.
#[tracing::instrument(skip(tournament, form, conn), fields(tournament_id = %tournament.id))]
pub fn record_pick(
    tournament: &Tournament,
    evaluator_id: &str,
    round_index: i64,
    group_index: i64,
    form: &PickForm,
    conn: &mut (impl Connection<Backend = Sqlite> + LoadConnection),
) -> Result<(), ApiError> {
    if form.top1 == form.top2
        || form.top1 == form.bottom1
        || form.top2 == form.bottom1
    {
        return Err(bad_request(
            "top1, top2 and bottom1 must be three different managers",
        ));
    }

    let members = tournament_appearances::table
        .filter(
            tournament_appearances::tournament_id
                .eq(&tournament.id)
                .and(tournament_appearances::evaluator_id.eq(evaluator_id))
                .and(tournament_appearances::round_index.eq(round_index))
                .and(tournament_appearances::group_index.eq(group_index)),
        )
        .order(tournament_appearances::manager_id.asc())
        .select(tournament_appearances::manager_id)
        .load::<String>(conn)?;

    if members.is_empty() {
        return Err(err_not_found());
    }

    for pick in [&form.top1, &form.top2, &form.bottom1] {
        if !members.contains(pick) {
            return Err(bad_request(
                "all picks must be members of the target group",
            ));
        }
    }

    let deltas = score_pick(&form.top1, &form.top2, &form.bottom1, &members);

    conn.transaction(|conn| -> Result<(), ApiError> {
        let inserted = diesel::insert_into(tournament_picks::table)
            .values((
                tournament_picks::id.eq(Uuid::now_v7().to_string()),
                tournament_picks::tournament_id.eq(&tournament.id),
                tournament_picks::evaluator_id.eq(evaluator_id),
                tournament_picks::round_index.eq(round_index),
                tournament_picks::group_index.eq(group_index),
                tournament_picks::top1.eq(&form.top1),
                tournament_picks::top2.eq(&form.top2),
                tournament_picks::bottom1.eq(&form.bottom1),
                tournament_picks::decided_at.eq(Utc::now().naive_utc()),
                tournament_picks::latency_ms.eq(form.latency_ms),
            ))
            .execute(conn);

        match inserted {
            Ok(_) => {}
            Err(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                _,
            )) => return Err(ApiError::DuplicateSubmission),
            Err(e) => return Err(e.into()),
        }

        for (manager_id, delta) in &deltas {
            diesel::insert_into(tournament_round_scores::table)
                .values((
                    tournament_round_scores::tournament_id.eq(&tournament.id),
                    tournament_round_scores::evaluator_id.eq(evaluator_id),
                    tournament_round_scores::manager_id.eq(manager_id),
                    tournament_round_scores::round_index.eq(round_index),
                    tournament_round_scores::points.eq(delta.points),
                    tournament_round_scores::wins.eq(delta.wins),
                    tournament_round_scores::losses.eq(delta.losses),
                    tournament_round_scores::top1_count
                        .eq(delta.is_top1 as i64),
                    tournament_round_scores::top2_count
                        .eq(delta.is_top2 as i64),
                    tournament_round_scores::bottom1_count
                        .eq(delta.is_bottom1 as i64),
                ))
                .on_conflict((
                    tournament_round_scores::tournament_id,
                    tournament_round_scores::evaluator_id,
                    tournament_round_scores::manager_id,
                    tournament_round_scores::round_index,
                ))
                .do_update()
                .set((
                    tournament_round_scores::points.eq(delta.points),
                    tournament_round_scores::wins.eq(delta.wins),
                    tournament_round_scores::losses.eq(delta.losses),
                    tournament_round_scores::top1_count
                        .eq(delta.is_top1 as i64),
                    tournament_round_scores::top2_count
                        .eq(delta.is_top2 as i64),
                    tournament_round_scores::bottom1_count
                        .eq(delta.is_bottom1 as i64),
                ))
                .execute(conn)?;
        }

        Ok(())
    })
}
