use axum::{Json, extract::Path};
use diesel::{
    Connection,
    connection::LoadConnection,
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
    sqlite::Sqlite,
};
use indexmap::IndexMap;
use rand::{SeedableRng, seq::SliceRandom};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    schema::tournament_appearances,
    state::Conn,
    tournaments::{
        Tournament, evaluators::Evaluator, groups::history::PairHistory,
        managers::Manager, standings::Standings,
    },
    util_resp::{ApiError, JsonResult, bad_request, err_not_found},
};

pub mod history;
pub mod swiss;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub group_index: i64,
    pub member_ids: Vec<String>,
}

#[derive(Serialize)]
pub struct GroupsResponse {
    pub groups: Vec<Group>,
}

pub async fn schedule_groups(
    Path((tournament_id, evaluator_id, round_index)): Path<(
        String,
        String,
        i64,
    )>,
    mut conn: Conn,
) -> JsonResult<GroupsResponse> {
    let tournament = Tournament::fetch(&tournament_id, &mut *conn)?;
    let evaluator = Evaluator::fetch(&evaluator_id, &mut *conn)?;
    if !tournament.has_round(round_index) {
        return Err(err_not_found());
    }

    let groups =
        schedule_round_groups(&tournament, &evaluator.id, round_index, &mut *conn)?;

    Ok(Json(GroupsResponse { groups }))
}

/// Returns the round's groups for one evaluator, computing and persisting
/// them on first access.
///
/// Once a round's partition exists it is never recomputed: round 0's ordering
/// is randomized and later rounds depend on mutable standings, so only the
/// persisted appearance rows are authoritative. Every call (including the one
/// that computed the partition) serves the persisted form, read back ordered
/// by group index and manager id.
#[tracing::instrument(skip(tournament, conn), fields(tournament_id = %tournament.id))]
pub fn schedule_round_groups(
    tournament: &Tournament,
    evaluator_id: &str,
    round_index: i64,
    conn: &mut (impl Connection<Backend = Sqlite> + LoadConnection),
) -> Result<Vec<Group>, ApiError> {
    if let Some(groups) =
        read_persisted_groups(&tournament.id, evaluator_id, round_index, conn)?
    {
        return Ok(groups);
    }

    let ordered = seed_ordering(tournament, evaluator_id, round_index, conn)?;
    if ordered.is_empty() {
        return Err(bad_request("there are no managers to schedule"));
    }

    let history =
        PairHistory::fetch(&tournament.id, evaluator_id, round_index, conn)?;
    let computed =
        swiss::make_groups(&ordered, tournament.group_size as usize, &history);

    if !persist_groups(&tournament.id, evaluator_id, round_index, &computed, conn)? {
        tracing::debug!(
            evaluator_id,
            round_index,
            "lost the scheduling race, serving the winner's partition"
        );
    }

    read_persisted_groups(&tournament.id, evaluator_id, round_index, conn)?
        .ok_or_else(|| {
            ApiError::Persistence(
                "appearances missing after being written".to_string(),
            )
        })
}

/// The ordering fed to the partitioner. Round 0 is an unconstrained random
/// permutation; later rounds follow the evaluator's own running standings so
/// that similarly-performing managers meet each other.
fn seed_ordering(
    tournament: &Tournament,
    evaluator_id: &str,
    round_index: i64,
    conn: &mut impl LoadConnection<Backend = Sqlite>,
) -> Result<Vec<String>, ApiError> {
    if round_index == 0 {
        let mut ids = Manager::all_ids(conn)?;
        let mut rng = rand_chacha::ChaCha20Rng::from_os_rng();
        ids.shuffle(&mut rng);
        Ok(ids)
    } else {
        Ok(Standings::fetch(&tournament.id, evaluator_id, conn)?
            .entries
            .into_iter()
            .map(|entry| entry.manager_id)
            .collect())
    }
}

fn read_persisted_groups(
    tournament_id: &str,
    evaluator_id: &str,
    round_index: i64,
    conn: &mut impl LoadConnection<Backend = Sqlite>,
) -> Result<Option<Vec<Group>>, ApiError> {
    let rows = tournament_appearances::table
        .filter(
            tournament_appearances::tournament_id
                .eq(tournament_id)
                .and(tournament_appearances::evaluator_id.eq(evaluator_id))
                .and(tournament_appearances::round_index.eq(round_index)),
        )
        .order((
            tournament_appearances::group_index.asc(),
            tournament_appearances::manager_id.asc(),
        ))
        .select((
            tournament_appearances::group_index,
            tournament_appearances::manager_id,
        ))
        .load::<(i64, String)>(conn)?;

    if rows.is_empty() {
        return Ok(None);
    }

    let mut by_group: IndexMap<i64, Vec<String>> = IndexMap::new();
    for (group_index, manager_id) in rows {
        by_group.entry(group_index).or_default().push(manager_id);
    }

    Ok(Some(
        by_group
            .into_iter()
            .map(|(group_index, member_ids)| Group {
                group_index,
                member_ids,
            })
            .collect(),
    ))
}

/// Writes the computed partition. Returns false when a concurrent writer got
/// there first (the unique constraint on appearance rows rejects the second
/// partition wholesale), in which case the caller must discard its result and
/// re-read.
fn persist_groups(
    tournament_id: &str,
    evaluator_id: &str,
    round_index: i64,
    groups: &[Vec<String>],
    conn: &mut (impl Connection<Backend = Sqlite> + LoadConnection),
) -> Result<bool, ApiError> {
    let result = conn.transaction(|conn| -> Result<(), DieselError> {
        for (group_index, members) in groups.iter().enumerate() {
            for member in members {
                diesel::insert_into(tournament_appearances::table)
                    .values((
                        tournament_appearances::id
                            .eq(Uuid::now_v7().to_string()),
                        tournament_appearances::tournament_id.eq(tournament_id),
                        tournament_appearances::evaluator_id.eq(evaluator_id),
                        tournament_appearances::round_index.eq(round_index),
                        tournament_appearances::group_index
                            .eq(group_index as i64),
                        tournament_appearances::manager_id.eq(member),
                    ))
                    .execute(conn)?;
            }
        }
        Ok(())
    });

    match result {
        Ok(()) => Ok(true),
        Err(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            _,
        )) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
