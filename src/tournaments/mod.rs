use axum::Json;
use diesel::{connection::LoadConnection, prelude::*, sqlite::Sqlite};
use serde::{Deserialize, Serialize};

use crate::{
    schema::tournaments,
    state::Conn,
    util_resp::{ApiError, JsonResult, err_not_found},
};

pub mod evaluators;
pub mod export;
pub mod groups;
pub mod managers;
pub mod picks;
pub mod standings;

#[derive(Serialize, Deserialize, Queryable, Clone, Debug)]
pub struct Tournament {
    pub id: String,
    pub title: String,
    /// Number of rounds each evaluator plays. Fixed at creation.
    pub rounds: i64,
    /// Target group size. Fixed at creation.
    pub group_size: i64,
    pub created_at: chrono::NaiveDateTime,
}

impl Tournament {
    #[tracing::instrument(skip(conn))]
    pub fn fetch(
        tournament_id: &str,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> Result<Tournament, ApiError> {
        tournaments::table
            .filter(tournaments::id.eq(tournament_id))
            .first::<Tournament>(conn)
            .optional()?
            .ok_or_else(err_not_found)
    }

    pub fn latest(
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> Result<Option<Tournament>, ApiError> {
        Ok(tournaments::table
            .order((tournaments::created_at.desc(), tournaments::id.desc()))
            .first::<Tournament>(conn)
            .optional()?)
    }

    /// True iff `round_index` addresses one of this tournament's rounds.
    pub fn has_round(&self, round_index: i64) -> bool {
        (0..self.rounds).contains(&round_index)
    }
}

pub async fn latest_tournament(mut conn: Conn) -> JsonResult<Tournament> {
    Tournament::latest(&mut *conn)?
        .map(Json)
        .ok_or_else(err_not_found)
}
