use axum::Json;
use diesel::{connection::LoadConnection, prelude::*, sqlite::Sqlite};
use serde::{Deserialize, Serialize};

use crate::{
    schema::evaluators,
    state::Conn,
    util_resp::{ApiError, JsonResult, err_not_found},
};

/// A ranker. The roster is fixed and supplied at seed time.
#[derive(Serialize, Deserialize, Queryable, Clone, Debug)]
pub struct Evaluator {
    pub id: String,
    pub name: String,
    pub created_at: chrono::NaiveDateTime,
}

impl Evaluator {
    #[tracing::instrument(skip(conn))]
    pub fn fetch(
        evaluator_id: &str,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> Result<Evaluator, ApiError> {
        evaluators::table
            .filter(evaluators::id.eq(evaluator_id))
            .first::<Evaluator>(conn)
            .optional()?
            .ok_or_else(err_not_found)
    }

    pub fn all(
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> Result<Vec<Evaluator>, diesel::result::Error> {
        evaluators::table
            .order(evaluators::name.asc())
            .load::<Evaluator>(conn)
    }
}

pub async fn list_evaluators(mut conn: Conn) -> JsonResult<Vec<Evaluator>> {
    Ok(Json(Evaluator::all(&mut *conn)?))
}
