use axum::Json;
use diesel::{connection::LoadConnection, prelude::*, sqlite::Sqlite};
use serde::{Deserialize, Serialize};

use crate::{schema::managers, state::Conn, util_resp::JsonResult};

/// A ranked subject. Created once at roster seed, immutable thereafter.
#[derive(Serialize, Deserialize, Queryable, Clone, Debug)]
pub struct Manager {
    pub id: String,
    pub name: String,
    pub department: Option<String>,
    pub external_id: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

impl Manager {
    pub fn all(
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> Result<Vec<Manager>, diesel::result::Error> {
        managers::table
            .order(managers::name.asc())
            .load::<Manager>(conn)
    }

    pub fn all_ids(
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> Result<Vec<String>, diesel::result::Error> {
        managers::table
            .order(managers::id.asc())
            .select(managers::id)
            .load::<String>(conn)
    }
}

pub async fn list_managers(mut conn: Conn) -> JsonResult<Vec<Manager>> {
    Ok(Json(Manager::all(&mut *conn)?))
}
