//! Roster and tournament seeding.
//!
//! The evaluator and manager rosters are externally supplied data, applied
//! once at startup (`--seed roster.toml`) or called directly by tests and the
//! simulation binary. Roster rows are keyed by name and survive repeated
//! seeding unchanged; every invocation creates one fresh tournament.

use chrono::Utc;
use diesel::{Connection, connection::LoadConnection, prelude::*, sqlite::Sqlite};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    schema::{evaluators, managers, tournaments},
    util_resp::{ApiError, bad_request},
};

#[derive(Deserialize, Clone, Debug)]
pub struct SeedConfig {
    pub title: String,
    pub rounds: i64,
    pub group_size: i64,
    pub evaluators: Vec<String>,
    pub managers: Vec<SeedManager>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SeedManager {
    pub name: String,
    pub department: Option<String>,
    pub external_id: Option<String>,
}

/// Applies the seed and returns the id of the tournament it created.
pub fn seed_database(
    config: &SeedConfig,
    conn: &mut (impl Connection<Backend = Sqlite> + LoadConnection),
) -> Result<String, ApiError> {
    if config.rounds < 1 {
        return Err(bad_request("a tournament needs at least one round"));
    }
    // three distinct picks are required per group
    if config.group_size < 3 {
        return Err(bad_request("group size must be at least 3"));
    }
    if config.evaluators.is_empty() {
        return Err(bad_request("the evaluator roster is empty"));
    }
    if config.managers.is_empty() {
        return Err(bad_request("the manager roster is empty"));
    }

    let tournament_id = conn.transaction(|conn| -> Result<String, ApiError> {
        for name in &config.evaluators {
            diesel::insert_into(evaluators::table)
                .values((
                    evaluators::id.eq(Uuid::now_v7().to_string()),
                    evaluators::name.eq(name),
                    evaluators::created_at.eq(Utc::now().naive_utc()),
                ))
                .on_conflict(evaluators::name)
                .do_nothing()
                .execute(conn)?;
        }

        for manager in &config.managers {
            diesel::insert_into(managers::table)
                .values((
                    managers::id.eq(Uuid::now_v7().to_string()),
                    managers::name.eq(&manager.name),
                    managers::department.eq(manager.department.as_deref()),
                    managers::external_id.eq(manager.external_id.as_deref()),
                    managers::created_at.eq(Utc::now().naive_utc()),
                ))
                .on_conflict(managers::name)
                .do_nothing()
                .execute(conn)?;
        }

        let tournament_id = Uuid::now_v7().to_string();
        diesel::insert_into(tournaments::table)
            .values((
                tournaments::id.eq(&tournament_id),
                tournaments::title.eq(&config.title),
                tournaments::rounds.eq(config.rounds),
                tournaments::group_size.eq(config.group_size),
                tournaments::created_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;

        Ok(tournament_id)
    })?;

    tracing::info!(
        evaluators = config.evaluators.len(),
        managers = config.managers.len(),
        rounds = config.rounds,
        group_size = config.group_size,
        "seed applied"
    );

    Ok(tournament_id)
}
