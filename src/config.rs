use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    state::DbPool,
    tournaments::{
        evaluators::list_evaluators,
        export::export_aggregate_csv,
        groups::schedule_groups,
        latest_tournament,
        managers::list_managers,
        picks::submit_pick,
        standings::{
            aggregate::tournament_aggregate, evaluator_standings,
            tournament_scores,
        },
    },
};

pub fn create_app(pool: DbPool) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/managers", get(list_managers))
        .route("/evaluators", get(list_evaluators))
        .route("/tournaments/latest", get(latest_tournament))
        .route(
            "/tournaments/:tournament_id/evaluators/:evaluator_id/rounds/:round_index/groups",
            post(schedule_groups),
        )
        .route(
            "/tournaments/:tournament_id/evaluators/:evaluator_id/rounds/:round_index/groups/:group_index/pick",
            post(submit_pick),
        )
        .route(
            "/tournaments/:tournament_id/evaluators/:evaluator_id/standings",
            get(evaluator_standings),
        )
        .route("/tournaments/:tournament_id/scores", get(tournament_scores))
        .route(
            "/tournaments/:tournament_id/aggregate",
            get(tournament_aggregate),
        )
        .route(
            "/tournaments/:tournament_id/export",
            get(export_aggregate_csv),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(pool)
}

async fn health() -> &'static str {
    "ok"
}
