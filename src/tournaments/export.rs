use axum::{
    extract::Path,
    http::header,
    response::IntoResponse,
};

use crate::{
    state::Conn,
    tournaments::{Tournament, standings::aggregate::Aggregate},
    util_resp::ApiError,
};

/// Downloads the aggregate ranking as CSV, one row per manager in final
/// order.
pub async fn export_aggregate_csv(
    Path(tournament_id): Path<String>,
    mut conn: Conn,
) -> Result<impl IntoResponse, ApiError> {
    let tournament = Tournament::fetch(&tournament_id, &mut *conn)?;
    let aggregate = Aggregate::fetch(&tournament.id, &mut *conn)?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "name",
            "avg_points",
            "stability",
            "top1_total",
            "bottom1_total",
            "sos",
            "rank",
        ])
        .expect("writing csv to memory cannot fail");

    for (index, entry) in aggregate.entries.iter().enumerate() {
        writer
            .write_record([
                entry.name.clone(),
                format!("{:.2}", entry.avg_points),
                format!("{:.2}", entry.stability),
                entry.top1_total.to_string(),
                entry.bottom1_total.to_string(),
                format!("{:.2}", entry.tiebreak.sos),
                (index + 1).to_string(),
            ])
            .expect("writing csv to memory cannot fail");
    }

    let body = String::from_utf8(
        writer
            .into_inner()
            .expect("flushing csv to memory cannot fail"),
    )
    .expect("csv output is utf-8");

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/csv; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"results-{}.csv\"",
                    tournament.id
                ),
            ),
        ],
        body,
    ))
}
