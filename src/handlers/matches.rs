use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::errors::{AppError, Result};
use crate::models::matches::{CreateMatch, Match};
use crate::state::AppState;

/// GET /api/matches
pub async fn get_matches(State(state): State<AppState>) -> Result<Json<Vec<Match>>> {
    let matches = sqlx::query_as::<_, Match>(
        "SELECT match_id, date, home_team, away_team, home_score, away_score
         FROM matches ORDER BY match_id",
    )
    .fetch_all(&state.pg)
    .await?;
    Ok(Json(matches))
}

/// POST /api/matches: bulk insert of scheduled matches; scores stay
/// NULL until the match is ended and synced.
pub async fn add_matches(
    State(state): State<AppState>,
    Json(matches): Json<Vec<CreateMatch>>,
) -> Result<Json<Value>> {
    for entry in &matches {
        let date = entry.date.ok_or(AppError::MissingField("date"))?;
        let home_team = entry.home_team.ok_or(AppError::MissingField("homeTeam"))?;
        let away_team = entry.away_team.ok_or(AppError::MissingField("awayTeam"))?;

        sqlx::query("INSERT INTO matches (date, home_team, away_team) VALUES ($1, $2, $3)")
            .bind(date)
            .bind(home_team)
            .bind(away_team)
            .execute(&state.pg)
            .await?;

        tracing::info!("Match added: {} - home {} vs away {}", date, home_team, away_team);
    }
    Ok(Json(json!({
        "success": true,
        "message": "Matches added successfully",
    })))
}
