use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::errors::Result;
use crate::models::team::{ActivePlayer, CreateTeam, Team};
use crate::state::AppState;

/// GET /api/teams
pub async fn get_teams(State(state): State<AppState>) -> Result<Json<Vec<Team>>> {
    let teams = sqlx::query_as::<_, Team>("SELECT team_id, team_name FROM teams ORDER BY team_id")
        .fetch_all(&state.pg)
        .await?;
    Ok(Json(teams))
}

/// POST /api/teams: bulk insert, ids are assigned by the database.
pub async fn add_teams(
    State(state): State<AppState>,
    Json(teams): Json<Vec<CreateTeam>>,
) -> Result<Json<Value>> {
    for team in &teams {
        sqlx::query("INSERT INTO teams (team_name) VALUES ($1)")
            .bind(&team.team_name)
            .execute(&state.pg)
            .await?;
    }
    tracing::info!("Added {} teams", teams.len());
    Ok(Json(json!({
        "success": true,
        "message": "Teams added successfully.",
    })))
}

/// GET /api/teams/:teamId/players: the team's current roster.
pub async fn get_team_active_players(
    State(state): State<AppState>,
    Path(team_id): Path<i64>,
) -> Result<Json<Vec<ActivePlayer>>> {
    let players = sqlx::query_as::<_, ActivePlayer>(
        "SELECT p.player_id AS id,
                CONCAT(p.first_name, ' ', p.last_name) AS full_name
         FROM player_team_history pth
         JOIN players p ON p.player_id = pth.player_id
         WHERE pth.team_id = $1 AND pth.end_date IS NULL
         ORDER BY p.player_id",
    )
    .bind(team_id)
    .fetch_all(&state.pg)
    .await?;
    Ok(Json(players))
}
