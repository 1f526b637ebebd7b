use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::errors::{AppError, Result};
use crate::models::player::{
    CreatePlayer, CreatePlayerTeamHistory, DeletePlayerRequest, LeaveTeamRequest, Player,
    PlayerTeamHistory,
};
use crate::state::AppState;

/// GET /api/players
pub async fn get_players(State(state): State<AppState>) -> Result<Json<Vec<Player>>> {
    let players = sqlx::query_as::<_, Player>(
        "SELECT player_id, first_name, last_name FROM players ORDER BY player_id",
    )
    .fetch_all(&state.pg)
    .await?;
    Ok(Json(players))
}

/// POST /api/players: bulk insert.
pub async fn add_players(
    State(state): State<AppState>,
    Json(players): Json<Vec<CreatePlayer>>,
) -> Result<Json<Value>> {
    for player in &players {
        sqlx::query("INSERT INTO players (first_name, last_name) VALUES ($1, $2)")
            .bind(&player.first_name)
            .bind(&player.last_name)
            .execute(&state.pg)
            .await?;
    }
    tracing::info!("Added {} players", players.len());
    Ok(Json(json!({
        "success": true,
        "message": "Players added successfully.",
    })))
}

/// DELETE /api/players: the FK cascade removes history and stat rows.
pub async fn delete_player(
    State(state): State<AppState>,
    Json(req): Json<DeletePlayerRequest>,
) -> Result<Json<Value>> {
    sqlx::query("DELETE FROM players WHERE player_id = $1")
        .bind(req.player_id)
        .execute(&state.pg)
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Player {} deleted successfully", req.player_id),
    })))
}

/// GET /api/player_team_history
pub async fn get_player_team_histories(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlayerTeamHistory>>> {
    let history = sqlx::query_as::<_, PlayerTeamHistory>(
        "SELECT p.player_id,
                CONCAT(p.first_name, ' ', p.last_name) AS player_full_name,
                t.team_id,
                t.team_name,
                pth.start_date,
                pth.end_date
         FROM player_team_history pth
         JOIN teams t ON pth.team_id = t.team_id
         JOIN players p ON pth.player_id = p.player_id
         ORDER BY pth.start_date, p.player_id",
    )
    .fetch_all(&state.pg)
    .await?;
    Ok(Json(history))
}

/// POST /api/player_team_history: bulk insert; an absent end date
/// leaves the interval open.
pub async fn add_player_team_histories(
    State(state): State<AppState>,
    Json(records): Json<Vec<CreatePlayerTeamHistory>>,
) -> Result<Json<Value>> {
    for record in &records {
        sqlx::query(
            "INSERT INTO player_team_history (player_id, team_id, start_date, end_date)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(record.player_id)
        .bind(record.team_id)
        .bind(record.start_date)
        .bind(record.end_date)
        .execute(&state.pg)
        .await?;
    }
    Ok(Json(json!({ "success": true })))
}

/// POST /api/leave_team: closes the open interval.
pub async fn leave_team(
    State(state): State<AppState>,
    Json(req): Json<LeaveTeamRequest>,
) -> Result<Json<Value>> {
    let result = sqlx::query(
        "UPDATE player_team_history
         SET end_date = $1
         WHERE player_id = $2 AND team_id = $3 AND end_date IS NULL",
    )
    .bind(req.end_date)
    .bind(req.player_id)
    .bind(req.team_id)
    .execute(&state.pg)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "No active record found for player {} on team {}",
            req.player_id, req.team_id
        )));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Player successfully left the team",
    })))
}
