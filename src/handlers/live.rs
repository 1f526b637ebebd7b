use std::collections::HashMap;

use axum::{
    extract::{Path, RawQuery, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::{AppError, Result};
use crate::models::stat::{StatRequest, StatSummary};
use crate::services::match_service::{self, SummaryScope};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchStatPayload {
    #[serde(rename = "matchId")]
    pub match_id: Option<i64>,
    #[serde(rename = "playerId")]
    pub player_id: Option<i64>,
    pub minute: Option<String>,
    pub stat: Option<String>,
}

/// POST /api/start_match/:matchId
///
/// Body maps each of the two team ids to its five-player roster:
/// `{"1": [101, …, 105], "2": [201, …, 205]}`.
pub async fn start_match(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
    Json(rosters): Json<HashMap<i64, Vec<i64>>>,
) -> Result<Json<Value>> {
    match_service::start_match(&state, match_id, rosters).await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Match {} started", match_id),
    })))
}

/// POST /api/match_stat
pub async fn add_match_stat(
    State(state): State<AppState>,
    Json(payload): Json<MatchStatPayload>,
) -> Result<Json<Value>> {
    let match_id = payload.match_id.ok_or(AppError::MissingField("matchId"))?;
    let player_id = payload.player_id.ok_or(AppError::MissingField("playerId"))?;
    let minute = payload.minute.ok_or(AppError::MissingField("minute"))?;
    let stat = payload.stat.ok_or(AppError::MissingField("stat"))?;

    match_service::add_stat(&state, match_id, player_id, &minute, &stat).await?;
    Ok(Json(json!({ "success": true })))
}

/// POST /api/end_match/:matchId
pub async fn end_match(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
) -> Result<Json<Value>> {
    let outcome = match_service::end_match(&state, match_id).await?;
    Ok(Json(json!({
        "success": true,
        "match": outcome,
    })))
}

/// GET /api/match_stat/:matchId/:entity/:entityId?stat,stat,…
pub async fn get_entity_summary(
    State(state): State<AppState>,
    Path((match_id, entity, entity_id)): Path<(i64, String, i64)>,
    RawQuery(raw): RawQuery,
) -> Result<Json<StatSummary>> {
    let scope = match entity.as_str() {
        "player" => SummaryScope::Player(entity_id),
        "team" => SummaryScope::Team(entity_id),
        other => {
            return Err(AppError::invalid_data(format!(
                "entity must be 'player' or 'team', got '{}'",
                other
            )))
        }
    };
    let request = parse_stat_filter(raw)?;
    let summary = match_service::summary(&state, match_id, scope, &request).await?;
    Ok(Json(summary))
}

/// GET /api/match_stat/:matchId/:playerId: player-scoped shorthand.
pub async fn get_player_summary(
    State(state): State<AppState>,
    Path((match_id, player_id)): Path<(i64, i64)>,
    RawQuery(raw): RawQuery,
) -> Result<Json<StatSummary>> {
    let request = parse_stat_filter(raw)?;
    let summary =
        match_service::summary(&state, match_id, SummaryScope::Player(player_id), &request).await?;
    Ok(Json(summary))
}

/// GET /api/match_stats: ids of matches with any live state.
pub async fn get_active_matches(State(state): State<AppState>) -> Result<Json<Vec<i64>>> {
    let ids = match_service::active_matches(&state).await?;
    Ok(Json(ids))
}

fn parse_stat_filter(raw: Option<String>) -> Result<StatRequest> {
    match raw {
        Some(raw) => StatRequest::from_raw_query(&raw).map_err(AppError::UnknownStat),
        None => Ok(StatRequest::all()),
    }
}
