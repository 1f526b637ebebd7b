use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde_json::{json, Value};
use sqlx::Row;

use crate::errors::{AppError, Result};
use crate::models::matches::MatchStatRow;
use crate::models::stat::StatTag;
use crate::services::clock::GameTime;
use crate::state::AppState;

/// GET /api/player_stats/:playerId/:seasonYear?stat=assists
///
/// Raw persisted event rows for one player across a season.
pub async fn get_player_season_stats(
    State(state): State<AppState>,
    Path((player_id, season_year)): Path<(i64, i32)>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<MatchStatRow>>> {
    let stat_filter = match params.get("stat") {
        Some(raw) => Some(
            raw.parse::<StatTag>()
                .map_err(|_| AppError::UnknownStat(raw.clone()))?,
        ),
        None => None,
    };

    let base = "SELECT ms.match_id, ms.player_id, ms.minute, ms.stat
                FROM matches_stats ms
                JOIN matches m ON ms.match_id = m.match_id
                WHERE ms.player_id = $1
                  AND EXTRACT(YEAR FROM m.date) = $2";

    let rows = match stat_filter {
        Some(tag) => {
            sqlx::query_as::<_, MatchStatRow>(&format!("{} AND ms.stat = $3", base))
                .bind(player_id)
                .bind(season_year)
                .bind(tag.as_str())
                .fetch_all(&state.pg)
                .await?
        }
        None => {
            sqlx::query_as::<_, MatchStatRow>(base)
                .bind(player_id)
                .bind(season_year)
                .fetch_all(&state.pg)
                .await?
        }
    };

    Ok(Json(rows))
}

/// GET /api/average_stat/:season/:entity/:entityId/:stat
///
/// Seasonal per-game average over the persisted event table. Counted
/// stats divide the row count by the number of distinct matches;
/// `points` weighs the field goals first; `minutes` replays the paired
/// in/out walk per match and reports decimal minutes per game.
pub async fn get_average_stat(
    State(state): State<AppState>,
    Path((season, entity, entity_id, stat)): Path<(i32, String, i64, String)>,
) -> Result<Json<Value>> {
    let tag: StatTag = stat
        .parse()
        .map_err(|_| AppError::UnknownStat(stat.clone()))?;
    let entity_column = match entity.as_str() {
        "player" => "ms.player_id",
        "team" => "ms.team_id",
        other => {
            return Err(AppError::invalid_data(format!(
                "entity must be 'player' or 'team', got '{}'",
                other
            )))
        }
    };

    let games = distinct_games(&state, entity_column, entity_id, season).await?;
    if games == 0 {
        return Ok(Json(average_body(season, &entity, entity_id, tag, 0.0, 0)));
    }

    let average = match tag {
        StatTag::Points => {
            let total: i64 = sqlx::query(&format!(
                "SELECT COALESCE(SUM(CASE ms.stat
                        WHEN '1pt' THEN 1 WHEN '2pt' THEN 2 WHEN '3pt' THEN 3
                        ELSE 0 END), 0) AS total
                 FROM matches_stats ms
                 JOIN matches m ON ms.match_id = m.match_id
                 WHERE {} = $1 AND EXTRACT(YEAR FROM m.date) = $2",
                entity_column
            ))
            .bind(entity_id)
            .bind(season)
            .fetch_one(&state.pg)
            .await?
            .get("total");
            total as f64 / games as f64
        }
        StatTag::Minutes => {
            let rows = sqlx::query_as::<_, MatchStatRow>(&format!(
                "SELECT ms.match_id, ms.player_id, ms.minute, ms.stat
                 FROM matches_stats ms
                 JOIN matches m ON ms.match_id = m.match_id
                 WHERE {} = $1 AND EXTRACT(YEAR FROM m.date) = $2
                   AND ms.stat IN ('in', 'out')
                 ORDER BY ms.match_id, ms.player_id, ms.minute",
                entity_column
            ))
            .bind(entity_id)
            .bind(season)
            .fetch_all(&state.pg)
            .await?;
            paired_seconds(&rows) as f64 / games as f64 / 60.0
        }
        counted => {
            let total: i64 = sqlx::query(&format!(
                "SELECT COUNT(*) AS total
                 FROM matches_stats ms
                 JOIN matches m ON ms.match_id = m.match_id
                 WHERE {} = $1 AND EXTRACT(YEAR FROM m.date) = $2 AND ms.stat = $3",
                entity_column
            ))
            .bind(entity_id)
            .bind(season)
            .bind(counted.as_str())
            .fetch_one(&state.pg)
            .await?
            .get("total");
            total as f64 / games as f64
        }
    };

    Ok(Json(average_body(season, &entity, entity_id, tag, average, games)))
}

async fn distinct_games(
    state: &AppState,
    entity_column: &str,
    entity_id: i64,
    season: i32,
) -> Result<i64> {
    let games: i64 = sqlx::query(&format!(
        "SELECT COUNT(DISTINCT ms.match_id) AS games
         FROM matches_stats ms
         JOIN matches m ON ms.match_id = m.match_id
         WHERE {} = $1 AND EXTRACT(YEAR FROM m.date) = $2",
        entity_column
    ))
    .bind(entity_id)
    .bind(season)
    .fetch_one(&state.pg)
    .await?
    .get("games");
    Ok(games)
}

/// Pairs `in` with the following `out` per (match, player). Rows arrive
/// sorted; a dangling `in` (possible only after a partial sync) is
/// dropped rather than guessed at.
fn paired_seconds(rows: &[MatchStatRow]) -> u64 {
    let mut total = 0u64;
    let mut current: Option<(i64, i64)> = None;
    let mut in_time: Option<GameTime> = None;

    for row in rows {
        let key = (row.match_id, row.player_id);
        if current != Some(key) {
            current = Some(key);
            in_time = None;
        }

        let Ok(minute) = GameTime::from_minute_real(row.minute as f64) else {
            continue;
        };
        match row.stat.as_str() {
            "in" => in_time = Some(minute),
            "out" => {
                if let Some(entered) = in_time.take() {
                    total += entered.diff(minute).total_secs() as u64;
                }
            }
            _ => {}
        }
    }
    total
}

fn average_body(
    season: i32,
    entity: &str,
    entity_id: i64,
    tag: StatTag,
    average: f64,
    games: i64,
) -> Value {
    json!({
        "season": season,
        "entity": entity,
        "entityId": entity_id,
        "stat": tag.as_str(),
        "average": average,
        "games": games,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(match_id: i64, player_id: i64, minute: f32, stat: &str) -> MatchStatRow {
        MatchStatRow {
            match_id,
            player_id,
            minute,
            stat: stat.to_string(),
        }
    }

    #[test]
    fn pairs_intervals_within_one_match() {
        let rows = vec![
            row(1, 101, 0.0, "in"),
            row(1, 101, 12.30, "out"),
            row(1, 101, 24.00, "in"),
            row(1, 101, 48.00, "out"),
        ];
        // 12m30s + 24m = 36m30s
        assert_eq!(paired_seconds(&rows), 36 * 60 + 30);
    }

    #[test]
    fn interval_state_resets_between_matches() {
        let rows = vec![
            row(1, 101, 40.00, "in"),
            // Terminal out missing from match 1 (partial sync); the
            // dangling in must not leak into match 2.
            row(2, 101, 0.0, "in"),
            row(2, 101, 10.00, "out"),
        ];
        assert_eq!(paired_seconds(&rows), 10 * 60);
    }

    #[test]
    fn double_out_adds_nothing() {
        let rows = vec![
            row(1, 101, 0.0, "in"),
            row(1, 101, 10.00, "out"),
            row(1, 101, 48.00, "out"),
        ];
        assert_eq!(paired_seconds(&rows), 10 * 60);
    }
}
