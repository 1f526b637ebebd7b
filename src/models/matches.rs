use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Match {
    pub match_id: i64,
    pub date: NaiveDate,
    pub home_team: i64,
    pub away_team: i64,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMatch {
    pub date: Option<NaiveDate>,
    #[serde(rename = "homeTeam")]
    pub home_team: Option<i64>,
    #[serde(rename = "awayTeam")]
    pub away_team: Option<i64>,
}

/// One persisted event row, as returned by the season endpoints.
#[derive(Debug, Serialize, FromRow)]
pub struct MatchStatRow {
    pub match_id: i64,
    pub player_id: i64,
    pub minute: f32,
    pub stat: String,
}
