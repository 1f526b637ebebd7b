use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Player {
    pub player_id: i64,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlayer {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct DeletePlayerRequest {
    #[serde(rename = "playerId")]
    pub player_id: i64,
}

/// Joined listing row: who played where, and when.
#[derive(Debug, Serialize, FromRow)]
pub struct PlayerTeamHistory {
    #[serde(rename = "playerId")]
    pub player_id: i64,
    #[serde(rename = "playerFullName")]
    pub player_full_name: String,
    #[serde(rename = "teamId")]
    pub team_id: i64,
    #[serde(rename = "teamName")]
    pub team_name: String,
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    /// Open interval while the player is still on the team.
    #[serde(rename = "endDate")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlayerTeamHistory {
    #[serde(rename = "playerId")]
    pub player_id: i64,
    #[serde(rename = "teamId")]
    pub team_id: i64,
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    #[serde(rename = "endDate", default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct LeaveTeamRequest {
    pub player_id: i64,
    pub team_id: i64,
    pub end_date: NaiveDate,
}
