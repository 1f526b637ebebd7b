use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Team {
    pub team_id: i64,
    pub team_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateTeam {
    #[serde(rename = "teamName")]
    pub team_name: String,
}

/// One row of a team's current lineup listing.
#[derive(Debug, Serialize, FromRow)]
pub struct ActivePlayer {
    pub id: i64,
    #[serde(rename = "fullName")]
    pub full_name: String,
}
