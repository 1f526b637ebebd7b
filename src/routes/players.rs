use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers::players;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/players", get(players::get_players))
        .route("/players", post(players::add_players))
        .route("/players", delete(players::delete_player))
        .route("/player_team_history", get(players::get_player_team_histories))
        .route("/player_team_history", post(players::add_player_team_histories))
        .route("/leave_team", post(players::leave_team))
}
