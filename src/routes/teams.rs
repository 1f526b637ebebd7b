use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::teams;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(teams::get_teams))
        .route("/", post(teams::add_teams))
        .route("/:teamId/players", get(teams::get_team_active_players))
}
