use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::live;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/start_match/:matchId", post(live::start_match))
        .route("/match_stat", post(live::add_match_stat))
        .route("/end_match/:matchId", post(live::end_match))
        .route("/match_stats", get(live::get_active_matches))
        .route("/match_stat/:matchId/:playerId", get(live::get_player_summary))
        .route(
            "/match_stat/:matchId/:entity/:entityId",
            get(live::get_entity_summary),
        )
}
