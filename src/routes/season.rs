use axum::{routing::get, Router};

use crate::handlers::season;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/player_stats/:playerId/:seasonYear",
            get(season::get_player_season_stats),
        )
        .route(
            "/average_stat/:season/:entity/:entityId/:stat",
            get(season::get_average_stat),
        )
}
