use sqlx::PgPool;

use crate::services::live_log::LiveLog;

/// Shared handles injected into every request handler: the durable
/// registry (Postgres) and the live match log (Redis). No other state
/// survives between requests.
#[derive(Clone)]
pub struct AppState {
    pub pg: PgPool,
    pub live: LiveLog,
}

impl AppState {
    pub fn new(pg: PgPool, live: LiveLog) -> Self {
        AppState { pg, live }
    }
}
