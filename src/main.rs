use axum::{http::Method, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

use courtside::config::AppConfig;
use courtside::database;
use courtside::routes;
use courtside::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = AppConfig::from_env();

    let pg = match database::postgres::connect(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("❌ Failed to connect to Postgres: {}", e);
            std::process::exit(1);
        }
    };

    let live = match database::redis::connect(&config.redis_url).await {
        Ok(live) => live,
        Err(e) => {
            tracing::error!("❌ Failed to connect to Redis: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState::new(pg, live);
    let app = build_router(state);
    start_server(app, config.port).await;
}

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .nest("/api/teams", routes::teams::routes())
        .nest("/api/matches", routes::matches::routes())
        .nest("/api", routes::players::routes())
        .nest("/api", routes::live::routes())
        .nest("/api", routes::season::routes())
        .layer(cors)
        .with_state(state)
}

async fn start_server(app: Router, port: u16) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("🚀 Server starting on {}", addr);

    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Server error: {}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    }
}

async fn root_handler() -> &'static str {
    "🏀 Courtside live match stats API"
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
