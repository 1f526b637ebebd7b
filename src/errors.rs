// src/errors.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Postgres error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Invalid minute value: {0}")]
    BadTime(String),

    #[error("Unknown stat '{0}'")]
    UnknownStat(String),

    #[error("Bad roster: {0}")]
    BadRoster(String),

    #[error("Team {0} is not playing in this match")]
    TeamNotInMatch(i64),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Match {0} already started")]
    AlreadyStarted(i64),

    #[error("No live session for match {0}")]
    NoSession(i64),

    #[error("Player is not on court")]
    PlayerOut,

    #[error("Player cannot go out before going in")]
    OutBeforeIn,

    #[error("Player is already {0}")]
    DoubleInOrOut(&'static str),

    #[error("Player has fouled out")]
    FouledOut,

    #[error("Match {0} not found")]
    NoSuchMatch(i64),

    #[error("{0}")]
    NotFound(String),

    #[error("Synced {synced} of {total} events; live log retained for retry")]
    SyncIncomplete { synced: usize, total: usize },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Database(e) => {
                tracing::error!("Postgres error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            AppError::Redis(e) => {
                tracing::error!("Redis error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Live store error".to_string())
            }
            AppError::SyncIncomplete { synced, total } => {
                tracing::error!("End-match sync incomplete: {}/{} events written", synced, total);
                (StatusCode::INTERNAL_SERVER_ERROR, "Sync incomplete".to_string())
            }
            AppError::BadTime(_) => (StatusCode::BAD_REQUEST, "Invalid minute value".to_string()),
            AppError::UnknownStat(_) => (StatusCode::BAD_REQUEST, "Unknown stat".to_string()),
            AppError::BadRoster(_) => (StatusCode::BAD_REQUEST, "Bad roster".to_string()),
            AppError::TeamNotInMatch(_) => (StatusCode::BAD_REQUEST, "Team not in match".to_string()),
            AppError::MissingField(_) => (StatusCode::BAD_REQUEST, "Missing field".to_string()),
            AppError::AlreadyStarted(_) => (StatusCode::BAD_REQUEST, "Match already started".to_string()),
            AppError::NoSession { .. } => (StatusCode::BAD_REQUEST, "No live session".to_string()),
            AppError::PlayerOut => (StatusCode::BAD_REQUEST, "Player is not on court".to_string()),
            AppError::OutBeforeIn => (StatusCode::BAD_REQUEST, "Player has not entered".to_string()),
            AppError::DoubleInOrOut(_) => (StatusCode::BAD_REQUEST, "Duplicate in/out".to_string()),
            AppError::FouledOut => (StatusCode::FORBIDDEN, "Player has fouled out".to_string()),
            AppError::NoSuchMatch(_) => (StatusCode::NOT_FOUND, "Match not found".to_string()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found".to_string()),
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "Validation failed".to_string()),
        };

        // Infra details stay in the logs; domain errors are surfaced verbatim.
        let message = match &self {
            AppError::Database(_) | AppError::Redis(_) => error_message.clone(),
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
            "message": message,
            "success": false,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ValidationError(format!("JSON parsing error: {}", err))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::ValidationError(format!("Integer parsing error: {}", err))
    }
}

// Helper conversion functions
impl AppError {
    pub fn bad_time(raw: impl Into<String>) -> Self {
        AppError::BadTime(raw.into())
    }

    pub fn bad_roster(msg: impl Into<String>) -> Self {
        AppError::BadRoster(msg.into())
    }

    pub fn invalid_data(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
