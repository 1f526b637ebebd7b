use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::errors::Result;

pub async fn connect(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    bootstrap_schema(&pool).await?;
    tracing::info!("Postgres connected");
    Ok(pool)
}

/// Creates the registry and event tables when missing. In a real
/// deployment this belongs to an infrastructure tool; for now the
/// service owns its schema the same way it owns its keyspace.
async fn bootstrap_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS teams (
            team_id BIGSERIAL PRIMARY KEY,
            team_name TEXT NOT NULL UNIQUE
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS players (
            player_id BIGSERIAL PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS player_team_history (
            history_id BIGSERIAL PRIMARY KEY,
            player_id BIGINT REFERENCES players(player_id) ON DELETE CASCADE,
            team_id BIGINT REFERENCES teams(team_id) ON DELETE CASCADE,
            start_date DATE NOT NULL,
            end_date DATE
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_unique_player_team_history
         ON player_team_history (player_id, team_id, COALESCE(end_date, DATE '9999-12-31'))",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS matches (
            match_id BIGSERIAL PRIMARY KEY,
            date DATE NOT NULL,
            home_team BIGINT REFERENCES teams(team_id) ON DELETE CASCADE,
            away_team BIGINT REFERENCES teams(team_id) ON DELETE CASCADE,
            home_score BIGINT,
            away_score BIGINT
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_unique_match_date
         ON matches (date, home_team, away_team)",
    )
    .execute(pool)
    .await?;

    // No uniqueness key on purpose: a retried partial sync may duplicate
    // rows, which operators deduplicate by hand.
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS matches_stats (
            match_id BIGINT REFERENCES matches(match_id) ON DELETE CASCADE,
            team_id BIGINT REFERENCES teams(team_id) ON DELETE CASCADE,
            player_id BIGINT REFERENCES players(player_id) ON DELETE CASCADE,
            minute REAL,
            stat TEXT NOT NULL,
            match_date DATE NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}
