use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{PgPool, Row};

use crate::errors::{AppError, Result};
use crate::models::matches::Match;
use crate::models::stat::{StatEvent, StatRequest, StatSummary, StatTag};
use crate::services::aggregator;
use crate::services::clock::{GameTime, FULL_TIME, TIP_OFF};
use crate::services::live_log::{self, LiveLog};
use crate::services::validator::{self, FOUL_LIMIT};
use crate::state::AppState;

pub const ROSTER_SIZE: usize = 5;

/// Summary scope of a live query.
#[derive(Debug, Clone, Copy)]
pub enum SummaryScope {
    Player(i64),
    Team(i64),
}

/// What `end_match` hands back after a fully successful sync.
#[derive(Debug, Serialize)]
pub struct MatchOutcome {
    pub match_id: i64,
    pub home_team: i64,
    pub away_team: i64,
    pub home_points: u32,
    pub away_points: u32,
    pub events_synced: usize,
}

/// Starts a match: validates both rosters against the registry, copies
/// the match date into the live store, writes the player→team map,
/// seeds `in@00.00` for all ten players and flips the started flag.
pub async fn start_match(
    state: &AppState,
    match_id: i64,
    rosters: HashMap<i64, Vec<i64>>,
) -> Result<()> {
    if state.live.is_started(match_id).await? {
        return Err(AppError::AlreadyStarted(match_id));
    }

    let row = match_row(&state.pg, match_id)
        .await?
        .ok_or(AppError::NoSuchMatch(match_id))?;

    if rosters.len() != 2 {
        return Err(AppError::bad_roster(format!(
            "expected exactly 2 teams, got {}",
            rosters.len()
        )));
    }

    for (&team_id, players) in &rosters {
        if team_id != row.home_team && team_id != row.away_team {
            return Err(AppError::TeamNotInMatch(team_id));
        }
        if players.len() != ROSTER_SIZE {
            return Err(AppError::bad_roster(format!(
                "team {} must field exactly {} players, got {}",
                team_id,
                ROSTER_SIZE,
                players.len()
            )));
        }
        for &player_id in players {
            if !on_team(&state.pg, player_id, team_id, row.date).await? {
                return Err(AppError::bad_roster(format!(
                    "player {} is not on team {} on {}",
                    player_id, team_id, row.date
                )));
            }
        }
    }

    state.live.set_match_date(match_id, row.date).await?;

    for (&team_id, players) in &rosters {
        for &player_id in players {
            state
                .live
                .set_player_team(match_id, player_id, team_id)
                .await?;
            seed_opening_in(&state.live, match_id, team_id, player_id).await?;
        }
    }

    state.live.mark_started(match_id).await?;
    state.live.register_active(match_id).await?;

    tracing::info!("Match {} started ({} vs {})", match_id, row.home_team, row.away_team);
    Ok(())
}

/// Seeding is idempotent: a retried start never doubles the opening `in`.
async fn seed_opening_in(live: &LiveLog, match_id: i64, team_id: i64, player_id: i64) -> Result<()> {
    let opening = StatEvent::new(TIP_OFF, StatTag::In);
    let existing = live.events(match_id, team_id, player_id).await?;
    if existing.events.contains(&opening) {
        return Ok(());
    }
    live.append(match_id, team_id, player_id, &opening).await
}

/// Validates one candidate event against the player's log and appends it.
/// The sixth foul additionally appends a synthetic `out` at the same
/// game time.
pub async fn add_stat(
    state: &AppState,
    match_id: i64,
    player_id: i64,
    minute_raw: &str,
    stat_raw: &str,
) -> Result<()> {
    let minute = GameTime::parse(minute_raw).map_err(|_| AppError::bad_time(minute_raw))?;
    let stat: StatTag = stat_raw
        .parse()
        .map_err(|_| AppError::UnknownStat(stat_raw.to_string()))?;
    if !stat.is_ingestible() {
        return Err(AppError::UnknownStat(stat_raw.to_string()));
    }

    let team_id = state
        .live
        .player_team(match_id, player_id)
        .await?
        .ok_or(AppError::NoSession(match_id))?;

    let log = state.live.events(match_id, team_id, player_id).await?;
    let candidate = StatEvent::new(minute, stat);
    validator::check(&candidate, &log.events)?;

    state.live.append(match_id, team_id, player_id, &candidate).await?;

    if stat == StatTag::Fouls && validator::foul_count(&log.events) + 1 == FOUL_LIMIT {
        let forced_out = StatEvent::new(minute, StatTag::Out);
        state
            .live
            .append(match_id, team_id, player_id, &forced_out)
            .await?;
        tracing::info!(
            "Player {} fouled out of match {} at {}",
            player_id,
            match_id,
            minute
        );
    }

    Ok(())
}

/// Computes a live summary for one player or one team of a match.
pub async fn summary(
    state: &AppState,
    match_id: i64,
    scope: SummaryScope,
    request: &StatRequest,
) -> Result<StatSummary> {
    let logs = read_match_logs(&state.live, match_id).await?;
    let all_events: Vec<StatEvent> = logs.iter().flat_map(|l| l.events.iter().copied()).collect();
    let closing = aggregator::reference_closing_time(&all_events);

    match scope {
        SummaryScope::Player(player_id) => {
            let team_id = state
                .live
                .player_team(match_id, player_id)
                .await?
                .ok_or(AppError::NoSession(match_id))?;
            let events = logs
                .iter()
                .find(|l| l.team_id == team_id && l.player_id == player_id)
                .map(|l| l.events.as_slice())
                .unwrap_or(&[]);
            Ok(aggregator::summarize(events, request, closing))
        }
        SummaryScope::Team(team_id) => {
            let team_logs: Vec<Vec<StatEvent>> = logs
                .iter()
                .filter(|l| l.team_id == team_id)
                .map(|l| l.events.clone())
                .collect();
            Ok(aggregator::summarize_team(&team_logs, request, closing))
        }
    }
}

/// Ends a match: appends the terminal `out@48.00` to every player log,
/// flattens the live store into `matches_stats`, derives the final
/// score, and, only when every event made it, drops the volatile keys.
pub async fn end_match(state: &AppState, match_id: i64) -> Result<MatchOutcome> {
    if !state.live.is_started(match_id).await? {
        return Err(AppError::NoSession(match_id));
    }
    let row = match_row(&state.pg, match_id)
        .await?
        .ok_or(AppError::NoSuchMatch(match_id))?;

    let terminal = StatEvent::new(FULL_TIME, StatTag::Out);
    for key in state.live.stats_keys(match_id).await? {
        if let Some((team_id, player_id)) = live_log::ids_from_stats_key(&key) {
            state.live.append(match_id, team_id, player_id, &terminal).await?;
        }
    }

    let match_date = state
        .live
        .match_date(match_id)
        .await?
        .unwrap_or(row.date);

    let logs = read_match_logs(&state.live, match_id).await?;

    // Inserts are independent; one failure never aborts the rest. The
    // volatile log survives any partial sync so the end can be retried.
    let mut synced = 0usize;
    let mut failed = 0usize;
    for log in &logs {
        failed += log.poisoned;
        for event in &log.events {
            match insert_stat_row(&state.pg, match_id, log.team_id, log.player_id, event, match_date)
                .await
            {
                Ok(()) => synced += 1,
                Err(e) => {
                    tracing::error!(
                        "Failed to persist {}@{} for player {} in match {}: {}",
                        event.stat,
                        event.minute,
                        log.player_id,
                        match_id,
                        e
                    );
                    failed += 1;
                }
            }
        }
    }

    let points_request = StatRequest::of([StatTag::Points]);
    let home_points = team_points(&logs, row.home_team, &points_request);
    let away_points = team_points(&logs, row.away_team, &points_request);

    sqlx::query("UPDATE matches SET home_score = $1, away_score = $2 WHERE match_id = $3")
        .bind(home_points as i64)
        .bind(away_points as i64)
        .bind(match_id)
        .execute(&state.pg)
        .await?;

    if failed > 0 {
        return Err(AppError::SyncIncomplete {
            synced,
            total: synced + failed,
        });
    }

    state.live.purge_match(match_id).await?;
    tracing::info!(
        "Match {} ended {}:{}, {} events persisted",
        match_id,
        home_points,
        away_points,
        synced
    );

    Ok(MatchOutcome {
        match_id,
        home_team: row.home_team,
        away_team: row.away_team,
        home_points,
        away_points,
        events_synced: synced,
    })
}

pub async fn active_matches(state: &AppState) -> Result<Vec<i64>> {
    state.live.active_matches().await
}

struct PlayerLog {
    team_id: i64,
    player_id: i64,
    events: Vec<StatEvent>,
    poisoned: usize,
}

async fn read_match_logs(live: &LiveLog, match_id: i64) -> Result<Vec<PlayerLog>> {
    let mut logs = Vec::new();
    for key in live.stats_keys(match_id).await? {
        let Some((team_id, player_id)) = live_log::ids_from_stats_key(&key) else {
            continue;
        };
        let read = live.events_at(&key).await?;
        logs.push(PlayerLog {
            team_id,
            player_id,
            events: read.events,
            poisoned: read.poisoned,
        });
    }
    Ok(logs)
}

fn team_points(logs: &[PlayerLog], team_id: i64, request: &StatRequest) -> u32 {
    let team_logs: Vec<Vec<StatEvent>> = logs
        .iter()
        .filter(|l| l.team_id == team_id)
        .map(|l| l.events.clone())
        .collect();
    aggregator::summarize_team(&team_logs, request, TIP_OFF)
        .points
        .unwrap_or(0)
}

async fn insert_stat_row(
    pg: &PgPool,
    match_id: i64,
    team_id: i64,
    player_id: i64,
    event: &StatEvent,
    match_date: NaiveDate,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO matches_stats (match_id, team_id, player_id, minute, stat, match_date)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(match_id)
    .bind(team_id)
    .bind(player_id)
    .bind(event.minute.as_minute_real() as f32)
    .bind(event.stat.as_str())
    .bind(match_date)
    .execute(pg)
    .await?;
    Ok(())
}

async fn match_row(pg: &PgPool, match_id: i64) -> Result<Option<Match>> {
    let row = sqlx::query_as::<_, Match>(
        "SELECT match_id, date, home_team, away_team, home_score, away_score
         FROM matches WHERE match_id = $1",
    )
    .bind(match_id)
    .fetch_optional(pg)
    .await?;
    Ok(row)
}

/// Membership check against `player_team_history`: the interval must
/// contain the match date; an absent end date means still on the team.
async fn on_team(pg: &PgPool, player_id: i64, team_id: i64, on: NaiveDate) -> Result<bool> {
    let row = sqlx::query(
        "SELECT EXISTS (
            SELECT 1 FROM player_team_history
            WHERE player_id = $1 AND team_id = $2
              AND start_date <= $3
              AND (end_date IS NULL OR end_date >= $3)
        ) AS on_team",
    )
    .bind(player_id)
    .bind(team_id)
    .bind(on)
    .fetch_one(pg)
    .await?;
    Ok(row.get::<bool, _>("on_team"))
}
